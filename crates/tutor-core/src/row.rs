//! The digit-entry automaton.
//!
//! A [`DigitRow`] is one horizontal row of single-digit cells compared
//! position-wise against an expected answer. Typing into a cell moves
//! focus to the neighbour in the row's fill direction; arrow navigation
//! that reaches an edge turns the direction so the learner can keep
//! writing away from that edge.

use tracing::trace;
use tutor_model::{Digit, FillDirection, Side};

use crate::error::{CoreError, Result};
use crate::keys::sanitize_cell_input;

/// What a write did to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSignal {
    /// Nothing beyond updating the cell.
    Idle,
    /// Focus moved to the given cell.
    Advanced(usize),
    /// The terminal cell was written and every cell now holds a digit.
    Filled,
}

/// Display state of a single cell after the most recent validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Unchecked,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct DigitRow {
    expected: Vec<Digit>,
    cells: Vec<Option<Digit>>,
    active: Option<usize>,
    direction: FillDirection,
    validated: Option<Vec<bool>>,
}

impl DigitRow {
    /// Creates an empty row with one cell per character of `expected_answer`.
    pub fn new(expected_answer: &str, direction: FillDirection) -> Result<Self> {
        let invalid = || CoreError::InvalidExpectedAnswer(expected_answer.to_string());
        let expected = Digit::parse_all(expected_answer).map_err(|_| invalid())?;
        if expected.is_empty() {
            return Err(invalid());
        }
        let len = expected.len();
        Ok(Self {
            expected,
            cells: vec![None; len],
            active: None,
            direction,
            validated: None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Digit>] {
        &self.cells
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn direction(&self) -> FillDirection {
        self.direction
    }

    /// Per-cell results of the last validation; cleared by any edit.
    #[must_use]
    pub fn validated(&self) -> Option<&[bool]> {
        self.validated.as_deref()
    }

    #[must_use]
    pub fn expected_answer(&self) -> String {
        self.expected.iter().map(|d| d.as_char()).collect()
    }

    /// Entered digits with blanks for empty cells.
    #[must_use]
    pub fn entered(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map_or(' ', Digit::as_char))
            .collect()
    }

    #[must_use]
    pub fn cell_mark(&self, index: usize) -> CellMark {
        match self.validated.as_ref().and_then(|marks| marks.get(index)) {
            Some(true) => CellMark::Correct,
            Some(false) => CellMark::Incorrect,
            None => CellMark::Unchecked,
        }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// True when the last validation found every cell correct.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.validated
            .as_ref()
            .is_some_and(|marks| marks.iter().all(|ok| *ok))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(CoreError::CellOutOfRange {
                index,
                length: self.len(),
            });
        }
        Ok(())
    }

    /// Writes sanitized input into `index`. Empty input clears the cell
    /// without moving focus.
    pub fn set_cell(&mut self, index: usize, raw: &str) -> Result<RowSignal> {
        self.check_index(index)?;
        let value = sanitize_cell_input(raw);
        self.cells[index] = value;
        self.validated = None;
        self.active = Some(index);
        if value.is_none() {
            return Ok(RowSignal::Idle);
        }
        if let Some(next) = self.direction.next_index(index, self.len()) {
            trace!(from = index, to = next, "advance within row");
            self.active = Some(next);
            return Ok(RowSignal::Advanced(next));
        }
        if self.is_filled() {
            Ok(RowSignal::Filled)
        } else {
            Ok(RowSignal::Idle)
        }
    }

    /// Deletes at `index`. An already-empty cell passes the deletion to
    /// its left neighbour, so repeated deletes walk back through the row.
    /// Returns the index that now has focus.
    pub fn clear_cell(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        self.validated = None;
        let target = if self.cells[index].is_some() || index == 0 {
            index
        } else {
            index - 1
        };
        self.cells[target] = None;
        self.active = Some(target);
        Ok(target)
    }

    /// Arrow navigation. Focus clamps at the edges, and landing on an edge
    /// turns the fill direction away from it.
    pub fn move_focus(&mut self, side: Side) -> usize {
        let len = self.len();
        let current = self
            .active
            .unwrap_or_else(|| self.direction.first_index(len));
        let target = match side {
            Side::Left => current.saturating_sub(1),
            Side::Right => (current + 1).min(len - 1),
        };
        self.active = Some(target);
        self.turn_at_edge(target);
        target
    }

    /// Focus placed directly on a cell, e.g. by a pointer click.
    pub fn snap_focus(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active = Some(index);
        self.turn_at_edge(index);
        Ok(())
    }

    /// Focus the first empty cell in fill order, or the terminal cell
    /// when the row is full.
    pub fn focus_first_empty(&mut self) -> usize {
        let len = self.len();
        let index = self
            .direction
            .order(len)
            .into_iter()
            .find(|i| self.cells[*i].is_none())
            .unwrap_or_else(|| self.direction.terminal_index(len));
        self.active = Some(index);
        index
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Compares each cell to the expected digit. Empty cells are wrong.
    pub fn validate(&mut self) -> bool {
        let marks: Vec<bool> = self
            .cells
            .iter()
            .zip(&self.expected)
            .map(|(cell, expected)| *cell == Some(*expected))
            .collect();
        let all = marks.iter().all(|ok| *ok);
        self.validated = Some(marks);
        all
    }

    fn turn_at_edge(&mut self, index: usize) {
        let len = self.len();
        if len < 2 {
            return;
        }
        if index == 0 {
            self.direction = FillDirection::LeftToRight;
        } else if index == len - 1 {
            self.direction = FillDirection::RightToLeft;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_expected_answers() {
        assert!(DigitRow::new("", FillDirection::RightToLeft).is_err());
        assert!(DigitRow::new("12a", FillDirection::RightToLeft).is_err());
    }

    #[test]
    fn single_cell_row_keeps_its_direction() {
        let mut row = DigitRow::new("7", FillDirection::RightToLeft).unwrap();
        row.move_focus(Side::Left);
        row.move_focus(Side::Right);
        assert_eq!(row.direction(), FillDirection::RightToLeft);
        assert_eq!(row.set_cell(0, "7").unwrap(), RowSignal::Filled);
    }

    #[test]
    fn cell_marks_follow_validation() {
        let mut row = DigitRow::new("12", FillDirection::LeftToRight).unwrap();
        assert_eq!(row.cell_mark(0), CellMark::Unchecked);
        row.set_cell(0, "1").unwrap();
        row.validate();
        assert_eq!(row.cell_mark(0), CellMark::Correct);
        assert_eq!(row.cell_mark(1), CellMark::Incorrect);
        row.set_cell(1, "2").unwrap();
        assert_eq!(row.cell_mark(0), CellMark::Unchecked);
    }
}
