//! Multi-row focus orchestration for one problem.
//!
//! The sequencer owns the carry row and one [`DigitRow`] per answer row.
//! Filling a row hands focus to the next answer row; submission validates
//! every row and reports a correct problem exactly once.

use std::time::Instant;

use tracing::{debug, info};
use tutor_model::{Digit, Side};

use crate::carry::{CarryRow, FlashToken};
use crate::error::{CoreError, Result};
use crate::keys::Key;
use crate::problem::{MultiplicationProblem, RowId};
use crate::row::{DigitRow, RowSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AwaitingCarry,
    FillingPartial(u32),
    FillingProduct,
    AllSubmitted,
}

/// Focus moved between rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub from: RowId,
    pub to: RowId,
}

/// Emitted by the submission that first finds the whole problem correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub question_index: usize,
    pub first_attempt: bool,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub rows: Vec<(RowId, bool)>,
    pub all_correct: bool,
    pub completion: Option<Completion>,
}

#[derive(Debug, Clone)]
pub struct StepSequencer {
    problem: MultiplicationProblem,
    question_index: usize,
    carry: Option<CarryRow>,
    partials: Vec<(u32, DigitRow)>,
    product: DigitRow,
    focus: RowId,
    attempts: u32,
    reported: bool,
}

impl StepSequencer {
    /// Builds fresh rows for `problem`. Focus starts on the first answer
    /// row; the carry row is reached by selection or `BackTab`.
    pub fn new(problem: MultiplicationProblem, question_index: usize) -> Result<Self> {
        let carry = match problem.carry_slots() {
            0 => None,
            slots => Some(CarryRow::new(slots)?),
        };
        let mut partials = Vec::new();
        let mut product = None;
        for spec in problem.rows() {
            let row = DigitRow::new(&spec.expected_value, spec.alignment.fill_direction())?;
            match spec.id {
                RowId::Partial(position) => partials.push((position, row)),
                RowId::Product => product = Some(row),
                RowId::Carry => {}
            }
        }
        let product = match product {
            Some(row) => row,
            None => DigitRow::new(problem.final_product(), Default::default())?,
        };
        let focus = partials
            .first()
            .map_or(RowId::Product, |(position, _)| RowId::Partial(*position));

        let mut sequencer = Self {
            problem,
            question_index,
            carry,
            partials,
            product,
            focus,
            attempts: 0,
            reported: false,
        };
        if let Some(row) = sequencer.digit_row_mut(focus) {
            row.focus_first_empty();
        }
        debug!(
            multiplicand = sequencer.problem.multiplicand(),
            multiplier = sequencer.problem.multiplier(),
            rows = sequencer.partials.len() + 1,
            "problem ready"
        );
        Ok(sequencer)
    }

    #[must_use]
    pub fn problem(&self) -> &MultiplicationProblem {
        &self.problem
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn focus(&self) -> RowId {
        self.focus
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    #[must_use]
    pub fn carry(&self) -> Option<&CarryRow> {
        self.carry.as_ref()
    }

    pub fn partial_rows(&self) -> impl Iterator<Item = (RowId, &DigitRow)> + '_ {
        self.partials
            .iter()
            .map(|(position, row)| (RowId::Partial(*position), row))
    }

    #[must_use]
    pub fn product_row(&self) -> &DigitRow {
        &self.product
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&DigitRow> {
        match id {
            RowId::Carry => None,
            RowId::Partial(position) => self
                .partials
                .iter()
                .find(|(p, _)| *p == position)
                .map(|(_, row)| row),
            RowId::Product => Some(&self.product),
        }
    }

    fn digit_row_mut(&mut self, id: RowId) -> Option<&mut DigitRow> {
        match id {
            RowId::Carry => None,
            RowId::Partial(position) => self
                .partials
                .iter_mut()
                .find(|(p, _)| *p == position)
                .map(|(_, row)| row),
            RowId::Product => Some(&mut self.product),
        }
    }

    /// Every row in top-to-bottom order, carry first when present.
    #[must_use]
    pub fn row_order(&self) -> Vec<RowId> {
        self.carry
            .iter()
            .map(|_| RowId::Carry)
            .chain(self.partials.iter().map(|(p, _)| RowId::Partial(*p)))
            .chain(std::iter::once(RowId::Product))
            .collect()
    }

    fn row_len(&self, id: RowId) -> Result<usize> {
        match id {
            RowId::Carry => self.carry.as_ref().map(CarryRow::len),
            other => self.row(other).map(DigitRow::len),
        }
        .ok_or_else(|| CoreError::UnknownRow(id.to_string()))
    }

    #[must_use]
    pub fn step(&self) -> Step {
        if self.reported && self.all_correct() {
            return Step::AllSubmitted;
        }
        match self.focus {
            RowId::Carry => Step::AwaitingCarry,
            RowId::Partial(position) => Step::FillingPartial(position),
            RowId::Product => Step::FillingProduct,
        }
    }

    /// True when the most recent validation of every answer row passed.
    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.partials.iter().all(|(_, row)| row.is_correct()) && self.product.is_correct()
    }

    fn switch_focus(&mut self, to: RowId) {
        match self.focus {
            RowId::Carry => {
                if let Some(carry) = self.carry.as_mut() {
                    carry.blur();
                }
            }
            other => {
                if let Some(row) = self.digit_row_mut(other) {
                    row.blur();
                }
            }
        }
        self.focus = to;
    }

    /// Moves focus to `id`, landing on its first empty cell.
    pub fn focus_row(&mut self, id: RowId) -> Result<()> {
        self.row_len(id)?;
        self.switch_focus(id);
        match id {
            RowId::Carry => {
                if let Some(carry) = self.carry.as_mut() {
                    carry.focus_first_empty();
                }
            }
            other => {
                if let Some(row) = self.digit_row_mut(other) {
                    row.focus_first_empty();
                }
            }
        }
        Ok(())
    }

    /// Direct selection of a cell. Selecting a carry cell starts its
    /// highlight and returns the token that ends it.
    pub fn select_cell(
        &mut self,
        id: RowId,
        index: usize,
        now: Instant,
    ) -> Result<Option<FlashToken>> {
        let length = self.row_len(id)?;
        if index >= length {
            return Err(CoreError::CellOutOfRange { index, length });
        }
        self.switch_focus(id);
        match id {
            RowId::Carry => match self.carry.as_mut() {
                Some(carry) => carry.select(index, now).map(Some),
                None => Ok(None),
            },
            other => {
                if let Some(row) = self.digit_row_mut(other) {
                    row.snap_focus(index)?;
                }
                Ok(None)
            }
        }
    }

    pub fn expire_flash(&mut self, token: FlashToken) -> bool {
        self.carry
            .as_mut()
            .is_some_and(|carry| carry.expire_flash(token))
    }

    pub fn handle_key(&mut self, key: Key) -> Result<Option<Handoff>> {
        match key {
            Key::Digit(digit) => self.type_digit(digit),
            Key::Backspace | Key::Delete => {
                self.delete()?;
                Ok(None)
            }
            Key::Left => {
                self.move_within_row(Side::Left);
                Ok(None)
            }
            Key::Right => {
                self.move_within_row(Side::Right);
                Ok(None)
            }
            Key::Tab => self.step_row(1),
            Key::BackTab => self.step_row(-1),
        }
    }

    fn type_digit(&mut self, digit: Digit) -> Result<Option<Handoff>> {
        self.type_text(&digit.as_char().to_string())
    }

    /// Writes raw text into the focused cell. Non-digits are stripped and
    /// the last digit wins.
    pub fn type_text(&mut self, raw: &str) -> Result<Option<Handoff>> {
        let from = self.focus;
        if from == RowId::Carry {
            if let Some(carry) = self.carry.as_mut() {
                let index = carry
                    .active_index()
                    .unwrap_or_else(|| carry.focus_first_empty());
                carry.set_cell(index, raw)?;
            }
            return Ok(None);
        }
        let Some(row) = self.digit_row_mut(from) else {
            return Err(CoreError::UnknownRow(from.to_string()));
        };
        let index = row.active_index().unwrap_or_else(|| row.focus_first_empty());
        if row.set_cell(index, raw)? != RowSignal::Filled {
            return Ok(None);
        }
        let order = self.row_order();
        let next = order
            .iter()
            .skip_while(|id| **id != from)
            .nth(1)
            .copied();
        match next {
            Some(to) => {
                self.focus_row(to)?;
                debug!(%from, %to, "row filled, focus handed on");
                Ok(Some(Handoff { from, to }))
            }
            None => Ok(None),
        }
    }

    fn delete(&mut self) -> Result<()> {
        match self.focus {
            RowId::Carry => {
                if let Some(carry) = self.carry.as_mut() {
                    let index = carry
                        .active_index()
                        .unwrap_or_else(|| carry.focus_first_empty());
                    carry.clear_cell(index)?;
                }
            }
            other => {
                if let Some(row) = self.digit_row_mut(other) {
                    let index = row.active_index().unwrap_or_else(|| row.focus_first_empty());
                    row.clear_cell(index)?;
                }
            }
        }
        Ok(())
    }

    fn move_within_row(&mut self, side: Side) {
        match self.focus {
            RowId::Carry => {
                if let Some(carry) = self.carry.as_mut() {
                    carry.move_focus(side);
                }
            }
            other => {
                if let Some(row) = self.digit_row_mut(other) {
                    row.move_focus(side);
                }
            }
        }
    }

    /// Tab order clamps at the first and last rows.
    fn step_row(&mut self, delta: isize) -> Result<Option<Handoff>> {
        let order = self.row_order();
        let Some(current) = order.iter().position(|id| *id == self.focus) else {
            return Ok(None);
        };
        let Some(target) = current.checked_add_signed(delta).filter(|i| *i < order.len()) else {
            return Ok(None);
        };
        let from = self.focus;
        let to = order[target];
        self.focus_row(to)?;
        Ok(Some(Handoff { from, to }))
    }

    /// Validates every answer row. The carry row is never checked.
    pub fn submit(&mut self) -> SubmitReport {
        let was_correct = self.all_correct();
        self.attempts += 1;

        let mut rows = Vec::with_capacity(self.partials.len() + 1);
        for (position, row) in &mut self.partials {
            rows.push((RowId::Partial(*position), row.validate()));
        }
        rows.push((RowId::Product, self.product.validate()));
        let all_correct = rows.iter().all(|(_, ok)| *ok);

        let completion = if all_correct && !was_correct && !self.reported {
            self.reported = true;
            let completion = Completion {
                question_index: self.question_index,
                first_attempt: self.attempts == 1,
                attempts: self.attempts,
            };
            info!(
                question = self.question_index,
                attempts = self.attempts,
                "problem solved"
            );
            Some(completion)
        } else {
            None
        };

        SubmitReport {
            rows,
            all_correct,
            completion,
        }
    }

    /// Marks the problem as settled without a solve, e.g. after giving up.
    /// Later correct submissions report nothing.
    pub fn abandon(&mut self) {
        self.reported = true;
    }
}
