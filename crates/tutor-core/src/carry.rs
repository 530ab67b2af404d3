//! Scratch row for carries.
//!
//! Carries are the learner's working notes: they are never validated and
//! never affect correctness. Selecting a carry cell briefly highlights it.

use std::time::{Duration, Instant};

use tutor_model::{Digit, Side};

use crate::error::{CoreError, Result};
use crate::keys::sanitize_cell_input;

pub const FLASH_DURATION: Duration = Duration::from_millis(500);

/// Identifies one flash. Expiring a stale token is a no-op, so a quick
/// second selection is not cut short by the first one's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashToken(u64);

#[derive(Debug, Clone, Default)]
pub struct FlashTimer {
    generation: u64,
    lit: Option<(usize, Instant)>,
}

impl FlashTimer {
    pub fn trigger(&mut self, index: usize, now: Instant) -> FlashToken {
        self.generation += 1;
        self.lit = Some((index, now));
        FlashToken(self.generation)
    }

    /// Ends the flash identified by `token`. Returns false for stale tokens.
    pub fn expire(&mut self, token: FlashToken) -> bool {
        if token.0 != self.generation || self.lit.is_none() {
            return false;
        }
        self.lit = None;
        true
    }

    /// Cell highlighted at `now`, if any.
    #[must_use]
    pub fn lit_index(&self, now: Instant) -> Option<usize> {
        self.lit
            .filter(|(_, started)| now.duration_since(*started) < FLASH_DURATION)
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone)]
pub struct CarryRow {
    cells: Vec<Option<Digit>>,
    active: Option<usize>,
    flash: FlashTimer,
}

impl CarryRow {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(CoreError::EmptyRow);
        }
        Ok(Self {
            cells: vec![None; len],
            active: None,
            flash: FlashTimer::default(),
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

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(CoreError::CellOutOfRange {
                index,
                length: self.len(),
            });
        }
        Ok(())
    }

    /// Overwrites a carry. Focus stays put.
    pub fn set_cell(&mut self, index: usize, raw: &str) -> Result<()> {
        self.check_index(index)?;
        self.cells[index] = sanitize_cell_input(raw);
        self.active = Some(index);
        Ok(())
    }

    pub fn clear_cell(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        self.cells[index] = None;
        self.active = Some(index);
        Ok(index)
    }

    /// Focuses `index` and starts its highlight.
    pub fn select(&mut self, index: usize, now: Instant) -> Result<FlashToken> {
        self.check_index(index)?;
        self.active = Some(index);
        Ok(self.flash.trigger(index, now))
    }

    pub fn move_focus(&mut self, side: Side) -> usize {
        let last = self.len() - 1;
        let current = self.active.unwrap_or(last);
        let target = match side {
            Side::Left => current.saturating_sub(1),
            Side::Right => (current + 1).min(last),
        };
        self.active = Some(target);
        target
    }

    /// Carries are written from the right; focus the rightmost empty slot.
    pub fn focus_first_empty(&mut self) -> usize {
        let last = self.len() - 1;
        let index = (0..self.len())
            .rev()
            .find(|i| self.cells[*i].is_none())
            .unwrap_or(last);
        self.active = Some(index);
        index
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn flash_index(&self, now: Instant) -> Option<usize> {
        self.flash.lit_index(now)
    }

    pub fn expire_flash(&mut self, token: FlashToken) -> bool {
        self.flash.expire(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_lasts_half_a_second() {
        let start = Instant::now();
        let mut timer = FlashTimer::default();
        timer.trigger(2, start);
        assert_eq!(timer.lit_index(start + Duration::from_millis(499)), Some(2));
        assert_eq!(timer.lit_index(start + FLASH_DURATION), None);
    }

    #[test]
    fn stale_tokens_do_not_cut_a_newer_flash() {
        let start = Instant::now();
        let mut timer = FlashTimer::default();
        let first = timer.trigger(0, start);
        let second = timer.trigger(1, start);
        assert!(!timer.expire(first));
        assert_eq!(timer.lit_index(start), Some(1));
        assert!(timer.expire(second));
        assert_eq!(timer.lit_index(start), None);
    }

    #[test]
    fn carry_row_accepts_anything_digit_like() {
        let mut row = CarryRow::new(3).unwrap();
        row.set_cell(1, "a9").unwrap();
        assert_eq!(row.cells()[1].map(Digit::value), Some(9));
        assert_eq!(row.focus_first_empty(), 2);
        assert!(row.set_cell(3, "1").is_err());
        assert_eq!(CarryRow::new(0).unwrap_err(), CoreError::EmptyRow);
    }
}
