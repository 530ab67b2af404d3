//! Keyboard allow-list for digit entry.
//!
//! Front-ends translate their native key events into [`Key`]; anything
//! that has no `Key` spelling is dropped before it reaches a row, so
//! invalid characters can never enter cell state.

use tutor_model::Digit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(Digit),
    Backspace,
    Delete,
    Tab,
    BackTab,
    Left,
    Right,
}

impl Key {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        Digit::from_char(c).map(Self::Digit)
    }
}

/// Reduces raw text typed or pasted into a cell to the digit it should
/// hold: non-digits are stripped and the most recently typed digit wins.
#[must_use]
pub fn sanitize_cell_input(raw: &str) -> Option<Digit> {
    raw.chars().rev().find_map(Digit::from_char)
}
