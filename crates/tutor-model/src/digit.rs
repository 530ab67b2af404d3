//! Single decimal digits and the direction vocabulary used by digit rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A value in `0..=9`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u8) -> Result<Self> {
        if value > 9 {
            return Err(ModelError::InvalidDigit(value));
        }
        Ok(Self(value))
    }

    /// Converts an ASCII decimal character. Anything else yields `None`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|value| Self(value as u8))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }

    /// Parses a string in which every character must be a decimal digit.
    pub fn parse_all(text: &str) -> Result<Vec<Self>> {
        text.chars()
            .map(|c| Self::from_char(c).ok_or(ModelError::InvalidDigitChar(c)))
            .collect()
    }
}

impl TryFrom<u8> for Digit {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order in which a digit row is filled, and therefore which neighbour
/// receives focus after a cell is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    LeftToRight,
    #[default]
    RightToLeft,
}

impl FillDirection {
    /// Index where filling starts for a row of `len` cells.
    #[must_use]
    pub fn first_index(self, len: usize) -> usize {
        match self {
            Self::LeftToRight => 0,
            Self::RightToLeft => len.saturating_sub(1),
        }
    }

    /// Index where filling ends; writing here never auto-advances.
    #[must_use]
    pub fn terminal_index(self, len: usize) -> usize {
        match self {
            Self::LeftToRight => len.saturating_sub(1),
            Self::RightToLeft => 0,
        }
    }

    /// Neighbour of `index` in this direction, if it stays inside the row.
    #[must_use]
    pub fn next_index(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::LeftToRight => (index + 1 < len).then_some(index + 1),
            Self::RightToLeft => index.checked_sub(1),
        }
    }

    /// All indices of a row of `len` cells in fill order.
    #[must_use]
    pub fn order(self, len: usize) -> Vec<usize> {
        match self {
            Self::LeftToRight => (0..len).collect(),
            Self::RightToLeft => (0..len).rev().collect(),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
        }
    }
}

impl fmt::Display for FillDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Horizontal alignment hint handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Start,
    #[default]
    End,
}

impl Alignment {
    /// Rows for a multiplier digit of 1 start-align; everything else is
    /// written from the right.
    #[must_use]
    pub fn for_multiplier_digit(digit: u8) -> Self {
        if digit == 1 { Self::Start } else { Self::End }
    }

    /// Default fill direction of a row rendered with this alignment.
    #[must_use]
    pub fn fill_direction(self) -> FillDirection {
        match self {
            Self::Start => FillDirection::LeftToRight,
            Self::End => FillDirection::RightToLeft,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Arrow-key navigation inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}
