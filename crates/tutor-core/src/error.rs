use thiserror::Error;
use tutor_model::ModelError;

/// Integration errors. Every variant is a caller bug or bad input data,
/// never a learner mistake: wrong digits are reported through validation
/// results, and disallowed keys never reach the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("cell index {index} out of range for row of length {length}")]
    CellOutOfRange { index: usize, length: usize },
    #[error("expected answer must be a non-empty string of decimal digits, got {0:?}")]
    InvalidExpectedAnswer(String),
    #[error("row length must be positive")]
    EmptyRow,
    #[error("{field} must be a positive integer")]
    NonPositiveOperand { field: &'static str },
    #[error("{multiplicand} × {multiplier} overflows")]
    ProductOverflow { multiplicand: u64, multiplier: u64 },
    #[error("{value} has {digits} digits, {field} allows {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        value: u64,
        digits: u32,
        min: u32,
        max: u32,
    },
    #[error("invalid problem bounds: {0}")]
    InvalidBounds(String),
    #[error("row {0} does not exist in this problem")]
    UnknownRow(String),
    #[error("question index {index} out of range for a set of {size}")]
    QuestionIndexOutOfRange { index: usize, size: usize },
    #[error("question {index} is not the current question ({current})")]
    QuestionMismatch { index: usize, current: usize },
    #[error("outcome for question {0} already recorded")]
    OutcomeAlreadyRecorded(usize),
    #[error("cannot advance before the current question is answered")]
    AdvanceLocked,
    #[error("question set for level {level} has {found} questions, expected {expected}")]
    MalformedSet {
        level: u32,
        found: usize,
        expected: usize,
    },
    #[error("no questions available for level {0}")]
    MissingLevel(u32),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
