use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("digit out of range: {0}")]
    InvalidDigit(u8),
    #[error("expected a decimal digit, found {0:?}")]
    InvalidDigitChar(char),
    #[error("invalid {field} value: {value:?}")]
    InvalidOperand { field: &'static str, value: String },
    #[error("unsupported operator {0:?}")]
    UnsupportedOperator(String),
    #[error("invalid level key: {0}")]
    InvalidLevelKey(String),
    #[error("duplicate level {level} (key {key})")]
    DuplicateLevel { level: u32, key: String },
    #[error("level {key} has {found} questions, expected {expected}")]
    WrongSetSize {
        key: String,
        found: usize,
        expected: usize,
    },
    #[error("question bank has no levels")]
    EmptyBank,
}

pub type Result<T> = std::result::Result<T, ModelError>;
