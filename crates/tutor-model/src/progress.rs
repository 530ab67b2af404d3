use serde::{Deserialize, Serialize};

/// Per-question state of the active set, as shown in the progress strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMarker {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

impl ProgressMarker {
    #[must_use]
    pub fn from_outcome(outcome: Option<bool>) -> Self {
        match outcome {
            None => Self::Unanswered,
            Some(true) => Self::Correct,
            Some(false) => Self::Incorrect,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Unanswered => '·',
            Self::Correct => '✓',
            Self::Incorrect => '✗',
        }
    }
}
