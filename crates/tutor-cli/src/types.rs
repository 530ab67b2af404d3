use tutor_core::SetSummary;
use tutor_model::{ProgressMarker, QUESTIONS_PER_SET};

/// What a finished `play` session leaves behind for the exit summary.
#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub history: Vec<SetSummary>,
    pub level: u32,
    pub progress: [ProgressMarker; QUESTIONS_PER_SET],
    pub source: &'static str,
}
