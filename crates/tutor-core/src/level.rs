//! Sets of ten questions and the adaptive level policy between them.

use std::fmt;

use tracing::info;
use tutor_model::{ProgressMarker, QUESTIONS_PER_SET, Question};

use crate::error::{CoreError, Result};
use crate::provider::QuestionProvider;

/// Correct answers needed to avoid a full regression.
pub const PASSING_SCORE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    /// A perfect set moves up one level.
    Promoted,
    /// A perfect set at the top level starts the curriculum over.
    Wrapped,
    /// 6 to 9 correct: held back one level.
    HeldBack,
    /// Fewer than 6 correct.
    Regressed,
}

impl LevelTransition {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Promoted => "promoted",
            Self::Wrapped => "curriculum complete",
            Self::HeldBack => "held back",
            Self::Regressed => "regressed",
        }
    }
}

impl fmt::Display for LevelTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Level for the next set given this set's score.
///
/// Ten correct promotes (wrapping to 0 past `max_level`); anything less
/// drops one level, floored at 0.
#[must_use]
pub fn next_level(level: u32, correct_count: usize, max_level: u32) -> (u32, LevelTransition) {
    let level = level.min(max_level);
    if correct_count >= QUESTIONS_PER_SET {
        if level >= max_level {
            (0, LevelTransition::Wrapped)
        } else {
            (level + 1, LevelTransition::Promoted)
        }
    } else if correct_count >= PASSING_SCORE {
        (level.saturating_sub(1), LevelTransition::HeldBack)
    } else {
        (level.saturating_sub(1), LevelTransition::Regressed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    level: u32,
    questions: Vec<Question>,
    current_index: usize,
    correct_count: usize,
    outcomes: [Option<bool>; QUESTIONS_PER_SET],
}

impl QuestionSet {
    pub fn new(level: u32, questions: Vec<Question>) -> Result<Self> {
        if questions.len() != QUESTIONS_PER_SET {
            return Err(CoreError::MalformedSet {
                level,
                found: questions.len(),
                expected: QUESTIONS_PER_SET,
            });
        }
        Ok(Self {
            level,
            questions,
            current_index: 0,
            correct_count: 0,
            outcomes: [None; QUESTIONS_PER_SET],
        })
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.questions.get(self.current_index).copied()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<bool> {
        self.outcomes.get(index).copied().flatten()
    }

    #[must_use]
    pub fn markers(&self) -> [ProgressMarker; QUESTIONS_PER_SET] {
        self.outcomes.map(ProgressMarker::from_outcome)
    }

    /// Unanswered questions count as incorrect.
    #[must_use]
    pub fn per_question_outcome(&self) -> [bool; QUESTIONS_PER_SET] {
        self.outcomes.map(|outcome| outcome.unwrap_or(false))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_index >= QUESTIONS_PER_SET
    }

    /// Records the first outcome for the current question.
    pub fn record_outcome(&mut self, index: usize, correct: bool) -> Result<()> {
        if index >= QUESTIONS_PER_SET {
            return Err(CoreError::QuestionIndexOutOfRange {
                index,
                size: QUESTIONS_PER_SET,
            });
        }
        if index != self.current_index {
            return Err(CoreError::QuestionMismatch {
                index,
                current: self.current_index,
            });
        }
        if self.outcomes[index].is_some() {
            return Err(CoreError::OutcomeAlreadyRecorded(index));
        }
        self.outcomes[index] = Some(correct);
        if correct {
            self.correct_count += 1;
        }
        Ok(())
    }

    fn step(&mut self) {
        self.current_index += 1;
    }
}

/// Result of one finished set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSummary {
    pub level: u32,
    pub correct_count: usize,
    pub next_level: u32,
    pub transition: LevelTransition,
    pub outcomes: [bool; QUESTIONS_PER_SET],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion { index: usize, question: Question },
    SetCompleted { summary: SetSummary, question: Question },
}

/// Drives the learner through sets of ten, choosing each set's level
/// from the previous score.
#[derive(Debug, Clone)]
pub struct LevelController {
    max_level: u32,
    active: QuestionSet,
    advance_unlocked: bool,
    history: Vec<SetSummary>,
}

impl LevelController {
    pub fn new(
        provider: &mut dyn QuestionProvider,
        start_level: u32,
        max_level: u32,
    ) -> Result<Self> {
        let level = start_level.min(max_level);
        let active = QuestionSet::new(level, provider.question_set(level)?)?;
        info!(level, max_level, source = provider.label(), "starting set");
        Ok(Self {
            max_level,
            active,
            advance_unlocked: false,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.active.level()
    }

    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Takes effect from the next set.
    pub fn set_max_level(&mut self, max_level: u32) {
        self.max_level = max_level;
    }

    #[must_use]
    pub fn active_set(&self) -> &QuestionSet {
        &self.active
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.active.current_index()
    }

    /// The question being worked on. Always present: a completed set is
    /// replaced during [`advance`](Self::advance).
    #[must_use]
    pub fn current_question(&self) -> Question {
        self.active.questions()[self.active.current_index().min(QUESTIONS_PER_SET - 1)]
    }

    #[must_use]
    pub fn advance_unlocked(&self) -> bool {
        self.advance_unlocked
    }

    #[must_use]
    pub fn progress(&self) -> [ProgressMarker; QUESTIONS_PER_SET] {
        self.active.markers()
    }

    #[must_use]
    pub fn history(&self) -> &[SetSummary] {
        &self.history
    }

    pub fn record_outcome(&mut self, question_index: usize, correct: bool) -> Result<()> {
        self.active.record_outcome(question_index, correct)?;
        self.advance_unlocked = true;
        Ok(())
    }

    /// Moves to the next question, rolling over to a new set after the
    /// tenth. Locked until the current question has an outcome.
    pub fn advance(&mut self, provider: &mut dyn QuestionProvider) -> Result<Advance> {
        if !self.advance_unlocked {
            return Err(CoreError::AdvanceLocked);
        }
        if self.active.current_index() + 1 < QUESTIONS_PER_SET {
            self.active.step();
            self.advance_unlocked = false;
            let index = self.active.current_index();
            return Ok(Advance::NextQuestion {
                index,
                question: self.current_question(),
            });
        }

        let (next, transition) =
            next_level(self.active.level(), self.active.correct_count(), self.max_level);
        // fetch first so a failing provider leaves the finished set in place
        let fresh = QuestionSet::new(next, provider.question_set(next)?)?;
        self.active.step();
        let summary = SetSummary {
            level: self.active.level(),
            correct_count: self.active.correct_count(),
            next_level: next,
            transition,
            outcomes: self.active.per_question_outcome(),
        };
        info!(
            level = summary.level,
            correct = summary.correct_count,
            next_level = next,
            %transition,
            "set completed"
        );
        self.active = fresh;
        self.advance_unlocked = false;
        self.history.push(summary);
        Ok(Advance::SetCompleted {
            summary,
            question: self.current_question(),
        })
    }
}
