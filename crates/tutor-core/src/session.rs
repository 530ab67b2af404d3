//! A learner's session: level controller, provider and the sequencer for
//! the question on screen, behind one surface for front-ends.

use std::time::Instant;

use tracing::{info, warn};
use tutor_model::{ProgressMarker, QUESTIONS_PER_SET, Question};

use crate::carry::FlashToken;
use crate::error::Result;
use crate::keys::Key;
use crate::level::{Advance, LevelController, SetSummary};
use crate::problem::{MultiplicationProblem, RowId};
use crate::provider::QuestionProvider;
use crate::sequencer::{Handoff, StepSequencer, SubmitReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ProblemSolved {
        question_index: usize,
        first_attempt: bool,
    },
    GaveUp {
        question_index: usize,
    },
    AdvanceUnlocked,
    QuestionDealt {
        index: usize,
        question: Question,
    },
    SetCompleted(SetSummary),
}

pub struct TutorSession {
    provider: Box<dyn QuestionProvider>,
    controller: LevelController,
    sequencer: StepSequencer,
}

impl TutorSession {
    /// Starts at `start_level`, clamped to the provider's range and to
    /// `max_level` when given.
    pub fn new(
        mut provider: Box<dyn QuestionProvider>,
        start_level: u32,
        max_level: Option<u32>,
    ) -> Result<Self> {
        let max_level = effective_max(provider.as_ref(), max_level);
        let controller = LevelController::new(provider.as_mut(), start_level, max_level)?;
        let sequencer = deal(&controller)?;
        Ok(Self {
            provider,
            controller,
            sequencer,
        })
    }

    #[must_use]
    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    #[must_use]
    pub fn controller(&self) -> &LevelController {
        &self.controller
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.controller.level()
    }

    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.controller.max_level()
    }

    #[must_use]
    pub fn provider_label(&self) -> &'static str {
        self.provider.label()
    }

    #[must_use]
    pub fn progress(&self) -> [ProgressMarker; QUESTIONS_PER_SET] {
        self.controller.progress()
    }

    #[must_use]
    pub fn history(&self) -> &[SetSummary] {
        self.controller.history()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.controller.advance_unlocked()
    }

    pub fn handle_key(&mut self, key: Key) -> Result<Option<Handoff>> {
        self.sequencer.handle_key(key)
    }

    pub fn type_text(&mut self, raw: &str) -> Result<Option<Handoff>> {
        self.sequencer.type_text(raw)
    }

    pub fn select_cell(
        &mut self,
        row: RowId,
        index: usize,
        now: Instant,
    ) -> Result<Option<FlashToken>> {
        self.sequencer.select_cell(row, index, now)
    }

    pub fn focus_row(&mut self, row: RowId) -> Result<()> {
        self.sequencer.focus_row(row)
    }

    pub fn expire_flash(&mut self, token: FlashToken) -> bool {
        self.sequencer.expire_flash(token)
    }

    /// Validates the worksheet. The first fully correct submission records
    /// the question: correct only if it was also the first attempt.
    pub fn submit(&mut self) -> Result<(SubmitReport, Vec<SessionEvent>)> {
        let report = self.sequencer.submit();
        let mut events = Vec::new();
        if let Some(completion) = report.completion {
            self.controller
                .record_outcome(completion.question_index, completion.first_attempt)?;
            events.push(SessionEvent::ProblemSolved {
                question_index: completion.question_index,
                first_attempt: completion.first_attempt,
            });
            events.push(SessionEvent::AdvanceUnlocked);
        }
        Ok((report, events))
    }

    /// Records the current question as incorrect and unlocks advancing.
    /// No-op once the question already has an outcome.
    pub fn give_up(&mut self) -> Result<Vec<SessionEvent>> {
        let index = self.controller.current_index();
        if self.controller.active_set().outcome(index).is_some() {
            return Ok(Vec::new());
        }
        self.controller.record_outcome(index, false)?;
        self.sequencer.abandon();
        info!(question = index, "gave up");
        Ok(vec![
            SessionEvent::GaveUp {
                question_index: index,
            },
            SessionEvent::AdvanceUnlocked,
        ])
    }

    /// Deals the next question, discarding the current rows. Nothing
    /// changes unless the next worksheet can be built.
    pub fn advance(&mut self) -> Result<Vec<SessionEvent>> {
        let mut controller = self.controller.clone();
        let mut events = Vec::new();
        let (index, question) = match controller.advance(self.provider.as_mut())? {
            Advance::NextQuestion { index, question } => (index, question),
            Advance::SetCompleted { summary, question } => {
                events.push(SessionEvent::SetCompleted(summary));
                (0, question)
            }
        };
        let sequencer = deal(&controller).inspect_err(|error| {
            warn!(%error, question = %question, "next question cannot be dealt");
        })?;
        self.controller = controller;
        self.sequencer = sequencer;
        events.push(SessionEvent::QuestionDealt { index, question });
        Ok(events)
    }

    /// Swaps the question source, e.g. after a bank refresh. The active
    /// set is kept; the new provider supplies sets from the next one on.
    pub fn replace_provider(&mut self, provider: Box<dyn QuestionProvider>, max_level: Option<u32>) {
        let max_level = effective_max(provider.as_ref(), max_level);
        if max_level < self.controller.level() {
            warn!(
                level = self.controller.level(),
                max_level, "new question source has fewer levels than the current one"
            );
        }
        info!(source = provider.label(), max_level, "question source replaced");
        self.controller.set_max_level(max_level);
        self.provider = provider;
    }
}

fn effective_max(provider: &dyn QuestionProvider, requested: Option<u32>) -> u32 {
    let available = provider.max_level();
    requested.map_or(available, |max| max.min(available))
}

fn deal(controller: &LevelController) -> Result<StepSequencer> {
    let problem = MultiplicationProblem::from_question(controller.current_question())?;
    StepSequencer::new(problem, controller.current_index())
}
