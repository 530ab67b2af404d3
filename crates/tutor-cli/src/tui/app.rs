//! Interactive session state and action handling, independent of the
//! terminal so it can be driven from tests.

use std::time::Instant;

use chrono::{DateTime, Utc};
use ratatui::layout::{Position, Rect};
use tracing::{error, info};
use tutor_core::{
    CoreError, FLASH_DURATION, FlashToken, Key, RowId, SessionEvent, TutorSession,
};
use tutor_source::{CacheUpdate, QuestionCache, RefreshEvent, Refresher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Key(Key),
    Paste(String),
    Click { column: u16, row: u16 },
    Submit,
    GiveUp,
    Next,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    fn problem(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Problem,
            text: text.into(),
        }
    }
}

/// Screen area of one input cell, recorded while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHit {
    pub area: Rect,
    pub row: RowId,
    pub index: usize,
}

pub struct App {
    session: TutorSession,
    cache: QuestionCache,
    refresher: Option<Refresher>,
    max_level: Option<u32>,
    notice: Option<Notice>,
    pending_flash: Option<(FlashToken, Instant)>,
    hits: Vec<CellHit>,
    should_quit: bool,
}

impl App {
    pub fn new(
        session: TutorSession,
        cache: QuestionCache,
        refresher: Option<Refresher>,
        max_level: Option<u32>,
    ) -> Self {
        Self {
            session,
            cache,
            refresher,
            max_level,
            notice: None,
            pending_flash: None,
            hits: Vec::new(),
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &TutorSession {
        &self.session
    }

    #[must_use]
    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresher.is_some()
    }

    /// Remote questions were loaded once but have missed a scheduled refresh.
    #[must_use]
    pub fn source_is_stale(&self, now: DateTime<Utc>) -> bool {
        self.refresher.as_ref().is_some_and(|refresher| {
            self.cache.last_refresh().is_some() && self.cache.is_stale(refresher.interval(), now)
        })
    }

    pub fn set_hits(&mut self, hits: Vec<CellHit>) {
        self.hits = hits;
    }

    pub fn into_session(self) -> TutorSession {
        self.session
    }

    /// Housekeeping between events: ends expired flashes and applies
    /// finished refreshes.
    pub fn tick(&mut self, now: Instant) {
        if let Some((token, deadline)) = self.pending_flash
            && now >= deadline
        {
            self.session.expire_flash(token);
            self.pending_flash = None;
        }
        let mut finished = Vec::new();
        if let Some(refresher) = &self.refresher {
            while let Some(event) = refresher.try_next() {
                finished.push(event);
            }
        }
        for event in finished {
            self.apply_refresh(event);
        }
    }

    /// Applies a refresh result. New question data takes over from the
    /// next set; a failure keeps whatever was loaded before.
    pub fn apply_refresh(&mut self, event: RefreshEvent) {
        match self.cache.apply(event.result, event.finished_at) {
            CacheUpdate::Replaced {
                changed: true,
                levels,
                ..
            } => {
                if let Some(bank) = self.cache.bank() {
                    self.session
                        .replace_provider(Box::new(bank.clone()), self.max_level);
                }
                self.notice = Some(Notice::info(format!(
                    "Loaded {levels} levels from the question server."
                )));
            }
            CacheUpdate::Replaced { changed: false, .. } => {}
            CacheUpdate::Kept { error } => {
                self.notice = Some(Notice::problem(error.user_message()));
            }
        }
    }

    pub fn handle(&mut self, action: Action, now: Instant) {
        let result = match action {
            Action::Key(key) => self.session.handle_key(key).map(|_| ()),
            Action::Paste(text) => self.session.type_text(&text).map(|_| ()),
            Action::Click { column, row } => self.click(column, row, now),
            Action::Submit => self.submit(),
            Action::GiveUp => self.give_up(),
            Action::Next => self.next(),
            Action::Refresh => {
                match &self.refresher {
                    Some(refresher) => {
                        refresher.refresh_now();
                        self.notice = Some(Notice::info("Fetching new questions..."));
                    }
                    None => {
                        self.notice = Some(Notice::info("Remote questions are not in use."));
                    }
                }
                Ok(())
            }
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
        };
        if let Err(error) = result {
            error!(%error, "action failed");
            self.notice = Some(Notice::problem(error.to_string()));
        }
    }

    fn click(&mut self, column: u16, row: u16, now: Instant) -> Result<(), CoreError> {
        let position = Position::new(column, row);
        let Some(hit) = self.hits.iter().find(|hit| hit.area.contains(position)).copied() else {
            return Ok(());
        };
        if let Some(token) = self.session.select_cell(hit.row, hit.index, now)? {
            self.pending_flash = Some((token, now + FLASH_DURATION));
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<(), CoreError> {
        let (report, events) = self.session.submit()?;
        for event in events {
            if let SessionEvent::ProblemSolved { first_attempt, .. } = event {
                self.notice = Some(if first_attempt {
                    Notice::success("Correct! Press n for the next question.")
                } else {
                    Notice::success("Solved, but not on the first try. Press n to continue.")
                });
                return Ok(());
            }
        }
        let right = report.rows.iter().filter(|(_, ok)| *ok).count();
        self.notice = Some(if report.all_correct {
            Notice::success("All rows are correct.")
        } else {
            Notice::problem(format!(
                "{right} of {} rows correct. Fix the red digits and submit again.",
                report.rows.len()
            ))
        });
        Ok(())
    }

    fn give_up(&mut self) -> Result<(), CoreError> {
        let events = self.session.give_up()?;
        self.notice = Some(if events.is_empty() {
            Notice::info("This question is already scored.")
        } else {
            Notice::info("Marked as incorrect. Press n for the next question.")
        });
        Ok(())
    }

    fn next(&mut self) -> Result<(), CoreError> {
        let events = match self.session.advance() {
            Err(CoreError::AdvanceLocked) => {
                self.notice = Some(Notice::info(
                    "Solve the problem or give up with g before moving on.",
                ));
                return Ok(());
            }
            other => other?,
        };
        self.notice = None;
        for event in events {
            if let SessionEvent::SetCompleted(summary) = event {
                info!(level = summary.level, correct = summary.correct_count, "set shown");
                self.notice = Some(Notice::info(format!(
                    "Set finished with {}/10 correct: {}, now on level {}.",
                    summary.correct_count,
                    summary.transition,
                    summary.next_level + 1
                )));
            }
        }
        Ok(())
    }
}
