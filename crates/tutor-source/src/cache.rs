//! Holds the most recent good question bank.
//!
//! Refresh results are applied whole: a successful fetch replaces the
//! bank, a failed one is recorded and the previous bank stays usable.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use tutor_model::QuestionBank;

use crate::error::{Result, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheUpdate {
    Replaced {
        /// False when the new bank has the same content as the old one.
        changed: bool,
        levels: usize,
        fingerprint: String,
    },
    Kept {
        error: SourceError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct QuestionCache {
    bank: Option<QuestionBank>,
    fingerprint: Option<String>,
    last_refresh: Option<DateTime<Utc>>,
    last_error: Option<SourceError>,
}

impl QuestionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache seeded with a bank loaded from disk.
    #[must_use]
    pub fn with_bank(bank: QuestionBank) -> Self {
        Self {
            fingerprint: Some(bank.fingerprint()),
            bank: Some(bank),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bank(&self) -> Option<&QuestionBank> {
        self.bank.as_ref()
    }

    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Error from the latest refresh; cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    /// True when no successful refresh happened within `interval` of `now`.
    #[must_use]
    pub fn is_stale(&self, interval: Duration, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now
                .signed_duration_since(last)
                .to_std()
                .is_ok_and(|elapsed| elapsed >= interval),
        }
    }

    pub fn apply(&mut self, result: Result<QuestionBank>, now: DateTime<Utc>) -> CacheUpdate {
        match result {
            Ok(bank) => {
                let fingerprint = bank.fingerprint();
                let changed = self.fingerprint.as_deref() != Some(fingerprint.as_str());
                let levels = bank.level_count();
                info!(levels, changed, fingerprint = %fingerprint, "question bank refreshed");
                self.bank = Some(bank);
                self.fingerprint = Some(fingerprint.clone());
                self.last_refresh = Some(now);
                self.last_error = None;
                CacheUpdate::Replaced {
                    changed,
                    levels,
                    fingerprint,
                }
            }
            Err(error) => {
                warn!(%error, retryable = error.is_retryable(), "question bank refresh failed");
                self.last_error = Some(error.clone());
                CacheUpdate::Kept { error }
            }
        }
    }
}
