//! Persisted tutor configuration.
//!
//! Stored as TOML in the user's config directory. Missing or unreadable
//! files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;
use tutor_core::ProblemBounds;
use tutor_source::SourceSettings;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "tutor.log";

/// Highest level the random generator offers when no bank is loaded.
pub const DEFAULT_GENERATED_MAX_LEVEL: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Remote question source.
    pub source: SourceSettings,

    /// Where a session starts and how far it may climb.
    pub curriculum: CurriculumSettings,

    /// Operand limits for generated problems.
    pub bounds: ProblemBounds,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumSettings {
    pub start_level: u32,

    /// Caps the level below what the question source offers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_level: Option<u32>,
}

impl TutorConfig {
    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()),
        }
    }

    /// Load from a specific path; a missing file yields defaults. Unusable
    /// `[bounds]` fall back to the default bounds.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        let mut config: Self = toml::from_str(&content).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "ignoring unreadable config file");
            Self::default()
        });
        if let Err(error) = config.bounds.validate() {
            warn!(path = %path.display(), %error, "using default problem bounds");
            config.bounds = ProblemBounds::default();
        }
        config
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        fs::write(path, self.to_toml()?).with_context(|| format!("write {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }

    /// Default config file path.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Log file used by the interactive session when none is given.
    pub fn default_log_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_dir().join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "LongMultiplication", "long-multiplication")
}
