//! Settings for the remote question source.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://www.bloshup.com:8181/dev/publicmathget";
pub const DEFAULT_TAG: &str = "publicmath.get";
pub const DEFAULT_DEVICE_ID: &str = "680810a0737ab55963f6223b";

/// Three hours between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3 * 60 * 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Whether the remote source is contacted at all.
    pub enabled: bool,
    pub endpoint: String,
    /// Value of the `tag` field in the request body.
    pub tag: String,
    /// Value of the `deviceid` field in the request body.
    pub device_id: String,
    pub refresh_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tag: DEFAULT_TAG.to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceSettings {
    /// Refresh interval, never shorter than one minute.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(60))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_refresh_every_three_hours() {
        let settings = SourceSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(10_800));
    }

    #[test]
    fn tiny_intervals_are_raised() {
        let settings = SourceSettings {
            refresh_interval_secs: 1,
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));
        assert_eq!(settings.timeout(), Duration::from_secs(1));
    }
}
