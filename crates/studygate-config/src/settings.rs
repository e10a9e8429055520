//! Validated settings structures

use crate::schema::{RawConfig, RawSessionConfig, RawStorageConfig, RawTrackerConfig};
use std::path::PathBuf;
use std::time::Duration;
use studygate_util::default_data_dir;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted session lifetime, in hours (one year)
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 366;

/// Default login entry point
pub const DEFAULT_LOGIN_PATH: &str = "login.html";

/// Default period of the open-page expiry check
pub const DEFAULT_EXPIRY_CHECK: Duration = Duration::from_secs(5 * 60);

/// Default minimum interval length worth recording
pub const DEFAULT_MIN_INTERVAL_MINUTES: u32 = 5;

/// Default daily goal
pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 60;

/// Default display refresh period
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Validated settings ready for use by the core
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub session: SessionSettings,
    pub tracker: TrackerSettings,
    pub storage: StorageSettings,
    pub users: Vec<UserCredential>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            session: SessionSettings::from_raw(raw.session),
            tracker: TrackerSettings::from_raw(raw.tracker),
            storage: StorageSettings::from_raw(raw.storage),
            users: raw
                .users
                .into_iter()
                .map(|u| UserCredential {
                    username: u.username,
                    password: u.password,
                })
                .collect(),
        }
    }
}

/// Login session settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub ttl: Duration,
    pub login_path: String,
    pub expiry_check_interval: Duration,
}

impl SessionSettings {
    fn from_raw(raw: RawSessionConfig) -> Self {
        Self {
            ttl: raw
                .ttl_hours
                .and_then(|h| h.checked_mul(60 * 60))
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SESSION_TTL),
            login_path: raw
                .login_path
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            expiry_check_interval: raw
                .expiry_check_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_EXPIRY_CHECK),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_raw(RawSessionConfig::default())
    }
}

/// Study tracker settings
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub min_interval_minutes: u32,
    pub daily_goal_minutes: u32,
    pub refresh_interval: Duration,
}

impl TrackerSettings {
    fn from_raw(raw: RawTrackerConfig) -> Self {
        Self {
            min_interval_minutes: raw
                .min_interval_minutes
                .unwrap_or(DEFAULT_MIN_INTERVAL_MINUTES),
            daily_goal_minutes: raw
                .daily_goal_minutes
                .unwrap_or(DEFAULT_DAILY_GOAL_MINUTES),
            refresh_interval: raw
                .refresh_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from_raw(RawTrackerConfig::default())
    }
}

/// Storage settings
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl StorageSettings {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::from_raw(RawStorageConfig::default())
    }
}

/// One credential from the static table
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
