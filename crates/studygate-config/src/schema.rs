//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Login session settings
    #[serde(default)]
    pub session: RawSessionConfig,

    /// Study tracker settings
    #[serde(default)]
    pub tracker: RawTrackerConfig,

    /// Where the store lives
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Credential table
    #[serde(default)]
    pub users: Vec<RawUser>,
}

/// Login session settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionConfig {
    /// Session lifetime in hours (default: 24)
    pub ttl_hours: Option<u64>,

    /// Login entry point that receives the `redirect` parameter (default: login.html)
    pub login_path: Option<String>,

    /// How often an open page re-checks expiry, in seconds (default: 300)
    pub expiry_check_secs: Option<u64>,
}

/// Study tracker settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTrackerConfig {
    /// Intervals shorter than this are discarded (default: 5)
    pub min_interval_minutes: Option<u32>,

    /// Daily goal in minutes unless overridden in the store (default: 60)
    pub daily_goal_minutes: Option<u32>,

    /// Display refresh period in seconds (default: 1)
    pub refresh_interval_secs: Option<u64>,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory for the store database
    pub data_dir: Option<PathBuf>,
}

/// One entry of the credential table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub username: String,
    pub password: String,
}
