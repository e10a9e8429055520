//! Default paths for studygate components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/studygate/config.toml` or `~/.config/studygate/config.toml`
//! - Data: `$STUDYGATE_DATA_DIR`, `$XDG_DATA_HOME/studygate` or `~/.local/share/studygate`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const STUDYGATE_DATA_DIR_ENV: &str = "STUDYGATE_DATA_DIR";

/// Environment variable for overriding the config file
pub const STUDYGATE_CONFIG_ENV: &str = "STUDYGATE_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "studygate";

/// Store database filename within the data directory
pub const STORE_FILENAME: &str = "studygate.db";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$STUDYGATE_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/studygate` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/studygate` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(STUDYGATE_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking STUDYGATE_DATA_DIR.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(STUDYGATE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"));

    config_home.join(APP_DIR).join("config.toml")
}

/// Path of the store database inside a data directory
pub fn store_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(STORE_FILENAME)
}
