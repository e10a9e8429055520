//! Well-known storage keys

/// `"true"` while a login marker exists
pub const KEY_AUTHENTICATED: &str = "sss_authenticated";

/// Login time as decimal epoch milliseconds
pub const KEY_LOGIN_TIME: &str = "sss_login_time";

/// Name of the logged-in user
pub const KEY_USERNAME: &str = "sss_username";

/// JSON map of date -> completed intervals
pub const KEY_DAILY_RECORDS: &str = "sss_study_sessions";

/// JSON active interval, including its pause state
pub const KEY_ACTIVE_INTERVAL: &str = "sss_current_session";

/// Daily goal override in minutes
pub const KEY_DAILY_GOAL: &str = "sss_daily_goal";

/// Every key written by studygate
pub const ALL_KEYS: [&str; 6] = [
    KEY_AUTHENTICATED,
    KEY_LOGIN_TIME,
    KEY_USERNAME,
    KEY_DAILY_RECORDS,
    KEY_ACTIVE_INTERVAL,
    KEY_DAILY_GOAL,
];
