//! Configuration validation

use crate::schema::{RawConfig, RawUser};
use crate::settings::MAX_SESSION_TTL_HOURS;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("User #{index}: {message}")]
    UserError { index: usize, message: String },

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("No users configured; nobody could log in")]
    NoUsers,

    #[error("[{section}] {field} must be greater than zero")]
    ZeroValue {
        section: &'static str,
        field: &'static str,
    },

    #[error("[session] ttl_hours {0} exceeds the maximum of {max}", max = MAX_SESSION_TTL_HOURS)]
    TtlTooLong(u64),

    #[error("[session] login_path cannot be empty")]
    EmptyLoginPath,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.users.is_empty() {
        errors.push(ValidationError::NoUsers);
    }

    let mut seen = HashSet::new();
    for user in &config.users {
        if !user.username.is_empty() && !seen.insert(user.username.as_str()) {
            errors.push(ValidationError::DuplicateUsername(user.username.clone()));
        }
    }

    for (index, user) in config.users.iter().enumerate() {
        errors.extend(validate_user(index, user));
    }

    let zero_checks = [
        ("session", "ttl_hours", config.session.ttl_hours == Some(0)),
        (
            "session",
            "expiry_check_secs",
            config.session.expiry_check_secs == Some(0),
        ),
        (
            "tracker",
            "daily_goal_minutes",
            config.tracker.daily_goal_minutes == Some(0),
        ),
        (
            "tracker",
            "refresh_interval_secs",
            config.tracker.refresh_interval_secs == Some(0),
        ),
    ];
    for (section, field, is_zero) in zero_checks {
        if is_zero {
            errors.push(ValidationError::ZeroValue { section, field });
        }
    }

    if let Some(hours) = config.session.ttl_hours
        && hours > MAX_SESSION_TTL_HOURS
    {
        errors.push(ValidationError::TtlTooLong(hours));
    }

    if let Some(path) = &config.session.login_path
        && path.trim().is_empty()
    {
        errors.push(ValidationError::EmptyLoginPath);
    }

    errors
}

fn validate_user(index: usize, user: &RawUser) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if user.username.is_empty() {
        errors.push(ValidationError::UserError {
            index,
            message: "username cannot be empty".into(),
        });
    } else if user.username.chars().any(char::is_whitespace) {
        errors.push(ValidationError::UserError {
            index,
            message: format!("username '{}' cannot contain whitespace", user.username),
        });
    }

    if user.password.is_empty() {
        errors.push(ValidationError::UserError {
            index,
            message: "password cannot be empty".into(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawSessionConfig, RawStorageConfig, RawTrackerConfig};

    fn user(name: &str, password: &str) -> RawUser {
        RawUser {
            username: name.into(),
            password: password.into(),
        }
    }

    fn config(users: Vec<RawUser>) -> RawConfig {
        RawConfig {
            config_version: 1,
            session: RawSessionConfig::default(),
            tracker: RawTrackerConfig::default(),
            storage: RawStorageConfig::default(),
            users,
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        let errors = validate_config(&config(vec![user("ann", "pw")]));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn duplicate_usernames_rejected() {
        let errors = validate_config(&config(vec![user("ann", "a"), user("ann", "b")]));
        assert!(errors.contains(&ValidationError::DuplicateUsername("ann".into())));
    }

    #[test]
    fn empty_fields_and_missing_users_rejected() {
        assert_eq!(validate_config(&config(vec![])), vec![ValidationError::NoUsers]);

        let errors = validate_config(&config(vec![user("", ""), user("two words", "pw")]));
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::UserError { .. })));
    }

    #[test]
    fn zero_values_rejected() {
        let mut raw = config(vec![user("ann", "pw")]);
        raw.session.ttl_hours = Some(0);
        raw.tracker.daily_goal_minutes = Some(0);
        raw.session.login_path = Some("  ".into());

        let errors = validate_config(&raw);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroValue {
            section: "session",
            field: "ttl_hours",
        }));
        assert!(errors.contains(&ValidationError::EmptyLoginPath));
    }

    #[test]
    fn oversized_ttl_rejected() {
        let mut raw = config(vec![user("ann", "pw")]);
        raw.session.ttl_hours = Some(MAX_SESSION_TTL_HOURS);
        assert!(validate_config(&raw).is_empty());

        raw.session.ttl_hours = Some(9_000_000_000_000_000);
        assert_eq!(
            validate_config(&raw),
            vec![ValidationError::TtlTooLong(9_000_000_000_000_000)]
        );
    }

    #[test]
    fn zero_minimum_interval_is_allowed() {
        let mut raw = config(vec![user("ann", "pw")]);
        raw.tracker.min_interval_minutes = Some(0);
        assert!(validate_config(&raw).is_empty());
    }
}
