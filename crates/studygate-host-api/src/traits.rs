//! Host page traits

use serde::{Deserialize, Serialize};
use std::fmt;
use studygate_util::StudyGateError;
use thiserror::Error;

/// Errors from host page operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
}

impl From<HostError> for StudyGateError {
    fn from(e: HostError) -> Self {
        StudyGateError::host(e.to_string())
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Where the page currently is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageLocation {
    /// Path component, e.g. `/guides/planets.html`
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
}

impl PageLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let query = query.strip_prefix('?').unwrap_or(&query).to_string();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    /// Parse `path?query`
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self::new(path).with_query(query),
            None => Self::new(target),
        }
    }

    /// Path plus query, as sent back after login
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_target())
    }
}

/// The page hosting the gate and the tracker
pub trait PageHost: Send + Sync {
    /// Current location of the page
    fn location(&self) -> PageLocation;

    /// Leave the page for `url`
    fn navigate(&self, url: &str) -> HostResult<()>;

    /// Show a blocking message to the user
    fn notify(&self, message: &str);

    /// Run the page's own initializer, if it has one. Returns whether one ran.
    fn run_page_initializer(&self) -> bool {
        false
    }
}
