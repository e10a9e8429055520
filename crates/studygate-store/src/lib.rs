//! Persistence layer for studygate
//!
//! The whole application state is one string-keyed map with JSON or
//! plain-string values, mirroring browser local storage.
//!
//! Provides:
//! - The [`Store`] trait and typed JSON helpers
//! - SQLite-backed store for the CLI
//! - In-memory store for tests and ephemeral pages
//! - The well-known storage keys

mod keys;
mod memory;
mod sqlite;
mod traits;

pub use keys::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use studygate_util::StudyGateError;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error for '{key}': {message}")]
    Serialization { key: String, message: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<StoreError> for StudyGateError {
    fn from(e: StoreError) -> Self {
        StudyGateError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
