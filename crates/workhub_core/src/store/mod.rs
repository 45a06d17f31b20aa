//! Document store clients and live snapshot plumbing.
//!
//! # Responsibility
//! - Translate mini-app intents into persistence operations against the
//!   `tasks` and `notes` collections.
//! - Expose a cancellable snapshot subscription primitive for the task list.
//!
//! # Invariants
//! - Store clients apply no optimistic local state; callers observe changes
//!   only through fresh reads or delivered snapshots.
//! - Collection listings are ordered most-recently-created first.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod note_store;
pub mod task_store;
pub mod watch;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error shared by both collection clients.
#[derive(Debug)]
pub enum StoreError {
    /// Target document does not exist (or is already permanently deleted).
    NotFound(Uuid),
    /// Persistence backend failure.
    Db(DbError),
    /// Persisted row violates the document shape.
    InvalidData(String),
    /// Transport-level failure reported by remote-backed store clients.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Used for the client-assigned `completed_at`/`deleted_at` markers; the
/// store itself assigns `created_at`/`updated_at` on write.
pub fn now_epoch_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        // Pre-epoch clocks only happen on badly misconfigured hosts; a zero
        // marker keeps the write path infallible.
        Err(_) => 0,
    }
}
