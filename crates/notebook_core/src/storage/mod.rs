//! Durable slot storage contracts and implementations.
//!
//! # Responsibility
//! - Define the string-keyed, string-valued slot contract used by
//!   persisted state.
//! - Keep backend details (SQLite, in-process map) out of state logic.
//!
//! # Invariants
//! - `set` overwrites the whole slot; there is no partial update.
//! - `get` of a never-written key is `Ok(None)`, not an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySlotStorage;
pub use sqlite::SqliteSlotStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a slot backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Writing `key` would exceed the backend byte quota.
    QuotaExceeded { key: String, quota_bytes: usize },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { key, quota_bytes } => write!(
                f,
                "writing slot `{key}` exceeds storage quota of {quota_bytes} bytes"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/value slot store addressed by string keys.
pub trait SlotStorage {
    /// Reads the raw text stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the slot `key` with `value`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
