//! Core data layer for the notebook.
//!
//! Notes and tags live in two JSON slots of a key-value store. Notes point
//! at tags by id; callers read notes through a cached join that embeds the
//! tag objects.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod projection;
pub mod service;
pub mod storage;

pub use config::{ConfigError, CorruptSlotPolicy, LoggingConfig, NotebookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteData, NoteId, RawNote};
pub use model::tag::{Tag, TagId};
pub use persist::{LoadOutcome, PersistError, PersistResult, PersistedState};
pub use projection::{project, ProjectionCache, ProjectionStamp};
pub use service::listing::{markdown_preview, NoteQuery, NoteSummary};
pub use service::notebook::{Notebook, NotebookError, NotebookResult};
pub use storage::{MemorySlotStorage, SlotStorage, SqliteSlotStorage, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
