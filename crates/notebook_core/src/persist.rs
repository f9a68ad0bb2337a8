//! Persisted state bound to one durable slot.
//!
//! # Responsibility
//! - Load a typed value from a slot once, at initialization.
//! - Mirror every replacement of the value back to the slot as JSON.
//!
//! # Invariants
//! - Durable reads happen only in `initialize*`.
//! - Each successful `set`/`update` performs exactly one durable write.
//! - The in-memory value changes only after the durable write succeeded.
//! - `revision` increases by one per successful write and never otherwise.

use crate::config::CorruptSlotPolicy;
use crate::storage::{SlotStorage, StorageError};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while loading or saving persisted state.
#[derive(Debug)]
pub enum PersistError {
    Storage(StorageError),
    /// Slot content is not valid JSON of the expected shape.
    Deserialize {
        key: String,
        source: serde_json::Error,
    },
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Deserialize { key, source } => {
                write!(f, "slot `{key}` holds malformed data: {source}")
            }
            Self::Serialize { key, source } => {
                write!(f, "failed to serialize value for slot `{key}`: {source}")
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Deserialize { source, .. } | Self::Serialize { source, .. } => Some(source),
        }
    }
}

impl From<StorageError> for PersistError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// How the initial value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parsed from the slot.
    Loaded,
    /// Slot was absent; default used.
    Defaulted,
    /// Slot was malformed; default used under `CorruptSlotPolicy::Fallback`.
    Recovered,
}

/// A value continuously mirrored to the slot `key`.
#[derive(Debug, Clone)]
pub struct PersistedState<T> {
    key: String,
    value: T,
    revision: u64,
    outcome: LoadOutcome,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads `key`, or uses `initial` when the slot is absent.
    pub fn initialize<S>(
        storage: &S,
        key: impl Into<String>,
        initial: T,
        policy: CorruptSlotPolicy,
    ) -> PersistResult<Self>
    where
        S: SlotStorage + ?Sized,
    {
        Self::initialize_with(storage, key, move || initial, policy)
    }

    /// Loads `key`, or calls `factory` when the slot is absent.
    ///
    /// `factory` runs at most once and only when no stored value is used.
    pub fn initialize_with<S, F>(
        storage: &S,
        key: impl Into<String>,
        factory: F,
        policy: CorruptSlotPolicy,
    ) -> PersistResult<Self>
    where
        S: SlotStorage + ?Sized,
        F: FnOnce() -> T,
    {
        let key = key.into();
        let raw = storage.get(&key)?;

        let (value, outcome) = match raw {
            None => (factory(), LoadOutcome::Defaulted),
            Some(raw) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => (value, LoadOutcome::Loaded),
                Err(source) => match policy {
                    CorruptSlotPolicy::Fallback => {
                        warn!(
                            "event=slot_load module=persist status=recovered key={} bytes={} error={}",
                            key,
                            raw.len(),
                            source
                        );
                        (factory(), LoadOutcome::Recovered)
                    }
                    CorruptSlotPolicy::Fail => {
                        error!(
                            "event=slot_load module=persist status=error key={} bytes={} error={}",
                            key,
                            raw.len(),
                            source
                        );
                        return Err(PersistError::Deserialize { key, source });
                    }
                },
            },
        };

        debug!(
            "event=slot_load module=persist status=ok key={} outcome={:?}",
            key, outcome
        );
        Ok(Self {
            key,
            value,
            revision: 0,
            outcome,
        })
    }

    /// Replaces the value with `value` and writes it durably.
    pub fn set<S>(&mut self, storage: &mut S, value: T) -> PersistResult<()>
    where
        S: SlotStorage + ?Sized,
    {
        self.write(storage, &value)?;
        self.value = value;
        self.revision += 1;
        Ok(())
    }

    /// Replaces the value with `updater(previous)` and writes it durably.
    pub fn update<S, F>(&mut self, storage: &mut S, updater: F) -> PersistResult<()>
    where
        S: SlotStorage + ?Sized,
        F: FnOnce(&T) -> T,
    {
        let next = updater(&self.value);
        self.set(storage, next)
    }

    fn write<S>(&self, storage: &mut S, value: &T) -> PersistResult<()>
    where
        S: SlotStorage + ?Sized,
    {
        let encoded = serde_json::to_string(value).map_err(|source| PersistError::Serialize {
            key: self.key.clone(),
            source,
        })?;

        if let Err(err) = storage.set(&self.key, &encoded) {
            error!(
                "event=slot_save module=persist status=error key={} bytes={} error={}",
                self.key,
                encoded.len(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=slot_save module=persist status=ok key={} bytes={} revision={}",
            self.key,
            encoded.len(),
            self.revision + 1
        );
        Ok(())
    }
}

impl<T> PersistedState<T> {
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Count of successful writes since initialization.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }
}
