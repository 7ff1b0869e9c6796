//! Cart persistence
//!
//! The cart survives reloads by serializing the full state to client-local
//! storage as an opaque JSON blob. Persistence is best-effort: the store
//! decides what to do about failures, the backend only reports them.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use mockall::automock;
use thiserror::Error;

use crate::cart::Cart;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying storage failed.
    #[error("cart storage io error")]
    Io(#[from] std::io::Error),

    /// Stored state exists but does not parse as a cart.
    #[error("persisted cart state is corrupt")]
    Corrupt(#[source] serde_json::Error),
}

/// Client-local persistence for the cart state.
#[automock]
pub trait CartStorage {
    /// Persists the full cart state, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the state cannot be written.
    fn save(&mut self, cart: &Cart) -> Result<(), StorageError>;

    /// Loads the last persisted state, or `None` when nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when stored state exists but cannot be
    /// read or parsed.
    fn load(&self) -> Result<Option<Cart>, StorageError>;
}

/// File-backed storage: one JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage backend writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path the cart state is stored at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart).map_err(StorageError::Corrupt)?;

        fs::write(&self.path, json)?;

        Ok(())
    }

    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let cart = serde_json::from_str(&json).map_err(StorageError::Corrupt)?;

        Ok(Some(cart))
    }
}

/// In-memory storage, mainly for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshot: Option<String>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently held, if any state was saved.
    #[must_use]
    pub fn snapshot_len(&self) -> Option<usize> {
        self.snapshot.as_ref().map(String::len)
    }
}

impl CartStorage for MemoryStorage {
    fn save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        self.snapshot = Some(serde_json::to_string(cart).map_err(StorageError::Corrupt)?);

        Ok(())
    }

    fn load(&self) -> Result<Option<Cart>, StorageError> {
        self.snapshot
            .as_deref()
            .map(|json| serde_json::from_str(json).map_err(StorageError::Corrupt))
            .transpose()
    }
}
