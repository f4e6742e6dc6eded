//! Shared database handle
//!
//! Holds the current `Database` behind an `Arc`. Readers take a snapshot
//! and resolve against it without holding the lock; a reload builds a new
//! database first and then swaps the pointer, so in-flight resolutions
//! finish against the pair they started with.

use crate::config::Keys;
use crate::database::Database;
use crate::error::{ReloadError, ResourceError};
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Debug, Default)]
pub struct DatabaseResource {
    current: RwLock<Option<Arc<Database>>>,
}

impl DatabaseResource {
    pub fn new(db: Database) -> Self {
        DatabaseResource {
            current: RwLock::new(Some(Arc::new(db))),
        }
    }

    /// Current database, if one is loaded
    pub fn snapshot(&self) -> Result<Arc<Database>, ResourceError> {
        let guard = self.current.read().map_err(|_| ResourceError::Poisoned)?;
        guard.clone().ok_or(ResourceError::NoDatabase)
    }

    /// Run `f` against the current database
    pub fn with_database<F, R>(&self, f: F) -> Result<R, ResourceError>
    where
        F: FnOnce(&Database) -> R,
    {
        let db = self.snapshot()?;
        Ok(f(&db))
    }

    /// Swap in `db`, returning the previous one
    pub fn replace(&self, db: Option<Database>) -> Result<Option<Arc<Database>>, ResourceError> {
        let next = db.map(Arc::new);
        let mut guard = self.current.write().map_err(|_| ResourceError::Poisoned)?;
        Ok(std::mem::replace(&mut *guard, next))
    }

    /// Parse `input` and swap it in. On failure the current database stays.
    pub fn reload(&self, input: &[u8], keys: Keys) -> Result<Option<Arc<Database>>, ReloadError> {
        let db = Database::load(input, keys)?;
        info!(loaded = db.is_some(), "swapping database");
        Ok(self.replace(db)?)
    }
}
