//! Profile store boundary
//!
//! The progress engine persists snapshots through the [`ProfileStore`]
//! trait: a document store keyed by user id. The SQLite implementation is
//! the default for the binary; [`MemoryStore`] backs tests.

mod buffer;
mod sqlite;

pub use buffer::{DebouncedWriter, ProgressPatch};
pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::progress::ProgressSnapshot;

/// Errors at the profile store boundary
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no profile stored for user {0}")]
    NotFound(String),

    #[error("stored profile for {user} is malformed: {reason}")]
    Corrupt { user: String, reason: String },

    #[error("profile write failed: {0}")]
    Write(String),
}

/// Document store holding one progress snapshot per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<ProgressSnapshot, StoreError>;

    async fn put(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), StoreError>;

    /// Merge a partial update into the stored snapshot
    async fn patch(&self, user_id: &str, patch: &ProgressPatch) -> Result<(), StoreError> {
        let mut snapshot = self.get(user_id).await?;
        patch.apply(&mut snapshot);
        self.put(user_id, &snapshot).await
    }
}

#[async_trait]
impl<T: ProfileStore + ?Sized> ProfileStore for std::sync::Arc<T> {
    async fn get(&self, user_id: &str) -> Result<ProgressSnapshot, StoreError> {
        (**self).get(user_id).await
    }

    async fn put(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        (**self).put(user_id, snapshot).await
    }

    async fn patch(&self, user_id: &str, patch: &ProgressPatch) -> Result<(), StoreError> {
        (**self).patch(user_id, patch).await
    }
}

/// In-memory store for tests and dry runs
///
/// Writes can be made to fail on demand so callers' failure handling is
/// testable.
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, ProgressSnapshot>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.profiles
            .lock()
            .expect("profile map lock")
            .contains_key(user_id)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<ProgressSnapshot, StoreError> {
        self.profiles
            .lock()
            .expect("profile map lock")
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    async fn put(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("simulated write failure".into()));
        }
        self.profiles
            .lock()
            .expect("profile map lock")
            .insert(user_id.to_string(), snapshot.clone());
        Ok(())
    }
}
