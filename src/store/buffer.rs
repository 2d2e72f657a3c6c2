//! Debounced profile writes
//!
//! Rapid UI interactions produce many small profile mutations. The
//! [`DebouncedWriter`] coalesces them into one [`ProgressPatch`] and commits
//! after a quiet period with no further updates, so write volume stays
//! proportional to bursts of activity rather than to individual clicks.
//! This is a write-reduction mechanism, not a correctness one: callers that
//! need the data on disk call [`DebouncedWriter::flush`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::warn;

use super::{ProfileStore, StoreError};
use crate::progress::{ProgressSnapshot, apply_xp_delta};

/// A mergeable partial update to a stored snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    /// Net XP change, fed through the leveling core on apply
    pub xp_delta: i64,
    /// Goal completion flags, in order; a later flag for the same goal wins
    pub goal_flags: Vec<(String, bool)>,
    pub questions_answered: u64,
    pub questions_correct: u64,
}

impl ProgressPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold a newer patch into this one
    pub fn merge(&mut self, newer: ProgressPatch) {
        self.xp_delta += newer.xp_delta;
        self.goal_flags.extend(newer.goal_flags);
        self.questions_answered += newer.questions_answered;
        self.questions_correct += newer.questions_correct;
    }

    /// Apply the patch to a snapshot, maintaining the leveling and
    /// goal-completion invariants.
    pub fn apply(&self, snapshot: &mut ProgressSnapshot) {
        apply_xp_delta(snapshot, self.xp_delta);
        for (goal_id, completed) in &self.goal_flags {
            if let Some(goal) = snapshot.daily_goals.iter_mut().find(|g| g.id == *goal_id) {
                goal.completed = *completed;
            }
        }
        snapshot.refresh_goal_completion();
        snapshot.questions_answered += self.questions_answered;
        snapshot.questions_correct += self.questions_correct;
    }
}

/// Coalesces patches for one user and writes them after a quiet period
pub struct DebouncedWriter<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for DebouncedWriter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    store: S,
    user_id: String,
    quiet: Duration,
    pending: Mutex<ProgressPatch>,
    /// Bumped on every schedule; a timer only commits if it is still the
    /// latest, so new updates reset the quiet period
    generation: AtomicU64,
    /// One write in flight at a time
    commit_lock: tokio::sync::Mutex<()>,
}

impl<S: ProfileStore + 'static> DebouncedWriter<S> {
    pub fn new(store: S, user_id: impl Into<String>, quiet: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                user_id: user_id.into(),
                quiet,
                pending: Mutex::new(ProgressPatch::default()),
                generation: AtomicU64::new(0),
                commit_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Merge a patch into the pending buffer and (re)start the quiet-period
    /// timer. Returns immediately; the commit happens in the background and
    /// a failed write is logged, not retried.
    pub fn schedule_update(&self, patch: ProgressPatch) {
        let generation = {
            let mut pending = self.inner.pending.lock().expect("pending patch lock");
            pending.merge(patch);
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.quiet).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return; // superseded by a newer update
            }
            if let Err(err) = inner.commit().await {
                warn!(user_id = %inner.user_id, %err, "debounced profile write failed");
            }
        });
    }

    /// Commit whatever is pending right now, cancelling any running timer
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.commit().await
    }

    pub fn has_pending(&self) -> bool {
        !self
            .inner
            .pending
            .lock()
            .expect("pending patch lock")
            .is_empty()
    }
}

impl<S: ProfileStore> Inner<S> {
    async fn commit(&self) -> Result<(), StoreError> {
        let _in_flight = self.commit_lock.lock().await;
        let patch = std::mem::take(&mut *self.pending.lock().expect("pending patch lock"));
        if patch.is_empty() {
            return Ok(());
        }
        self.store.patch(&self.user_id, &patch).await
    }
}
