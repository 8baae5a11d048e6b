use async_trait::async_trait;
use chrono::{DateTime, Utc};
use onboard_core::model::{Catalog, TaskId, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one `(user, task)` completion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub done: bool,
    pub updated_at: DateTime<Utc>,
}

/// Repository contract for per-user checklist progress.
///
/// Invariant: once `ensure_user_rows` has run for a user, that user's row
/// set is total over the catalog — exactly one row per catalog task.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Inserts a `done = false` row for every catalog task the user does not
    /// have yet. Existing rows are never overwritten, so repeated and
    /// concurrent calls are safe; the insert-if-absent is atomic per row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be written.
    async fn ensure_user_rows(
        &self,
        user: &UserId,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Task ids currently marked done for the user. Recomputed on every
    /// call; never cached.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing store cannot be
    /// reached. Callers treat this as fatal for the current request and
    /// render nothing.
    async fn completed_ids(&self, user: &UserId) -> Result<BTreeSet<TaskId>, StorageError>;

    /// Full replace across the whole catalog for one user: every catalog
    /// task's `done` becomes `done_ids.contains(id)` and its `updated_at`
    /// becomes `now`, unconditionally. Either the whole write lands or the
    /// prior state stands.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; no partial state is kept.
    async fn set_all(
        &self,
        user: &UserId,
        catalog: &Catalog,
        done_ids: &BTreeSet<TaskId>,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// All rows stored for the user, ordered by task id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn records_for_user(&self, user: &UserId) -> Result<Vec<ProgressRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<Mutex<HashMap<(UserId, TaskId), (bool, DateTime<Utc>)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn ensure_user_rows(
        &self,
        user: &UserId,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for task in catalog.tasks() {
            guard
                .entry((user.clone(), task.id().clone()))
                .or_insert((false, now));
        }
        Ok(())
    }

    async fn completed_ids(&self, user: &UserId) -> Result<BTreeSet<TaskId>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|((u, _), (done, _))| u == user && *done)
            .map(|((_, t), _)| t.clone())
            .collect())
    }

    async fn set_all(
        &self,
        user: &UserId,
        catalog: &Catalog,
        done_ids: &BTreeSet<TaskId>,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for task in catalog.tasks() {
            guard.insert(
                (user.clone(), task.id().clone()),
                (done_ids.contains(task.id()), now),
            );
        }
        Ok(())
    }

    async fn records_for_user(&self, user: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut out: Vec<ProgressRecord> = guard
            .iter()
            .filter(|((u, _), _)| u == user)
            .map(|((u, t), (done, at))| ProgressRecord {
                user_id: u.clone(),
                task_id: t.clone(),
                done: *done,
                updated_at: *at,
            })
            .collect();
        out.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        Ok(out)
    }
}

/// Aggregates the progress repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}
