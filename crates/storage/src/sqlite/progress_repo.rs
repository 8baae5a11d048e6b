use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::collections::BTreeSet;

use onboard_core::model::{Catalog, TaskId, UserId};

use super::SqliteRepository;
use crate::repository::{ProgressRecord, ProgressRepository, StorageError};

fn connection_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let task_id: String = row
        .try_get("task_id")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let done: bool = row
        .try_get("done")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    Ok(ProgressRecord {
        user_id: UserId::new(user_id),
        task_id: TaskId::new(task_id),
        done,
        updated_at,
    })
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn ensure_user_rows(
        &self,
        user: &UserId,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(connection_err)?;

        for task in catalog.tasks() {
            sqlx::query(
                r"
                    INSERT INTO onboarding_progress (user_id, task_id, done, updated_at)
                    VALUES (?1, ?2, 0, ?3)
                    ON CONFLICT(user_id, task_id) DO NOTHING
                ",
            )
            .bind(user.as_str())
            .bind(task.id().as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(connection_err)?;
        }

        tx.commit().await.map_err(connection_err)
    }

    async fn completed_ids(&self, user: &UserId) -> Result<BTreeSet<TaskId>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT task_id FROM onboarding_progress
                WHERE user_id = ?1 AND done = 1
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(connection_err)?;

        let mut out = BTreeSet::new();
        for row in rows {
            let id: String = row
                .try_get("task_id")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            out.insert(TaskId::new(id));
        }
        Ok(out)
    }

    async fn set_all(
        &self,
        user: &UserId,
        catalog: &Catalog,
        done_ids: &BTreeSet<TaskId>,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(connection_err)?;

        for task in catalog.tasks() {
            sqlx::query(
                r"
                    INSERT INTO onboarding_progress (user_id, task_id, done, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(user_id, task_id) DO UPDATE SET
                        done = excluded.done,
                        updated_at = excluded.updated_at
                ",
            )
            .bind(user.as_str())
            .bind(task.id().as_str())
            .bind(done_ids.contains(task.id()))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(connection_err)?;
        }

        tx.commit().await.map_err(connection_err)
    }

    async fn records_for_user(&self, user: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT user_id, task_id, done, updated_at
                FROM onboarding_progress
                WHERE user_id = ?1
                ORDER BY task_id ASC
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(connection_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_progress_row(&row)?);
        }
        Ok(out)
    }
}
