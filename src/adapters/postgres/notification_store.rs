//! PostgreSQL implementation of NotificationStore.
//!
//! Persists notification records to the `notifications` table
//! (see `migrations/0001_create_notifications.sql`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{NotificationId, Timestamp};
use crate::domain::notification::{Notification, NotificationDraft, NotificationKind};
use crate::ports::{NotificationStore, NotificationStoreError};

/// PostgreSQL implementation of NotificationStore.
#[derive(Clone)]
pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    /// Creates a new PostgresNotificationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, NotificationStoreError> {
        let data = draft.data.map(|d| d.to_value());

        let row = sqlx::query(
            r#"
            INSERT INTO notifications (kind, title, message, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, kind, title, message, read, data, created_at
            "#,
        )
        .bind(draft.kind.as_str())
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            NotificationStoreError::Database(format!("Failed to insert notification: {}", e))
        })?;

        row_to_notification(row)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Notification>, NotificationStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, title, message, read, data, created_at
            FROM notifications
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            NotificationStoreError::Database(format!("Failed to list notifications: {}", e))
        })?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn count_unread(&self) -> Result<u64, NotificationStoreError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE NOT read")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    NotificationStoreError::Database(format!(
                        "Failed to count unread notifications: {}",
                        e
                    ))
                })?;

        Ok(result.0 as u64)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, NotificationStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET read = TRUE
            WHERE id = $1 AND NOT read
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            NotificationStoreError::Database(format!("Failed to mark notification read: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self) -> Result<u64, NotificationStoreError> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE NOT read")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                NotificationStoreError::Database(format!(
                    "Failed to mark all notifications read: {}",
                    e
                ))
            })?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: NotificationId) -> Result<bool, NotificationStoreError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                NotificationStoreError::Database(format!("Failed to delete notification: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_notification(row: PgRow) -> Result<Notification, NotificationStoreError> {
    let kind_str: String = row
        .try_get("kind")
        .map_err(|e| NotificationStoreError::Database(format!("Missing kind column: {}", e)))?;
    let kind = NotificationKind::parse(&kind_str).ok_or_else(|| {
        NotificationStoreError::Serialization(format!("Unknown notification kind: {}", kind_str))
    })?;

    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(|e| {
        NotificationStoreError::Database(format!("Missing created_at column: {}", e))
    })?;

    Ok(Notification {
        id: NotificationId::from_i64(
            row.try_get("id")
                .map_err(|e| NotificationStoreError::Database(format!("Missing id column: {}", e)))?,
        ),
        kind,
        title: row
            .try_get("title")
            .map_err(|e| NotificationStoreError::Database(format!("Missing title column: {}", e)))?,
        message: row.try_get("message").map_err(|e| {
            NotificationStoreError::Database(format!("Missing message column: {}", e))
        })?,
        created_at: Timestamp::from_datetime(created_at),
        read: row
            .try_get("read")
            .map_err(|e| NotificationStoreError::Database(format!("Missing read column: {}", e)))?,
        data: row
            .try_get("data")
            .map_err(|e| NotificationStoreError::Database(format!("Missing data column: {}", e)))?,
    })
}
