use crate::{
    config::Config,
    error::{AppError, Result},
    models::notification::{NewNotification, NotificationOut, NotificationRow},
    services::Database,
};
use chrono::Utc;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<Database>,
    config: Config,
}

impl NotificationService {
    pub async fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            config: config.clone(),
        })
    }

    /// Records an engagement notification on the caller's connection so it
    /// commits or rolls back with the engagement itself. Acting on your own
    /// rec notifies nobody; returns whether a row was written.
    pub async fn record(conn: &mut SqliteConnection, notification: NewNotification) -> Result<bool> {
        if notification.recipient_id == notification.actor_id {
            return Ok(false);
        }

        sqlx::query(
            r#"
                INSERT INTO notifications (user_id, from_user_id, type, rec_id, is_read, created_at)
                VALUES ($1, $2, $3, $4, FALSE, $5)
            "#,
        )
        .bind(notification.recipient_id)
        .bind(notification.actor_id)
        .bind(notification.kind.as_str())
        .bind(notification.rec_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        debug!(
            "Recorded {} notification for user {} from user {}",
            notification.kind, notification.recipient_id, notification.actor_id
        );
        Ok(true)
    }

    /// Part of the rec deletion cascade.
    pub async fn delete_for_rec(conn: &mut SqliteConnection, rec_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE rec_id = $1")
            .bind(rec_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Newest first, capped at `NOTIFICATIONS_LIMIT`. Actors that no longer
    /// resolve show up with empty name and avatar.
    pub async fn list_notifications(&self, user_id: i64) -> Result<Vec<NotificationOut>> {
        debug!("Listing notifications for user {}", user_id);

        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
                SELECT
                    n.id,
                    n.type AS kind,
                    n.rec_id,
                    n.is_read,
                    n.created_at,
                    COALESCE(u.username, '') AS from_username,
                    COALESCE(u.avatar, '') AS from_user_avatar
                FROM notifications n
                LEFT JOIN users u ON u.id = n.from_user_id
                WHERE n.user_id = $1
                ORDER BY n.created_at DESC, n.id DESC
                LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(self.config.notifications_limit)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|row| NotificationOut::try_from(row).map_err(AppError::Internal))
            .collect()
    }

    /// Idempotent; returns how many notifications flipped to read.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        info!(
            "Marked {} notifications read for user {}",
            result.rows_affected(),
            user_id
        );
        Ok(result.rows_affected())
    }
}
