use crate::{
    error::{AppError, Result},
    models::{
        like::Like,
        notification::{NewNotification, NotificationKind},
    },
    services::{Database, NotificationService, RecService},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct LikeService {
    db: Arc<Database>,
    rec_service: RecService,
}

impl LikeService {
    pub async fn new(db: Arc<Database>, rec_service: RecService) -> Result<Self> {
        Ok(Self { db, rec_service })
    }

    /// Likes a rec and notifies its author in the same transaction. The
    /// insert is the transaction's first statement, so concurrent likes of
    /// one pair queue on the write lock and all but one hit the unique
    /// constraint as `Conflict`.
    pub async fn like(&self, rec_id: i64, user_id: i64) -> Result<Like> {
        debug!("User {} liking rec {}", user_id, rec_id);

        let rec = self.rec_service.require(rec_id).await?;

        let mut tx = self.db.begin_transaction().await?;

        let like: Like = sqlx::query_as(
            r#"
                INSERT INTO likes (user_id, rec_id, created_at)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, rec_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(rec_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // The rec went away between the lookup and the insert
            let rec_gone = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()
            );
            if rec_gone {
                AppError::not_found("Rec")
            } else {
                AppError::from_unique_violation(e, "Already liked")
            }
        })?;

        NotificationService::record(
            &mut *tx,
            NewNotification {
                recipient_id: rec.user_id,
                actor_id: user_id,
                kind: NotificationKind::Like,
                rec_id,
            },
        )
        .await?;

        tx.commit().await?;

        info!("User {} liked rec {}", user_id, rec_id);
        Ok(like)
    }

    /// Notifications from the earlier like are kept.
    pub async fn unlike(&self, rec_id: i64, user_id: i64) -> Result<()> {
        debug!("User {} unliking rec {}", user_id, rec_id);

        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND rec_id = $2")
            .bind(user_id)
            .bind(rec_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_operation("Not liked"));
        }

        info!("User {} unliked rec {}", user_id, rec_id);
        Ok(())
    }
}
