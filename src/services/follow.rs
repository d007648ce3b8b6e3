use crate::{
    error::{AppError, Result},
    models::follow::Follow,
    services::{Database, UserService},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct FollowService {
    db: Arc<Database>,
    user_service: UserService,
}

impl FollowService {
    pub async fn new(db: Arc<Database>, user_service: UserService) -> Result<Self> {
        Ok(Self { db, user_service })
    }

    pub async fn follow_user(&self, follower_id: i64, username: &str) -> Result<Follow> {
        debug!("User {} following {}", follower_id, username);

        let target = self.user_service.require_by_username(username).await?;

        // Prevent self-follow before touching the follows table
        if target.id == follower_id {
            return Err(AppError::invalid_operation("Cannot follow yourself"));
        }

        if self.find_edge(follower_id, target.id).await?.is_some() {
            return Err(AppError::conflict("Already following"));
        }

        // A concurrent follow that wins the race trips the UNIQUE constraint
        let follow: Follow = sqlx::query_as(
            r#"
                INSERT INTO follows (follower_id, following_id, created_at)
                VALUES ($1, $2, $3)
                RETURNING id, follower_id, following_id, created_at
            "#,
        )
        .bind(follower_id)
        .bind(target.id)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Already following"))?;

        info!("User {} followed user {}", follower_id, target.id);
        Ok(follow)
    }

    pub async fn unfollow_user(&self, follower_id: i64, username: &str) -> Result<()> {
        debug!("User {} unfollowing {}", follower_id, username);

        let target = self.user_service.require_by_username(username).await?;

        let result = sqlx::query(
            "DELETE FROM follows WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower_id)
        .bind(target.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_operation("Not following"));
        }

        info!("User {} unfollowed user {}", follower_id, target.id);
        Ok(())
    }

    pub async fn find_edge(&self, follower_id: i64, following_id: i64) -> Result<Option<Follow>> {
        let follow = sqlx::query_as(
            r#"
                SELECT id, follower_id, following_id, created_at
                FROM follows
                WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(follow)
    }
}
