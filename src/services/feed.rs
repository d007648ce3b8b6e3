use crate::{
    config::Config,
    error::Result,
    models::rec::RecOut,
    services::{rec::REC_SELECT, Database, UserService},
};
use std::sync::Arc;
use tracing::debug;

/// Read side of recs: timelines enriched for the viewer in one query each.
#[derive(Clone)]
pub struct FeedService {
    db: Arc<Database>,
    user_service: UserService,
    config: Config,
}

impl FeedService {
    pub async fn new(db: Arc<Database>, user_service: UserService, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            user_service,
            config: config.clone(),
        })
    }

    /// The viewer's own recs plus those of everyone they follow, newest first.
    pub async fn feed(
        &self,
        viewer_id: i64,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<RecOut>> {
        let (skip, limit) = self.config.page(skip, limit, self.config.default_feed_limit);
        debug!("Feed for user {} (skip {}, limit {})", viewer_id, skip, limit);

        let query = format!(
            r#"{}
                WHERE r.user_id = $1
                   OR r.user_id IN (SELECT following_id FROM follows WHERE follower_id = $1)
                ORDER BY r.created_at DESC, r.id DESC
                LIMIT $2 OFFSET $3
            "#,
            REC_SELECT
        );

        let recs = sqlx::query_as(&query)
            .bind(viewer_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.db.pool())
            .await?;
        Ok(recs)
    }

    /// One author's recs, newest first.
    pub async fn user_recs(
        &self,
        username: &str,
        viewer_id: i64,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<RecOut>> {
        let author = self.user_service.require_by_username(username).await?;
        let (skip, limit) = self
            .config
            .page(skip, limit, self.config.default_user_recs_limit);
        debug!("Recs of user {} for viewer {}", author.id, viewer_id);

        let query = format!(
            r#"{}
                WHERE r.user_id = $2
                ORDER BY r.created_at DESC, r.id DESC
                LIMIT $3 OFFSET $4
            "#,
            REC_SELECT
        );

        let recs = sqlx::query_as(&query)
            .bind(viewer_id)
            .bind(author.id)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.db.pool())
            .await?;
        Ok(recs)
    }
}
