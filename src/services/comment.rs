use crate::{
    config::Config,
    error::Result,
    models::{
        comment::{CommentOut, CreateCommentRequest},
        notification::{NewNotification, NotificationKind},
    },
    services::{Database, NotificationService, RecService},
    utils::validation::validate_max_chars,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

const COMMENT_SELECT: &str = r#"
    SELECT
        c.id,
        c.rec_id,
        c.user_id,
        c.content,
        c.created_at,
        u.username,
        u.avatar AS user_avatar
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
    rec_service: RecService,
    config: Config,
}

impl CommentService {
    pub async fn new(db: Arc<Database>, rec_service: RecService, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            rec_service,
            config: config.clone(),
        })
    }

    pub async fn create_comment(
        &self,
        rec_id: i64,
        author_id: i64,
        request: CreateCommentRequest,
    ) -> Result<CommentOut> {
        debug!("User {} commenting on rec {}", author_id, rec_id);

        request.validate()?;
        validate_max_chars("content", &request.content, self.config.max_comment_length)?;

        let rec = self.rec_service.require(rec_id).await?;

        let mut tx = self.db.begin_transaction().await?;

        let comment_id: i64 = sqlx::query_scalar(
            r#"
                INSERT INTO comments (user_id, rec_id, content, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id
            "#,
        )
        .bind(author_id)
        .bind(rec_id)
        .bind(&request.content)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::record(
            &mut *tx,
            NewNotification {
                recipient_id: rec.user_id,
                actor_id: author_id,
                kind: NotificationKind::Comment,
                rec_id,
            },
        )
        .await?;

        let query = format!("{} WHERE c.id = $1", COMMENT_SELECT);
        let comment: CommentOut = sqlx::query_as(&query)
            .bind(comment_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Created comment {} on rec {}", comment_id, rec_id);
        Ok(comment)
    }

    /// Oldest first. An unknown rec simply has no comments.
    pub async fn get_comments(&self, rec_id: i64) -> Result<Vec<CommentOut>> {
        let query = format!(
            "{} WHERE c.rec_id = $1 ORDER BY c.created_at ASC, c.id ASC",
            COMMENT_SELECT
        );
        let comments = sqlx::query_as(&query)
            .bind(rec_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(comments)
    }
}
