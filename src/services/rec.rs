use crate::{
    error::{AppError, Result},
    models::rec::{CreateRecRequest, Rec, RecOut},
    services::{Database, NotificationService},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Rec columns enriched for one viewer (`$1`): author name and avatar, like
/// count, and whether the viewer liked it. Callers append `WHERE`/`ORDER BY`
/// and number their own parameters from `$2`.
pub(crate) const REC_SELECT: &str = r#"
    SELECT
        r.id,
        r.user_id,
        r.category,
        r.title,
        r.description,
        r.link,
        r.image,
        r.created_at,
        u.username,
        u.avatar AS user_avatar,
        (SELECT COUNT(*) FROM likes l WHERE l.rec_id = r.id) AS likes_count,
        EXISTS(
            SELECT 1 FROM likes l
            WHERE l.rec_id = r.id AND l.user_id = $1
        ) AS is_liked
    FROM recs r
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct RecService {
    db: Arc<Database>,
}

impl RecService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn create_rec(&self, author_id: i64, request: CreateRecRequest) -> Result<RecOut> {
        request.validate()?;
        debug!("User {} creating rec '{}'", author_id, request.title);

        let rec_id: i64 = sqlx::query_scalar(
            r#"
                INSERT INTO recs (user_id, category, title, description, link, image, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
            "#,
        )
        .bind(author_id)
        .bind(request.category.trim())
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(&request.link)
        .bind(&request.image)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await?;

        info!("Created rec {} by user {}", rec_id, author_id);
        self.get_rec(rec_id, author_id).await
    }

    pub async fn find(&self, rec_id: i64) -> Result<Option<Rec>> {
        let rec = sqlx::query_as(
            r#"
                SELECT id, user_id, category, title, description, link, image, created_at
                FROM recs
                WHERE id = $1
            "#,
        )
        .bind(rec_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(rec)
    }

    pub async fn require(&self, rec_id: i64) -> Result<Rec> {
        self.find(rec_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rec"))
    }

    /// A single rec as seen by `viewer_id`.
    pub async fn get_rec(&self, rec_id: i64, viewer_id: i64) -> Result<RecOut> {
        let query = format!("{} WHERE r.id = $2", REC_SELECT);
        sqlx::query_as(&query)
            .bind(viewer_id)
            .bind(rec_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Rec"))
    }

    /// Author-only. Likes, comments and notifications go with the rec in
    /// one transaction.
    pub async fn delete_rec(&self, rec_id: i64, requester_id: i64) -> Result<()> {
        debug!("User {} deleting rec {}", requester_id, rec_id);

        let rec = self.require(rec_id).await?;
        if rec.user_id != requester_id {
            return Err(AppError::forbidden("Only the author can delete this rec"));
        }

        let mut tx = self.db.begin_transaction().await?;

        let likes = sqlx::query("DELETE FROM likes WHERE rec_id = $1")
            .bind(rec_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let comments = sqlx::query("DELETE FROM comments WHERE rec_id = $1")
            .bind(rec_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let notifications = NotificationService::delete_for_rec(&mut *tx, rec_id).await?;

        sqlx::query("DELETE FROM recs WHERE id = $1")
            .bind(rec_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Deleted rec {} ({} likes, {} comments, {} notifications)",
            rec_id, likes, comments, notifications
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::CreateCommentRequest;
    use crate::test_support::{seed_rec, seed_user, test_state};

    fn request(category: &str, title: &str) -> CreateRecRequest {
        CreateRecRequest {
            category: category.to_string(),
            title: title.to_string(),
            description: String::new(),
            link: String::new(),
            image: String::new(),
        }
    }

    async fn count(state: &crate::state::AppState, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(state.db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_rec_returns_enriched_view() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;

        let rec = state
            .rec_service
            .create_rec(alice.id, request("book", "Dune"))
            .await
            .unwrap();
        assert_eq!(rec.user_id, alice.id);
        assert_eq!(rec.username, "alice");
        assert_eq!(rec.title, "Dune");
        assert_eq!(rec.description, "");
        assert_eq!(rec.likes_count, 0);
        assert!(!rec.is_liked);
    }

    #[tokio::test]
    async fn create_rec_rejects_blank_title() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;

        let err = state
            .rec_service
            .create_rec(alice.id, request("book", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidatorError(_)));
        assert_eq!(count(&state, "recs").await, 0);
    }

    #[tokio::test]
    async fn get_rec_of_missing_id_is_not_found() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let err = state.rec_service.get_rec(42, alice.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_engagement_and_notifications() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let dune = seed_rec(&state, alice.id, "Dune").await;
        let arrival = seed_rec(&state, alice.id, "Arrival").await;

        state.like_service.like(dune.id, bob.id).await.unwrap();
        state.like_service.like(arrival.id, bob.id).await.unwrap();
        state
            .comment_service
            .create_comment(dune.id, bob.id, CreateCommentRequest { content: "classic".into() })
            .await
            .unwrap();
        assert_eq!(count(&state, "notifications").await, 3);

        state.rec_service.delete_rec(dune.id, alice.id).await.unwrap();

        assert_eq!(count(&state, "likes").await, 1);
        assert_eq!(count(&state, "comments").await, 0);
        assert_eq!(count(&state, "notifications").await, 1);
        let err = state.rec_service.get_rec(dune.id, alice.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(state.rec_service.get_rec(arrival.id, alice.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_by_non_author_is_forbidden_and_changes_nothing() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let dune = seed_rec(&state, alice.id, "Dune").await;

        state.like_service.like(dune.id, bob.id).await.unwrap();
        state
            .comment_service
            .create_comment(dune.id, bob.id, CreateCommentRequest { content: "classic".into() })
            .await
            .unwrap();

        let err = state.rec_service.delete_rec(dune.id, bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        let view = state.rec_service.get_rec(dune.id, bob.id).await.unwrap();
        assert_eq!(view.likes_count, 1);
        assert!(view.is_liked);
        assert_eq!(count(&state, "comments").await, 1);
        assert_eq!(count(&state, "notifications").await, 2);
    }

    #[tokio::test]
    async fn delete_missing_rec_is_not_found() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let err = state.rec_service.delete_rec(7, alice.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
