use crate::{
    config::Config,
    error::{AppError, Result},
    models::user::{UpdateProfileRequest, User, UserProfile},
    services::Database,
    utils::validation::{escape_like, validate_max_chars},
};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Profile columns plus follow-graph aggregates. `$2` is the viewer id; a
/// NULL viewer never matches an edge, so `is_following` comes out false.
const PROFILE_SELECT: &str = r#"
    SELECT
        u.id,
        u.username,
        u.bio,
        u.avatar,
        (SELECT COUNT(*) FROM recs r WHERE r.user_id = u.id) AS recs_count,
        (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS tuned_in,
        (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS tuned_to,
        EXISTS(
            SELECT 1 FROM follows f
            WHERE f.follower_id = $2 AND f.following_id = u.id
        ) AS is_following
    FROM users u
"#;

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    config: Config,
}

impl UserService {
    pub async fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            config: config.clone(),
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as(
            "SELECT id, username, email, password, bio, avatar, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }

    /// Like [`find_by_username`](Self::find_by_username) but absent users are `NotFound`.
    pub async fn require_by_username(&self, username: &str) -> Result<User> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn get_profile(&self, username: &str, viewer_id: i64) -> Result<UserProfile> {
        debug!("Getting profile {} for viewer {}", username, viewer_id);

        let query = format!("{} WHERE u.username = $1", PROFILE_SELECT);
        sqlx::query_as(&query)
            .bind(username)
            .bind(viewer_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// The caller's own profile. `is_following` is always false here.
    pub async fn get_me(&self, user_id: i64) -> Result<UserProfile> {
        let query = format!("{} WHERE u.id = $1", PROFILE_SELECT);
        sqlx::query_as(&query)
            .bind(user_id)
            .bind(Option::<i64>::None)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Case-insensitive substring search on username, in id order.
    pub async fn search(&self, term: &str, viewer_id: i64) -> Result<Vec<UserProfile>> {
        debug!("Searching users for '{}'", term);

        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let query = format!(
            "{} WHERE lower(u.username) LIKE $1 ESCAPE '\\' ORDER BY u.id LIMIT $3",
            PROFILE_SELECT
        );

        let profiles = sqlx::query_as(&query)
            .bind(pattern)
            .bind(viewer_id)
            .bind(self.config.search_max_results)
            .fetch_all(self.db.pool())
            .await?;
        Ok(profiles)
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        request.validate()?;
        if let Some(bio) = &request.bio {
            validate_max_chars("bio", bio, self.config.max_bio_length)?;
        }

        let result = sqlx::query(
            r#"
                UPDATE users
                SET bio = COALESCE($2, bio),
                    avatar = COALESCE($3, avatar)
                WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(request.bio)
        .bind(request.avatar)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        info!("Updated profile of user {}", user_id);
        self.get_me(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_follow, seed_rec, seed_user, test_state};

    #[tokio::test]
    async fn profile_reports_counts_and_follow_state() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let carol = seed_user(&state, "carol").await;

        seed_rec(&state, alice.id, "Dune").await;
        seed_rec(&state, alice.id, "Arrival").await;
        seed_follow(&state, bob.id, alice.id).await;
        seed_follow(&state, carol.id, alice.id).await;
        seed_follow(&state, alice.id, carol.id).await;

        let seen_by_bob = state.user_service.get_profile("alice", bob.id).await.unwrap();
        assert_eq!(seen_by_bob.id, alice.id);
        assert_eq!(seen_by_bob.recs_count, 2);
        assert_eq!(seen_by_bob.tuned_in, 2);
        assert_eq!(seen_by_bob.tuned_to, 1);
        assert!(seen_by_bob.is_following);

        let seen_by_carol = state.user_service.get_profile("bob", carol.id).await.unwrap();
        assert!(!seen_by_carol.is_following);
        assert_eq!(seen_by_carol.recs_count, 0);
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_not_found() {
        let state = test_state().await;
        let viewer = seed_user(&state, "viewer").await;
        let err = state.user_service.get_profile("ghost", viewer.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn me_never_reports_following() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        seed_follow(&state, alice.id, bob.id).await;

        let me = state.user_service.get_me(alice.id).await.unwrap();
        assert_eq!(me.username, "alice");
        assert_eq!(me.tuned_to, 1);
        assert!(!me.is_following);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let state = test_state().await;
        let viewer = seed_user(&state, "viewer").await;
        let dune = seed_user(&state, "DuneFan").await;
        seed_user(&state, "sandworm").await;
        seed_user(&state, "fremen_dune").await;
        seed_follow(&state, viewer.id, dune.id).await;

        let found = state.user_service.search("dUNe", viewer.id).await.unwrap();
        let names: Vec<_> = found.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["DuneFan", "fremen_dune"]);
        assert!(found[0].is_following);
        assert!(!found[1].is_following);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally_and_caps_results() {
        let state = test_state().await;
        let viewer = seed_user(&state, "viewer").await;
        for i in 0..25 {
            seed_user(&state, &format!("reader{}", i)).await;
        }
        seed_user(&state, "under_score").await;

        let capped = state.user_service.search("reader", viewer.id).await.unwrap();
        assert_eq!(capped.len(), 20);
        assert_eq!(capped[0].username, "reader0");

        let literal = state.user_service.search("_", viewer.id).await.unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].username, "under_score");

        let none = state.user_service.search("%", viewer.id).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;

        let updated = state
            .user_service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    bio: Some("reads a lot".to_string()),
                    avatar: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio, "reads a lot");
        assert_eq!(updated.avatar, "");

        let updated = state
            .user_service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    bio: None,
                    avatar: Some("https://img.example/a.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio, "reads a lot");
        assert_eq!(updated.avatar, "https://img.example/a.png");
    }

    #[tokio::test]
    async fn update_profile_enforces_bio_limit() {
        let state = test_state().await;
        let alice = seed_user(&state, "alice").await;
        let too_long = "x".repeat(state.config.max_bio_length + 1);

        let err = state
            .user_service
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    bio: Some(too_long),
                    avatar: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
