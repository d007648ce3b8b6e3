use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::utils::validation::validate_username_chars;

/// Stored account row. Carries the password digest, so it never leaves the
/// service layer; responses use [`UserOut`] or [`UserProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Public profile with follow-graph aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub bio: String,
    pub avatar: String,
    pub recs_count: i64,
    /// Followers: edges pointing at this user.
    pub tuned_in: i64,
    /// Followees: edges leaving this user.
    pub tuned_to: i64,
    pub is_following: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_username_chars")]
    pub username: String,

    #[validate(email(message = "Invalid email format"), length(max = 100))]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Bio is length-checked against `MAX_BIO_LENGTH` in the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,

    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub q: String,
}
