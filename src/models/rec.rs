use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rec {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// A rec as seen by one viewer: author fields, like count and whether the
/// viewer liked it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecOut {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub user_avatar: String,
    pub likes_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub category: String,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub link: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
