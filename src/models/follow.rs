use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Directed edge: `follower_id` is tuned to `following_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    pub created_at: DateTime<Utc>,
}
