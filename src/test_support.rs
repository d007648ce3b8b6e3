//! Fixtures for unit and router tests: a migrated in-memory store wired into
//! a full `AppState`, plus direct-insert seeders that skip password hashing.

use crate::{
    config::Config,
    models::{rec::Rec, user::User},
    services::Database,
    state::AppState,
};
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        log_level: "recs=debug".to_string(),
        log_format: "pretty".to_string(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_expiry_minutes: 60,
        default_feed_limit: 50,
        default_user_recs_limit: 20,
        max_page_size: 100,
        search_max_results: 20,
        notifications_limit: 50,
        max_comment_length: 2000,
        max_bio_length: 500,
        cors_allowed_origins: "http://localhost:5173".to_string(),
    }
}

pub async fn test_state() -> Arc<AppState> {
    let db = Database::in_memory().await.expect("in-memory database");
    db.migrate().await.expect("migrations apply");
    AppState::new(test_config(), Arc::new(db))
        .await
        .expect("state builds")
}

/// Store backed by a WAL file with a multi-connection pool, for tests where
/// requests must actually overlap. The database lives as long as the
/// returned `TempDir`.
pub async fn file_backed_state(max_connections: u32) -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = test_config();
    config.database_url = format!("sqlite://{}", dir.path().join("recs.db").display());
    config.database_max_connections = max_connections;

    let db = Database::new(&config).await.expect("file database");
    db.migrate().await.expect("migrations apply");
    let state = AppState::new(config, Arc::new(db))
        .await
        .expect("state builds");
    (state, dir)
}

pub async fn seed_user(state: &AppState, username: &str) -> User {
    sqlx::query_as(
        r#"
            INSERT INTO users (username, email, password, created_at)
            VALUES ($1, $2, 'not-a-real-digest', $3)
            RETURNING id, username, email, password, bio, avatar, created_at
        "#,
    )
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(Utc::now())
    .fetch_one(state.db.pool())
    .await
    .expect("seed user")
}

pub async fn seed_rec(state: &AppState, author_id: i64, title: &str) -> Rec {
    sqlx::query_as(
        r#"
            INSERT INTO recs (user_id, category, title, created_at)
            VALUES ($1, 'book', $2, $3)
            RETURNING id, user_id, category, title, description, link, image, created_at
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(Utc::now())
    .fetch_one(state.db.pool())
    .await
    .expect("seed rec")
}

pub async fn seed_follow(state: &AppState, follower_id: i64, following_id: i64) {
    sqlx::query("INSERT INTO follows (follower_id, following_id, created_at) VALUES ($1, $2, $3)")
        .bind(follower_id)
        .bind(following_id)
        .bind(Utc::now())
        .execute(state.db.pool())
        .await
        .expect("seed follow");
}
