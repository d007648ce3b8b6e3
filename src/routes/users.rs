use crate::{
    error::Result,
    models::user::{UpdateProfileRequest, UserSearchQuery},
    state::AppState,
    utils::middleware::AuthUser,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/search", get(search_users))
        .route("/:username", get(get_profile))
        .route("/:username/follow", post(follow_user).delete(unfollow_user))
}

/// GET /users/me
async fn get_me(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<Value>> {
    let profile = state.user_service.get_me(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": profile
    })))
}

/// Update bio and/or avatar
/// PUT /users/me
async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let profile = state.user_service.update_profile(user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "data": profile
    })))
}

/// GET /users/search?q=
async fn search_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Value>> {
    debug!("User {} searching for '{}'", user.id, query.q);

    let users = state.user_service.search(&query.q, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": users
    })))
}

/// GET /users/:username
async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    let profile = state.user_service.get_profile(&username, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": profile
    })))
}

/// POST /users/:username/follow
async fn follow_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    state.follow_service.follow_user(user.id, &username).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Now following {}", username)
    })))
}

/// DELETE /users/:username/follow
async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    state.follow_service.unfollow_user(user.id, &username).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Unfollowed {}", username)
    })))
}
