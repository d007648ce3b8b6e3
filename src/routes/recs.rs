use crate::{
    error::Result,
    models::{
        comment::CreateCommentRequest,
        rec::{CreateRecRequest, RecListQuery},
    },
    state::AppState,
    utils::middleware::AuthUser,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_rec))
        .route("/feed", get(get_feed))
        .route("/user/:username", get(get_user_recs))
        .route("/:id", get(get_rec).delete(delete_rec))
        .route("/:id/like", post(like_rec).delete(unlike_rec))
        .route("/:id/comments", get(get_comments).post(create_comment))
}

/// POST /recs
async fn create_rec(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateRecRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let rec = state.rec_service.create_rec(user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": rec
        })),
    ))
}

/// GET /recs/feed?skip&limit
async fn get_feed(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<RecListQuery>,
) -> Result<Json<Value>> {
    let recs = state
        .feed_service
        .feed(user.id, query.skip, query.limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": recs
    })))
}

/// GET /recs/user/:username?skip&limit
async fn get_user_recs(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
    Query(query): Query<RecListQuery>,
) -> Result<Json<Value>> {
    let recs = state
        .feed_service
        .user_recs(&username, user.id, query.skip, query.limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": recs
    })))
}

/// GET /recs/:id
async fn get_rec(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rec_id): Path<i64>,
) -> Result<Json<Value>> {
    let rec = state.rec_service.get_rec(rec_id, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": rec
    })))
}

/// DELETE /recs/:id
async fn delete_rec(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rec_id): Path<i64>,
) -> Result<Json<Value>> {
    state.rec_service.delete_rec(rec_id, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Rec deleted"
    })))
}

/// POST /recs/:id/like
async fn like_rec(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rec_id): Path<i64>,
) -> Result<Json<Value>> {
    state.like_service.like(rec_id, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Rec liked"
    })))
}

/// DELETE /recs/:id/like
async fn unlike_rec(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rec_id): Path<i64>,
) -> Result<Json<Value>> {
    state.like_service.unlike(rec_id, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Rec unliked"
    })))
}

/// GET /recs/:id/comments
async fn get_comments(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(rec_id): Path<i64>,
) -> Result<Json<Value>> {
    let comments = state.comment_service.get_comments(rec_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": comments
    })))
}

/// POST /recs/:id/comments
async fn create_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rec_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let comment = state
        .comment_service
        .create_comment(rec_id, user.id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": comment
        })),
    ))
}
