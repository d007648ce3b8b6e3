use crate::{error::Result, state::AppState, utils::middleware::AuthUser};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read", post(mark_all_read))
}

/// GET /notifications
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    let notifications = state
        .notification_service
        .list_notifications(user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": notifications
    })))
}

/// POST /notifications/read
async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    let updated = state.notification_service.mark_all_read(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "updated": updated }
    })))
}
