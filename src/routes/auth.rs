use crate::{
    error::Result,
    models::user::{LoginRequest, SignupRequest, TokenResponse},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Create an account
/// POST /auth/signup
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = state.auth_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": user
        })),
    ))
}

/// Exchange credentials for a bearer token. Responds with the bare token
/// object rather than the success envelope.
/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    request.validate()?;
    debug!("Login attempt for {}", request.email);

    let token = state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}
