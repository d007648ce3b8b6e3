use crate::{error::AppError, state::AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::FromRequestParts,
    headers::{authorization::Bearer, Authorization},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
    RequestPartsExt, TypedHeader,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                debug!("Request to {} without bearer token", parts.uri.path());
                AppError::unauthorized("Missing authorization header")
            })?;

        let user_id = state.auth_service.verify_token(bearer.token()).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AppError::unauthorized("Invalid token")
        })?;

        Ok(AuthUser { id: user_id })
    }
}

/// Request logging middleware
pub async fn request_logging_middleware(request: Request<Body>, next: Next<Body>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start_time = std::time::Instant::now();

    debug!("Incoming request: {} {}", method, uri);

    let response = next.run(request).await;

    let elapsed = start_time.elapsed();
    let status = response.status();

    info!(
        "Request completed: {} {} {} - {}ms",
        method,
        uri.path(),
        status.as_u16(),
        elapsed.as_millis()
    );

    response
}
