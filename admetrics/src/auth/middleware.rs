use crate::{AppState, errors::Error};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::trace;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret gate applied to the analysis endpoints.
///
/// When no `api_key` is configured the gate is disabled and every request
/// passes. When one is configured, a missing or mismatched header fails the
/// request with 403 before any validation, computation, or persistence runs.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    if let Some(expected) = state.config.api_key.as_deref() {
        let supplied = request.headers().get(API_KEY_HEADER).and_then(|value| value.to_str().ok());
        if supplied != Some(expected) {
            return Err(Error::InvalidApiKey);
        }
        trace!("API key accepted for {}", request.uri().path());
    }

    Ok(next.run(request).await)
}
