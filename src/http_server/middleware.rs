//! # HTTP Middleware
//!
//! Correlation ids, the token check for protected routes, and the span
//! factory for request tracing.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

use crate::api::{strip_bearer, ApiError, AppState, AUTH_TOKEN_HEADER};
use crate::auth::AuthError;

/// Request and response header carrying the correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Correlation id of the current request, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Take the caller's correlation id or mint a UUID v4, and echo it back.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(CorrelationId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

/// Reject the request unless it carries a valid, unexpired token.
///
/// Verified claims are stored in request extensions for the handler.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let value = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedToken)?;
    let token = strip_bearer(value).ok_or(AuthError::MalformedToken)?;

    let claims = state.verifier.verify(token)?;
    tracing::debug!(user = %claims.user_id, "token accepted");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Span for one request: method, path and correlation id
pub fn make_span(req: &Request) -> Span {
    let correlation_id = req
        .extensions()
        .get::<CorrelationId>()
        .map(|c| c.0.as_str())
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        correlation_id = %correlation_id,
    )
}
