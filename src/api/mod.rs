//! # Request Handlers
//!
//! HTTP handlers for the product catalog and user accounts, the state they
//! share, and the error boundary that turns failures into responses.
//!
//! # Endpoints
//!
//! - `GET /products`, `GET /products/:id` - public reads
//! - `POST /products`, `PUT /products/:id`, `DELETE /products/:id` - token required
//! - `POST /users` - register
//! - `POST /auth` - log in

pub mod errors;
pub mod products;
pub mod state;
pub mod users;

pub use errors::{store_failure, ApiError, ApiResult, ErrorBody, ErrorDetail};
pub use state::{AppState, USERNAME_FIELD};

/// Header carrying the signed token, both ways
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Scheme prefix of the token header value
pub const BEARER_PREFIX: &str = "Bearer ";

/// Header value for a token
pub fn bearer(token: &str) -> String {
    format!("{}{}", BEARER_PREFIX, token)
}

/// Token part of a header value, if it uses the bearer scheme
pub fn strip_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
