//! # User Handlers
//!
//! Registration and login. Both answer with the user (never the password)
//! and a freshly signed token in the `x-auth-token` response header.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::errors::{store_failure, ApiError, ApiResult};
use super::state::{AppState, USERNAME_FIELD};
use super::{bearer, AUTH_TOKEN_HEADER};
use crate::auth::AuthError;
use crate::models::{User, UserPayload, UserView};
use crate::store::{Document, Filter};
use crate::validation;

type WithToken = (StatusCode, [(&'static str, String); 1], Json<UserView>);

fn with_token(status: StatusCode, token: &str, user: &User) -> WithToken {
    (status, [(AUTH_TOKEN_HEADER, bearer(token))], Json(user.view()))
}

/// `POST /users`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<WithToken> {
    let Json(payload) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    validation::check(&payload)?;
    let (email, password, is_admin) = payload.into_parts();

    // Fast path only; the unique index decides races
    let existing = state
        .users
        .find_one(&Filter::new().eq(USERNAME_FIELD, email.as_str()))
        .await
        .map_err(store_failure("find user", None))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let hash = state.credentials.hash(password).await?;
    let mut user = User::new(email, hash, is_admin);
    let id = user.assign_id();
    let doc = Document::from_record(id, &user).map_err(store_failure("encode user", Some(id)))?;

    state
        .users
        .insert_one(doc)
        .await
        .map_err(|e| match store_failure("insert user", Some(id))(e) {
            ApiError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
            other => other,
        })?;

    let token = state.credentials.issue_token(&user)?;
    tracing::info!(%id, "user registered");
    Ok(with_token(StatusCode::CREATED, &token, &user))
}

/// `POST /auth`
///
/// Unknown user is 404, wrong password is 401. Both paths run one
/// password verification so neither answers noticeably faster.
pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<WithToken> {
    let Json(payload) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    validation::check(&payload)?;
    let (email, password, _) = payload.into_parts();

    let found = state
        .users
        .find_one(&Filter::new().eq(USERNAME_FIELD, email.as_str()))
        .await
        .map_err(store_failure("find user", None))?;

    let Some(doc) = found else {
        state.credentials.verify_unknown(password).await;
        return Err(ApiError::NotFound("User"));
    };

    let user = doc
        .decode::<User>()
        .map_err(store_failure("decode user", Some(doc.id)))?;

    if !state
        .credentials
        .verify(password, user.password.clone())
        .await?
    {
        return Err(ApiError::Authentication(AuthError::InvalidCredentials));
    }

    let token = state.credentials.issue_token(&user)?;
    tracing::debug!(id = %doc.id, "user authenticated");
    Ok(with_token(StatusCode::OK, &token, &user))
}
