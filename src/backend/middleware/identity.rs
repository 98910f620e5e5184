/**
 * Caller Identity Extraction
 *
 * Identity is established upstream (gateway or auth proxy) and forwarded as
 * trusted headers. No authorization decision is taken here.
 *
 * - `x-user-id` - required, 401 when missing or blank
 * - `x-account-id` - account owning the caller's boards; defaults to the
 *   user id
 * - `x-user-name` - display name stored as author of log entries
 */
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap, http::StatusCode};

use crate::backend::error::BackendError;
use crate::shared::board::Identity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Axum extractor for the trusted caller identity.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read the identity headers.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, BackendError> {
    let user_id = header(headers, USER_ID_HEADER).ok_or_else(|| {
        tracing::warn!("[Server] Request without {} header", USER_ID_HEADER);
        BackendError::handler(StatusCode::UNAUTHORIZED, "missing x-user-id header")
    })?;
    let account = header(headers, ACCOUNT_ID_HEADER).unwrap_or_else(|| user_id.clone());
    Ok(Identity {
        user_id,
        account,
        full_name: header(headers, USER_NAME_HEADER),
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers).map(AuthUser)
    }
}
