//! Session endpoints and cookie issuance.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    cookie::{clear_session_cookie, extract_session_token, session_cookie},
    error::AuthError,
    state::AuthState,
    token::SessionClaims,
    types::{MessageResponse, Role, SessionResponse},
};

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Missing or invalid tokens are treated as "no session" to avoid leaking auth state.
    match verify_session(&headers, &auth_state) {
        Some(claims) => (StatusCode::OK, Json(SessionResponse::from(claims))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Tokens are stateless; clearing the cookie is all there is to do.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Verify the session cookie, if any.
///
/// Every failure collapses to `None`.
pub(crate) fn verify_session(headers: &HeaderMap, auth_state: &AuthState) -> Option<SessionClaims> {
    let token = extract_session_token(headers)?;
    match auth_state.keys().verify(&token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("rejected session token: {err}");
            None
        }
    }
}

/// Mint a token for the subject and wrap it in a `Set-Cookie` header.
pub(super) fn issue_session_cookie(
    auth_state: &AuthState,
    subject: &str,
    role: Role,
) -> Result<HeaderMap, AuthError> {
    let (token, _) = auth_state
        .keys()
        .issue(subject, role)
        .map_err(|err| AuthError::Internal(err.into()))?;
    let cookie = session_cookie(auth_state.config(), &token)
        .map_err(|err| AuthError::Internal(err.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

impl From<SessionClaims> for SessionResponse {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
            expires_at: claims.exp,
        }
    }
}
