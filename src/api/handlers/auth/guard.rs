//! Session guard for the admin namespace.
//!
//! Flow Overview: every request whose path is `/admin` or lives under
//! `/admin/` is classified by its `token` cookie, then routed:
//!
//! | session state      | `/admin/login`        | other `/admin` paths   |
//! |--------------------|-----------------------|------------------------|
//! | no token           | allow                 | redirect to login      |
//! | invalid token      | allow                 | redirect to login      |
//! | valid, non-admin   | allow                 | redirect to login      |
//! | valid, admin       | redirect to dashboard | allow                  |
//!
//! Any verification failure counts as "invalid"; the guard never lets an
//! unverified request through to a protected page.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::{
    cookie::extract_session_token,
    state::AuthState,
    token::{SessionClaims, TokenKeys},
};

pub const ADMIN_PATH: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    NoToken,
    Invalid,
    NonAdmin(SessionClaims),
    Admin(SessionClaims),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Classify a request by its session cookie.
#[must_use]
pub fn classify(headers: &HeaderMap, keys: &TokenKeys) -> SessionState {
    let Some(token) = extract_session_token(headers) else {
        return SessionState::NoToken;
    };
    match keys.verify(&token) {
        Ok(claims) if claims.role.is_admin() => SessionState::Admin(claims),
        Ok(claims) => SessionState::NonAdmin(claims),
        Err(err) => {
            debug!("session token rejected: {err}");
            SessionState::Invalid
        }
    }
}

/// Whether the guard applies to this path at all.
#[must_use]
pub fn is_protected(path: &str) -> bool {
    path == ADMIN_PATH || path.starts_with("/admin/")
}

fn is_login_path(path: &str) -> bool {
    path.trim_end_matches('/') == LOGIN_PATH
}

/// Route a classified request on a protected path.
#[must_use]
pub fn decide(state: &SessionState, path: &str) -> GuardDecision {
    if !is_protected(path) {
        return GuardDecision::Allow;
    }
    match (state, is_login_path(path)) {
        (SessionState::Admin(_), true) => GuardDecision::RedirectToDashboard,
        (SessionState::Admin(_), false) | (_, true) => GuardDecision::Allow,
        (_, false) => GuardDecision::RedirectToLogin,
    }
}

/// Middleware entry point; wire with `axum::middleware::from_fn_with_state`.
pub async fn session_guard(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !is_protected(&path) {
        return next.run(request).await;
    }

    let state = classify(request.headers(), auth_state.keys());
    match decide(&state, &path) {
        GuardDecision::Allow => {
            if let SessionState::Admin(claims) = state {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        GuardDecision::RedirectToLogin => {
            debug!(path = %path, "redirecting to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        GuardDecision::RedirectToDashboard => Redirect::temporary(ADMIN_PATH).into_response(),
    }
}
