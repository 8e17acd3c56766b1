//! Admin namespace endpoints.
//!
//! Both routes sit behind `auth::session_guard`; by the time a handler runs the
//! guard has already decided the request may proceed.

use axum::{
    extract::Extension,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::{
    SessionClaims,
    guard::LOGIN_PATH,
    types::{Role, SessionResponse},
};

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LoginHint {
    pub message: String,
    pub login_endpoint: String,
    pub signup_endpoint: String,
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Current admin session", body = SessionResponse),
        (status = 307, description = "No admin session; redirected to the login page")
    ),
    tag = "admin"
)]
pub async fn dashboard(claims: Option<Extension<SessionClaims>>) -> Response {
    // The guard attaches claims for admin sessions only.
    match claims {
        Some(Extension(claims)) if claims.role == Role::Admin => {
            Json(SessionResponse::from(claims)).into_response()
        }
        _ => Redirect::temporary(LOGIN_PATH).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/admin/login",
    responses(
        (status = 200, description = "Where to sign in", body = LoginHint),
        (status = 307, description = "Already signed in as admin; redirected to the dashboard")
    ),
    tag = "admin"
)]
pub async fn login_page() -> Json<LoginHint> {
    Json(LoginHint {
        message: "Sign in to access the admin area".to_string(),
        login_endpoint: "/api/auth/login".to_string(),
        signup_endpoint: "/api/auth/signup".to_string(),
    })
}
