//! Password login endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    credentials::verify_credentials,
    error::AuthError,
    session::issue_session_cookie,
    state::AuthState,
    types::{CredentialsRequest, MessageResponse},
    utils::read_credentials,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = MessageResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 403, description = "Account is not an admin", body = MessageResponse),
        (status = 500, description = "Server error", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CredentialsRequest>>,
) -> impl IntoResponse {
    match login_inner(&auth_state, payload).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn login_inner(
    auth_state: &AuthState,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    let (email, password) = read_credentials(request)?;

    let identity = verify_credentials(auth_state.store(), &email, &password).await?;
    let headers = issue_session_cookie(auth_state, &identity.id.to_string(), identity.role)?;

    info!(subject = %identity.id, "admin logged in");

    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponse::new("Logged in successfully")),
    ))
}
