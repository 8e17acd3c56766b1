//! Admin signup endpoint.
//!
//! Every accepted registrant is created with the `admin` role and is logged in
//! immediately. The configured `SignupPolicy` decides whether registration is
//! accepted at all.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    error::AuthError,
    password::hash_password,
    session::issue_session_cookie,
    state::{AuthState, SignupPolicy},
    storage::{AdminGate, CreateOutcome, NewCredential},
    types::{CredentialsRequest, MessageResponse, Role},
    utils::{read_credentials, validate_signup},
};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created; session cookie set", body = MessageResponse),
        (status = 400, description = "Validation error or user already exists", body = MessageResponse),
        (status = 403, description = "Signup is closed", body = MessageResponse),
        (status = 500, description = "Server error", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CredentialsRequest>>,
) -> impl IntoResponse {
    match signup_inner(&auth_state, payload).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn signup_inner(
    auth_state: &AuthState,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    let (email, password) = read_credentials(request)?;
    validate_signup(&email, &password)?;

    let gate = match auth_state.config().signup_policy() {
        SignupPolicy::Closed => return Err(AuthError::SignupClosed),
        SignupPolicy::Bootstrap => AdminGate::RequireNoAdmin,
        SignupPolicy::Open => AdminGate::Unrestricted,
    };

    if auth_state.store().find_by_email(&email).await?.is_some() {
        return Err(AuthError::UserExists);
    }

    let credential = NewCredential {
        email,
        password_hash: hash_password(&password).await?,
        role: Role::Admin,
    };

    let record = match auth_state.store().create(&credential, gate).await? {
        CreateOutcome::Created(record) => record,
        // Lost a race with a concurrent signup for the same email.
        CreateOutcome::Conflict => return Err(AuthError::UserExists),
        CreateOutcome::AdminExists => {
            warn!("signup rejected: an admin already exists");
            return Err(AuthError::SignupClosed);
        }
    };

    let headers = issue_session_cookie(auth_state, &record.id.to_string(), record.role)?;

    info!(subject = %record.id, "admin account created");

    Ok((
        StatusCode::CREATED,
        headers,
        Json(MessageResponse::new(
            "User created and logged in successfully",
        )),
    ))
}
