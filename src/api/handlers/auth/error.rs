//! Error taxonomy for auth endpoints and its mapping to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use super::{password::MIN_PASSWORD_LENGTH, types::MessageResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please provide email and password")]
    MissingFields,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    WeakPassword,
    /// Unknown user and wrong password share this variant.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authorized to access this route")]
    NotAuthorized,
    #[error("User already exists")]
    UserExists,
    #[error("Signup is closed")]
    SignupClosed,
    #[error("Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidEmail | Self::WeakPassword | Self::UserExists => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized | Self::SignupClosed => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Details stay in the logs; clients only see the generic message.
        if let Self::Internal(err) = &self {
            error!("auth request failed: {err:#}");
        }
        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
