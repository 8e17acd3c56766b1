//! Auth handlers and supporting modules.
//!
//! This module coordinates password login, admin signup, stateless session
//! tokens, and the guard that fronts the `/admin` namespace.
//!
//! ## Session Tokens
//!
//! A session is an HS256 JWT `{sub, role, iat, exp}` delivered in the `token`
//! cookie (`HttpOnly`, `SameSite=Strict`, `Secure` outside development). Nothing
//! is stored server-side, so logout only instructs the browser to overwrite the
//! cookie with an expired, empty value.
//!
//! ## Signup
//!
//! Registrants become admins. With the default `bootstrap` policy only the
//! first signup succeeds; the admin check and the insert run under a Postgres
//! advisory lock so concurrent first signups cannot both win.

mod cookie;
pub(crate) mod credentials;
mod error;
pub(crate) mod guard;
pub(crate) mod login;
mod password;
pub(crate) mod session;
pub(crate) mod signup;
mod state;
mod storage;
mod token;
pub(crate) mod types;
mod utils;

pub use cookie::SESSION_COOKIE_NAME;
pub use credentials::{VerifiedIdentity, verify_credentials};
pub use error::AuthError;
pub use guard::{GuardDecision, SessionState, classify, decide, session_guard};
pub use password::{MIN_PASSWORD_LENGTH, hash_password, verify_password};
pub use state::{
    AuthConfig, AuthState, Environment, PLACEHOLDER_JWT_SECRET, SignupPolicy, resolve_jwt_secret,
};
pub use storage::{
    AdminGate, CreateOutcome, CredentialRecord, CredentialStore, MemoryCredentialStore,
    NewCredential, PgCredentialStore, StoreFuture, UpsertOutcome, connect,
};
pub use token::{DEFAULT_SESSION_TTL_SECONDS, SessionClaims, TokenError, TokenKeys};
pub use types::Role;
pub use utils::{normalize_email, valid_email};
