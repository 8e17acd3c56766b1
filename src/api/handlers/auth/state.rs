//! Auth state, configuration, and signing-secret resolution.

use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::warn;

use super::{
    password::prepare_dummy_hash,
    storage::CredentialStore,
    token::{DEFAULT_SESSION_TTL_SECONDS, TokenKeys},
};

/// Well-known fallback secret; never acceptable outside development.
pub const PLACEHOLDER_JWT_SECRET: &str = "default-secret-key-that-is-long-enough";
const MIN_SECRET_BYTES: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("invalid environment: {other}")),
        }
    }
}

/// Who may register through `POST /api/auth/signup`.
///
/// Every accepted registrant becomes an admin; the policy decides when
/// registration is accepted at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignupPolicy {
    /// Accept signups only while no admin exists.
    Bootstrap,
    /// Accept every signup.
    Open,
    /// Reject every signup.
    Closed,
}

impl SignupPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for SignupPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "bootstrap" => Ok(Self::Bootstrap),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(format!("invalid signup policy: {other}")),
        }
    }
}

/// Resolve the signing secret for the given environment.
///
/// Production refuses a missing or placeholder secret. Development falls back
/// to the placeholder with a warning.
///
/// # Errors
/// Returns an error in production when the secret is unset or the placeholder.
pub fn resolve_jwt_secret(
    secret: Option<SecretString>,
    environment: Environment,
) -> Result<SecretString> {
    match secret.filter(|secret| !secret.expose_secret().trim().is_empty()) {
        Some(secret) if secret.expose_secret() != PLACEHOLDER_JWT_SECRET => {
            if secret.expose_secret().len() < MIN_SECRET_BYTES {
                warn!("FOLIO_JWT_SECRET is shorter than {MIN_SECRET_BYTES} bytes");
            }
            Ok(secret)
        }
        _ if environment == Environment::Production => {
            bail!("FOLIO_JWT_SECRET must be set to a non-default value in production")
        }
        _ => {
            warn!("FOLIO_JWT_SECRET is unset or the placeholder; using the development secret");
            Ok(SecretString::from(PLACEHOLDER_JWT_SECRET.to_string()))
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    environment: Environment,
    session_ttl_seconds: u64,
    signup_policy: SignupPolicy,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            environment: Environment::Production,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            signup_policy: SignupPolicy::Bootstrap,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_signup_policy(mut self, policy: SignupPolicy) -> Self {
        self.signup_policy = policy;
        self
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn signup_policy(&self) -> SignupPolicy {
        self.signup_policy
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.environment != Environment::Development
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("environment", &self.environment)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("signup_policy", &self.signup_policy)
            .finish()
    }
}

/// Process-wide auth state shared by handlers and the session guard.
pub struct AuthState {
    config: AuthConfig,
    keys: TokenKeys,
    store: Arc<dyn CredentialStore>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let keys = TokenKeys::new(&config.jwt_secret, config.session_ttl_seconds);
        prepare_dummy_hash();
        Self {
            config,
            keys,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
