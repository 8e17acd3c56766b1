use crate::api::{
    self,
    handlers::auth::{
        AuthConfig, AuthState, Environment, PgCredentialStore, SignupPolicy, connect,
        resolve_jwt_secret,
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: Option<SecretString>,
    pub environment: Environment,
    pub session_ttl_seconds: u64,
    pub signup_policy: SignupPolicy,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the signing secret is rejected, the database is
/// unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // Resolve the secret before touching the database so a misconfigured
    // production deploy fails fast.
    let jwt_secret = resolve_jwt_secret(args.jwt_secret, args.environment)?;

    let pool = connect(&args.dsn).await?;
    let store = PgCredentialStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to apply database schema")?;

    let auth_config = AuthConfig::new(jwt_secret)
        .with_environment(args.environment)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_signup_policy(args.signup_policy);

    info!(
        environment = args.environment.as_str(),
        signup_policy = args.signup_policy.as_str(),
        session_ttl_seconds = args.session_ttl_seconds,
        "starting folio"
    );

    let auth_state = Arc::new(AuthState::new(auth_config, Arc::new(store)));

    api::new(args.port, auth_state).await
}
