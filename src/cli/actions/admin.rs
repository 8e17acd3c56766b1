//! Operator tooling for the admin account.
//!
//! `sync-admin` creates the admin record or resets its password hash and role,
//! so a lost password can be recovered from the deploy environment.
//! `verify-login` reports whether the configured credentials would pass login
//! without issuing a session.

use crate::api::handlers::auth::{
    CredentialStore, MIN_PASSWORD_LENGTH, PgCredentialStore, Role, UpsertOutcome, connect,
    hash_password, normalize_email, valid_email, verify_password,
};
use anyhow::{Context, Result, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub dsn: String,
    pub email: String,
    pub password: SecretString,
}

/// Outcome of checking a credential pair against the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginCheck {
    NotFound,
    Mismatch(Role),
    Match(Role),
}

/// Execute `sync-admin` against Postgres.
/// # Errors
/// Returns an error if the credentials are invalid or the database fails.
pub async fn sync_admin(args: Args) -> Result<()> {
    let store = open_store(&args.dsn).await?;
    let email = normalize_email(&args.email);

    info!(email = %email, "syncing admin account");

    match upsert_admin(&store, &email, args.password.expose_secret()).await? {
        UpsertOutcome::Created => println!("Admin user {email} created."),
        UpsertOutcome::Updated => println!("Admin user {email} password and role updated."),
    }
    Ok(())
}

/// Execute `verify-login` against Postgres.
/// # Errors
/// Returns an error when the account is missing, the password does not match,
/// or the database fails.
pub async fn verify_login(args: Args) -> Result<()> {
    let store = open_store(&args.dsn).await?;
    let email = normalize_email(&args.email);

    println!("Checking user: {email}");
    match check_login(&store, &email, args.password.expose_secret()).await? {
        LoginCheck::NotFound => bail!("user {email} not found"),
        LoginCheck::Mismatch(role) => {
            println!("Role: {role}");
            bail!("password does not match the stored hash for {email}")
        }
        LoginCheck::Match(role) => {
            println!("Role: {role}");
            println!("Password match: SUCCESS");
            if role.is_admin() {
                println!("Sign in should work with these credentials.");
            } else {
                println!("Sign in will be refused: the account is not an admin.");
            }
            Ok(())
        }
    }
}

async fn open_store(dsn: &str) -> Result<PgCredentialStore> {
    let store = PgCredentialStore::new(connect(dsn).await?);
    store
        .ensure_schema()
        .await
        .context("Failed to apply database schema")?;
    Ok(store)
}

/// Validate, hash, and upsert the admin credential.
///
/// # Errors
/// Returns an error if the email or password is rejected, or storage fails.
pub async fn upsert_admin(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<UpsertOutcome> {
    if !valid_email(email) {
        bail!("invalid admin email: {email}");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!("admin password must be at least {MIN_PASSWORD_LENGTH} characters");
    }
    let password_hash = hash_password(password).await?;
    store.upsert_admin(email, &password_hash).await
}

/// Look the account up and verify the password without issuing a session.
///
/// # Errors
/// Returns an error if storage fails or the stored hash is unusable.
pub async fn check_login(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<LoginCheck> {
    let Some(record) = store.find_by_email(email).await? else {
        return Ok(LoginCheck::NotFound);
    };
    if verify_password(password, &record.password_hash).await? {
        Ok(LoginCheck::Match(record.role))
    } else {
        Ok(LoginCheck::Mismatch(record.role))
    }
}
