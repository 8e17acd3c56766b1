//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`), so the salt and
//! cost parameters travel with the hash. Hashing and verification are
//! CPU-bound and run on the blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use std::sync::OnceLock;
use tracing::warn;

pub const MIN_PASSWORD_LENGTH: usize = 8;

// Verified against when the email is unknown so both paths cost one Argon2 run.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails or the blocking task panics.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .context("password hashing task failed")?
}

/// Verify a candidate password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .context("password verification task failed")?
}

/// Burn one verification against a throwaway hash.
pub async fn verify_dummy(password: &str) {
    let password = password.to_string();
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(hash) = dummy_hash() {
            let _ = verify_blocking(&password, hash);
        }
    })
    .await;
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| anyhow!("invalid stored password hash: {err}"))?;
    // The PHC output comparison is constant-time.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow!("failed to verify password: {err}")),
    }
}

/// Build the dummy hash up front so the first unknown-email login costs the
/// same single verification as every later one.
pub(super) fn prepare_dummy_hash() {
    if dummy_hash().is_none() {
        warn!("failed to prepare dummy password hash");
    }
}

#[cfg(test)]
pub(super) fn dummy_hash_ready() -> bool {
    DUMMY_HASH.get().is_some_and(Option::is_some)
}

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_blocking("folio-dummy-password").ok())
        .as_deref()
}
