//! Credential verification.
//!
//! Flow Overview: look the normalized email up, verify the candidate password
//! against the stored Argon2 hash, then require the `admin` role. Unknown users
//! and wrong passwords produce the same error, and an unknown user still costs
//! one hash verification.

use uuid::Uuid;

use super::{
    error::AuthError,
    password::{verify_dummy, verify_password},
    storage::CredentialStore,
    types::Role,
};

/// Identity proven by a successful credential check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Check an email/password pair and require the admin role.
///
/// # Errors
/// `InvalidCredentials` for an unknown email or wrong password, `NotAuthorized`
/// for a non-admin record, `Internal` when storage or hashing fails.
pub async fn verify_credentials(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<VerifiedIdentity, AuthError> {
    let Some(record) = store.find_by_email(email).await? else {
        verify_dummy(password).await;
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &record.password_hash).await? {
        return Err(AuthError::InvalidCredentials);
    }

    if !record.role.is_admin() {
        return Err(AuthError::NotAuthorized);
    }

    Ok(VerifiedIdentity {
        id: record.id,
        email: record.email,
        role: record.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::{
        password::hash_password,
        storage::{CredentialRecord, MemoryCredentialStore},
    };
    use anyhow::Result;

    async fn store_with(email: &str, password: &str, role: Role) -> Result<MemoryCredentialStore> {
        let store = MemoryCredentialStore::new();
        store
            .insert(CredentialRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: hash_password(password).await?,
                role,
            })
            .await;
        Ok(store)
    }

    #[tokio::test]
    async fn admin_with_correct_password_is_verified() -> Result<()> {
        let store = store_with("a@x.com", "secret123", Role::Admin).await?;
        let identity = verify_credentials(&store, "a@x.com", "secret123").await?;
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.role, Role::Admin);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() -> Result<()> {
        let store = store_with("a@x.com", "secret123", Role::Admin).await?;
        let unknown = verify_credentials(&store, "b@x.com", "secret123").await;
        let wrong = verify_credentials(&store, "a@x.com", "wrong").await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn non_admin_is_not_authorized() -> Result<()> {
        let store = store_with("u@x.com", "secret123", Role::User).await?;
        let result = verify_credentials(&store, "u@x.com", "secret123").await;
        assert!(matches!(result, Err(AuthError::NotAuthorized)));
        Ok(())
    }

    #[tokio::test]
    async fn non_admin_with_wrong_password_is_invalid_credentials() -> Result<()> {
        let store = store_with("u@x.com", "secret123", Role::User).await?;
        let result = verify_credentials(&store, "u@x.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_internal() {
        let store = MemoryCredentialStore::new();
        store
            .insert(CredentialRecord {
                id: Uuid::new_v4(),
                email: "a@x.com".to_string(),
                password_hash: "plaintext".to_string(),
                role: Role::Admin,
            })
            .await;
        let result = verify_credentials(&store, "a@x.com", "secret123").await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
