//! Small helpers for credential validation.

use super::{error::AuthError, password::MIN_PASSWORD_LENGTH, types::CredentialsRequest};

/// Normalize an email for lookup/uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email_normalized: &str) -> bool {
    regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Pull a normalized email and the raw password out of a request body.
///
/// Blank fields are treated as missing.
pub(super) fn read_credentials(request: CredentialsRequest) -> Result<(String, String), AuthError> {
    let email = normalize_email(&request.email);
    if email.is_empty() || request.password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok((email, request.password))
}

/// Signup-only checks layered on top of `read_credentials`.
pub(super) fn validate_signup(email: &str, password: &str) -> Result<(), AuthError> {
    if !valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    fn request(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn read_credentials_normalizes_email() {
        let result = read_credentials(request("  A@X.com ", "secret123"));
        assert!(matches!(
            result,
            Ok((ref email, ref password)) if email == "a@x.com" && password == "secret123"
        ));
    }

    #[test]
    fn read_credentials_rejects_blank_fields() {
        assert!(matches!(
            read_credentials(request("", "secret123")),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            read_credentials(request("   ", "secret123")),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            read_credentials(request("a@x.com", "")),
            Err(AuthError::MissingFields)
        ));
    }

    #[test]
    fn validate_signup_checks_email_then_length() {
        assert!(matches!(
            validate_signup("nope", "short"),
            Err(AuthError::InvalidEmail)
        ));
        assert!(matches!(
            validate_signup("a@x.com", "short"),
            Err(AuthError::WeakPassword)
        ));
        assert!(validate_signup("a@x.com", "secret123").is_ok());
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23503"),
        }));
        assert!(!is_unique_violation(&err));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
