//! # Folio (Portfolio Admin Authentication)
//!
//! `folio` guards the admin area of a personal portfolio site. It verifies an
//! email/password pair against a stored Argon2 hash, mints a short-lived HS256
//! session token, and hands it to the browser as an `HttpOnly` cookie.
//!
//! ## Session Guard
//!
//! Every request under `/admin` passes through the session guard before any
//! handler runs. The guard reads the `token` cookie, verifies signature and
//! expiry, and either lets the request through or redirects:
//!
//! - No token, an invalid token, or a non-admin token on a protected page
//!   redirects to `/admin/login`.
//! - An admin token on `/admin/login` redirects to `/admin`.
//!
//! Verification failures are never distinguished from "no token"; the guard
//! fails closed.
//!
//! ## Signup Policy
//!
//! New registrants are created with the `admin` role. The default `bootstrap`
//! policy only accepts a signup while no admin exists yet, so the first
//! registrant claims the site and later signups are rejected with `403`.
//!
//! ## Signing Secret
//!
//! The HS256 secret is loaded once at startup. In production the service
//! refuses to start when the secret is missing or left at the placeholder.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
