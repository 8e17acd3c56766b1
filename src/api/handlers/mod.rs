//! API handlers for the folio service.
//!
//! `auth` owns login, signup, sessions and the admin guard; `admin` serves the
//! guarded namespace; `health` reports build metadata and database reachability.

pub mod admin;
pub mod auth;
pub mod health;
