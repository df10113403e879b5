//! # Authentication Module
//!
//! Credential provider bound to a host-managed OAuth2 session.
//!
//! ## Overview
//!
//! The host platform owns token acquisition and refresh; this crate
//! wraps that session behind [`OAuthSession`] and exposes
//! [`ConfigEntryAuth`], which yields a valid access token for each
//! storage operation and classifies refresh failures the way the host
//! expects: "reauth required" for credential rejections, "not ready"
//! for transient failures during setup, and a reauth request once the
//! entry is already running.

pub mod auth;
pub mod error;
pub mod session;

pub use auth::ConfigEntryAuth;
pub use error::{AuthError, Result};
pub use session::{EntryState, OAuthSession, SessionError};

/// OAuth scopes required for the app-private Drive folder.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/drive.appdata",
    "https://www.googleapis.com/auth/drive.appfolder",
];
