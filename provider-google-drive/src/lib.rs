//! # Google Drive Provider
//!
//! Remote storage client for Google Drive API v3, scoped to the
//! app-private `appDataFolder` space.
//!
//! ## Overview
//!
//! This module provides:
//! - Exact-name file lookup inside the app-private folder
//! - Chunked downloads via sequential range requests
//! - Resumable chunked uploads (1 MiB segments)
//! - File deletion by id
//! - A reqwest-backed [`HttpClient`](agent_traits::http::HttpClient)
//!   implementation for hosts without their own transport
//!
//! No call retries on its own; every remote failure propagates to the
//! caller.

pub mod connector;
pub mod error;
pub mod http;
pub mod types;

pub use connector::DriveClient;
pub use error::{GoogleDriveError, Result};
pub use http::ReqwestHttpClient;
pub use types::DriveFile;
