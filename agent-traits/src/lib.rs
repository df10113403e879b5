//! # Host Agent Traits
//!
//! Contract between the backup core and the host platform.
//!
//! ## Overview
//!
//! This crate defines what the host must provide (an [`HttpClient`]
//! implementation) and what the backup integration exposes back to the
//! host (the [`BackupAgent`] trait and the [`AgentBackup`] descriptor).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport the host supplies
//! - [`BackupAgent`](backup::BackupAgent) - Backup operations the host invokes
//!
//! All agent operations are asynchronous and may be invoked concurrently
//! by the host; implementations are responsible for their own internal
//! sequencing.

pub mod backup;
pub mod error;
pub mod http;

pub use backup::{AgentBackup, BackupAgent, BackupStream};
pub use error::{AgentError, Result};
pub use http::HttpClient;
