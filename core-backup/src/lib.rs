//! # Backup Core
//!
//! Google Drive backup agent: the manifest store and the
//! [`BackupAgent`](agent_traits::BackupAgent) implementation the host
//! plugs in.
//!
//! ## Overview
//!
//! Backups live in Drive's app-private folder as `<backup_id>.tar`
//! files, indexed by a single JSON manifest (`backups.json`). The
//! manifest is the sole source of truth: an archive without a manifest
//! record is invisible to listing. Every operation reloads the
//! manifest from remote storage; mutations hold a per-agent lock
//! across the read-modify-write cycle so concurrent host calls cannot
//! lose updates.

pub mod agent;
pub mod manifest;

pub use agent::DriveBackupAgent;
pub use manifest::{Manifest, ManifestStore, MANIFEST_NAME};
