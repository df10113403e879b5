//! Backup agent contract
//!
//! The operations a backup storage integration exposes to the host,
//! plus the backup descriptor exchanged across that boundary.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// A finite byte stream carrying backup archive content.
///
/// Producers yield content in order, chunk by chunk; an `Err` item
/// aborts the transfer.
pub type BackupStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Metadata describing one backup archive.
///
/// This is the record persisted in the remote manifest; identity is
/// `backup_id`. Descriptor fields this crate does not model (add-on
/// lists, platform versions, ...) are kept in `extra` so they survive
/// a manifest round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBackup {
    /// Unique backup identifier
    pub backup_id: String,

    /// Human-readable backup name
    pub name: String,

    /// When the backup was taken
    pub date: DateTime<Utc>,

    /// Archive size in bytes
    pub size: u64,

    /// Whether the archive is password protected
    #[serde(default)]
    pub protected: bool,

    /// Host-specific descriptor fields carried through verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AgentBackup {
    /// File name under which this backup's content is stored remotely.
    pub fn archive_name(&self) -> String {
        format!("{}.tar", self.backup_id)
    }
}

/// Backup storage agent contract
///
/// The host constructs one agent per configured account and invokes
/// these operations, possibly concurrently. Every operation reloads
/// remote state; no cross-call cache is guaranteed consistent.
#[async_trait]
pub trait BackupAgent: Send + Sync {
    /// List every backup known to the remote manifest.
    async fn list_backups(&self) -> Result<Vec<AgentBackup>>;

    /// Return the record for `backup_id`, or `None` if unknown.
    async fn get_backup(&self, backup_id: &str) -> Result<Option<AgentBackup>>;

    /// Upload a new backup: store the archive content, then record the
    /// descriptor in the manifest.
    async fn upload_backup(&self, stream: BackupStream, backup: AgentBackup) -> Result<()>;

    /// Download an existing backup's archive content.
    ///
    /// Fails with `AgentError::BackupNotFound` if the manifest has no
    /// record for `backup_id` or the content file is missing.
    async fn download_backup(&self, backup_id: &str) -> Result<BackupStream>;

    /// Delete a backup: remove the archive content and its manifest
    /// record.
    ///
    /// Fails with `AgentError::BackupNotFound`, leaving the manifest
    /// unchanged, if the record or content file is absent.
    async fn delete_backup(&self, backup_id: &str) -> Result<()>;
}
