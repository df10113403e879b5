//! Remote backup manifest
//!
//! One JSON document (`backups.json`) in the app-private folder lists
//! every known backup. Read-through/write-through: no local copy is
//! kept between operations. Drive offers no update-in-place here, so
//! a save uploads a replacement file and deletes the superseded one.

use bytes::Bytes;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use agent_traits::{AgentBackup, AgentError, Result};
use provider_google_drive::DriveClient;

/// Name of the manifest file in the app-private folder
pub const MANIFEST_NAME: &str = "backups.json";

/// Decoded manifest plus the id of the remote file it was read from.
#[derive(Debug)]
pub struct Manifest {
    /// Backup records, in stored order
    pub records: Vec<AgentBackup>,

    /// Remote file id of the manifest document
    pub file_id: Option<String>,
}

/// Read-through/write-through store for the remote manifest.
///
/// Holds the logical lock serializing read-modify-write cycles for
/// this agent's storage folder. Callers mutating the manifest take
/// [`guard`](Self::guard) first, then `load`, apply their change, and
/// `save` the full replacement.
#[derive(Default)]
pub struct ManifestStore {
    lock: Mutex<()>,
}

impl ManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the manifest mutation lock.
    pub async fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Load the manifest. An absent manifest reads as empty.
    ///
    /// Loading never writes: read-only callers do not hold the
    /// mutation lock, so creating the file here would race a
    /// concurrent first access into duplicate manifests. The file is
    /// created by the first [`save`](Self::save).
    #[instrument(skip(self, drive))]
    pub async fn load(&self, drive: &DriveClient) -> Result<Manifest> {
        let handle = drive.find_by_name(MANIFEST_NAME).await?;

        let Some(handle) = handle else {
            debug!("No manifest found, reading as empty");
            return Ok(Manifest {
                records: Vec::new(),
                file_id: None,
            });
        };

        let data = drive.download(&handle.id).await?;
        let records: Vec<AgentBackup> = serde_json::from_slice(&data)
            .map_err(|e| AgentError::Storage(format!("failed to decode manifest: {}", e)))?;

        debug!(records = records.len(), "Manifest loaded");
        Ok(Manifest {
            records,
            file_id: Some(handle.id),
        })
    }

    /// Persist the full record set, replacing the previous manifest
    /// file.
    #[instrument(skip(self, drive, records), fields(records = records.len()))]
    pub async fn save(
        &self,
        drive: &DriveClient,
        records: &[AgentBackup],
        previous_file_id: Option<String>,
    ) -> Result<()> {
        let data = serde_json::to_vec(records)
            .map_err(|e| AgentError::Storage(format!("failed to encode manifest: {}", e)))?;

        let new_id = drive.upload_bytes(MANIFEST_NAME, Bytes::from(data)).await?;

        if let Some(old_id) = previous_file_id {
            if old_id != new_id {
                drive.delete(&old_id).await?;
            }
        }

        info!("Manifest saved");
        Ok(())
    }
}
