//! Google Drive backup agent
//!
//! Composes the credential provider, the Drive storage client and the
//! manifest store into the host's [`BackupAgent`] contract.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use agent_traits::http::HttpClient;
use agent_traits::{AgentBackup, AgentError, BackupAgent, BackupStream, Result};
use core_auth::ConfigEntryAuth;
use provider_google_drive::DriveClient;

use crate::manifest::ManifestStore;

fn not_found(backup_id: &str) -> AgentError {
    AgentError::BackupNotFound {
        backup_id: backup_id.to_string(),
    }
}

/// Backup agent storing archives in Google Drive's app-private folder.
///
/// Every operation first obtains a storage client bound to a freshly
/// validated token, then works against the remote manifest. Manifest
/// mutations are serialized through the store's lock; nothing is
/// cached across calls.
pub struct DriveBackupAgent {
    auth: ConfigEntryAuth,
    http_client: Arc<dyn HttpClient>,
    manifest: ManifestStore,
}

impl DriveBackupAgent {
    pub fn new(auth: ConfigEntryAuth, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            auth,
            http_client,
            manifest: ManifestStore::new(),
        }
    }

    /// Storage client bound to the current access token.
    async fn drive(&self) -> Result<DriveClient> {
        Ok(DriveClient::authorized(self.http_client.clone(), &self.auth).await?)
    }
}

#[async_trait]
impl BackupAgent for DriveBackupAgent {
    #[instrument(skip(self))]
    async fn list_backups(&self) -> Result<Vec<AgentBackup>> {
        let drive = self.drive().await?;
        let manifest = self.manifest.load(&drive).await?;
        Ok(manifest.records)
    }

    #[instrument(skip(self), fields(backup_id = %backup_id))]
    async fn get_backup(&self, backup_id: &str) -> Result<Option<AgentBackup>> {
        let backups = self.list_backups().await?;
        Ok(backups.into_iter().find(|b| b.backup_id == backup_id))
    }

    #[instrument(skip(self, stream), fields(backup_id = %backup.backup_id, size = backup.size))]
    async fn upload_backup(&self, stream: BackupStream, backup: AgentBackup) -> Result<()> {
        let drive = self.drive().await?;
        let archive = backup.archive_name();

        // Content goes first; the manifest only ever references
        // archives that finished uploading.
        let file_id = drive.upload(&archive, backup.size, stream).await?;
        info!(file_id = %file_id, "Archive uploaded");

        let _guard = self.manifest.guard().await;
        let manifest = self.manifest.load(&drive).await?;
        let had_previous = manifest
            .records
            .iter()
            .any(|r| r.backup_id == backup.backup_id);

        // Re-uploading an existing id replaces the prior record.
        let mut records: Vec<AgentBackup> = manifest
            .records
            .into_iter()
            .filter(|r| r.backup_id != backup.backup_id)
            .collect();
        records.push(backup);
        self.manifest
            .save(&drive, &records, manifest.file_id)
            .await?;

        if had_previous {
            // Drop archives left behind by earlier uploads of this id.
            for file in drive.find_all_by_name(&archive).await? {
                if file.id != file_id {
                    debug!(file_id = %file.id, "Deleting superseded archive");
                    drive.delete(&file.id).await?;
                }
            }
        }

        Ok(())
    }

    #[instrument(skip(self), fields(backup_id = %backup_id))]
    async fn download_backup(&self, backup_id: &str) -> Result<BackupStream> {
        let drive = self.drive().await?;

        // The manifest decides whether the backup exists; no content
        // lookup happens for unknown ids.
        let manifest = self.manifest.load(&drive).await?;
        if !manifest.records.iter().any(|r| r.backup_id == backup_id) {
            return Err(not_found(backup_id));
        }

        let archive = format!("{}.tar", backup_id);
        let file = drive
            .find_by_name(&archive)
            .await?
            .ok_or_else(|| not_found(backup_id))?;

        debug!(file_id = %file.id, "Streaming archive");
        let stream = drive
            .download_stream(&file.id)
            .map(|chunk| chunk.map_err(std::io::Error::other));
        Ok(stream.boxed())
    }

    #[instrument(skip(self), fields(backup_id = %backup_id))]
    async fn delete_backup(&self, backup_id: &str) -> Result<()> {
        let drive = self.drive().await?;

        let _guard = self.manifest.guard().await;
        let manifest = self.manifest.load(&drive).await?;
        if !manifest.records.iter().any(|r| r.backup_id == backup_id) {
            return Err(not_found(backup_id));
        }

        // Resolve and delete the archive before touching the manifest:
        // the record must survive until the content is actually gone.
        let archive = format!("{}.tar", backup_id);
        let file = drive
            .find_by_name(&archive)
            .await?
            .ok_or_else(|| not_found(backup_id))?;
        drive.delete(&file.id).await?;

        let records: Vec<AgentBackup> = manifest
            .records
            .into_iter()
            .filter(|r| r.backup_id != backup_id)
            .collect();
        self.manifest.save(&drive, &records, manifest.file_id).await?;

        info!("Backup deleted");
        Ok(())
    }
}
