//! Google Drive API response types
//!
//! Data structures for the subset of Drive API v3 this provider uses.

use serde::{Deserialize, Serialize};

/// Google Drive file handle
///
/// Only `id` and `name` are requested; content is addressed by id
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,

    /// File name
    #[serde(default)]
    pub name: String,
}

/// Google Drive API files.list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    /// Matching files
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// Metadata body sent when creating a file
#[derive(Debug, Serialize)]
pub struct FileMetadata {
    /// File name
    pub name: String,

    /// Parent folder; always the app-private space here
    pub parents: Vec<String>,
}

/// Final response of a resumable upload (`fields=id`)
#[derive(Debug, Deserialize)]
pub struct CreatedFile {
    /// Id of the created file, if the server returned one
    pub id: Option<String>,
}
