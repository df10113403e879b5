//! Google Drive storage client
//!
//! Thin facade over Drive API v3, scoped to the app-private folder.
//! Transfers are chunked: downloads issue sequential range requests,
//! uploads go through a resumable session in 1 MiB segments. Memory
//! stays proportional to the chunk size, not the file size.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use agent_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_auth::ConfigEntryAuth;

use crate::error::{GoogleDriveError, Result};
use crate::types::{CreatedFile, DriveFile, FileMetadata, FilesListResponse};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Google Drive upload API base URL
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// App-private storage space, invisible in the user's file listing
const APP_DATA_FOLDER: &str = "appDataFolder";

/// Transfer segment size for chunked uploads and downloads
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Build an API error from a non-success response.
fn api_error(response: &HttpResponse) -> GoogleDriveError {
    GoogleDriveError::ApiError {
        status_code: response.status,
        message: String::from_utf8_lossy(&response.body).to_string(),
    }
}

/// Google Drive storage client bound to one access token.
///
/// All operations live inside `appDataFolder`. The client does not
/// retry failed calls; errors propagate to the caller.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::DriveClient;
///
/// let drive = DriveClient::authorized(http_client, &auth).await?;
/// let handle = drive.find_by_name("backups.json").await?;
/// ```
#[derive(Clone)]
pub struct DriveClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,
}

impl DriveClient {
    /// Create a client from an already-valid access token.
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
        }
    }

    /// Create a client bound to the credential provider's current
    /// token, refreshing it first if needed.
    pub async fn authorized(
        http_client: Arc<dyn HttpClient>,
        auth: &ConfigEntryAuth,
    ) -> core_auth::Result<Self> {
        let token = auth.check_and_refresh_token().await?;
        Ok(Self::new(http_client, token))
    }

    /// Build authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Find every file with the given exact name in the app folder.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn find_all_by_name(&self, name: &str) -> Result<Vec<DriveFile>> {
        let query = format!("name = '{}'", name.replace('\'', "\\'"));
        let url = format!(
            "{}/files?spaces={}&fields=files(id,name)&q={}",
            DRIVE_API_BASE,
            APP_DATA_FOLDER,
            urlencoding::encode(&query)
        );

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json");

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "files.list failed");
            return Err(api_error(&response));
        }

        let list: FilesListResponse = response
            .json()
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;

        debug!(matches = list.files.len(), "files.list succeeded");
        Ok(list.files)
    }

    /// Find a file by exact name; first match or `None`.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<DriveFile>> {
        Ok(self.find_all_by_name(name).await?.into_iter().next())
    }

    /// Stream a file's content as sequential 1 MiB range requests.
    ///
    /// Each chunk is fetched only when the consumer polls for it; the
    /// stream ends on a short chunk or HTTP 416 (past end of file).
    pub fn download_stream(&self, file_id: &str) -> BoxStream<'static, Result<Bytes>> {
        let client = self.clone();
        let url = format!("{}/files/{}?alt=media", DRIVE_API_BASE, file_id);

        stream::try_unfold(
            (client, url, 0u64, false),
            |(client, url, offset, done)| async move {
                if done {
                    return Ok(None);
                }

                let end = offset + CHUNK_SIZE as u64 - 1;
                let request = HttpRequest::new(HttpMethod::Get, url.clone())
                    .header("Authorization", client.auth_header())
                    .header("Range", format!("bytes={}-{}", offset, end));

                let response = client.http_client.execute(request).await?;
                match response.status {
                    // Requested past the end of the file.
                    416 => Ok(None),
                    200 | 206 => {
                        let chunk = response.body;
                        if chunk.is_empty() {
                            return Ok(None);
                        }
                        // Status 200 means the server ignored the range and
                        // sent everything; a short chunk is the last one.
                        let finished = response.status == 200 || chunk.len() < CHUNK_SIZE;
                        let next_offset = offset + chunk.len() as u64;
                        debug!(offset, len = chunk.len(), "Downloaded chunk");
                        Ok(Some((chunk, (client, url, next_offset, finished))))
                    }
                    _ => Err(api_error(&response)),
                }
            },
        )
        .boxed()
    }

    /// Download a file's full content into memory.
    ///
    /// Only for small files (the manifest); archives go through
    /// [`download_stream`](Self::download_stream).
    #[instrument(skip(self), fields(file_id = %file_id))]
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        let mut chunks = self.download_stream(file_id);
        let mut buf = BytesMut::new();
        while let Some(chunk) = chunks.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        info!(bytes = buf.len(), "Downloaded file");
        Ok(buf.freeze())
    }

    /// Open a resumable upload session and return its session URI.
    async fn open_upload_session(&self, name: &str) -> Result<String> {
        let url = format!("{}/files?uploadType=resumable&fields=id", UPLOAD_API_BASE);
        let metadata = FileMetadata {
            name: name.to_string(),
            parents: vec![APP_DATA_FOLDER.to_string()],
        };

        let request = HttpRequest::new(HttpMethod::Post, url)
            .header("Authorization", self.auth_header())
            .json(&metadata)
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "Upload session rejected");
            return Err(api_error(&response));
        }

        response
            .header("location")
            .map(str::to_string)
            .ok_or_else(|| GoogleDriveError::MissingSessionUri {
                name: name.to_string(),
            })
    }

    /// Upload a new file via a resumable session, returning its id.
    ///
    /// Content is consumed from `content` and sent in `CHUNK_SIZE`
    /// segments; intermediate segments are acknowledged with HTTP 308,
    /// the final one must answer with the created file's id. A stream
    /// shorter or longer than `total` bytes fails the upload.
    #[instrument(skip(self, content), fields(name = %name))]
    pub async fn upload<S>(&self, name: &str, total: u64, mut content: S) -> Result<String>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin,
    {
        let session_uri = self.open_upload_session(name).await?;

        if total == 0 {
            let request = HttpRequest::new(HttpMethod::Put, session_uri)
                .header("Authorization", self.auth_header())
                .header("Content-Range", "bytes */0")
                .body(Bytes::new());
            let response = self.http_client.execute(request).await?;
            if !response.is_success() {
                return Err(api_error(&response));
            }
            let created: CreatedFile = response
                .json()
                .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;
            return created.id.ok_or_else(|| GoogleDriveError::MissingFileId {
                name: name.to_string(),
            });
        }

        let mut buf = BytesMut::new();
        let mut sent: u64 = 0;
        let mut file_id: Option<String> = None;

        loop {
            // Fill the buffer up to one segment.
            while buf.len() < CHUNK_SIZE {
                match content.next().await {
                    Some(chunk) => {
                        let chunk = chunk.map_err(|e| {
                            GoogleDriveError::NetworkError(format!("content stream failed: {}", e))
                        })?;
                        buf.extend_from_slice(&chunk);
                    }
                    None => break,
                }
            }
            if buf.is_empty() {
                break;
            }

            let take = buf.len().min(CHUNK_SIZE);
            let piece = buf.split_to(take).freeze();
            let start = sent;
            sent += take as u64;
            if sent > total {
                return Err(GoogleDriveError::SizeMismatch {
                    name: name.to_string(),
                    sent,
                    expected: total,
                });
            }

            let request = HttpRequest::new(HttpMethod::Put, session_uri.clone())
                .header("Authorization", self.auth_header())
                .header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, sent - 1, total),
                )
                .body(piece);

            let response = self.http_client.execute(request).await?;
            if sent == total {
                if !response.is_success() {
                    warn!(status = response.status, "Final upload segment rejected");
                    return Err(api_error(&response));
                }
                let created: CreatedFile = response
                    .json()
                    .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;
                file_id = created.id;
                info!(sent, "Upload finished");
            } else if response.status != 308 {
                // 308 Resume Incomplete acknowledges an intermediate segment.
                warn!(status = response.status, "Upload segment rejected");
                return Err(api_error(&response));
            } else {
                debug!(sent, total, "Upload segment accepted");
            }
        }

        if sent != total {
            return Err(GoogleDriveError::SizeMismatch {
                name: name.to_string(),
                sent,
                expected: total,
            });
        }

        file_id.ok_or_else(|| GoogleDriveError::MissingFileId {
            name: name.to_string(),
        })
    }

    /// Upload a small in-memory payload, returning the new file id.
    pub async fn upload_bytes(&self, name: &str, data: Bytes) -> Result<String> {
        let total = data.len() as u64;
        let content = stream::iter(std::iter::once(Ok::<_, std::io::Error>(data)));
        self.upload(name, total, content).await
    }

    /// Delete a file by id. Raw API errors propagate; deleting an
    /// already-gone file is not guaranteed to be a no-op.
    #[instrument(skip(self), fields(file_id = %file_id))]
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        let url = format!("{}/files/{}", DRIVE_API_BASE, file_id);
        let request =
            HttpRequest::new(HttpMethod::Delete, url).header("Authorization", self.auth_header());

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "files.delete failed");
            return Err(api_error(&response));
        }
        info!("Deleted file");
        Ok(())
    }
}
