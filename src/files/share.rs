use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Debug, Error)]
pub enum ShareError {
    /// The user dismissed the share sheet. Not a failure.
    #[error("user did not share")]
    Cancelled,

    #[error("share failed: {0}")]
    Failed(String),
}

/// What to hand to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    /// `file://` URI of the shared file or directory.
    pub url: String,
    /// The same location as a filesystem path.
    pub path: PathBuf,
    pub mime_type: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ShareRequest {
    pub fn for_path(title: impl Into<String>, path: &Path) -> Self {
        ShareRequest {
            title: title.into(),
            url: file_uri(path),
            path: path.to_path_buf(),
            mime_type: None,
            subject: None,
            message: None,
        }
    }
}

pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// The platform's native share mechanism.
#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}

/// Shares by copying into an outbox directory.
///
/// A shared file lands as `{outbox}/{file name}`; a shared directory is
/// copied flat into `{outbox}/{dir name}/`.
pub struct OutboxShareSheet {
    outbox: PathBuf,
}

impl OutboxShareSheet {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        OutboxShareSheet {
            outbox: outbox.into(),
        }
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    async fn copy_into(&self, source: &Path) -> std::io::Result<PathBuf> {
        let name = source.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "shared path has no name")
        })?;
        let target = self.outbox.join(name);
        fs::create_dir_all(&self.outbox).await?;

        if fs::metadata(source).await?.is_dir() {
            fs::create_dir_all(&target).await?;
            let mut entries = fs::read_dir(source).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    fs::copy(entry.path(), target.join(entry.file_name())).await?;
                }
            }
        } else {
            fs::copy(source, &target).await?;
        }

        Ok(target)
    }
}

#[async_trait]
impl ShareSheet for OutboxShareSheet {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        let target = self
            .copy_into(&request.path)
            .await
            .map_err(|e| ShareError::Failed(e.to_string()))?;

        info!(title = %request.title, target = %target.display(), "shared to outbox");
        Ok(())
    }
}

/// A share sheet the user always dismisses.
pub struct DeclineShareSheet;

#[async_trait]
impl ShareSheet for DeclineShareSheet {
    async fn share(&self, _request: &ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Cancelled)
    }
}
