use std::path::{Path, PathBuf};
use std::time::Duration;
use timelapse_common::frame::FrameName;
use tracing::{debug, info, warn};

/// Fetches one camera snapshot per trigger and writes it into the frame directory.
///
/// Capture is best-effort: a missed frame only leaves a gap in the timelapse,
/// so [`SnapshotCapturer::capture`] logs every failure and never returns an error.
pub struct SnapshotCapturer {
    client: reqwest::Client,
    url: String,
    base_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("snapshot request failed: {0}")]
    Request(reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("failed to read snapshot body: {0}")]
    Body(reqwest::Error),
    #[error("failed to write frame {0}: {1}")]
    Write(String, std::io::Error),
}

impl SnapshotCapturer {
    pub fn new(url: &str, base_dir: &Path, timeout: Duration) -> Result<Self, CaptureError> {
        // The camera sits next to the printer; never route it through a proxy.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(CaptureError::Client)?;
        Ok(Self {
            client,
            url: url.to_string(),
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Take one snapshot, logging the outcome. Returns the written path on success.
    pub async fn capture(&self) -> Option<PathBuf> {
        match self.try_capture().await {
            Ok(path) => Some(path),
            Err(CaptureError::Status(status)) => {
                warn!(status, url = self.url, "snapshot failed (HTTP error)");
                None
            }
            Err(e) => {
                warn!(error = %e, url = self.url, "snapshot exception");
                None
            }
        }
    }

    /// The fallible half of [`capture`](Self::capture): GET, check status, write.
    pub async fn try_capture(&self) -> Result<PathBuf, CaptureError> {
        // Name the frame after the trigger, not after the download finishes.
        let name = FrameName::now();
        let path = name.path_in(&self.base_dir);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(CaptureError::Request)?;

        if !response.status().is_success() {
            return Err(CaptureError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(CaptureError::Body)?;
        debug!(bytes = body.len(), "received snapshot");

        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| CaptureError::Write(path.display().to_string(), e))?;

        info!(file = name.file_name(), bytes = body.len(), "saved snapshot");
        Ok(path)
    }
}

/// Create the frame directory (and parents). Succeeds if it already exists.
pub async fn ensure_base_dir(base_dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(base_dir).await?;
    info!(path = %base_dir.display(), "frame directory ready");
    Ok(())
}
