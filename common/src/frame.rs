use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeZone};
use std::path::{Path, PathBuf};

const FRAME_PREFIX: &str = "frame_";
const FRAME_EXTENSION: &str = ".jpg";
/// Millisecond precision, e.g. `2026-02-18_09-30-00_123`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S_%3f";

/// Name of a timelapse frame on disk: `frame_<YYYY-MM-DD_HH-MM-SS_mmm>.jpg`.
///
/// The timestamp is local wall-clock time truncated to milliseconds, so names
/// sort lexically in capture order while the clock moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameName {
    captured_at: NaiveDateTime,
}

impl FrameName {
    /// Name for a frame captured right now.
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn at<Tz: TimeZone>(captured_at: &DateTime<Tz>) -> Self {
        Self::from_naive(captured_at.naive_local())
    }

    pub fn from_naive(captured_at: NaiveDateTime) -> Self {
        Self {
            captured_at: captured_at.trunc_subsecs(3),
        }
    }

    /// Local capture time, truncated to milliseconds.
    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }

    pub fn file_name(&self) -> String {
        format!(
            "{FRAME_PREFIX}{ts}{FRAME_EXTENSION}",
            ts = self.captured_at.format(TIMESTAMP_FORMAT)
        )
    }

    pub fn path_in(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.file_name())
    }

    /// Parse a bare file name (no directory) back into a frame name.
    ///
    /// Inverse of [`file_name`](Self::file_name). The capturer never reads
    /// frames back; this is for tooling and tests that inspect a frame
    /// directory and need each file's capture time.
    pub fn parse(file_name: &str) -> Result<Self, FrameError> {
        let rest = file_name
            .strip_prefix(FRAME_PREFIX)
            .ok_or_else(|| FrameError::MissingPrefix(file_name.to_string()))?;
        let ts = rest
            .strip_suffix(FRAME_EXTENSION)
            .ok_or_else(|| FrameError::MissingExtension(file_name.to_string()))?;
        let captured_at = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
            .map_err(|e| FrameError::BadTimestamp(file_name.to_string(), e.to_string()))?;
        Ok(Self { captured_at })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("not a frame file (missing `frame_` prefix): {0}")]
    MissingPrefix(String),
    #[error("not a frame file (missing `.jpg` extension): {0}")]
    MissingExtension(String),
    #[error("bad frame timestamp in {0}: {1}")]
    BadTimestamp(String, String),
}
