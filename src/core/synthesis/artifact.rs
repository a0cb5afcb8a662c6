//! Temporary audio artifacts.
//!
//! The engine writes its output to a file; this module owns that file from
//! the moment its name is chosen until it is deleted. An [`Artifact`] is
//! deleted exactly once: explicitly through [`Artifact::release`] on the
//! normal path, or from `Drop` when the owning task unwinds or is dropped
//! before reaching it. A file that was never created is not an error.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, warn};
use uuid::Uuid;

/// Current UTC time as `YYYYmmdd_HHMMSS`.
pub fn generation_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// A unique, not yet created, artifact location.
///
/// The random token keeps concurrent requests for the same voice within the
/// same second from sharing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath(PathBuf);

impl ArtifactPath {
    pub fn generate(dir: &Path, voice: &str, timestamp: &str) -> Self {
        let token = Uuid::new_v4().simple();
        Self(dir.join(format!("temp_{voice}_{timestamp}_{token}.wav")))
    }

    #[inline]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ArtifactPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Scoped ownership of one artifact file.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    released: bool,
}

impl Artifact {
    /// Take ownership of `path`. The file does not need to exist yet.
    pub fn reserve(path: ArtifactPath) -> Self {
        let path = path.into_path_buf();
        debug!(artifact = %path.display(), "Reserved audio artifact");
        Self {
            path,
            released: false,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole artifact into memory.
    pub async fn read_all(&self) -> io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }

    /// Delete the artifact. A missing file counts as deleted.
    pub async fn release(mut self) -> io::Result<()> {
        self.released = true;
        let result = ignore_missing(tokio::fs::remove_file(&self.path).await);
        if result.is_ok() {
            debug!(artifact = %self.path.display(), "Released audio artifact");
        }
        result
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match ignore_missing(std::fs::remove_file(&self.path)) {
            Ok(()) => debug!(
                artifact = %self.path.display(),
                "Released audio artifact on drop"
            ),
            Err(e) => warn!(
                artifact = %self.path.display(),
                error = %e,
                "Failed to remove audio artifact on drop"
            ),
        }
    }
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
