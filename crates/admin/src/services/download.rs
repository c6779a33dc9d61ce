//! "Save as file" step for exports.

use std::path::{Path, PathBuf};

use crate::export::{ExportError, ExportFile};

/// Destination for rendered exports.
pub trait FileSink: Send + Sync {
    /// Persist `file` and return where it went.
    fn save(&self, file: &ExportFile) -> impl Future<Output = Result<PathBuf, ExportError>> + Send;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    async fn save(&self, file: &ExportFile) -> Result<PathBuf, ExportError> {
        // Only the final component of the name is used.
        let name = Path::new(&file.file_name)
            .file_name()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty file name"))?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "Saved export");
        Ok(path)
    }
}
