use std::path::{Path, PathBuf};

use crate::foundation::error::{BadgeError, BadgeResult};

/// Fixed file name of every exported badge.
pub const EXPORT_FILE_NAME: &str = "badge.png";

/// Receives an encoded export, the headless counterpart of a browser download.
pub trait ExportSink {
    /// Deliver `bytes` under `file_name`.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<()>;
}

/// Writes exports into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl DirectorySink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: None,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the last delivered file.
    pub fn last_written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BadgeError::export(format!(
                "create output dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| BadgeError::export(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "badge exported");
        self.written = Some(path);
        Ok(())
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delivery, in order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// Most recent delivery.
    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.files.last()
    }
}

impl ExportSink for InMemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<()> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
