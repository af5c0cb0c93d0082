use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::models::Listing;
use crate::utils::error::{AppError, Result};

/// Destination for the aggregate of one run.
pub trait ListingSink: Send + Sync {
    /// Replaces any previous artifact with `listings`.
    fn persist(&self, listings: &[Listing]) -> Result<PathBuf>;
}

/// Writes the aggregate as indented JSON, replacing the file atomically.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, message: impl ToString) -> AppError {
        AppError::Persist {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl ListingSink for JsonFileSink {
    fn persist(&self, listings: &[Listing]) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(listings)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.persist_error(e))?;

        // Same directory as the target so the final rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.persist_error(e))?;
        write_json(&mut tmp, &json).map_err(|e| self.persist_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.persist_error(e.error))?;

        debug!(path = %self.path.display(), count = listings.len(), "Wrote listings");
        Ok(self.path.clone())
    }
}

fn write_json(tmp: &mut NamedTempFile, json: &str) -> std::io::Result<()> {
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()
}
