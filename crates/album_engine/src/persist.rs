use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use album_core::Post;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::document::{render_post, TocFormat};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no export file has been created yet")]
    Unresolved,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writability check: the temp file is removed on drop.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// The run's export file. Truncated once on creation, then only appended to.
#[derive(Debug)]
pub struct ExportTarget {
    path: PathBuf,
    file: File,
    format: TocFormat,
}

impl ExportTarget {
    pub fn create(dir: &Path, filename: &str, format: TocFormat) -> Result<Self, PersistError> {
        let path = dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self { path, file, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one rendered post straight to disk, so a later failure keeps it.
    pub fn append_post(&mut self, post: &Post) -> Result<(), PersistError> {
        self.file.write_all(render_post(post, self.format).as_bytes())?;
        Ok(())
    }

    /// Syncs everything appended so far; called once per page.
    pub fn sync(&mut self) -> Result<(), PersistError> {
        self.file.sync_all()?;
        Ok(())
    }
}
