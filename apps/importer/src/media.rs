//! Collection media folder.

use arq_core::{ImportError, MediaStore};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Subfolder trashed files are moved into.
const TRASH_DIR: &str = ".trash";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid media file name: {0}")]
    InvalidName(String),
}

impl From<MediaError> for ImportError {
    fn from(e: MediaError) -> Self {
        ImportError::Media(e.to_string())
    }
}

/// File written to the media folder.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MediaEntry {
    pub name: String,
    pub sha256: String,
}

/// Media folder on disk.
pub struct MediaFolder {
    dir: PathBuf,
    written: Vec<MediaEntry>,
}

impl MediaFolder {
    /// Open the folder at `dir`, creating it if necessary.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, MediaError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Last file written through this handle.
    pub fn last_written(&self) -> Option<&MediaEntry> {
        self.written.last()
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, MediaError> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains('\0')
        {
            return Err(MediaError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    fn trash(&self, name: &str) -> Result<bool, MediaError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        let trash = self.dir.join(TRASH_DIR);
        fs::create_dir_all(&trash)?;
        fs::rename(&path, trash.join(name))?;
        Ok(true)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<MediaEntry, MediaError> {
        let path = self.path_for(name)?;
        fs::write(&path, data)?;
        let entry = MediaEntry {
            name: name.to_string(),
            sha256: hash_content(data),
        };
        self.written.push(entry.clone());
        Ok(entry)
    }
}

impl MediaStore for MediaFolder {
    fn check_name(&self, name: &str) -> arq_core::Result<()> {
        self.path_for(name)?;
        Ok(())
    }

    fn trash_files(&mut self, names: &[String]) -> arq_core::Result<()> {
        for name in names {
            if self.trash(name)? {
                tracing::debug!(file = %name, "moved media file to trash");
            }
        }
        Ok(())
    }

    fn write_data(&mut self, name: &str, data: &[u8]) -> arq_core::Result<String> {
        let entry = self.write(name, data)?;
        tracing::info!(
            file = %entry.name,
            sha256 = %entry.sha256,
            bytes = data.len(),
            "wrote media file"
        );
        Ok(entry.name)
    }
}

/// Calculate SHA256 hash of content.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
