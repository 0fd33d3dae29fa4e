//! Runtime configuration from the environment.

use std::path::{Path, PathBuf};

/// Collection database path.
pub const COLLECTION_ENV: &str = "ARQ_COLLECTION";
/// Media folder path.
pub const MEDIA_DIR_ENV: &str = "ARQ_MEDIA_DIR";

const APP_DIR: &str = "arq-importer";
const DB_FILE: &str = "collection.db";
const MEDIA_DIR: &str = "collection.media";

/// Paths the importer works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub collection_path: PathBuf,
    pub media_dir: PathBuf,
    /// False when `media_dir` was derived from `collection_path`.
    media_dir_set: bool,
}

impl Config {
    /// Read configuration from the environment, falling back to the local
    /// data directory.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var_os(COLLECTION_ENV).map(PathBuf::from),
            std::env::var_os(MEDIA_DIR_ENV).map(PathBuf::from),
        )
    }

    /// Fill in defaults for whichever paths are missing. The media folder
    /// defaults to a sibling of the collection database.
    pub fn resolve(collection_path: Option<PathBuf>, media_dir: Option<PathBuf>) -> Self {
        let collection_path = collection_path.unwrap_or_else(default_collection_path);
        let media_dir_set = media_dir.is_some();
        let media_dir = media_dir.unwrap_or_else(|| media_dir_for(&collection_path));
        Self {
            collection_path,
            media_dir,
            media_dir_set,
        }
    }

    /// Override paths given on the command line. A media folder that was
    /// set explicitly stays put when only the collection moves.
    pub fn with_overrides(
        self,
        collection_path: Option<PathBuf>,
        media_dir: Option<PathBuf>,
    ) -> Self {
        let media_dir = media_dir.or_else(|| self.media_dir_set.then_some(self.media_dir));
        Self::resolve(Some(collection_path.unwrap_or(self.collection_path)), media_dir)
    }
}

fn default_collection_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(DB_FILE)
}

fn media_dir_for(collection_path: &Path) -> PathBuf {
    collection_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(MEDIA_DIR)
}
