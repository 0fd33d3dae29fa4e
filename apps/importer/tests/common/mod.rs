//! Common test utilities for integration tests.
//!
//! Provides a TestContext holding an in-memory collection with the note type
//! installed and a media folder in a fresh temporary directory.

use std::path::PathBuf;

use arq_core::{MarkerConfig, ARQ_NOTE_TYPE};
use arq_importer::commands::{ensure_note_type, ImportOptions};
use arq_importer::db::SqliteRepository;
use arq_importer::media::MediaFolder;

pub struct TestContext {
    pub repo: SqliteRepository,
    pub media: MediaFolder,
    dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("arq-importer-test-{}", uuid::Uuid::new_v4()));
        let repo = SqliteRepository::open_in_memory().expect("open collection");
        ensure_note_type(&repo, &ARQ_NOTE_TYPE).expect("install note type");
        let media = MediaFolder::open(dir.join("collection.media")).expect("open media folder");
        Self { repo, media, dir }
    }

    /// Read a media file written during the test.
    pub fn media_file(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.media.dir().join(name)).ok()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// Import options with question-mark markers and the default deck.
pub fn options(title: &str, text: &str) -> ImportOptions {
    ImportOptions {
        title: title.to_string(),
        text: text.to_string(),
        deck: "Default".to_string(),
        tags: String::new(),
        markers: MarkerConfig::new("?", true),
        previously_imported: 0,
    }
}
