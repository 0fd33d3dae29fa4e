//! Importing a pasted question set into the collection.

use super::CommandError;
use crate::commands::note_type::installed_version;
use crate::db::{DeckRepository, NoteRepository, SqliteRepository};
use crate::media::{MediaEntry, MediaFolder};
use arq_core::{
    add_notes, cleanse_text, parse_questions, split_tags, DeckId, ImportRequest, MarkerConfig,
    Record, ARQ_NOTE_TYPE,
};

/// Everything the user supplies for one import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub title: String,
    pub text: String,
    pub deck: String,
    /// Whitespace separated tags.
    pub tags: String,
    pub markers: MarkerConfig,
    /// Leading questions already imported by an earlier run with this title.
    pub previously_imported: usize,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportSummary {
    pub title: String,
    pub deck_id: DeckId,
    pub parsed: usize,
    pub added: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaEntry>,
}

/// Parse text without touching the collection.
pub fn preview_text(text: &str, markers: &MarkerConfig) -> Result<Vec<Record>, CommandError> {
    let lines = cleanse_text(text)?;
    Ok(parse_questions(&lines, markers))
}

/// Import `options.text` as notes of the ARQ note type.
///
/// Without a media folder the question set script is not written.
pub fn import_text(
    repo: &SqliteRepository,
    media: Option<&mut MediaFolder>,
    options: &ImportOptions,
) -> Result<ImportSummary, CommandError> {
    let title = options.title.trim();
    if title.is_empty() {
        return Err(CommandError::MissingTitle);
    }

    if options.previously_imported == 0 && repo.title_exists(ARQ_NOTE_TYPE.name, title)? {
        return Err(CommandError::DuplicateTitle(title.to_string()));
    }

    if options.text.trim().is_empty() {
        return Err(CommandError::NothingToImport);
    }

    ARQ_NOTE_TYPE.ensure_current(&installed_version(repo)?)?;

    let records = preview_text(&options.text, &options.markers)?;
    let deck_id = repo.get_or_create_deck(&options.deck)?;
    let request = ImportRequest {
        title: title.to_string(),
        tags: split_tags(&options.tags),
        deck_id,
        previously_imported: options.previously_imported,
    };
    tracing::debug!(
        title,
        records = records.len(),
        skipped = request.previously_imported,
        "parsed question set"
    );

    let mut writer = repo.note_writer(ARQ_NOTE_TYPE.name)?;
    let (added, media) = match media {
        Some(folder) => {
            let added = add_notes(&mut writer, Some(&mut *folder), &request, &records)?;
            (added, folder.last_written().cloned())
        }
        None => (
            add_notes::<_, MediaFolder>(&mut writer, None, &request, &records)?,
            None,
        ),
    };

    tracing::info!(title, deck_id, added, "imported question set");

    Ok(ImportSummary {
        title: title.to_string(),
        deck_id,
        parsed: records.len(),
        added,
        media,
    })
}
