//! Listing the notes of an earlier import.

use super::CommandError;
use crate::db::{DbError, DeckRepository, NoteRepository, SqliteRepository, StoredNote};
use arq_core::{DeckId, ARQ_NOTE_TYPE};
use std::collections::HashMap;

/// Stored note together with the name of its deck.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShownNote {
    pub deck: String,
    #[serde(flatten)]
    pub note: StoredNote,
}

/// Notes imported under `title`, oldest first.
pub fn show_question_set(
    repo: &SqliteRepository,
    title: &str,
) -> Result<Vec<ShownNote>, CommandError> {
    let title = title.trim();
    let notes = repo.get_notes_by_title(ARQ_NOTE_TYPE.name, title)?;
    if notes.is_empty() {
        return Err(CommandError::UnknownTitle(title.to_string()));
    }

    let mut decks: HashMap<DeckId, String> = HashMap::new();
    let mut shown = Vec::with_capacity(notes.len());
    for note in notes {
        let deck = match decks.get(&note.deck_id) {
            Some(name) => name.clone(),
            None => {
                let name = repo.get_deck_name(note.deck_id)?.ok_or_else(|| {
                    DbError::InvalidData(format!(
                        "note {} refers to missing deck {}",
                        note.id, note.deck_id
                    ))
                })?;
                decks.insert(note.deck_id, name.clone());
                name
            }
        };
        shown.push(ShownNote { deck, note });
    }

    tracing::debug!(title, notes = shown.len(), "loaded question set");
    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ensure_note_type, import_text, ImportOptions};
    use arq_core::note_type::fields;
    use arq_core::MarkerConfig;
    use pretty_assertions::assert_eq;

    fn repo() -> SqliteRepository {
        let repo = SqliteRepository::open_in_memory().unwrap();
        ensure_note_type(&repo, &ARQ_NOTE_TYPE).unwrap();
        repo
    }

    fn import(repo: &SqliteRepository, deck: &str, text: &str, previously_imported: usize) {
        let options = ImportOptions {
            title: "Set".to_string(),
            text: text.to_string(),
            deck: deck.to_string(),
            tags: String::new(),
            markers: MarkerConfig::new("?", true),
            previously_imported,
        };
        import_text(repo, None, &options).unwrap();
    }

    #[test]
    fn shows_notes_with_deck_names() {
        let repo = repo();
        import(&repo, "Fiqh", "Q1?\nA1", 0);
        import(&repo, "Default", "Q1?\nA1\nQ2?\nA2", 1);

        let shown = show_question_set(&repo, " Set ").unwrap();
        let decks: Vec<&str> = shown.iter().map(|n| n.deck.as_str()).collect();
        assert_eq!(decks, vec!["Fiqh", "Default"]);
        assert_eq!(shown[1].note.fields[fields::QUESTION], "Q2?");
        assert_eq!(shown[1].note.fields[fields::NUMBER], "2");
    }

    #[test]
    fn unknown_title_is_reported() {
        let err = show_question_set(&repo(), "Missing").unwrap_err();
        assert!(matches!(err, CommandError::UnknownTitle(ref t) if t == "Missing"));
    }

    #[test]
    fn json_flattens_note_fields() {
        let repo = repo();
        import(&repo, "Default", "Q1?\nA1", 0);

        let shown = show_question_set(&repo, "Set").unwrap();
        let value = serde_json::to_value(&shown[0]).unwrap();
        assert_eq!(value["deck"], "Default");
        assert_eq!(value["fields"][fields::ANSWER], "A1");
        assert!(value["guid"].is_string());
    }
}
