//! Core library for importing pasted question sets as flashcards.
//!
//! Provides:
//! - Text normalization and question/answer segmentation
//! - Rendering of a question set into the media script shown on every card
//! - The ARQ note type definition and its version upgrades
//! - Collaborator traits for note storage and media (RecordSink, MediaStore)

pub mod error;
pub mod importer;
pub mod note_type;
pub mod parser;
pub mod render;
pub mod types;

pub use error::{ImportError, ParseError, Result};
pub use importer::{
    add_notes, split_tags, write_question_set, ImportRequest, MediaStore, RecordSink,
};
pub use note_type::{note_fields, NoteTypeSchema, NoteTypeDefinition, ARQ_NOTE_TYPE, UNVERSIONED};
pub use parser::{classify_line, cleanse_text, parse_questions};
pub use render::{media_filename, question_set_script, render_question_set};
pub use types::{DeckId, LineKind, MarkerConfig, Record};
