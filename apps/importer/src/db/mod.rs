//! Local SQLite collection.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{
    ConfigRepository, DeckRepository, NoteRepository, NoteTypeRepository, NoteWriter,
    SqliteRepository, StoredNote,
};
