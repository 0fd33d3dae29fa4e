//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::db::schema::{INIT_DEFAULT_DECK, SCHEMA};
use arq_core::note_type::fields;
use arq_core::{note_fields, DeckId, ImportError, NoteTypeSchema, Record, RecordSink};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for deck operations.
pub trait DeckRepository {
    fn get_or_create_deck(&self, name: &str) -> Result<DeckId>;
    fn get_deck_name(&self, id: DeckId) -> Result<Option<String>>;
}

/// Repository for note type operations.
pub trait NoteTypeRepository {
    fn get_note_type(&self, name: &str) -> Result<Option<NoteTypeSchema>>;
    fn save_note_type(&self, schema: &NoteTypeSchema) -> Result<()>;
}

/// Repository for collection config.
pub trait ConfigRepository {
    fn get_config(&self, key: &str) -> Result<Option<String>>;
    fn set_config(&self, key: &str, value: &str) -> Result<()>;
}

/// Repository for note operations.
pub trait NoteRepository {
    fn title_exists(&self, note_type: &str, title: &str) -> Result<bool>;
    fn count_notes(&self, note_type: &str) -> Result<usize>;
    fn get_notes_by_title(&self, note_type: &str, title: &str) -> Result<Vec<StoredNote>>;
}

/// Note as stored in the collection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredNote {
    pub id: i64,
    pub guid: String,
    pub deck_id: DeckId,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute_batch(INIT_DEFAULT_DECK)?;
        Ok(())
    }

    /// Prepare a sink that adds notes of the stored note type `note_type`.
    pub fn note_writer(&self, note_type: &str) -> Result<NoteWriter<'_>> {
        let schema = self
            .get_note_type(note_type)?
            .ok_or_else(|| DbError::NoteTypeNotFound(note_type.to_string()))?;
        Ok(NoteWriter { repo: self, schema })
    }

    /// Insert one note with its field values.
    pub fn insert_note(
        &self,
        schema: &NoteTypeSchema,
        deck_id: DeckId,
        tags: &[String],
        values: &BTreeMap<String, String>,
    ) -> Result<i64> {
        let sort_value = schema
            .fields
            .get(schema.sort_field)
            .and_then(|f| values.get(&f.name))
            .cloned()
            .unwrap_or_default();
        let guid = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO notes (guid, note_type, deck_id, tags, sort_field, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![guid, schema.name, deck_id, tags.join(" "), sort_value, now],
        )?;
        let note_id = tx.last_insert_rowid();

        for (name, value) in values {
            tx.execute(
                "INSERT INTO note_fields (note_id, name, value) VALUES (?1, ?2, ?3)",
                params![note_id, name, value],
            )?;
        }
        tx.commit()?;

        Ok(note_id)
    }

    fn get_note_fields(&self, note_id: i64) -> Result<BTreeMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, value FROM note_fields WHERE note_id = ?1")?;

        let fields = stmt
            .query_map(params![note_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        Ok(fields)
    }
}

impl DeckRepository for SqliteRepository {
    fn get_or_create_deck(&self, name: &str) -> Result<DeckId> {
        self.conn.execute(
            "INSERT OR IGNORE INTO decks (name) VALUES (?1)",
            params![name],
        )?;
        self.conn
            .query_row(
                "SELECT id FROM decks WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    fn get_deck_name(&self, id: DeckId) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT name FROM decks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }
}

impl NoteTypeRepository for SqliteRepository {
    fn get_note_type(&self, name: &str) -> Result<Option<NoteTypeSchema>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT schema_json FROM note_types WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(Into::into)
    }

    fn save_note_type(&self, schema: &NoteTypeSchema) -> Result<()> {
        let json = serde_json::to_string(schema)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO note_types (name, schema_json, updated_at) VALUES (?1, ?2, ?3)",
            params![schema.name, json, now],
        )?;
        Ok(())
    }
}

impl ConfigRepository for SqliteRepository {
    fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl NoteRepository for SqliteRepository {
    fn title_exists(&self, note_type: &str, title: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT n.id FROM notes n
                 JOIN note_fields f ON f.note_id = n.id
                 WHERE n.note_type = ?1 AND f.name = ?2 AND f.value = ?3
                 LIMIT 1",
                params![note_type, fields::TITLE, title],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_notes(&self, note_type: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE note_type = ?1",
            params![note_type],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn get_notes_by_title(&self, note_type: &str, title: &str) -> Result<Vec<StoredNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.id, n.guid, n.deck_id, n.tags, n.created_at FROM notes n
             JOIN note_fields f ON f.note_id = n.id
             WHERE n.note_type = ?1 AND f.name = ?2 AND f.value = ?3
             ORDER BY n.id",
        )?;

        let rows = stmt
            .query_map(params![note_type, fields::TITLE, title], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, DeckId>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, guid, deck_id, tags, created_at)| {
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| DbError::InvalidData(format!("created_at of note {id}: {e}")))?
                    .with_timezone(&Utc);
                Ok(StoredNote {
                    id,
                    guid,
                    deck_id,
                    tags: tags.split_whitespace().map(str::to_string).collect(),
                    fields: self.get_note_fields(id)?,
                    created_at,
                })
            })
            .collect()
    }
}

/// Record sink adding notes of one note type to the collection.
pub struct NoteWriter<'a> {
    repo: &'a SqliteRepository,
    schema: NoteTypeSchema,
}

impl RecordSink for NoteWriter<'_> {
    fn materialize(
        &mut self,
        record: &Record,
        seq: usize,
        title: &str,
        tags: &[String],
        destination: DeckId,
    ) -> std::result::Result<(), ImportError> {
        let values = note_fields(&self.schema, record, seq, title)?;
        self.repo
            .insert_note(&self.schema, destination, tags, &values)?;
        Ok(())
    }
}
