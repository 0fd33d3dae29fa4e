//! SQLite schema definitions.

/// Config key holding the installed note type version.
pub const NOTE_TYPE_VERSION_KEY: &str = "arqimporter_model_version";

/// Complete schema for the local collection.
pub const SCHEMA: &str = r#"
-- Decks notes are added to
CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Note types, stored as serialized schemas
CREATE TABLE IF NOT EXISTS note_types (
    name TEXT PRIMARY KEY,
    schema_json TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Notes
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guid TEXT NOT NULL UNIQUE,
    note_type TEXT NOT NULL REFERENCES note_types(name),
    deck_id INTEGER NOT NULL REFERENCES decks(id),
    tags TEXT NOT NULL DEFAULT '',
    sort_field TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- Field values, one row per note and field
CREATE TABLE IF NOT EXISTS note_fields (
    note_id INTEGER NOT NULL REFERENCES notes(id),
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (note_id, name)
);

-- Collection config
CREATE TABLE IF NOT EXISTS config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_notes_type ON notes(note_type);
CREATE INDEX IF NOT EXISTS idx_notes_deck ON notes(deck_id);
CREATE INDEX IF NOT EXISTS idx_note_fields_value ON note_fields(name, value);
"#;

/// Create the default deck if not exists.
pub const INIT_DEFAULT_DECK: &str = r#"
INSERT OR IGNORE INTO decks (id, name) VALUES (1, 'Default');
"#;
