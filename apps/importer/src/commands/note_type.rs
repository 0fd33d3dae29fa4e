//! Installing and upgrading the note type imported questions use.

use super::CommandError;
use crate::db::schema::NOTE_TYPE_VERSION_KEY;
use crate::db::{ConfigRepository, DbError, NoteTypeRepository, SqliteRepository};
use arq_core::{NoteTypeDefinition, UNVERSIONED};

/// What `ensure_note_type` did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NoteTypeStatus {
    Installed { version: String },
    Upgraded { from: String, to: String },
    Current { version: String },
}

/// Version of the note type recorded in the collection.
pub fn installed_version(repo: &SqliteRepository) -> Result<String, DbError> {
    Ok(repo
        .get_config(NOTE_TYPE_VERSION_KEY)?
        .unwrap_or_else(|| UNVERSIONED.to_string()))
}

/// Make sure the collection holds the current version of `definition`.
///
/// A missing note type is installed. An old one is upgraded when an upgrade
/// path exists; otherwise the collection is left alone and the mismatch is
/// reported, since imports would produce broken notes.
pub fn ensure_note_type(
    repo: &SqliteRepository,
    definition: &NoteTypeDefinition,
) -> Result<NoteTypeStatus, CommandError> {
    let Some(mut schema) = repo.get_note_type(definition.name)? else {
        repo.save_note_type(&definition.to_schema())?;
        repo.set_config(NOTE_TYPE_VERSION_KEY, definition.version)?;
        tracing::info!(
            note_type = definition.name,
            version = definition.version,
            "installed note type"
        );
        return Ok(NoteTypeStatus::Installed {
            version: definition.version.to_string(),
        });
    };

    let current = installed_version(repo)?;
    if definition.can_upgrade(&current) {
        let upgraded = definition.upgrade_from(&mut schema, &current)?;
        repo.save_note_type(&schema)?;
        repo.set_config(NOTE_TYPE_VERSION_KEY, &upgraded)?;
        tracing::info!(
            note_type = definition.name,
            from = %current,
            to = %upgraded,
            "upgraded note type"
        );
        return Ok(NoteTypeStatus::Upgraded {
            from: current,
            to: upgraded,
        });
    }

    definition.ensure_current(&current)?;
    Ok(NoteTypeStatus::Current { version: current })
}
