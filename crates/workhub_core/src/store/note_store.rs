//! Note collection client: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/delete/list operations over the `notes`
//!   collection.
//!
//! # Invariants
//! - Notes are fetched one-shot; the note manager reloads explicitly after
//!   each mutation instead of holding a live subscription. This asymmetry
//!   with the task store is deliberate and must be preserved.
//! - Listings are ordered `created_at DESC`, newest insertion first on ties.

use crate::model::note::{Note, NoteId};
use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// Client interface for the `notes` collection.
pub trait NoteStore {
    /// Creates a new note document; the store assigns id and timestamps.
    fn create_note(&self, title: &str, content: &str) -> StoreResult<NoteId>;
    /// Replaces title and content fully and refreshes `updated_at`.
    fn update_note(&self, id: NoteId, title: &str, content: &str) -> StoreResult<()>;
    /// Irreversibly removes one note. A repeat call reports `NotFound`.
    fn delete_note(&self, id: NoteId) -> StoreResult<()>;
    /// Fetches one note by id.
    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// One-shot collection fetch, most-recently-created first.
    fn list_notes(&self) -> StoreResult<Vec<Note>>;
}

/// SQLite-backed note store client.
#[derive(Debug)]
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn create_note(&self, title: &str, content: &str) -> StoreResult<NoteId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO notes (uuid, title, content) VALUES (?1, ?2, ?3);",
            params![id.to_string(), title, content],
        )?;
        Ok(id)
    }

    fn update_note(&self, id: NoteId, title: &str, content: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                content = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![title, content, id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"))?;

        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
