//! Note domain model.
//!
//! # Responsibility
//! - Define the markdown note record used by the note manager list and
//!   editor screens.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` is a derived projection of `content`; the editor recomputes it
//!   on every save rather than accepting a caller-provided title.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note document.
pub type NoteId = Uuid;

/// Markdown note record.
///
/// Notes have no soft-delete tombstone: the note manager removes empty
/// drafts outright and keeps everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable global ID assigned by the store on creation.
    pub id: NoteId,
    /// Display title derived from the first non-blank content line.
    pub title: String,
    /// Raw markdown source text.
    pub content: String,
    /// Epoch milliseconds, assigned by the store at creation, immutable.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed by the store on every save.
    pub updated_at: i64,
}
