//! Note manager controller and editor session.
//!
//! # Responsibility
//! - Mirror the note list via explicit one-shot reloads.
//! - Own the editor session: debounced autosave, title derivation, and the
//!   empty-draft cleanup rule.
//!
//! # Invariants
//! - The list refreshes only on `reload()`; there is no live subscription.
//! - Exactly one autosave slot is pending per editor; a new edit replaces
//!   the previous deadline instead of racing it.
//! - Closing an editor with trimmed-empty content deletes the note.

use crate::model::note::{Note, NoteId};
use crate::store::note_store::NoteStore;
use crate::store::{StoreError, StoreResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};

/// Inactivity window after an edit before the pending autosave fires.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Title used when content has no non-blank line to derive from.
pub const UNTITLED: &str = "Untitled";

static HEADING_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s*").expect("valid heading marker regex"));

/// Derives a display title from markdown content.
///
/// Rules:
/// - Take the first non-blank line.
/// - Strip one leading run of `#` heading markers and following whitespace.
/// - Fall back to [`UNTITLED`] when nothing remains.
pub fn derive_note_title(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    let title = HEADING_MARKER_RE.replace(line, "");
    let title = title.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// How an editor session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Content was persisted with a freshly derived title.
    Saved,
    /// Content was still empty; the draft was deleted instead of kept.
    Discarded,
}

/// Note list controller.
///
/// Mirrors the collection through one-shot fetches; callers reload after
/// closing an editor to observe its effect.
pub struct NotePad<S: NoteStore> {
    store: S,
    notes: Vec<Note>,
}

impl<S: NoteStore> NotePad<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notes: Vec::new(),
        }
    }

    /// Re-fetches the note list, most-recently-created first.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.notes = self.store.list_notes()?;
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an empty draft note and opens an editor on it.
    ///
    /// The draft is persisted immediately; if the user leaves without
    /// typing anything the close path removes it again.
    pub fn create_note(&self) -> StoreResult<NoteEditor<'_, S>> {
        let id = self.store.create_note(UNTITLED, "")?;
        info!("event=note_create module=notepad status=ok id={id}");
        Ok(NoteEditor {
            store: &self.store,
            note_id: id,
            content: String::new(),
            pending_save: None,
        })
    }

    /// Opens an editor on an existing note.
    pub fn open_note(&self, id: NoteId) -> StoreResult<NoteEditor<'_, S>> {
        let note = self.store.get_note(id)?.ok_or(StoreError::NotFound(id))?;
        Ok(NoteEditor {
            store: &self.store,
            note_id: id,
            content: note.content,
            pending_save: None,
        })
    }
}

/// One editor session over a single note.
///
/// Edits land in a local buffer; persistence happens through the debounced
/// autosave slot or the final save on close. The last write wins.
#[derive(Debug)]
pub struct NoteEditor<'store, S: NoteStore> {
    store: &'store S,
    note_id: NoteId,
    content: String,
    pending_save: Option<Instant>,
}

impl<S: NoteStore> NoteEditor<'_, S> {
    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_some()
    }

    /// Replaces the buffer content and (re)arms the autosave slot.
    ///
    /// The slot holds a single deadline; an edit inside the debounce window
    /// pushes it out rather than scheduling a second save.
    pub fn edit(&mut self, content: impl Into<String>, now: Instant) {
        self.content = content.into();
        self.pending_save = Some(now + AUTOSAVE_DEBOUNCE);
    }

    /// Fires the pending autosave if its deadline has passed.
    ///
    /// Returns whether a save was written. Callers drive this from their
    /// frame/tick loop with the current instant.
    pub fn poll_autosave(&mut self, now: Instant) -> StoreResult<bool> {
        match self.pending_save {
            Some(deadline) if now >= deadline => {
                self.save()?;
                self.pending_save = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Ends the session.
    ///
    /// Trimmed-empty content deletes the note (empty drafts are never kept);
    /// anything else is saved as-is, superseding any still-pending autosave.
    pub fn close(self) -> StoreResult<CloseOutcome> {
        if self.content.trim().is_empty() {
            self.store.delete_note(self.note_id)?;
            info!(
                "event=note_close module=notepad status=discarded id={}",
                self.note_id
            );
            return Ok(CloseOutcome::Discarded);
        }

        self.save()?;
        Ok(CloseOutcome::Saved)
    }

    fn save(&self) -> StoreResult<()> {
        let title = derive_note_title(&self.content);
        self.store.update_note(self.note_id, &title, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_note_title, UNTITLED};

    #[test]
    fn title_comes_from_first_non_blank_line() {
        assert_eq!(derive_note_title("\n\n  \nplan for monday\nrest"), "plan for monday");
    }

    #[test]
    fn title_strips_heading_markers() {
        assert_eq!(derive_note_title("# Hello"), "Hello");
        assert_eq!(derive_note_title("### Deep heading\nbody"), "Deep heading");
    }

    #[test]
    fn bare_markers_fall_back_to_untitled() {
        assert_eq!(derive_note_title("###"), UNTITLED);
        assert_eq!(derive_note_title("   \n\n"), UNTITLED);
        assert_eq!(derive_note_title(""), UNTITLED);
    }

    #[test]
    fn markers_inside_the_line_are_kept() {
        assert_eq!(derive_note_title("release #42 notes"), "release #42 notes");
    }
}
