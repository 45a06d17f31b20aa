use std::cell::Cell;
use std::time::{Duration, Instant};
use uuid::Uuid;
use workhub_core::db::open_db_in_memory;
use workhub_core::service::note_pad::AUTOSAVE_DEBOUNCE;
use workhub_core::{
    CloseOutcome, Note, NoteId, NotePad, NoteStore, SqliteNoteStore, StoreError,
};

/// Delegating store double that counts note saves.
struct SpyNoteStore<'conn> {
    inner: SqliteNoteStore<'conn>,
    update_calls: Cell<usize>,
}

impl<'conn> SpyNoteStore<'conn> {
    fn new(inner: SqliteNoteStore<'conn>) -> Self {
        Self {
            inner,
            update_calls: Cell::new(0),
        }
    }
}

impl NoteStore for SpyNoteStore<'_> {
    fn create_note(&self, title: &str, content: &str) -> Result<NoteId, StoreError> {
        self.inner.create_note(title, content)
    }

    fn update_note(&self, id: NoteId, title: &str, content: &str) -> Result<(), StoreError> {
        self.update_calls.set(self.update_calls.get() + 1);
        self.inner.update_note(id, title, content)
    }

    fn delete_note(&self, id: NoteId) -> Result<(), StoreError> {
        self.inner.delete_note(id)
    }

    fn get_note(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        self.inner.get_note(id)
    }

    fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        self.inner.list_notes()
    }
}

#[test]
fn leaving_an_untouched_draft_deletes_it() {
    let conn = open_db_in_memory().unwrap();
    let mut pad = NotePad::new(SqliteNoteStore::new(&conn));

    let editor = pad.create_note().unwrap();
    assert_eq!(editor.close().unwrap(), CloseOutcome::Discarded);

    pad.reload().unwrap();
    assert!(pad.notes().is_empty());
}

#[test]
fn whitespace_only_content_is_discarded_too() {
    let conn = open_db_in_memory().unwrap();
    let mut pad = NotePad::new(SqliteNoteStore::new(&conn));

    let mut editor = pad.create_note().unwrap();
    editor.edit("   \n\t\n", Instant::now());
    assert_eq!(editor.close().unwrap(), CloseOutcome::Discarded);

    pad.reload().unwrap();
    assert!(pad.notes().is_empty());
}

#[test]
fn closing_with_content_persists_a_titled_note() {
    let conn = open_db_in_memory().unwrap();
    let mut pad = NotePad::new(SqliteNoteStore::new(&conn));

    let mut editor = pad.create_note().unwrap();
    editor.edit("# Hello", Instant::now());
    assert_eq!(editor.close().unwrap(), CloseOutcome::Saved);

    pad.reload().unwrap();
    assert_eq!(pad.notes().len(), 1);
    assert_eq!(pad.notes()[0].title, "Hello");
    assert_eq!(pad.notes()[0].content, "# Hello");
}

#[test]
fn list_is_most_recently_created_first() {
    let conn = open_db_in_memory().unwrap();
    let mut pad = NotePad::new(SqliteNoteStore::new(&conn));

    for body in ["first note", "second note", "third note"] {
        let mut editor = pad.create_note().unwrap();
        editor.edit(body, Instant::now());
        editor.close().unwrap();
    }

    pad.reload().unwrap();
    let titles: Vec<_> = pad.notes().iter().map(|note| note.title.as_str()).collect();
    assert_eq!(titles, vec!["third note", "second note", "first note"]);
}

#[test]
fn reopening_a_note_restores_its_content() {
    let conn = open_db_in_memory().unwrap();
    let mut pad = NotePad::new(SqliteNoteStore::new(&conn));

    let mut editor = pad.create_note().unwrap();
    editor.edit("## Plan\n- step one", Instant::now());
    editor.close().unwrap();

    pad.reload().unwrap();
    let id = pad.notes()[0].id;

    let editor = pad.open_note(id).unwrap();
    assert_eq!(editor.content(), "## Plan\n- step one");
}

#[test]
fn opening_an_unknown_note_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let pad = NotePad::new(SqliteNoteStore::new(&conn));

    let missing = Uuid::new_v4();
    let err = pad.open_note(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn edits_inside_the_debounce_window_coalesce_into_one_save() {
    let conn = open_db_in_memory().unwrap();
    let pad = NotePad::new(SpyNoteStore::new(SqliteNoteStore::new(&conn)));

    let mut editor = pad.create_note().unwrap();
    let t0 = Instant::now();

    editor.edit("draft", t0);
    editor.edit("draft, revised", t0 + Duration::from_millis(300));
    assert!(editor.has_pending_save());

    // First edit's deadline has passed, but the second edit replaced it.
    let first_deadline = t0 + AUTOSAVE_DEBOUNCE;
    assert!(!editor.poll_autosave(first_deadline).unwrap());
    assert_eq!(pad.store().update_calls.get(), 0);

    let second_deadline = t0 + Duration::from_millis(300) + AUTOSAVE_DEBOUNCE;
    assert!(editor.poll_autosave(second_deadline).unwrap());
    assert!(!editor.has_pending_save());
    assert_eq!(pad.store().update_calls.get(), 1);

    let saved = pad
        .store()
        .get_note(editor.note_id())
        .unwrap()
        .expect("autosaved note should exist");
    assert_eq!(saved.content, "draft, revised");
    assert_eq!(saved.title, "draft, revised");
}

#[test]
fn close_supersedes_a_pending_autosave() {
    let conn = open_db_in_memory().unwrap();
    let pad = NotePad::new(SpyNoteStore::new(SqliteNoteStore::new(&conn)));

    let mut editor = pad.create_note().unwrap();
    editor.edit("# Final\nbody", Instant::now());
    let id = editor.note_id();
    assert!(editor.has_pending_save());

    assert_eq!(editor.close().unwrap(), CloseOutcome::Saved);
    assert_eq!(pad.store().update_calls.get(), 1);

    let saved = pad.store().get_note(id).unwrap().unwrap();
    assert_eq!(saved.title, "Final");
}

#[test]
fn deleting_a_note_twice_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::new(&conn);

    let id = store.create_note("Untitled", "").unwrap();
    store.delete_note(id).unwrap();
    let err = store.delete_note(id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}
