//! FFI use-case API for shell-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the prototype UI: every operation
//!   returns an envelope, never throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store failures surface as a single human-readable message per call.

use std::path::PathBuf;
use std::sync::OnceLock;

use uuid::Uuid;
use workhub_core::db::open_db;
use workhub_core::store::now_epoch_ms;
use workhub_core::{
    core_version as core_version_inner, derive_note_title, hub_entries,
    init_logging as init_logging_inner, ping as ping_inner, Launch, MiniApp, NoteStore,
    SqliteNoteStore, SqliteTaskStore, StoreError, TaskId, TaskPatch, TaskStore,
};

const APP_DB_FILE_NAME: &str = "workhub_app.sqlite3";
static APP_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One launcher card as shown on the hub screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub accent: String,
    /// `mini_app` | `external` | `planned`.
    pub kind: String,
    /// Mini-app screen key (`tasks`/`notes`) when `kind == mini_app`.
    pub screen: Option<String>,
    /// Target URL when `kind == external`.
    pub url: Option<String>,
}

/// Lists all hub entries in display order.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - Never panics; the registry is static.
#[flutter_rust_bridge::frb(sync)]
pub fn hub_list() -> Vec<HubCardView> {
    hub_entries().iter().map(to_hub_card).collect()
}

/// Generic action response envelope for mutation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created/affected document ID, when meaningful.
    pub doc_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, doc_id: Option<String>) -> Self {
        Self {
            ok: true,
            doc_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            doc_id: None,
            message: message.into(),
        }
    }
}

/// Task document view mirroring the store shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<i64>,
    pub is_deleted: bool,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Task listing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Full collection, most-recently-created first; callers partition into
    /// active/deleted views.
    pub items: Vec<TaskView>,
    pub message: String,
}

/// Lists the full task collection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListResponse {
    match with_task_store(|store| store.list_tasks()) {
        Ok(tasks) => TaskListResponse {
            ok: true,
            items: tasks.iter().map(to_task_view).collect(),
            message: String::new(),
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_list failed: {err}"),
        },
    }
}

/// Adds one task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Empty/whitespace-only text is rejected locally without touching the
///   store.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> ActionResponse {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ActionResponse::failure("Task text must not be empty.");
    }

    match with_task_store(|store| store.add_task(trimmed)) {
        Ok(id) => ActionResponse::success("Task added.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Sets completion state of one task, maintaining its `completed_at` marker.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_completed(id: String, completed: bool) -> ActionResponse {
    let task_id = match parse_doc_id(&id) {
        Ok(task_id) => task_id,
        Err(message) => return ActionResponse::failure(message),
    };

    let completed_at = completed.then(now_epoch_ms);
    match with_task_store(|store| {
        store.update_task(task_id, &TaskPatch::completion(completed, completed_at))
    }) {
        Ok(()) => ActionResponse::success("Task updated.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_set_completed failed: {err}")),
    }
}

/// Soft-deletes one task (restorable from the deleted tab).
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    task_tombstone_op(id, "task_delete", |store, task_id| {
        store.soft_delete_task(task_id)
    })
}

/// Restores one soft-deleted task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_restore(id: String) -> ActionResponse {
    task_tombstone_op(id, "task_restore", |store, task_id| {
        store.restore_task(task_id)
    })
}

/// Permanently deletes one task. Irreversible; the shell confirms first.
#[flutter_rust_bridge::frb(sync)]
pub fn task_purge(id: String) -> ActionResponse {
    task_tombstone_op(id, "task_purge", |store, task_id| {
        store.permanently_delete_task(task_id)
    })
}

/// Bulk purge envelope with per-item results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResponse {
    /// False when any individual deletion failed.
    pub ok: bool,
    pub deleted_ids: Vec<String>,
    pub failed_ids: Vec<String>,
    pub message: String,
}

/// Permanently deletes every soft-deleted task.
///
/// # FFI contract
/// - Sync call, one delete per matching document, no rollback: deletions
///   that succeeded before a failure stay applied.
/// - Nothing to delete yields `ok=true` with an informational message.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_purge_deleted() -> PurgeResponse {
    let db_path = resolve_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            return PurgeResponse {
                ok: false,
                deleted_ids: Vec::new(),
                failed_ids: Vec::new(),
                message: format!("task_purge_deleted failed: {err}"),
            };
        }
    };

    let store = SqliteTaskStore::new(&conn);
    let targets: Vec<TaskId> = match store.list_tasks() {
        Ok(tasks) => tasks
            .into_iter()
            .filter(|task| task.is_deleted)
            .map(|task| task.id)
            .collect(),
        Err(err) => {
            return PurgeResponse {
                ok: false,
                deleted_ids: Vec::new(),
                failed_ids: Vec::new(),
                message: format!("task_purge_deleted failed: {err}"),
            };
        }
    };

    if targets.is_empty() {
        return PurgeResponse {
            ok: true,
            deleted_ids: Vec::new(),
            failed_ids: Vec::new(),
            message: "Nothing to delete.".to_string(),
        };
    }

    let mut deleted_ids = Vec::new();
    let mut failed_ids = Vec::new();
    for id in targets {
        match store.permanently_delete_task(id) {
            Ok(()) => deleted_ids.push(id.to_string()),
            Err(err) => {
                log::warn!("event=task_purge_deleted module=ffi id={id} error={err}");
                failed_ids.push(id.to_string());
            }
        }
    }

    let ok = failed_ids.is_empty();
    let message = if ok {
        format!("Deleted {} task(s).", deleted_ids.len())
    } else {
        format!(
            "Deleted {} task(s); {} deletion(s) failed.",
            deleted_ids.len(),
            failed_ids.len()
        )
    };
    PurgeResponse {
        ok,
        deleted_ids,
        failed_ids,
        message,
    }
}

/// Note document view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Note listing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub ok: bool,
    pub items: Vec<NoteView>,
    pub message: String,
}

/// One-shot note list fetch; the shell calls this again after mutations.
#[flutter_rust_bridge::frb(sync)]
pub fn note_list() -> NoteListResponse {
    match with_note_store(|store| store.list_notes()) {
        Ok(notes) => NoteListResponse {
            ok: true,
            items: notes.iter().map(to_note_view).collect(),
            message: String::new(),
        },
        Err(err) => NoteListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("note_list failed: {err}"),
        },
    }
}

/// Creates an empty draft note and returns its ID for the editor screen.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create() -> ActionResponse {
    match with_note_store(|store| store.create_note("Untitled", "")) {
        Ok(id) => ActionResponse::success("Note created.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Saves editor content, deriving the display title from the first
/// non-blank line. Used by the editor's debounced autosave.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(id: String, content: String) -> ActionResponse {
    let note_id = match parse_doc_id(&id) {
        Ok(note_id) => note_id,
        Err(message) => return ActionResponse::failure(message),
    };

    let title = derive_note_title(&content);
    match with_note_store(|store| store.update_note(note_id, &title, &content)) {
        Ok(()) => ActionResponse::success("Note saved.", Some(id)),
        Err(err) => ActionResponse::failure(format!("note_save failed: {err}")),
    }
}

/// Editor-close envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCloseResponse {
    pub ok: bool,
    /// True when the draft was deleted because its content stayed empty.
    pub discarded: bool,
    pub message: String,
}

/// Ends an editor session.
///
/// Empty (trimmed) content deletes the note; anything else is saved as-is,
/// winning over any autosave still in flight on the shell side.
#[flutter_rust_bridge::frb(sync)]
pub fn note_close(id: String, content: String) -> NoteCloseResponse {
    let note_id = match parse_doc_id(&id) {
        Ok(note_id) => note_id,
        Err(message) => {
            return NoteCloseResponse {
                ok: false,
                discarded: false,
                message,
            };
        }
    };

    if content.trim().is_empty() {
        return match with_note_store(|store| store.delete_note(note_id)) {
            Ok(()) => NoteCloseResponse {
                ok: true,
                discarded: true,
                message: "Empty note discarded.".to_string(),
            },
            Err(err) => NoteCloseResponse {
                ok: false,
                discarded: false,
                message: format!("note_close failed: {err}"),
            },
        };
    }

    let title = derive_note_title(&content);
    match with_note_store(|store| store.update_note(note_id, &title, &content)) {
        Ok(()) => NoteCloseResponse {
            ok: true,
            discarded: false,
            message: "Note saved.".to_string(),
        },
        Err(err) => NoteCloseResponse {
            ok: false,
            discarded: false,
            message: format!("note_close failed: {err}"),
        },
    }
}

fn task_tombstone_op(
    id: String,
    op_name: &str,
    op: impl FnOnce(&SqliteTaskStore<'_>, TaskId) -> Result<(), StoreError>,
) -> ActionResponse {
    let task_id = match parse_doc_id(&id) {
        Ok(task_id) => task_id,
        Err(message) => return ActionResponse::failure(message),
    };

    match with_task_store(|store| op(store, task_id)) {
        Ok(()) => ActionResponse::success("Task updated.", Some(id)),
        Err(err) => ActionResponse::failure(format!("{op_name} failed: {err}")),
    }
}

fn parse_doc_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid document id: `{raw}`"))
}

fn resolve_db_path() -> PathBuf {
    APP_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("WORKHUB_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(APP_DB_FILE_NAME)
        })
        .clone()
}

fn with_task_store<T>(
    f: impl FnOnce(&SqliteTaskStore<'_>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("app DB open failed: {err}"))?;
    let store = SqliteTaskStore::new(&conn);
    f(&store).map_err(|err| err.to_string())
}

fn with_note_store<T>(
    f: impl FnOnce(&SqliteNoteStore<'_>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("app DB open failed: {err}"))?;
    let store = SqliteNoteStore::new(&conn);
    f(&store).map_err(|err| err.to_string())
}

fn to_hub_card(entry: &workhub_core::HubEntry) -> HubCardView {
    let (kind, screen, url) = match entry.launch {
        Launch::MiniApp(app) => ("mini_app", Some(mini_app_key(app).to_string()), None),
        Launch::External(target) => ("external", None, Some(target.to_string())),
        Launch::Planned => ("planned", None, None),
    };
    HubCardView {
        id: entry.id.to_string(),
        title: entry.title.to_string(),
        description: entry.description.to_string(),
        icon: entry.icon.to_string(),
        accent: entry.accent.to_string(),
        kind: kind.to_string(),
        screen,
        url,
    }
}

fn mini_app_key(app: MiniApp) -> &'static str {
    match app {
        MiniApp::Tasks => "tasks",
        MiniApp::Notes => "notes",
    }
}

fn to_task_view(task: &workhub_core::Task) -> TaskView {
    TaskView {
        id: task.id.to_string(),
        text: task.text.clone(),
        completed: task.completed,
        completed_at: task.completed_at,
        is_deleted: task.is_deleted,
        deleted_at: task.deleted_at,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

fn to_note_view(note: &workhub_core::Note) -> NoteView {
    NoteView {
        id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}
