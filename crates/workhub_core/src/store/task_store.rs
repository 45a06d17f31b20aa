//! Task collection client: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and soft-delete operations over the `tasks` collection.
//! - Broadcast a full ordered snapshot to subscribers after every mutation.
//!
//! # Invariants
//! - `created_at`/`updated_at` are assigned by the store on write; callers
//!   never supply them.
//! - Snapshots and listings are ordered `created_at DESC`, newest insertion
//!   first on ties.
//! - Mutations publish at most one snapshot, after the write succeeded.

use crate::model::task::{Task, TaskId};
use crate::store::watch::{SnapshotHub, WatchGuard};
use crate::store::{now_epoch_ms, StoreError, StoreResult};
use log::error;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::mpsc::Receiver;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    text,
    is_completed,
    completed_at,
    is_deleted,
    deleted_at,
    created_at,
    updated_at
FROM tasks";

/// Partial update for one task document.
///
/// `None` leaves a field untouched; `Some(None)` on the timestamp fields
/// clears them. The store refreshes `updated_at` on every patch regardless
/// of which fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<i64>>,
    pub is_deleted: Option<bool>,
    pub deleted_at: Option<Option<i64>>,
}

impl TaskPatch {
    /// Patch flipping completion state with its matching marker timestamp.
    pub fn completion(completed: bool, completed_at: Option<i64>) -> Self {
        Self {
            completed: Some(completed),
            completed_at: Some(completed_at),
            ..Self::default()
        }
    }

    /// Patch marking a task as soft-deleted at `deleted_at_ms`.
    pub fn soft_delete(deleted_at_ms: i64) -> Self {
        Self {
            is_deleted: Some(true),
            deleted_at: Some(Some(deleted_at_ms)),
            ..Self::default()
        }
    }

    /// Patch clearing the soft-delete tombstone.
    pub fn restore() -> Self {
        Self {
            is_deleted: Some(false),
            deleted_at: Some(None),
            ..Self::default()
        }
    }
}

/// Live snapshot subscription handle.
///
/// `snapshots` observes one initial listing followed by one full listing per
/// store mutation; `guard` detaches the watcher, exactly once, on cancel or
/// drop.
pub struct TaskSubscription {
    pub snapshots: Receiver<Vec<Task>>,
    pub guard: WatchGuard,
}

/// Client interface for the `tasks` collection.
pub trait TaskStore {
    /// Creates a new task document; the store assigns id and timestamps.
    fn add_task(&self, text: &str) -> StoreResult<TaskId>;
    /// Merges `patch` into an existing document and refreshes `updated_at`.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()>;
    /// Irreversibly removes one document. A repeat call reports `NotFound`.
    fn permanently_delete_task(&self, id: TaskId) -> StoreResult<()>;
    /// Full collection listing, most-recently-created first.
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    /// Registers a live watcher; the initial snapshot is delivered immediately.
    fn subscribe(&self) -> StoreResult<TaskSubscription>;

    /// Marks a task deleted without removing it.
    fn soft_delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.update_task(id, &TaskPatch::soft_delete(now_epoch_ms()))
    }

    /// Clears the tombstone set by [`TaskStore::soft_delete_task`].
    fn restore_task(&self, id: TaskId) -> StoreResult<()> {
        self.update_task(id, &TaskPatch::restore())
    }
}

/// SQLite-backed task store client.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
    hub: SnapshotHub<Task>,
}

impl<'conn> SqliteTaskStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            hub: SnapshotHub::new(),
        }
    }

    /// Re-reads the collection and fans it out to live watchers.
    ///
    /// A failed snapshot read is logged rather than surfaced: the triggering
    /// mutation already succeeded, and watchers recover on the next publish.
    fn broadcast(&self) {
        if self.hub.watcher_count() == 0 {
            return;
        }
        match self.list_tasks() {
            Ok(snapshot) => self.hub.publish(&snapshot),
            Err(err) => {
                error!("event=task_snapshot module=store status=error error={err}");
            }
        }
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn add_task(&self, text: &str) -> StoreResult<TaskId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (uuid, text) VALUES (?1, ?2);",
            params![id.to_string(), text],
        )?;

        self.broadcast();
        Ok(id)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        let mut assignments = vec!["updated_at = (strftime('%s', 'now') * 1000)".to_string()];
        let mut binds: Vec<Value> = Vec::new();

        if let Some(text) = &patch.text {
            assignments.push("text = ?".to_string());
            binds.push(Value::Text(text.clone()));
        }
        if let Some(completed) = patch.completed {
            assignments.push("is_completed = ?".to_string());
            binds.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(completed_at) = patch.completed_at {
            assignments.push("completed_at = ?".to_string());
            binds.push(optional_ms(completed_at));
        }
        if let Some(is_deleted) = patch.is_deleted {
            assignments.push("is_deleted = ?".to_string());
            binds.push(Value::Integer(bool_to_int(is_deleted)));
        }
        if let Some(deleted_at) = patch.deleted_at {
            assignments.push("deleted_at = ?".to_string());
            binds.push(optional_ms(deleted_at));
        }

        binds.push(Value::Text(id.to_string()));
        let sql = format!(
            "UPDATE tasks SET {} WHERE uuid = ?;",
            assignments.join(", ")
        );

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.broadcast();
        Ok(())
    }

    fn permanently_delete_task(&self, id: TaskId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.broadcast();
        Ok(())
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        // rowid breaks created_at ties so that same-millisecond inserts still
        // list newest first.
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"))?;

        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn subscribe(&self) -> StoreResult<TaskSubscription> {
        let initial = self.list_tasks()?;
        let (snapshots, guard) = self.hub.attach(initial);
        Ok(TaskSubscription { snapshots, guard })
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    Ok(Task {
        id,
        text: row.get("text")?,
        completed: parse_flag(row, "is_completed")?,
        completed_at: row.get("completed_at")?,
        is_deleted: parse_flag(row, "is_deleted")?,
        deleted_at: row.get("deleted_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_flag(row: &Row<'_>, column: &str) -> StoreResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in tasks.{column}"
        ))),
    }
}

fn optional_ms(value: Option<i64>) -> Value {
    match value {
        Some(ms) => Value::Integer(ms),
        None => Value::Null,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
