//! To-do board controller.
//!
//! # Responsibility
//! - Mirror the task collection locally and derive the active/deleted views.
//! - Validate input before it reaches the store and forward user intents.
//!
//! # Invariants
//! - Every pumped snapshot replaces the mirror wholesale; there is no
//!   incremental diffing and no special-casing of self-originated changes.
//! - A task is in exactly one of the active and deleted views.
//! - Empty or whitespace-only input never reaches the store.

use crate::model::task::{Task, TaskId};
use crate::store::task_store::{TaskPatch, TaskStore, TaskSubscription};
use crate::store::{now_epoch_ms, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Receiver;

/// Board lifecycle. `Loading` until the first snapshot lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    Loading,
    Ready,
}

/// Which of the two board tabs is selected. Presentation-only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTab {
    Active,
    Deleted,
}

/// Result of a toggle intent.
///
/// `NotInMirror` means the task vanished between render and intent (a race
/// with a concurrent delete); callers surface it as a toast instead of
/// failing silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled,
    NotInMirror,
}

/// Per-item results of a bulk purge over soft-deleted tasks.
///
/// The purge is deliberately non-transactional: deletions that succeeded
/// before a failure stay deleted.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub deleted: Vec<TaskId>,
    pub failed: Vec<(TaskId, StoreError)>,
}

impl PurgeReport {
    /// True when there was nothing to purge.
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty()
    }
}

/// Board operation error.
#[derive(Debug)]
pub enum TaskBoardError {
    /// Input was empty after trimming; handled locally, store not called.
    EmptyInput,
    /// Store operation failure, surfaced as a single user-visible alert.
    Store(StoreError),
    /// Bulk purge partially failed; per-item results are attached.
    PurgeIncomplete(PurgeReport),
}

impl Display for TaskBoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "task text must not be empty"),
            Self::Store(err) => write!(f, "{err}"),
            Self::PurgeIncomplete(report) => write!(
                f,
                "purge incomplete: {} deleted, {} failed",
                report.deleted.len(),
                report.failed.len()
            ),
        }
    }
}

impl Error for TaskBoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TaskBoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// To-do board over a task store client.
///
/// The board subscribes at mount and stays `Loading` until the first
/// snapshot is pumped. All mutations round-trip through the store; the
/// mirror changes only when a snapshot is delivered.
pub struct TaskBoard<S: TaskStore> {
    store: S,
    snapshots: Receiver<Vec<Task>>,
    guard: Option<crate::store::watch::WatchGuard>,
    mirror: Vec<Task>,
    phase: BoardPhase,
    tab: TaskTab,
}

impl<S: TaskStore> TaskBoard<S> {
    /// Subscribes to the store and returns a board in `Loading` phase.
    pub fn mount(store: S) -> Result<Self, TaskBoardError> {
        let TaskSubscription { snapshots, guard } = store.subscribe()?;
        Ok(Self {
            store,
            snapshots,
            guard: Some(guard),
            mirror: Vec::new(),
            phase: BoardPhase::Loading,
            tab: TaskTab::Active,
        })
    }

    /// Drains pending snapshots, replacing the mirror with each in order.
    ///
    /// Returns the number of snapshots applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.mirror = snapshot;
            self.phase = BoardPhase::Ready;
            applied += 1;
        }
        applied
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn tab(&self) -> TaskTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: TaskTab) {
        self.tab = tab;
    }

    /// Tasks shown on the active tab.
    pub fn active(&self) -> Vec<&Task> {
        self.mirror.iter().filter(|task| task.is_active()).collect()
    }

    /// Tasks shown on the deleted tab.
    pub fn deleted(&self) -> Vec<&Task> {
        self.mirror.iter().filter(|task| task.is_deleted).collect()
    }

    /// Borrow of the underlying store client.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a task after local validation.
    ///
    /// Whitespace-only input is rejected with `EmptyInput` before any store
    /// round-trip.
    pub fn add_task(&self, text: &str) -> Result<TaskId, TaskBoardError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TaskBoardError::EmptyInput);
        }

        let id = self.store.add_task(trimmed)?;
        info!("event=task_add module=board status=ok id={id}");
        Ok(id)
    }

    /// Flips completion state of one mirrored task.
    ///
    /// Reads the current state from the mirror and writes the inverse plus a
    /// matching `completed_at` marker. A task missing from the mirror yields
    /// `NotInMirror` rather than an error.
    pub fn toggle_task(&self, id: TaskId) -> Result<ToggleOutcome, TaskBoardError> {
        let Some(task) = self.mirror.iter().find(|task| task.id == id) else {
            warn!("event=task_toggle module=board status=skipped reason=not_in_mirror id={id}");
            return Ok(ToggleOutcome::NotInMirror);
        };

        let completing = !task.completed;
        let completed_at = completing.then(now_epoch_ms);
        self.store
            .update_task(id, &TaskPatch::completion(completing, completed_at))?;
        Ok(ToggleOutcome::Toggled)
    }

    /// Soft-deletes one task. No confirmation required; restorable.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskBoardError> {
        self.store.soft_delete_task(id)?;
        Ok(())
    }

    /// Clears the tombstone of one soft-deleted task.
    pub fn restore_task(&self, id: TaskId) -> Result<(), TaskBoardError> {
        self.store.restore_task(id)?;
        Ok(())
    }

    /// Irreversibly removes one task. Callers must confirm with the user
    /// first; there is no undo and no automatic retry.
    pub fn permanently_delete_task(&self, id: TaskId) -> Result<(), TaskBoardError> {
        self.store.permanently_delete_task(id)?;
        Ok(())
    }

    /// Purges every soft-deleted task in the mirror, one delete per task.
    ///
    /// Partial failure returns `PurgeIncomplete` carrying per-item results;
    /// already-deleted tasks stay deleted. An empty deleted view returns a
    /// no-op report without touching the store, so callers can show an
    /// informational message instead of a confirmation prompt.
    pub fn purge_deleted(&self) -> Result<PurgeReport, TaskBoardError> {
        let targets: Vec<TaskId> = self
            .mirror
            .iter()
            .filter(|task| task.is_deleted)
            .map(|task| task.id)
            .collect();

        let mut report = PurgeReport::default();
        for id in targets {
            match self.store.permanently_delete_task(id) {
                Ok(()) => report.deleted.push(id),
                Err(err) => {
                    warn!("event=task_purge module=board status=error id={id} error={err}");
                    report.failed.push((id, err));
                }
            }
        }

        if report.failed.is_empty() {
            info!(
                "event=task_purge module=board status=ok deleted={}",
                report.deleted.len()
            );
            Ok(report)
        } else {
            Err(TaskBoardError::PurgeIncomplete(report))
        }
    }

    /// Cancels the snapshot subscription and consumes the board.
    ///
    /// In-flight store work is not cancelled; unsubscribing is the only
    /// teardown primitive.
    pub fn unmount(mut self) {
        if let Some(guard) = self.guard.take() {
            guard.cancel();
        }
    }
}
