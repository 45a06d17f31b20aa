//! Core domain logic for the Work Hub prototype launcher.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod hub;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use hub::{find_entry, hub_entries, HubEntry, HubError, Launch, MiniApp, Navigator, Opened, Screen};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use model::task::{Task, TaskId};
pub use service::note_pad::{derive_note_title, CloseOutcome, NoteEditor, NotePad};
pub use service::task_board::{
    BoardPhase, PurgeReport, TaskBoard, TaskBoardError, TaskTab, ToggleOutcome,
};
pub use store::note_store::{NoteStore, SqliteNoteStore};
pub use store::task_store::{SqliteTaskStore, TaskPatch, TaskStore, TaskSubscription};
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
