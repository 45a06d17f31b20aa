//! Task domain model.
//!
//! # Responsibility
//! - Define the to-do record shared by the active and deleted views.
//! - Provide lifecycle helpers for soft-delete and completion state.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `is_deleted` is the source of truth for tombstone state.
//! - `completed_at` is present iff `completed` is true (best-effort; the
//!   store does not enforce the pair atomically).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task document.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Canonical to-do record as delivered by store snapshots.
///
/// Serialized field names follow the document-store schema, so the same
/// shape can cross the FFI boundary without a mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable global ID assigned by the store on creation.
    pub id: TaskId,
    /// User-entered to-do text, trimmed at the input boundary.
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds. Set when `completed` flips to true, cleared on false.
    pub completed_at: Option<i64>,
    /// Soft delete tombstone; deleted tasks stay restorable until purged.
    pub is_deleted: bool,
    /// Epoch milliseconds. Set on soft delete, cleared on restore.
    pub deleted_at: Option<i64>,
    /// Epoch milliseconds, assigned by the store at creation, immutable.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed by the store on every mutation.
    pub updated_at: i64,
}

impl Task {
    /// Returns whether this task belongs to the active view.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use uuid::Uuid;

    fn sample() -> Task {
        Task {
            id: Uuid::new_v4(),
            text: "write report".to_string(),
            completed: false,
            completed_at: None,
            is_deleted: false,
            deleted_at: None,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn active_is_inverse_of_deleted() {
        let mut task = sample();
        assert!(task.is_active());
        task.is_deleted = true;
        assert!(!task.is_active());
    }

    #[test]
    fn serializes_with_document_field_names() {
        let task = sample();
        let json = serde_json::to_value(&task).expect("task should serialize");
        assert!(json.get("isDeleted").is_some());
        assert!(json.get("completedAt").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("is_deleted").is_none());
    }
}
