//! Mini-app view controllers.
//!
//! # Responsibility
//! - Hold per-screen state for the to-do board and the note manager.
//! - Forward user intents to the store clients and mirror their results.
//!
//! # Invariants
//! - Controllers never apply optimistic updates; visible state follows
//!   store snapshots or explicit reloads.

pub mod note_pad;
pub mod task_board;
