//! Domain model for the hub mini-apps.
//!
//! # Responsibility
//! - Define the canonical task and note records used by core logic.
//! - Keep the two mini-app shapes as distinct record types; their field
//!   sets and semantics diverge (completion vs. title derivation).
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - Task deletion is represented by a soft-delete tombstone, not row removal.

pub mod note;
pub mod task;
