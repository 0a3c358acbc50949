//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the store, persistence and
//!   renderer.
//!
//! # Invariants
//! - Every task is identified by a unique `TaskId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod task;
