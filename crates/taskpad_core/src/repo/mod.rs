//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable slot contract used by the persistence adapter.
//! - Isolate SQLite query details from store/render orchestration.

pub mod slot_repo;
