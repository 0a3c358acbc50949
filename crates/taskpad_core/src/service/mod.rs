//! Core use-case services.
//!
//! # Responsibility
//! - Hold the in-memory task store and its mutation rules.
//! - Bridge the store to durable slot storage without leaking SQL.

pub mod persistence;
pub mod task_store;
