//! Core use-case services.
//!
//! # Responsibility
//! - Turn UI events into validated list mutations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod todo_store;
