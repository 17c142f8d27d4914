//! To-do domain model.
//!
//! # Responsibility
//! - Define the canonical item record persisted by the store.
//! - Define the view predicate used to partition items.
//!
//! # Invariants
//! - Every item is identified by a `TodoId` that is never reused.
//! - Item text is never blank once an item exists.

pub mod filter;
pub mod todo;
