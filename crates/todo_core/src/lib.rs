//! Core to-do list logic.
//! This crate is the single source of truth for list invariants; UI layers
//! call its store operations and paint the renderer's output.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod storage;

pub use config::{ConfigError, CoreConfig, RenderConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::filter::{Filter, UnknownFilterError};
pub use model::todo::{today, TodoId, TodoItem, TodoValidationError};
pub use render::{escape_html, format_date, project, render_html, DateLocale, DisplayRow, Projection};
pub use service::todo_store::{
    ClearOutcome, RestoreOutcome, TodoError, TodoResult, TodoStore, CLEAR_CONFIRM_PROMPT,
};
pub use storage::{MemoryStorage, SqliteStorage, StorageBackend, StorageError, StorageResult};

/// How long the UI keeps a validation message visible, in milliseconds.
pub const VALIDATION_FEEDBACK_MS: u64 = 2_000;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
