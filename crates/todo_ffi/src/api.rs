//! FFI use-case API for the to-do widget UI.
//!
//! # Responsibility
//! - Expose the widget's UI events (add, toggle, delete, clear, filter) as
//!   synchronous calls against one process-wide store session.
//! - Translate store outcomes into envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Silent outcomes (unknown ids, corrupt storage) carry `feedback_ms = 0`.
//! - The active filter lives in the session and resets when it is reopened.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    project, render_html, ClearOutcome, CoreConfig, Filter, LoggingConfig, Projection,
    RenderConfig, RestoreOutcome, SqliteStorage, TodoError, TodoId, TodoStore,
    CLEAR_CONFIRM_PROMPT, VALIDATION_FEEDBACK_MS,
};

const TODO_DB_FILE_NAME: &str = "todo_widget.sqlite3";
const TODO_DB_PATH_ENV: &str = "TODO_DB_PATH";

static SESSION: Mutex<Option<TodoSession>> = Mutex::new(None);

struct TodoSession {
    store: TodoStore<SqliteStorage>,
    render: RenderConfig,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LoggingConfig::new(level, log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope for widget events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected item id, when the action targets one item.
    pub todo_id: Option<i64>,
    /// Stable outcome code on failure (`empty_text`, `not_found`, ...).
    pub error_code: Option<String>,
    /// Human-readable message; shown to the user when `feedback_ms > 0`.
    pub message: String,
    /// How long the UI should show `message`; `0` means stay quiet.
    pub feedback_ms: u64,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, todo_id: Option<TodoId>) -> Self {
        Self {
            ok: true,
            todo_id,
            error_code: None,
            message: message.into(),
            feedback_ms: 0,
        }
    }

    fn failure(err: &TodoError, todo_id: Option<TodoId>) -> Self {
        let (message, feedback_ms) = match err.user_message() {
            Some(message) if !err.is_silent() => (message, VALIDATION_FEEDBACK_MS),
            _ => (err.to_string(), 0),
        };
        Self {
            ok: false,
            todo_id,
            error_code: Some(err.code().to_string()),
            message,
            feedback_ms,
        }
    }

    fn bridge_failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            todo_id: None,
            error_code: Some(code.to_string()),
            message: message.into(),
            feedback_ms: 0,
        }
    }
}

/// One painted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRowView {
    pub id: i64,
    /// HTML-escaped text.
    pub text: String,
    /// Locale-formatted date.
    pub date: String,
    pub completed: bool,
}

/// Current view of the list under the active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoViewResponse {
    /// Active filter (`all|pending|completed`).
    pub filter: String,
    pub rows: Vec<TodoRowView>,
    /// Placeholder message when nothing matches the filter.
    pub empty_message: Option<String>,
    /// Ready-to-paint list markup.
    pub html: String,
    /// Item count before filtering.
    pub total: u32,
}

/// Opens (or reopens) the widget session.
///
/// Input semantics:
/// - `db_path`: database file; falls back to `TODO_DB_PATH`, then a temp-dir
///   default.
/// - `config_json`: optional core config document; defaults when absent.
///
/// # FFI contract
/// - Replaces any existing session; the filter resets to `all`.
/// - A `logging` section initializes core logging before storage is opened;
///   a rejected section fails the call and leaves the session untouched.
/// - Corrupt persisted data is discarded silently and reported in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_open(db_path: Option<String>, config_json: Option<String>) -> TodoActionResponse {
    let config = match config_json.as_deref().map(CoreConfig::from_json_str) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            return TodoActionResponse::bridge_failure("invalid_config", err.to_string())
        }
        None => CoreConfig::default(),
    };

    if let Some(logging) = &config.logging {
        if let Err(err) = init_logging_inner(logging) {
            return TodoActionResponse::bridge_failure(
                "logging_failed",
                format!("todo_open failed: {err}"),
            );
        }
    }

    let path = resolve_db_path(db_path);
    let storage = match SqliteStorage::open(&path) {
        Ok(storage) => storage,
        Err(err) => {
            return TodoActionResponse::bridge_failure(
                "storage_open_failed",
                format!("todo_open failed: {err}"),
            )
        }
    };

    let mut store = TodoStore::new(storage, config.store);
    let message = match store.restore() {
        RestoreOutcome::Missing => "No saved todos.".to_string(),
        RestoreOutcome::Restored { count } => format!("Loaded {count} todo(s)."),
        RestoreOutcome::Discarded { reason } => {
            warn!("event=ffi_open module=ffi status=discarded");
            format!("Saved todos were unreadable and have been reset: {reason}")
        }
    };

    *lock_session() = Some(TodoSession {
        store,
        render: config.render,
    });
    TodoActionResponse::success(message, None)
}

/// Adds an item from the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(text: String, date: String) -> TodoActionResponse {
    with_session(|session| match session.store.create(&text, &date) {
        Ok(item) => TodoActionResponse::success("Todo added.", Some(item.id)),
        Err(err) => TodoActionResponse::failure(&err, None),
    })
}

/// Flips completion from a checkbox change.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: i64) -> TodoActionResponse {
    with_session(|session| match session.store.toggle(id) {
        Ok(item) => {
            let message = if item.completed {
                "Todo completed."
            } else {
                "Todo reopened."
            };
            TodoActionResponse::success(message, Some(item.id))
        }
        Err(err) => TodoActionResponse::failure(&err, Some(id)),
    })
}

/// Removes an item from its delete button; unknown ids succeed quietly.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoActionResponse {
    with_session(|session| match session.store.delete(id) {
        Ok(true) => TodoActionResponse::success("Todo deleted.", Some(id)),
        Ok(false) => TodoActionResponse::success("Nothing to delete.", Some(id)),
        Err(err) => TodoActionResponse::failure(&err, Some(id)),
    })
}

/// Prompt text the UI shows before calling `todo_clear(true)`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_clear_prompt() -> String {
    CLEAR_CONFIRM_PROMPT.to_string()
}

/// Clears the list from the clear-all control.
///
/// `confirmed` is the user's answer to `todo_clear_prompt()`. An empty list
/// is reported as `nothing_to_clear` regardless of the answer.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_clear(confirmed: bool) -> TodoActionResponse {
    with_session(|session| match session.store.clear(|_| confirmed) {
        Ok(ClearOutcome::Cleared { removed }) => {
            TodoActionResponse::success(format!("Cleared {removed} todo(s)."), None)
        }
        Ok(ClearOutcome::Declined) => TodoActionResponse::success("Clear cancelled.", None),
        Err(err) => TodoActionResponse::failure(&err, None),
    })
}

/// Changes the active filter (`all|pending|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn todo_set_filter(value: String) -> TodoActionResponse {
    let filter = match value.parse::<Filter>() {
        Ok(filter) => filter,
        Err(err) => return TodoActionResponse::bridge_failure("unknown_filter", err.to_string()),
    };
    with_session(|session| {
        session.store.set_filter(filter);
        TodoActionResponse::success(format!("Showing {filter} todos."), None)
    })
}

/// Projects the list through the active filter for painting.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_render() -> TodoViewResponse {
    let mut guard = lock_session();
    let Some(session) = ensure_session(&mut guard) else {
        return unavailable_view();
    };

    let filter = session.store.filter();
    let projection = project(session.store.items(), filter, &session.render);
    let html = render_html(&projection);
    let (rows, empty_message) = match projection {
        Projection::Empty { message } => (Vec::new(), Some(message)),
        Projection::Rows(rows) => (
            rows.into_iter()
                .map(|row| TodoRowView {
                    id: row.id,
                    text: row.text,
                    date: row.date,
                    completed: row.completed,
                })
                .collect(),
            None,
        ),
    };

    TodoViewResponse {
        filter: filter.as_str().to_string(),
        rows,
        empty_message,
        html,
        total: u32::try_from(session.store.len()).unwrap_or(u32::MAX),
    }
}

/// Placeholder view painted when no session could be opened.
fn unavailable_view() -> TodoViewResponse {
    let message = RenderConfig::default().empty_message;
    TodoViewResponse {
        filter: Filter::All.as_str().to_string(),
        rows: Vec::new(),
        html: render_html(&Projection::Empty {
            message: message.clone(),
        }),
        empty_message: Some(message),
        total: 0,
    }
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    let from_env = std::env::var(TODO_DB_PATH_ENV).ok();
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(TODO_DB_FILE_NAME))
}

fn lock_session() -> MutexGuard<'static, Option<TodoSession>> {
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Opens the default session when the UI skipped `todo_open`.
fn ensure_session<'a>(guard: &'a mut Option<TodoSession>) -> Option<&'a mut TodoSession> {
    if guard.is_none() {
        let storage = match SqliteStorage::open(resolve_db_path(None)) {
            Ok(storage) => storage,
            Err(err) => {
                warn!("event=ffi_session module=ffi status=error error={err}");
                return None;
            }
        };
        let config = CoreConfig::default();
        *guard = Some(TodoSession {
            store: TodoStore::open(storage, config.store),
            render: config.render,
        });
    }
    guard.as_mut()
}

fn with_session(f: impl FnOnce(&mut TodoSession) -> TodoActionResponse) -> TodoActionResponse {
    let mut guard = lock_session();
    match ensure_session(&mut guard) {
        Some(session) => f(session),
        None => TodoActionResponse::bridge_failure(
            "storage_open_failed",
            "todo storage could not be opened",
        ),
    }
}
