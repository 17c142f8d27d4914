//! To-do store: the authoritative list and its persistence.
//!
//! # Responsibility
//! - Own the in-memory list and the active view filter.
//! - Validate input, apply mutations and mirror the list to storage.
//! - Restore the list at startup, tolerating missing or corrupt data.
//!
//! # Invariants
//! - Every item has a unique `id` and non-empty `text`.
//! - After every successful mutation, storage holds the full list.
//! - A failed persist rolls the mutation back; memory never runs ahead of
//!   storage.
//! - Ids are strictly increasing within a session and above every
//!   restored id.

use crate::config::StoreConfig;
use crate::model::filter::Filter;
use crate::model::todo::{normalize_text, parse_date, TodoId, TodoItem, TodoValidationError};
use crate::storage::{StorageBackend, StorageError};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prompt the UI shows before clearing the list.
pub const CLEAR_CONFIRM_PROMPT: &str = "Are you sure you want to delete all todos?";

pub type TodoResult<T> = Result<T, TodoError>;

/// Outcome kinds of store operations.
///
/// All kinds are recoverable. `NotFound` and `StorageCorrupt` are silent:
/// the UI does not show them to the user.
#[derive(Debug)]
pub enum TodoError {
    Validation(TodoValidationError),
    NothingToClear,
    NotFound(TodoId),
    /// The id space is used up; no later id can be issued.
    IdsExhausted,
    StorageCorrupt(String),
    Storage(StorageError),
}

impl TodoError {
    /// Stable short code for log lines and UI bridges.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(TodoValidationError::EmptyText) => "empty_text",
            Self::Validation(TodoValidationError::TooShort { .. }) => "too_short",
            Self::Validation(TodoValidationError::MissingDate) => "missing_date",
            Self::Validation(TodoValidationError::DuplicateId(_)) => "duplicate_id",
            Self::NothingToClear => "nothing_to_clear",
            Self::NotFound(_) => "not_found",
            Self::IdsExhausted => "ids_exhausted",
            Self::StorageCorrupt(_) => "storage_corrupt",
            Self::Storage(_) => "storage_failed",
        }
    }

    /// Whether the UI should stay quiet about this outcome.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::StorageCorrupt(_))
    }

    /// Human-readable reason for the validation feedback channel.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            Self::Validation(TodoValidationError::EmptyText) => {
                "Please enter a todo item!".to_string()
            }
            Self::Validation(TodoValidationError::TooShort { minimum, .. }) => {
                format!("Todo must be at least {minimum} characters!")
            }
            Self::Validation(TodoValidationError::MissingDate) => {
                "Please select a date!".to_string()
            }
            Self::Validation(TodoValidationError::DuplicateId(_)) => return None,
            Self::NothingToClear => "No todos to clear!".to_string(),
            Self::IdsExhausted => "Could not add todo!".to_string(),
            Self::Storage(_) => "Could not save todos!".to_string(),
            Self::NotFound(_) | Self::StorageCorrupt(_) => return None,
        };
        Some(message)
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NothingToClear => write!(f, "no todos to clear"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::IdsExhausted => write!(f, "todo ids exhausted at {}", TodoId::MAX),
            Self::StorageCorrupt(reason) => write!(f, "stored todo list is corrupt: {reason}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for TodoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// What `restore` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No entry under the storage key; the list starts empty.
    Missing,
    Restored { count: usize },
    /// Entry was unreadable or violated item invariants; the list starts
    /// empty and storage is left untouched until the next mutation.
    Discarded { reason: String },
}

/// Result of a confirmed-or-declined clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed: usize },
    Declined,
}

/// Authoritative to-do list bound to one storage backend.
pub struct TodoStore<S: StorageBackend> {
    storage: S,
    config: StoreConfig,
    items: Vec<TodoItem>,
    filter: Filter,
    last_id: TodoId,
}

impl<S: StorageBackend> TodoStore<S> {
    /// Creates an empty store without reading storage.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            config,
            items: Vec::new(),
            filter: Filter::All,
            last_id: 0,
        }
    }

    /// Creates a store and restores the persisted list.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let mut store = Self::new(storage, config);
        store.restore();
        store
    }

    /// Validates input and appends a new pending item.
    ///
    /// # Errors
    /// - `Validation(EmptyText | TooShort | MissingDate)` for bad input.
    /// - `Storage` when the list cannot be written; the item is not kept.
    pub fn create(&mut self, text: &str, date: &str) -> TodoResult<TodoItem> {
        let validated = normalize_text(text, self.config.minimum_text_length)
            .and_then(|text| parse_date(date).map(|parsed| (text, parsed)));
        let (text, date) = match validated {
            Ok(fields) => fields,
            Err(err) => {
                let err = TodoError::from(err);
                debug!(
                    "event=todo_create module=store status=rejected error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        let Some(id) = self.next_id() else {
            error!(
                "event=todo_create module=store status=error error_code=ids_exhausted last_id={}",
                self.last_id
            );
            return Err(TodoError::IdsExhausted);
        };

        let item = TodoItem::new(id, text, date, Utc::now());
        self.items.push(item.clone());
        if let Err(err) = self.persist() {
            self.items.pop();
            error!(
                "event=todo_create module=store status=error id={} error_code={} error={err}",
                item.id,
                err.code()
            );
            return Err(err);
        }

        info!(
            "event=todo_create module=store status=ok id={} count={}",
            item.id,
            self.items.len()
        );
        Ok(item)
    }

    /// Flips `completed` on the item with `id` and returns the updated item.
    ///
    /// An unknown id yields the silent `NotFound` outcome and changes nothing.
    pub fn toggle(&mut self, id: TodoId) -> TodoResult<TodoItem> {
        let Some(index) = self.position(id) else {
            debug!("event=todo_toggle module=store status=not_found id={id}");
            return Err(TodoError::NotFound(id));
        };

        self.items[index].toggle();
        if let Err(err) = self.persist() {
            self.items[index].toggle();
            error!("event=todo_toggle module=store status=error id={id} error={err}");
            return Err(err);
        }

        let item = self.items[index].clone();
        info!(
            "event=todo_toggle module=store status=ok id={id} completed={}",
            item.completed
        );
        Ok(item)
    }

    /// Removes the item with `id`.
    ///
    /// Idempotent: returns `Ok(false)` without touching storage when no such
    /// item exists.
    pub fn delete(&mut self, id: TodoId) -> TodoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=todo_delete module=store status=not_found id={id}");
            return Ok(false);
        };

        let removed = self.items.remove(index);
        if let Err(err) = self.persist() {
            self.items.insert(index, removed);
            error!("event=todo_delete module=store status=error id={id} error={err}");
            return Err(err);
        }

        info!(
            "event=todo_delete module=store status=ok id={id} count={}",
            self.items.len()
        );
        Ok(true)
    }

    /// Removes every item once `confirm` approves [`CLEAR_CONFIRM_PROMPT`].
    ///
    /// The empty check runs first, so an empty list never prompts.
    ///
    /// # Errors
    /// - `NothingToClear` when the list is already empty.
    /// - `Storage` when the empty list cannot be written; items are kept.
    pub fn clear(&mut self, confirm: impl FnOnce(&str) -> bool) -> TodoResult<ClearOutcome> {
        if self.items.is_empty() {
            debug!("event=todo_clear module=store status=rejected error_code=nothing_to_clear");
            return Err(TodoError::NothingToClear);
        }
        if !confirm(CLEAR_CONFIRM_PROMPT) {
            debug!("event=todo_clear module=store status=declined");
            return Ok(ClearOutcome::Declined);
        }

        let previous = std::mem::take(&mut self.items);
        if let Err(err) = self.persist() {
            self.items = previous;
            error!("event=todo_clear module=store status=error error={err}");
            return Err(err);
        }

        info!(
            "event=todo_clear module=store status=ok removed={}",
            previous.len()
        );
        Ok(ClearOutcome::Cleared {
            removed: previous.len(),
        })
    }

    /// Items matching `filter`, in insertion order.
    pub fn list(&self, filter: Filter) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .collect()
    }

    /// Items matching the active filter.
    pub fn visible(&self) -> Vec<&TodoItem> {
        self.list(self.filter)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!("event=todo_filter module=store status=ok filter={filter}");
        self.filter = filter;
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the backend, e.g. to reopen it in a fresh store.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the full list to storage as one JSON blob.
    pub fn persist(&mut self) -> TodoResult<()> {
        let blob = serde_json::to_string(&self.items).map_err(StorageError::from)?;
        self.storage.set(&self.config.storage_key, &blob)?;
        Ok(())
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Never fails: missing, unreadable or invalid data yields an empty list.
    /// The active filter is left as is.
    pub fn restore(&mut self) -> RestoreOutcome {
        let raw = match self.storage.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.items.clear();
                info!("event=todo_restore module=store status=missing");
                return RestoreOutcome::Missing;
            }
            Err(err) => {
                self.items.clear();
                warn!("event=todo_restore module=store status=unreadable error={err}");
                return RestoreOutcome::Discarded {
                    reason: err.to_string(),
                };
            }
        };

        match decode_items(&raw) {
            Ok(items) => {
                if let Some(max_id) = items.iter().map(|item| item.id).max() {
                    self.last_id = self.last_id.max(max_id);
                }
                self.items = items;
                info!(
                    "event=todo_restore module=store status=ok count={}",
                    self.items.len()
                );
                RestoreOutcome::Restored {
                    count: self.items.len(),
                }
            }
            Err(err) => {
                self.items.clear();
                warn!(
                    "event=todo_restore module=store status=corrupt error_code={} error={err}",
                    err.code()
                );
                RestoreOutcome::Discarded {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// `None` once `last_id` sits at `TodoId::MAX`.
    fn next_id(&mut self) -> Option<TodoId> {
        let now_ms = Utc::now().timestamp_millis();
        let id = now_ms.max(self.last_id.checked_add(1)?);
        self.last_id = id;
        Some(id)
    }
}

/// Decodes a persisted blob and checks item invariants.
fn decode_items(raw: &str) -> TodoResult<Vec<TodoItem>> {
    let items: Vec<TodoItem> =
        serde_json::from_str(raw).map_err(|err| TodoError::StorageCorrupt(err.to_string()))?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        item.validate()
            .map_err(|err| TodoError::StorageCorrupt(format!("item {}: {err}", item.id)))?;
        if !seen.insert(item.id) {
            return Err(TodoError::StorageCorrupt(
                TodoValidationError::DuplicateId(item.id).to_string(),
            ));
        }
    }

    Ok(items)
}
