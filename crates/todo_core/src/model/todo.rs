//! To-do item model and field validation.
//!
//! # Responsibility
//! - Define the record stored in the persisted list.
//! - Normalize and validate user input before an item is created.
//!
//! # Invariants
//! - `id` is assigned once at creation and never mutated.
//! - `text` is stored trimmed and is never empty.
//! - `date` is a calendar date; no timezone is attached to it.
//! - `created_at` is informational and never drives ordering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a to-do item.
///
/// Issued from epoch milliseconds, forced strictly monotonic by the store.
pub type TodoId = i64;

/// Wire format of `TodoItem::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field-level validation failure for to-do input or persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Text is missing or blank after trimming.
    EmptyText,
    /// Text is shorter than the configured minimum (in characters).
    TooShort { minimum: usize, actual: usize },
    /// Date is absent or not a `YYYY-MM-DD` calendar date.
    MissingDate,
    /// Two records share one id.
    DuplicateId(TodoId),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text must not be empty"),
            Self::TooShort { minimum, actual } => write!(
                f,
                "todo text must be at least {minimum} characters (got {actual})"
            ),
            Self::MissingDate => write!(f, "todo date is missing or not a calendar date"),
            Self::DuplicateId(id) => write!(f, "duplicate todo id {id}"),
        }
    }
}

impl Error for TodoValidationError {}

/// One user-entered task with a target date and completion flag.
///
/// Serialized with camelCase field names (`createdAt`) to keep the
/// persisted blob shape stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    /// Serialized as an RFC 3339 timestamp.
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a pending item.
    ///
    /// This constructor does not validate `text`; use [`normalize_text`]
    /// on raw input first.
    pub fn new(
        id: TodoId,
        text: impl Into<String>,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            date,
            completed: false,
            created_at,
        }
    }

    /// Flips the completion flag in place.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Checks record-level invariants.
    ///
    /// Used on restore, where persisted data may have been edited externally.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Trims raw input text and enforces the minimum length policy.
///
/// `minimum_length == 0` disables the length check. Length is counted in
/// characters, not bytes.
pub fn normalize_text(raw: &str, minimum_length: usize) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyText);
    }

    let actual = trimmed.chars().count();
    if actual < minimum_length {
        return Err(TodoValidationError::TooShort {
            minimum: minimum_length,
            actual,
        });
    }

    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` calendar date from raw input.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::MissingDate);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| TodoValidationError::MissingDate)
}

/// Returns today's local calendar date, the add form's default.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
