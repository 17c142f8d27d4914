//! View predicate over the to-do list.

use super::todo::TodoItem;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Selects which items a view shows.
///
/// UI state only: never persisted, starts at `All` for every session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    /// Stable string id used by UI controls.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `item` belongs to this view.
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter control value outside `all|pending|completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterError(pub String);

impl Display for UnknownFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|pending|completed",
            self.0
        )
    }
}

impl Error for UnknownFilterError {}

impl FromStr for Filter {
    type Err = UnknownFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilterError(other.to_string())),
        }
    }
}
