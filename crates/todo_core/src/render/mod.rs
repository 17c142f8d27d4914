//! Display projection of the to-do list.
//!
//! # Responsibility
//! - Project `(items, filter)` into display rows for the UI to paint.
//! - Neutralize markup characters in user text before it reaches a view.
//!
//! # Invariants
//! - Projection is pure: no storage access, no mutation, no logging.
//! - Row order follows list insertion order.
//! - An empty result is `Projection::Empty`, never an empty row list.

mod date;

pub use date::{format_date, DateLocale};

use crate::config::RenderConfig;
use crate::model::filter::Filter;
use crate::model::todo::{TodoId, TodoItem};

/// One item as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: TodoId,
    /// HTML-escaped item text.
    pub text: String,
    /// Locale-formatted date.
    pub date: String,
    pub completed: bool,
}

/// Result of projecting a list through a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Nothing matches; carries the placeholder message to show.
    Empty { message: String },
    /// At least one row, in insertion order.
    Rows(Vec<DisplayRow>),
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Rows to paint; empty slice for the placeholder state.
    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            Self::Empty { .. } => &[],
            Self::Rows(rows) => rows,
        }
    }
}

/// Projects `items` matching `filter` into display rows.
pub fn project(items: &[TodoItem], filter: Filter, config: &RenderConfig) -> Projection {
    let rows = items
        .iter()
        .filter(|item| filter.matches(item))
        .map(|item| DisplayRow {
            id: item.id,
            text: escape_html(&item.text),
            date: format_date(item.date, config.locale),
            completed: item.completed,
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        Projection::Empty {
            message: config.empty_message.clone(),
        }
    } else {
        Projection::Rows(rows)
    }
}

/// Escapes `& < > " '` for safe inclusion in markup text or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a projection as the list markup painted by the web view.
///
/// Rows carry `data-id` attributes; event wiring belongs to the UI layer.
pub fn render_html(projection: &Projection) -> String {
    match projection {
        Projection::Empty { message } => {
            format!(r#"<p class="todo-empty">{}</p>"#, escape_html(message))
        }
        Projection::Rows(rows) => rows.iter().map(render_row).collect(),
    }
}

fn render_row(row: &DisplayRow) -> String {
    let (item_class, checked) = if row.completed {
        ("todo-item completed", " checked")
    } else {
        ("todo-item", "")
    };
    format!(
        concat!(
            r#"<div class="{item_class}" data-id="{id}">"#,
            r#"<input type="checkbox" class="todo-checkbox" data-id="{id}"{checked}>"#,
            r#"<div><div class="todo-text">{text}</div><div class="todo-date">{date}</div></div>"#,
            r#"<button class="todo-delete" data-id="{id}">Delete</button>"#,
            "</div>"
        ),
        item_class = item_class,
        id = row.id,
        checked = checked,
        text = row.text,
        date = row.date,
    )
}
