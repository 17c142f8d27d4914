//! Locale-bound calendar date formatting.
//!
//! Dates are formatted as tokens: no timezone conversion ever happens, so
//! `2024-01-15` renders as the 15th in every locale and every host zone.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display convention for item dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLocale {
    /// `15 Jan 2024`, Indonesian short month names.
    #[default]
    Indonesian,
    /// `Jan 15, 2024`.
    EnglishUs,
    /// `2024-01-15`.
    Iso,
}

/// Formats `date` as a human-readable string for `locale`.
pub fn format_date(date: NaiveDate, locale: DateLocale) -> String {
    let month = date.month0() as usize;
    match locale {
        DateLocale::Indonesian => format!("{} {} {}", date.day(), MONTHS_ID[month], date.year()),
        DateLocale::EnglishUs => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
        DateLocale::Iso => date.format("%Y-%m-%d").to_string(),
    }
}
