//! Row Matcher
//!
//! Case-insensitive substring matching for global search and per-column filters.

use super::accessor::{value_text, Row};
use super::column::{find_column, Column};
use super::query::Filters;

/// Whether any data column of `row` contains `search` (case-insensitive).
///
/// Empty search text matches every row.
pub fn matches_search(row: &Row, columns: &[Column], search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    columns
        .iter()
        .filter(|c| c.is_data_column())
        .any(|c| contains_text(row, c, &needle))
}

/// Whether `row` satisfies every active column filter.
///
/// Empty filter text is inactive. Filters for unknown keys or for columns
/// without a data path are ignored.
pub fn matches_filters(row: &Row, columns: &[Column], filters: &Filters) -> bool {
    filters.active().all(|(key, text)| {
        match find_column(columns, key).filter(|c| c.is_data_column()) {
            Some(column) => contains_text(row, column, &text.to_lowercase()),
            None => true,
        }
    })
}

/// `needle` must already be lowercase. Absent values never match.
fn contains_text(row: &Row, column: &Column, needle: &str) -> bool {
    column
        .value(row)
        .is_some_and(|value| value_text(value).to_lowercase().contains(needle))
}
