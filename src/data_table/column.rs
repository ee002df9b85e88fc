//! Column Definition
//!
//! Defines table columns with their data path, declared type and cell formatter.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::accessor::{get_path, Row};
use crate::error::{Error, Result};
use crate::utils::format::format_cell;

/// Declared value type of a column, drives ordering and default formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
    Object,
    /// Numeric when both sides are JSON numbers, lexical otherwise
    Auto,
}

/// Turns a row (and the column's resolved value) into cell text
pub trait CellFormatter: Send + Sync {
    fn format(&self, row: &Row, value: Option<&Value>) -> String;
}

impl<F> CellFormatter for F
where
    F: Fn(&Row, Option<&Value>) -> String + Send + Sync,
{
    fn format(&self, row: &Row, value: Option<&Value>) -> String {
        self(row, value)
    }
}

/// Column width in characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width
    Fixed(usize),
    /// Width follows content, with optional bounds
    Flex { min: Option<usize>, max: Option<usize> },
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex { min: None, max: None }
    }
}

/// Column definition for the DataTable
#[derive(Clone)]
pub struct Column {
    /// Column identifier, unique within a column set
    pub key: Arc<str>,
    /// Column header label
    pub label: Arc<str>,
    /// Dotted path into a row; `None` for non-data columns such as actions
    pub data_path: Option<Arc<str>>,
    /// Declared type
    pub kind: ColumnType,
    /// Column width
    pub width: ColumnWidth,
    /// Custom formatter, replaces the type-based default
    formatter: Option<Arc<dyn CellFormatter>>,
}

impl Column {
    /// Create a new data column
    pub fn new(
        key: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
        data_path: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            data_path: Some(data_path.into()),
            kind: ColumnType::default(),
            width: ColumnWidth::default(),
            formatter: None,
        }
    }

    /// Create a column that is not backed by row data (never sorted or filtered)
    pub fn display_only(
        key: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
        formatter: impl CellFormatter + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            data_path: None,
            kind: ColumnType::String,
            width: ColumnWidth::default(),
            formatter: Some(Arc::new(formatter)),
        }
    }

    /// Set the declared type
    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    /// Set a custom formatter
    pub fn formatter(mut self, formatter: impl CellFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: usize) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set flexible width with optional constraints
    pub fn flex_width(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.width = ColumnWidth::Flex { min, max };
        self
    }

    /// Whether the column takes part in search, filtering and sorting
    pub fn is_data_column(&self) -> bool {
        self.data_path.is_some()
    }

    /// Resolve this column's value in a row
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        get_path(row, self.data_path.as_deref())
    }

    /// Render a cell
    pub fn render_cell(&self, row: &Row) -> String {
        let value = self.value(row);
        match &self.formatter {
            Some(formatter) => formatter.format(row, value),
            None => format_cell(value, self.kind),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("data_path", &self.data_path)
            .field("kind", &self.kind)
            .field("custom_formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Find a column by key
pub fn find_column<'a>(columns: &'a [Column], key: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.key.as_ref() == key)
}

/// Reject column sets that reuse a key
pub fn ensure_unique_keys(columns: &[Column]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.key.as_ref()) {
            return Err(Error::Configuration {
                message: format!("Duplicate column key: {}", column.key),
            });
        }
    }
    Ok(())
}
