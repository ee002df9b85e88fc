//! DataTable
//!
//! Plain-text rendering of one page of rows.

use super::accessor::Row;
use super::column::{Column, ColumnWidth};
use crate::constants::{EMPTY_TABLE_MESSAGE, LOADING_MESSAGE};
use crate::utils::format::truncate;

/// Renders a header line, a separator and one line per row
pub struct DataTable<'a> {
    columns: &'a [Column],
    rows: &'a [Row],
    loading: bool,
}

impl<'a> DataTable<'a> {
    /// Create a new data table
    pub fn new(columns: &'a [Column], rows: &'a [Row]) -> Self {
        Self {
            columns,
            rows,
            loading: false,
        }
    }

    /// Set loading state
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn column_width(&self, column: &Column, cells: &[Vec<String>], index: usize) -> usize {
        let content = cells
            .iter()
            .map(|row| row[index].chars().count())
            .chain(std::iter::once(column.label.chars().count()))
            .max()
            .unwrap_or(0);
        match column.width {
            ColumnWidth::Fixed(w) => w,
            ColumnWidth::Flex { min, max } => {
                let w = content.max(min.unwrap_or(0));
                max.map_or(w, |max| w.min(max))
            }
        }
    }

    fn render_line(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| fit(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    /// Render the table
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = if self.loading {
            Vec::new()
        } else {
            self.rows
                .iter()
                .map(|row| self.columns.iter().map(|c| c.render_cell(row)).collect())
                .collect()
        };

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| self.column_width(c, &cells, i))
            .collect();

        let header: Vec<String> = self.columns.iter().map(|c| c.label.to_string()).collect();
        let mut out = vec![Self::render_line(&header, &widths)];
        out.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );

        if self.loading {
            out.push(LOADING_MESSAGE.to_string());
        } else if cells.is_empty() {
            out.push(EMPTY_TABLE_MESSAGE.to_string());
        } else {
            out.extend(cells.iter().map(|row| Self::render_line(row, &widths)));
        }

        out.join("\n")
    }
}

/// Pad or truncate to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    format!("{text:<width$}")
}
