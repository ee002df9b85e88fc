//! Query Pipeline
//!
//! search → column filters → stable sort → paginate. Pure: the same inputs
//! always produce the same page, and input rows are never modified.

use super::accessor::Row;
use super::column::{find_column, Column};
use super::comparator::compare;
use super::matcher::{matches_filters, matches_search};
use super::pagination::{total_pages, PageRequest, Pagination};
use super::query::QueryState;

/// One page of rows plus the size of the full filtered set
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<Row>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl QueryPage {
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.page_size)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.total_pages(), self.total_count)
    }
}

/// Apply search, filters and sort; returns borrowed rows in display order.
pub fn filter_and_sort<'a>(rows: &'a [Row], columns: &[Column], query: &QueryState) -> Vec<&'a Row> {
    let mut result: Vec<&Row> = rows
        .iter()
        .filter(|row| matches_search(row, columns, &query.global_search))
        .filter(|row| matches_filters(row, columns, &query.filters))
        .collect();

    let sort_column = query
        .sort_config
        .active_key()
        .and_then(|key| find_column(columns, key))
        .filter(|c| c.is_data_column());

    if let Some(column) = sort_column {
        let direction = query.sort_config.direction;
        result.sort_by(|a, b| compare(a, b, column, direction));
    }

    result
}

/// Run the full pipeline and cut out the requested page.
pub fn run(rows: &[Row], columns: &[Column], query: &QueryState, page: PageRequest) -> QueryPage {
    let matched = filter_and_sort(rows, columns, query);
    let total_count = matched.len();
    let range = page.range(total_count);

    tracing::trace!(
        input = rows.len(),
        total_count,
        page = page.page(),
        "worklist pipeline evaluated"
    );

    QueryPage {
        rows: matched[range].iter().map(|row| (*row).clone()).collect(),
        total_count,
        page: page.page(),
        page_size: page.page_size(),
    }
}
