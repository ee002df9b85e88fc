//! Worklist State
//!
//! Owns the column set, the rows of the last committed fetch, the query
//! (search, filters, sort) and the current page. Every fetch is tagged with a
//! sequence number and only the latest one may commit; older results are
//! dropped.

use std::sync::Arc;

use crate::data_table::column::{ensure_unique_keys, find_column};
use crate::data_table::{
    run, Column, PageRequest, Pagination, QueryPage, QueryState, Row, SortState,
};
use crate::error::{Error, Result};
use crate::services::FetchSeq;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WorklistLoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// `fatal` errors (bad wiring) cannot be cleared by refetching
    Failed { message: Arc<str>, fatal: bool },
}

impl WorklistLoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WorklistLoadState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorklistLoadState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, WorklistLoadState::Failed { fatal: true, .. })
    }
}

/// Interactive worklist state; the single mutator of query and rows
pub struct WorklistState {
    columns: Arc<[Column]>,
    rows: Vec<Row>,
    load_state: WorklistLoadState,
    query: QueryState,
    page: PageRequest,
    latest_seq: FetchSeq,
}

impl WorklistState {
    /// Column keys must be unique; the page size must be non-zero.
    pub fn new(columns: Vec<Column>, page_size: usize) -> Result<Self> {
        ensure_unique_keys(&columns)?;
        Ok(Self {
            columns: columns.into(),
            rows: Vec::new(),
            load_state: WorklistLoadState::Idle,
            query: QueryState::default(),
            page: PageRequest::new(1, page_size)?,
            latest_seq: FetchSeq::default(),
        })
    }

    // ==================== Getters ====================

    pub fn columns(&self) -> &Arc<[Column]> {
        &self.columns
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn load_state(&self) -> &WorklistLoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state.is_loading()
    }

    /// Rows of the last committed fetch, before the pipeline
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn page(&self) -> usize {
        self.page.page()
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size()
    }

    pub fn latest_seq(&self) -> FetchSeq {
        self.latest_seq
    }

    // ==================== Query changes ====================
    //
    // Each returns `true` when the query changed (and the page went back
    // to 1), which is when a refetching worklist must fetch again.

    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.query.global_search == text {
            return false;
        }
        self.query.global_search = text;
        self.reset_page();
        true
    }

    pub fn set_filter(&mut self, key: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.query.filters.get(key).unwrap_or_default() == text {
            return false;
        }
        if text.is_empty() {
            self.query.filters.remove(key);
        } else {
            self.query.filters.set(key, text);
        }
        self.reset_page();
        true
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        self.set_filter(key, "")
    }

    /// Header-click sort; columns without a data path are ignored
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        if !self.is_sortable(key) {
            tracing::debug!(key, "Ignoring sort on a non-data column");
            return false;
        }
        self.query.sort_config.toggle(key);
        self.reset_page();
        true
    }

    /// Replace search, filters and sort in one step. A sort on a column
    /// without a data path is dropped.
    pub fn set_query(&mut self, mut query: QueryState) -> bool {
        let unsortable = query
            .sort_config
            .active_key()
            .is_some_and(|key| !self.is_sortable(key));
        if unsortable {
            tracing::debug!(key = ?query.sort_config.key, "Ignoring sort on a non-data column");
            query.sort_config = SortState::default();
        }
        if self.query == query {
            return false;
        }
        self.query = query;
        self.reset_page();
        true
    }

    fn is_sortable(&self, key: &str) -> bool {
        find_column(&self.columns, key).is_some_and(Column::is_data_column)
    }

    fn reset_page(&mut self) {
        self.page = self.page.with_page(1);
    }

    // ==================== Paging ====================

    fn total_pages(&self) -> usize {
        self.visible_page().total_pages()
    }

    /// Go to `page`, kept within `1..=total_pages`
    pub fn set_page(&mut self, page: usize) {
        let last = self.total_pages().max(1);
        self.page = self.page.with_page(page.clamp(1, last));
    }

    pub fn next_page(&mut self) -> bool {
        if !self.pagination().can_next() {
            return false;
        }
        self.page = self.page.with_page(self.page() + 1);
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.pagination().can_prev() {
            return false;
        }
        self.page = self.page.with_page(self.page() - 1);
        true
    }

    // ==================== Fetch bookkeeping ====================

    /// Issue a new fetch; any fetch still in flight is superseded.
    pub fn begin_fetch(&mut self) -> FetchSeq {
        self.latest_seq = self.latest_seq.next();
        self.load_state = WorklistLoadState::Loading;
        tracing::debug!(seq = %self.latest_seq, "Fetch issued");
        self.latest_seq
    }

    /// Commit a fetch result. Returns `false` for superseded results.
    ///
    /// Failures clear the cached rows.
    pub fn commit(&mut self, seq: FetchSeq, result: Result<Vec<Row>>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(%seq, latest = %self.latest_seq, "Discarding superseded fetch result");
            return false;
        }

        match result {
            Ok(rows) => {
                tracing::debug!(%seq, rows = rows.len(), "Fetch committed");
                self.rows = rows;
                self.load_state = WorklistLoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(%seq, error = %e, "Fetch failed");
                self.rows.clear();
                self.set_error(&e);
            }
        }
        true
    }

    /// Put the worklist into the failed state
    pub fn set_error(&mut self, error: &Error) {
        self.load_state = WorklistLoadState::Failed {
            message: error.to_string().into(),
            fatal: !error.is_recoverable(),
        };
    }

    // ==================== View ====================

    /// Rows of the current page after search, filters and sort
    pub fn visible_page(&self) -> QueryPage {
        run(&self.rows, &self.columns, &self.query, self.page)
    }

    pub fn pagination(&self) -> Pagination {
        self.visible_page().pagination()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_table::{ColumnType, SortDirection};
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![
            Column::display_only("actions", "Actions", |_: &Row, _: Option<&serde_json::Value>| {
                "View | Edit".to_string()
            }),
            Column::new("name", "Name", "customer.name"),
            Column::new("amount", "Amount", "amount").kind(ColumnType::Number),
        ]
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                json!({"customer": {"name": format!("Customer {i:02}")}, "amount": i})
                    .as_object()
                    .cloned()
                    .expect("object")
            })
            .collect()
    }

    fn ready_state(n: usize) -> WorklistState {
        let mut state = WorklistState::new(columns(), 10).expect("state");
        let seq = state.begin_fetch();
        assert!(state.commit(seq, Ok(rows(n))));
        state
    }

    #[test]
    fn duplicate_column_keys_are_rejected() {
        let cols = vec![Column::new("a", "A", "a"), Column::new("a", "Again", "b")];
        let err = WorklistState::new(cols, 10).err().expect("duplicate");
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(matches!(
            WorklistState::new(columns(), 0).err(),
            Some(Error::Invalid { .. })
        ));
    }

    #[test]
    fn only_latest_fetch_commits() {
        let mut state = WorklistState::new(columns(), 10).expect("state");
        let first = state.begin_fetch();
        let second = state.begin_fetch();
        assert!(state.is_loading());

        assert!(!state.commit(first, Ok(rows(3))));
        assert!(state.is_loading());
        assert!(state.rows().is_empty());

        assert!(state.commit(second, Ok(rows(5))));
        assert_eq!(state.load_state(), &WorklistLoadState::Ready);
        assert_eq!(state.rows().len(), 5);
    }

    #[test]
    fn failed_fetch_clears_rows() {
        let mut state = ready_state(4);
        let seq = state.begin_fetch();
        state.commit(
            seq,
            Err(Error::Network {
                status: Some(503),
                message: "Service Unavailable".into(),
            }),
        );
        assert!(state.rows().is_empty());
        assert_eq!(
            state.load_state().error_message(),
            Some("API error: Service Unavailable")
        );
        assert!(!state.load_state().is_fatal());

        state.set_error(&Error::Configuration {
            message: "No data source configured".into(),
        });
        assert!(state.load_state().is_fatal());
    }

    #[test]
    fn query_changes_reset_page() {
        let mut state = ready_state(25);
        assert!(state.next_page());
        assert!(state.next_page());
        assert_eq!(state.page(), 3);
        assert!(!state.next_page());

        assert!(state.set_search("customer"));
        assert_eq!(state.page(), 1);
        assert!(!state.set_search("customer"));

        state.set_page(2);
        assert!(state.set_filter("name", "1"));
        assert_eq!(state.page(), 1);
        assert!(state.clear_filter("name"));
        assert!(!state.clear_filter("name"));

        state.set_page(2);
        assert!(state.toggle_sort("amount"));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn page_changes_keep_query() {
        let mut state = ready_state(12);
        state.set_search("customer");
        let query = state.query().clone();
        state.set_page(2);
        assert_eq!(state.query(), &query);
        assert_eq!(state.visible_page().rows.len(), 2);
        assert!(state.prev_page());
        assert!(!state.prev_page());
        state.set_page(0);
        assert_eq!(state.page(), 1);
        state.set_page(99);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn sort_toggles_and_ignores_non_data_columns() {
        let mut state = ready_state(3);
        assert!(!state.toggle_sort("actions"));
        assert!(!state.toggle_sort("missing"));
        assert_eq!(state.query().sort_config.active_key(), None);

        state.toggle_sort("amount");
        assert_eq!(state.query().sort_config.direction, SortDirection::Asc);
        state.toggle_sort("amount");
        assert_eq!(state.query().sort_config.direction, SortDirection::Desc);

        let page = state.visible_page();
        assert_eq!(page.rows[0]["amount"], 2);

        state.toggle_sort("name");
        assert_eq!(state.query().sort_config.key.as_deref(), Some("name"));
        assert_eq!(state.query().sort_config.direction, SortDirection::Asc);
    }

    #[test]
    fn whole_query_replaced_at_once() {
        let mut state = ready_state(25);
        state.set_page(3);

        let query = QueryState::default()
            .with_search("customer 1")
            .with_filter("name", "customer")
            .with_sort("amount", SortDirection::Desc);
        assert!(state.set_query(query.clone()));
        assert_eq!(state.page(), 1);
        assert!(!state.set_query(query));

        let page = state.visible_page();
        assert_eq!(page.total_count, 10);
        assert_eq!(page.rows[0]["amount"], 19);

        assert!(state.set_query(QueryState::default().with_sort("actions", SortDirection::Asc)));
        assert_eq!(state.query(), &QueryState::default());
    }

    #[test]
    fn pagination_summary_tracks_filtered_rows() {
        let mut state = ready_state(12);
        assert_eq!(state.pagination().render(), "Page 1 of 2 (12 total items)");
        state.set_filter("name", "Customer 1");
        assert_eq!(state.pagination().render(), "Page 1 of 1 (2 total items)");
    }
}
