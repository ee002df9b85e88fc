//! Worklist Controller
//!
//! Ties a [`WorklistState`] to a [`DataSource`]. Fetches run on the shared
//! tokio runtime and report back over a channel; the owner drains it with
//! [`Worklist::pump_events`] (or blocks with [`Worklist::wait_for_idle`]).
//!
//! Two modes:
//! - **refetch** (default): every search / filter / sort change issues a new
//!   fetch; the returned rows still pass through the pipeline.
//! - **local**: rows are fetched once and query changes are applied to the
//!   cached rows only.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::constants::{DEFAULT_PAGE_SIZE, FETCH_TIMEOUT_SECS};
use crate::data_table::{Column, DataSource, DataSourceBuilder, DataTable, QueryState};
use crate::domain::config::WorklistConfig;
use crate::error::{Error, Result};
use crate::services::{spawn_named_in_tokio, with_timeout, FetchSeq, WorklistEvent};
use crate::state::WorklistState;

/// Runtime options for a worklist
#[derive(Clone, Debug)]
pub struct WorklistOptions {
    pub page_size: usize,
    pub fetch_timeout: Duration,
    pub refetch_on_change: bool,
}

impl Default for WorklistOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            refetch_on_change: true,
        }
    }
}

impl From<&WorklistConfig> for WorklistOptions {
    fn from(config: &WorklistConfig) -> Self {
        Self {
            page_size: config.page_size,
            fetch_timeout: config.fetch_timeout(),
            refetch_on_change: config.refetch_on_change,
        }
    }
}

/// A configured worklist: state, data source and fetch plumbing
pub struct Worklist {
    state: WorklistState,
    /// `None` when the data source could not be configured
    source: Option<DataSource>,
    options: WorklistOptions,
    tx: Sender<WorklistEvent>,
    rx: Receiver<WorklistEvent>,
}

impl Worklist {
    /// Create a worklist over an existing data source
    pub fn new(columns: Vec<Column>, source: DataSource, options: WorklistOptions) -> Result<Self> {
        let state = WorklistState::new(columns, options.page_size)?;
        tracing::info!(source = source.kind(), "Worklist created");
        Ok(Self::assemble(state, Some(source), options))
    }

    /// Create a worklist from whichever data source input the builder holds.
    ///
    /// A missing or unusable data source does not fail construction: the
    /// worklist starts in a fatal error state instead. Column and page size
    /// problems are returned as errors.
    pub fn from_builder(
        columns: Vec<Column>,
        builder: DataSourceBuilder,
        options: WorklistOptions,
    ) -> Result<Self> {
        let mut state = WorklistState::new(columns, options.page_size)?;
        let source = match builder.build(state.columns(), options.fetch_timeout) {
            Ok(source) => {
                tracing::info!(source = source.kind(), "Worklist created");
                Some(source)
            }
            Err(e) => {
                tracing::error!(error = %e, "Worklist has no usable data source");
                state.set_error(&e);
                None
            }
        };
        Ok(Self::assemble(state, source, options))
    }

    fn assemble(state: WorklistState, source: Option<DataSource>, options: WorklistOptions) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            state,
            source,
            options,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &WorklistState {
        &self.state
    }

    pub fn options(&self) -> &WorklistOptions {
        &self.options
    }

    // ==================== Fetching ====================

    /// Issue a background fetch for the current query
    pub fn refresh(&mut self) -> Option<FetchSeq> {
        let Some(source) = self.source.clone() else {
            tracing::warn!("Refresh ignored: no data source");
            return None;
        };

        let seq = self.state.begin_fetch();
        let query = self.state.query().clone();
        let limit = self.options.fetch_timeout;
        let tx = self.tx.clone();

        spawn_named_in_tokio("worklist-fetch", async move {
            let result = fetch_with_timeout(&source, &query, limit).await;
            if tx.send(WorklistEvent::FetchCompleted { seq, result }).is_err() {
                tracing::debug!(%seq, "Worklist dropped before fetch completed");
            }
        });

        Some(seq)
    }

    /// Fetch and commit in place, without going through the channel
    pub async fn fetch_now(&mut self) -> Result<()> {
        let Some(source) = self.source.clone() else {
            return Err(Error::Configuration {
                message: "No data source configured".to_string(),
            });
        };
        let seq = self.state.begin_fetch();
        let query = self.state.query().clone();
        let result = fetch_with_timeout(&source, &query, self.options.fetch_timeout).await;
        self.state.commit(seq, result);
        Ok(())
    }

    fn apply(&mut self, event: WorklistEvent) -> bool {
        match event {
            WorklistEvent::FetchCompleted { seq, result } => self.state.commit(seq, result),
        }
    }

    /// Apply every pending completion. Returns how many were committed.
    pub fn pump_events(&mut self) -> usize {
        let mut committed = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.apply(event) {
                committed += 1;
            }
        }
        committed
    }

    /// Block until no fetch is pending, or `limit` runs out
    pub fn wait_for_idle(&mut self, limit: Duration) -> Result<()> {
        let deadline = Instant::now() + limit;
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.apply(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(Error::Timeout {
                        message: format!("worklist still loading after {}s", limit.as_secs_f64()),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(())
    }

    // ==================== Query changes ====================

    fn query_changed(&mut self, changed: bool) -> bool {
        if changed && self.options.refetch_on_change {
            self.refresh();
        }
        changed
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let changed = self.state.set_search(text);
        self.query_changed(changed)
    }

    pub fn set_filter(&mut self, key: &str, text: impl Into<String>) -> bool {
        let changed = self.state.set_filter(key, text);
        self.query_changed(changed)
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        let changed = self.state.clear_filter(key);
        self.query_changed(changed)
    }

    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let changed = self.state.toggle_sort(key);
        self.query_changed(changed)
    }

    pub fn set_query(&mut self, query: QueryState) -> bool {
        let changed = self.state.set_query(query);
        self.query_changed(changed)
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn next_page(&mut self) -> bool {
        self.state.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.state.prev_page()
    }

    // ==================== Rendering ====================

    /// Plain-text view: table plus page navigation when there is more than
    /// one page
    pub fn render(&self) -> String {
        if let Some(message) = self.state.load_state().error_message() {
            return format!("Error: {message}");
        }

        let page = self.state.visible_page();
        let table = DataTable::new(self.state.columns(), &page.rows)
            .loading(self.state.is_loading())
            .render();

        let pagination = page.pagination();
        if pagination.is_visible() && !self.state.is_loading() {
            format!("{table}\n\n{}", pagination.render())
        } else {
            table
        }
    }
}

async fn fetch_with_timeout(
    source: &DataSource,
    query: &QueryState,
    limit: Duration,
) -> Result<Vec<crate::data_table::Row>> {
    with_timeout(limit, "worklist fetch", source.fetch(query)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_table::{ColumnType, Row};
    use crate::services::block_on;
    use crate::state::WorklistLoadState;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(5);

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name", "name"),
            Column::new("status", "Status", "status"),
            Column::new("amount", "Amount", "amount").kind(ColumnType::Number),
        ]
    }

    fn row(name: &str, status: &str, amount: f64) -> Row {
        json!({"name": name, "status": status, "amount": amount})
            .as_object()
            .cloned()
            .expect("object")
    }

    fn rows() -> Vec<Row> {
        vec![
            row("John Doe", "Complete", 1250.50),
            row("Jane Smith", "Incomplete", 850.00),
            row("Bob Johnson", "Complete", 2100.75),
        ]
    }

    fn local_options() -> WorklistOptions {
        WorklistOptions {
            refetch_on_change: false,
            ..WorklistOptions::default()
        }
    }

    #[test]
    fn static_source_loads_and_renders() {
        let builder = DataSourceBuilder::new().rows(rows());
        let mut worklist =
            Worklist::from_builder(columns(), builder, WorklistOptions::default()).expect("worklist");
        worklist.refresh();
        worklist.wait_for_idle(WAIT).expect("idle");

        assert_eq!(worklist.state().load_state(), &WorklistLoadState::Ready);
        let text = worklist.render();
        assert!(text.starts_with("Name"));
        assert!(text.contains("Bob Johnson"));
        assert!(!text.contains("Page 1 of"));
    }

    #[test]
    fn missing_source_is_a_fatal_state() {
        let mut worklist =
            Worklist::from_builder(columns(), DataSourceBuilder::new(), WorklistOptions::default())
                .expect("constructed");
        assert!(worklist.state().load_state().is_fatal());
        assert_eq!(worklist.refresh(), None);
        assert!(worklist.render().starts_with("Error: Configuration error: No data source"));
        assert!(matches!(
            block_on(worklist.fetch_now()),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn refetch_mode_fetches_on_query_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = DataSource::delegating(move |query: QueryState| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                // Server-side search on name only
                let needle = query.global_search.to_lowercase();
                let matched: Vec<Row> = rows()
                    .into_iter()
                    .filter(|r| {
                        r["name"]
                            .as_str()
                            .is_some_and(|n| n.to_lowercase().contains(&needle))
                    })
                    .collect();
                Ok(matched)
            }
        });
        let mut worklist =
            Worklist::new(columns(), source, WorklistOptions::default()).expect("worklist");
        worklist.refresh();
        worklist.wait_for_idle(WAIT).expect("idle");
        assert_eq!(worklist.state().rows().len(), 3);

        assert!(worklist.set_search("john"));
        worklist.wait_for_idle(WAIT).expect("idle");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(worklist.state().rows().len(), 2);

        // Filters and sort refetch too, page moves do not
        worklist.set_filter("status", "complete");
        worklist.wait_for_idle(WAIT).expect("idle");
        worklist.toggle_sort("amount");
        worklist.wait_for_idle(WAIT).expect("idle");
        worklist.next_page();
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let page = worklist.state().visible_page();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.rows[0]["name"], "John Doe");
    }

    #[test]
    fn local_mode_reprocesses_cached_rows() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = DataSource::delegating(move |_query: QueryState| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(rows()) }
        });
        let mut worklist = Worklist::new(columns(), source, local_options()).expect("worklist");
        worklist.refresh();
        worklist.wait_for_idle(WAIT).expect("idle");

        worklist.set_filter("status", "Complete");
        worklist.toggle_sort("amount");
        worklist.toggle_sort("amount");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let amounts: Vec<f64> = worklist
            .state()
            .visible_page()
            .rows
            .iter()
            .filter_map(|r| r["amount"].as_f64())
            .collect();
        // "Incomplete" contains "complete"
        assert_eq!(amounts, [2100.75, 1250.50, 850.00]);
    }

    #[test]
    fn superseded_fetch_is_dropped() {
        let source = DataSource::delegating(|query: QueryState| async move {
            if query.global_search == "slow" {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(vec![row("Slow Result", "Complete", 1.0)])
            } else {
                Ok(rows())
            }
        });
        let mut worklist = Worklist::new(columns(), source, local_options()).expect("worklist");

        worklist.set_search("slow");
        let slow = worklist.refresh().expect("issued");
        worklist.set_search("");
        let fast = worklist.refresh().expect("issued");
        assert!(fast > slow);

        worklist.wait_for_idle(WAIT).expect("idle");
        std::thread::sleep(Duration::from_millis(600));
        assert_eq!(worklist.pump_events(), 0);
        assert_eq!(worklist.state().rows().len(), 3);
        assert_eq!(worklist.state().latest_seq(), fast);
    }

    #[test]
    fn slow_fetch_times_out() {
        let source = DataSource::delegating(|_query: QueryState| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(Vec::new())
        });
        let options = WorklistOptions {
            fetch_timeout: Duration::from_millis(50),
            ..WorklistOptions::default()
        };
        let mut worklist = Worklist::new(columns(), source, options).expect("worklist");
        worklist.refresh();
        worklist.wait_for_idle(WAIT).expect("idle");

        let message = worklist.state().load_state().error_message().map(str::to_string);
        assert!(message.is_some_and(|m| m.starts_with("Timeout:")));
        assert!(!worklist.state().load_state().is_fatal());
    }

    #[test]
    fn failed_fetch_then_recovery() {
        let fail = Arc::new(AtomicUsize::new(1));
        let remaining = fail.clone();
        let source = DataSource::delegating(move |_query: QueryState| {
            let should_fail = remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            async move {
                if should_fail {
                    Err(Error::Network {
                        status: Some(500),
                        message: "Internal Server Error".into(),
                    })
                } else {
                    Ok(rows())
                }
            }
        });
        let mut worklist = Worklist::new(columns(), source, WorklistOptions::default()).expect("worklist");

        block_on(worklist.fetch_now()).expect("fetch");
        assert_eq!(worklist.render(), "Error: API error: Internal Server Error");
        assert!(worklist.state().rows().is_empty());

        block_on(worklist.fetch_now()).expect("fetch");
        assert_eq!(worklist.state().load_state(), &WorklistLoadState::Ready);
        assert_eq!(worklist.state().rows().len(), 3);
    }

    #[test]
    fn pagination_line_appears_with_multiple_pages() {
        let many: Vec<Row> = (0..12).map(|i| row(&format!("Patient {i:02}"), "Complete", f64::from(i))).collect();
        let builder = DataSourceBuilder::new().rows(many);
        let mut worklist =
            Worklist::from_builder(columns(), builder, WorklistOptions::default()).expect("worklist");
        block_on(worklist.fetch_now()).expect("fetch");

        assert!(worklist.render().ends_with("Page 1 of 2 (12 total items)"));
        assert!(worklist.next_page());
        let text = worklist.render();
        assert!(text.contains("Patient 11"));
        assert!(text.ends_with("Page 2 of 2 (12 total items)"));
    }
}
