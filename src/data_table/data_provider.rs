//! Data Source Adapter
//!
//! Pluggable asynchronous row suppliers. Every variant answers the same
//! question: given filters, sort and search, which rows match? Results are
//! never paginated here; the pipeline pages them on the client side.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::accessor::Row;
use super::column::{Column, ColumnType};
use super::pipeline::filter_and_sort;
use super::query::QueryState;
use crate::error::{Error, Result};
use crate::services::RemoteSource;

/// Future returned by a caller-supplied fetch function
pub type FetchFuture = BoxFuture<'static, Result<Vec<Row>>>;

/// Caller-supplied asynchronous fetch function
pub type FetchFn = Arc<dyn Fn(QueryState) -> FetchFuture + Send + Sync>;

/// Data source for the worklist, one variant per backing store
#[derive(Clone)]
pub enum DataSource {
    /// Fixed in-memory rows, filtered and sorted on every call
    Static(StaticSource),
    /// Forwards the call to a caller-supplied function
    Delegating(FetchFn),
    /// HTTP GET against a configured endpoint
    Remote(RemoteSource),
}

impl DataSource {
    /// Wrap a caller-supplied async function
    pub fn delegating<F, Fut>(fetch: F) -> Self
    where
        F: Fn(QueryState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Row>>> + Send + 'static,
    {
        DataSource::Delegating(Arc::new(move |query| -> FetchFuture {
            Box::pin(fetch(query))
        }))
    }

    /// Fetch the full matching collection
    pub async fn fetch(&self, query: &QueryState) -> Result<Vec<Row>> {
        match self {
            DataSource::Static(source) => Ok(source.fetch(query)),
            DataSource::Delegating(fetch) => fetch(query.clone()).await,
            DataSource::Remote(source) => source.fetch(query).await,
        }
    }

    /// Variant name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Static(_) => "static",
            DataSource::Delegating(_) => "delegating",
            DataSource::Remote(_) => "remote",
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Static(source) => f.debug_tuple("Static").field(source).finish(),
            DataSource::Delegating(_) => f.write_str("Delegating(..)"),
            DataSource::Remote(source) => f.debug_tuple("Remote").field(source).finish(),
        }
    }
}

/// Simple in-memory data source
#[derive(Clone)]
pub struct StaticSource {
    rows: Arc<Vec<Row>>,
    fields: Arc<[Column]>,
}

impl StaticSource {
    /// Rows searched through a key → path mapping. Mapped fields sort
    /// numerically when both values are numbers, lexically otherwise.
    pub fn new<K, P>(rows: Vec<Row>, mappings: impl IntoIterator<Item = (K, P)>) -> Self
    where
        K: Into<Arc<str>>,
        P: Into<Arc<str>>,
    {
        let fields: Vec<Column> = mappings
            .into_iter()
            .map(|(key, path)| {
                let key: Arc<str> = key.into();
                Column::new(key.clone(), key, path).kind(ColumnType::Auto)
            })
            .collect();
        Self {
            rows: Arc::new(rows),
            fields: fields.into(),
        }
    }

    /// Rows searched through the table's own column definitions
    pub fn from_columns(rows: Vec<Row>, columns: &[Column]) -> Self {
        Self {
            rows: Arc::new(rows),
            fields: columns.to_vec().into(),
        }
    }

    /// Filter and sort a copy of the rows
    pub fn fetch(&self, query: &QueryState) -> Vec<Row> {
        filter_and_sort(&self.rows, &self.fields, query)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field("rows", &self.rows.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Picks a data source variant from whichever input is present.
///
/// Precedence: static rows, then fetch function, then endpoint.
#[derive(Default)]
pub struct DataSourceBuilder {
    rows: Option<Vec<Row>>,
    mappings: Vec<(Arc<str>, Arc<str>)>,
    fetch: Option<FetchFn>,
    endpoint: Option<String>,
}

impl DataSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn mapping(mut self, key: impl Into<Arc<str>>, path: impl Into<Arc<str>>) -> Self {
        self.mappings.push((key.into(), path.into()));
        self
    }

    pub fn fetch_fn(mut self, fetch: FetchFn) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the data source; fails when nothing was configured.
    ///
    /// Static rows without explicit mappings search through `columns`.
    pub fn build(self, columns: &[Column], timeout: std::time::Duration) -> Result<DataSource> {
        if let Some(rows) = self.rows {
            let source = if self.mappings.is_empty() {
                StaticSource::from_columns(rows, columns)
            } else {
                StaticSource::new(rows, self.mappings)
            };
            return Ok(DataSource::Static(source));
        }
        if let Some(fetch) = self.fetch {
            return Ok(DataSource::Delegating(fetch));
        }
        if let Some(endpoint) = self.endpoint {
            return Ok(DataSource::Remote(RemoteSource::new(&endpoint, timeout)?));
        }
        Err(Error::Configuration {
            message: "No data source configured. Provide rows, a fetch function, or an endpoint."
                .to_string(),
        })
    }
}
