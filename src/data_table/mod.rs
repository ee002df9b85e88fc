//! DataTable
//!
//! A reusable worklist table: field access, matching, ordering, pagination
//! and pluggable data sources.
//!
//! ```text
//! rows ──▶ global search ──▶ column filters ──▶ stable sort ──▶ page slice
//!            (matcher)          (matcher)       (comparator)   (pagination)
//! ```

pub mod accessor;
pub mod column;
pub mod comparator;
pub mod data_provider;
pub mod data_table;
pub mod matcher;
pub mod pagination;
pub mod pipeline;
pub mod query;

pub use accessor::{get_path, Row};
pub use column::{CellFormatter, Column, ColumnType, ColumnWidth};
pub use data_provider::{DataSource, DataSourceBuilder, FetchFn, StaticSource};
pub use data_table::DataTable;
pub use pagination::{PageRequest, Pagination};
pub use pipeline::{run, QueryPage};
pub use query::{Filters, QueryState, SortDirection, SortState};
