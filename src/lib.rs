//! Worklist Library
//!
//! A configuration-driven worklist table: field access, search and column
//! filters, typed ordering and pagination over rows supplied by a static,
//! delegating or remote data source. Also carries the patient segment score
//! and its result notification.

pub mod constants;
pub mod data_table;
pub mod domain;
pub mod error;
pub mod features;
pub mod helpers;
pub mod services;
pub mod state;
pub mod utils;
