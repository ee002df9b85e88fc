//! Domain - Pure Data Structures
//!
//! Configuration, clinical form statuses, segment scoring and the user
//! profile. Nothing here touches the async runtime.

pub mod config;
pub mod form_status;
pub mod segment;
pub mod user;
