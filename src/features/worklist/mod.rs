//! Worklist Feature
//!
//! The interactive worklist controller and the demo order data.

mod controller;
pub mod mock;

pub use controller::*;
