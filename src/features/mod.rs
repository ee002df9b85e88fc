//! Features - Vertical Feature Slices
//!
//! Each feature contains its controller and demo data.

pub mod worklist;
