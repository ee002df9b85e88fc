//! State
//!
//! Interactive worklist state, mutated only by its owner.

pub mod worklist_state;

pub use worklist_state::{WorklistLoadState, WorklistState};
