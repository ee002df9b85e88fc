//! Service Events
//!
//! Events emitted by background tasks and drained by the worklist owner.

use crate::data_table::Row;
use crate::error::Result;

/// Sequence number of an issued fetch. Later fetches carry larger numbers.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FetchSeq(pub u64);

impl FetchSeq {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for FetchSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events delivered from the runtime to the worklist owner
#[derive(Debug)]
pub enum WorklistEvent {
    /// A data source fetch finished (successfully or not)
    FetchCompleted {
        seq: FetchSeq,
        result: Result<Vec<Row>>,
    },
}

impl WorklistEvent {
    pub fn seq(&self) -> FetchSeq {
        match self {
            WorklistEvent::FetchCompleted { seq, .. } => *seq,
        }
    }
}
