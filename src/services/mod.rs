//! Service Layer
//!
//! Async plumbing behind the worklist: the shared tokio runtime, the HTTP
//! data source, the outbound result notifier and the events that carry fetch
//! completions back to the state owner.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    tokio runtime                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────┐  │
//! │  │ RemoteSource │  │ EmailNotifier│  │ with_timeout   │  │
//! │  │  (rows GET)  │  │ (results)    │  │ (every fetch)  │  │
//! │  └──────────────┘  └──────────────┘  └────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ WorklistEvent
//! ┌──────────────────────────────────────────────────────────┐
//! │                      State Layer                          │
//! │                   (WorklistState)                         │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod events;
mod notifier;
mod remote_source;
mod runtime;

pub use events::*;
pub use notifier::*;
pub use remote_source::*;
pub use runtime::*;
