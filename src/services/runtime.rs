//! Tokio Runtime Bridge
//!
//! Data source fetches run on one shared multi-thread runtime so that the
//! worklist owner can stay synchronous and drain completions at its own pace.
//!
//! ```text
//! Worklist::refresh()
//!       │
//!       ▼
//! spawn_named_in_tokio("worklist-fetch", async { source.fetch(..) })
//!       │
//!       ▼
//! crossbeam channel ──▶ Worklist::pump_events()
//! ```

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::error::{Error, Result};

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .thread_name("worklist-io")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Spawn a detached task with a name (for debugging)
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    get_runtime().spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    });
}

/// Block on a future synchronously (binary entry point and blocking callers)
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}

/// Bound a future by `limit`; elapsed time becomes [`Error::Timeout`]
pub async fn with_timeout<F, T>(limit: Duration, what: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            message: format!("{what} did not finish within {}s", limit.as_secs_f64()),
        }),
    }
}
