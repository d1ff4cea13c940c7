//! Two-tier resolution shared by the trend and content pipelines.
//!
//! A remote outcome is used when it succeeded and produced something usable;
//! otherwise a deterministic local substitute takes its place. Every
//! substitution is logged at `warn` with what was replaced and why, which is
//! the only externally visible difference between real and synthetic output.

use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Resolve an already-completed remote outcome.
///
/// * `what` - label used in the log line (`"related queries"`, `"article"`, ...)
/// * `outcome` - result of the remote call
/// * `is_empty` - decides whether a successful value is unusable
/// * `fallback` - builds the substitute; only called when needed
pub fn settle<T, E, P, F>(what: &str, outcome: Result<T, E>, is_empty: P, fallback: F) -> T
where
    E: Display,
    P: FnOnce(&T) -> bool,
    F: FnOnce() -> T,
{
    match outcome {
        Ok(value) if !is_empty(&value) => value,
        Ok(_) => {
            warn!(what, reason = "empty result", "Using fallback");
            fallback()
        }
        Err(e) => {
            warn!(what, reason = %e, "Using fallback");
            fallback()
        }
    }
}

/// Await `remote` and resolve it with [`settle`].
pub async fn attempt<T, E, Fut, P, F>(what: &str, remote: Fut, is_empty: P, fallback: F) -> T
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
    P: FnOnce(&T) -> bool,
    F: FnOnce() -> T,
{
    settle(what, remote.await, is_empty, fallback)
}
