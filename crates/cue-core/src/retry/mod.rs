//! Caller-driven retry around the drain loop.
//!
//! The engine itself never retries: a failed drain leaves the queue intact and
//! waits for the caller to invoke `start()` again. This module packages that
//! conscious re-invocation with error classification and exponential backoff,
//! for callers (like the CLI) that want transient transport failures smoothed
//! over. Server rejections and aborts are never retried here.

mod classify;
mod policy;
mod run;

pub use classify::classify;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::drain_with_retry;
