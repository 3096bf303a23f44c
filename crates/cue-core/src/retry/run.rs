//! Retry loop: re-invoke the engine's drain until success or policy stop.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::engine::{DrainStatus, UploadEngine};
use crate::transport::Transport;

/// Drives `engine.start()` until the queue drains, a non-retryable outcome
/// occurs, or the policy gives up. Only transport-level failures are retried;
/// server rejections, aborts, and a busy engine are returned to the caller
/// untouched. Backoff sleeps between attempts.
pub fn drain_with_retry<T: Transport>(
    policy: &RetryPolicy,
    engine: &mut UploadEngine<T>,
) -> DrainStatus {
    let mut attempt = 1u32;
    loop {
        let status = engine.start();
        let kind = match &status {
            DrainStatus::TransportFailed(error) => classify(error),
            _ => return status,
        };
        match policy.decide(attempt, kind) {
            RetryDecision::NoRetry => return status,
            RetryDecision::RetryAfter(delay) => {
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transport failure; retrying drain"
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}
