//! Caller-supplied lifecycle hooks for the upload engine.

use crate::response::ServerResponse;
use crate::transport::{TransportError, TransportEvent};

/// The five lifecycle hooks, all optional (default to no-ops).
///
/// `on_done` fires exactly once per full-queue drain, with the most recent
/// server response, or `None` when the queue was already empty. Failures are
/// only ever reported here; the engine itself never raises.
pub trait UploadHooks {
    /// First byte of a unit's body is on the wire.
    fn on_start(&mut self, _event: &TransportEvent) {}

    /// Upload progress for the in-flight unit, as an integer percent 0–100.
    fn on_progress(&mut self, _percent: u8) {}

    /// The in-flight transfer was aborted via the transport's abort signal.
    fn on_abort(&mut self, _event: &TransportEvent) {}

    /// Transport-level failure (network error, non-2xx status).
    fn on_error(&mut self, _error: &TransportError) {}

    /// The queue drained to empty.
    fn on_done(&mut self, _last_response: Option<&ServerResponse>) {}
}

/// Hook set that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl UploadHooks for NoHooks {}
