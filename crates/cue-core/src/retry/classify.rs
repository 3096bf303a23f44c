//! Map transport failures onto retry error kinds.

use super::policy::ErrorKind;
use crate::transport::TransportError;

/// Classify a transport failure. Aborts and form-building failures are
/// deliberate or deterministic, so they land in `Other` (no retry).
pub fn classify(error: &TransportError) -> ErrorKind {
    match error {
        TransportError::Curl(e) => classify_curl(e),
        TransportError::Http { status } => classify_status(*status),
        TransportError::Form(_) | TransportError::Aborted => ErrorKind::Other,
    }
}

fn classify_curl(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

fn classify_status(status: u32) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(status as u16),
        _ => ErrorKind::Other,
    }
}
