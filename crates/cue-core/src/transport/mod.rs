//! Transport seam: one multipart POST per transfer unit.
//!
//! The engine drives a [`Transport`] and never touches HTTP directly, so the
//! drain loop can be exercised against a scripted transport in tests. The
//! production implementation is [`CurlTransport`].

mod curl;

pub use self::curl::CurlTransport;

use crate::planner::TransferUnit;
use std::collections::HashMap;
use thiserror::Error;

/// Signals emitted while a unit's body streams out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// First progress callback for this transfer.
    Started,
    /// Upload progress; only emitted when the total body size is known.
    Progress { sent: u64, total: u64 },
    /// The transfer was aborted before completion.
    Aborted,
}

/// Terminal response of a completed 2xx exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: String,
}

/// Transport-level failure: anything short of a 2xx response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Curl(#[from] ::curl::Error),
    #[error("multipart form: {0}")]
    Form(#[from] ::curl::FormError),
    #[error("HTTP {status}")]
    Http { status: u32 },
    #[error("transfer aborted")]
    Aborted,
}

/// One blocking request/response round-trip for a single unit.
///
/// Implementations emit [`TransportEvent`]s through `events` while the body
/// streams, and resolve with the terminal response or a transport failure.
/// Non-2xx statuses are failures ([`TransportError::Http`]).
pub trait Transport {
    fn send(
        &mut self,
        unit: &TransferUnit,
        headers: &HashMap<String, String>,
        url: &str,
        events: &mut dyn FnMut(TransportEvent),
    ) -> Result<HttpResponse, TransportError>;
}
