//! Upload engine: sequential queue drainer.
//!
//! Owns the pending unit queue and drives one transport call at a time,
//! advancing only on a unit's confirmed success. Transport events are
//! translated into the caller's lifecycle hooks; failures stop the loop with
//! the queue intact so a later `start()` re-attempts the same head unit.
//! The engine never panics and never returns `Err` — every outcome is a
//! [`DrainStatus`] plus hook calls.

use crate::config::UploadConfig;
use crate::hooks::{NoHooks, UploadHooks};
use crate::planner::plan_units;
use crate::queue::UploadQueue;
use crate::response::{decode_body, ServerResponse};
use crate::source::UploadFile;
use crate::transport::{Transport, TransportError, TransportEvent};

/// Terminal state of one `start()` call.
#[derive(Debug)]
pub enum DrainStatus {
    /// Queue drained to empty; `on_done` has fired.
    Drained,
    /// The server reported failure for the head unit; it stays queued.
    ServerRejected(Option<String>),
    /// Transport-level failure; `on_error` has fired, head unit stays queued.
    TransportFailed(TransportError),
    /// The in-flight transfer was aborted; head unit stays queued.
    Aborted,
    /// A drain was already running; nothing was done.
    Busy,
    /// `init()` has not been called yet; nothing was done.
    NotConfigured,
}

/// Stateful upload engine over a [`Transport`].
pub struct UploadEngine<T: Transport> {
    transport: T,
    config: Option<UploadConfig>,
    hooks: Box<dyn UploadHooks>,
    queue: UploadQueue,
    in_flight: bool,
}

impl<T: Transport> UploadEngine<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: None,
            hooks: Box::new(NoHooks),
            queue: UploadQueue::new(),
            in_flight: false,
        }
    }

    /// Install the session configuration and hook set, replacing any previous
    /// ones wholesale. Queued units are kept.
    pub fn init(&mut self, config: UploadConfig, hooks: Box<dyn UploadHooks>) {
        self.config = Some(config);
        self.hooks = hooks;
    }

    pub fn config(&self) -> Option<&UploadConfig> {
        self.config.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    /// Plans the file into units and appends them to the queue; returns how
    /// many were added. With `auto_start` configured, drains immediately.
    pub fn enqueue(&mut self, file: &UploadFile) -> usize {
        let Some(config) = &self.config else {
            tracing::warn!(file = file.name(), "enqueue before init(); nothing queued");
            return 0;
        };
        let units = plan_units(file, config);
        let added = units.len();
        let auto_start = config.auto_start;
        self.queue.extend(units);
        tracing::debug!(file = file.name(), units = added, "queued transfer units");
        if auto_start {
            let status = self.start();
            tracing::debug!(?status, "auto-start drain finished");
        }
        added
    }

    /// Drains the queue: one transport call per unit, strictly FIFO, stopping
    /// on the first non-success outcome. An empty queue fires `on_done` with
    /// the last carried response (`None` on a fresh call) — the sole
    /// terminal-success signal.
    pub fn start(&mut self) -> DrainStatus {
        // Single-outstanding-transfer invariant, made explicit.
        if self.in_flight {
            tracing::warn!("start() while a transfer is in flight; rejected");
            return DrainStatus::Busy;
        }
        self.in_flight = true;
        let status = self.drain();
        self.in_flight = false;
        status
    }

    fn drain(&mut self) -> DrainStatus {
        let mut last: Option<ServerResponse> = None;
        loop {
            if self.queue.is_empty() {
                self.hooks.on_done(last.as_ref());
                return DrainStatus::Drained;
            }
            let (url, headers) = match &self.config {
                Some(config) => (config.url.clone(), config.headers.clone()),
                None => {
                    tracing::warn!("start() before init(); queue left untouched");
                    return DrainStatus::NotConfigured;
                }
            };

            let mut aborted = false;
            let result = {
                let Self {
                    transport,
                    queue,
                    hooks,
                    ..
                } = self;
                let unit = match queue.front() {
                    Some(unit) => unit,
                    None => continue,
                };
                transport.send(unit, &headers, &url, &mut |event| match event {
                    TransportEvent::Started => hooks.on_start(&event),
                    TransportEvent::Progress { sent, total } => {
                        hooks.on_progress(percent(sent, total));
                    }
                    TransportEvent::Aborted => {
                        aborted = true;
                        hooks.on_abort(&event);
                    }
                })
            };

            match result {
                Ok(response) => {
                    let outcome = decode_body(&response.body);
                    if outcome.success {
                        self.queue.pop_front();
                        last = Some(outcome);
                    } else {
                        tracing::error!(
                            message = outcome.message.as_deref().unwrap_or("no message"),
                            "server rejected transfer unit; halting drain"
                        );
                        return DrainStatus::ServerRejected(outcome.message);
                    }
                }
                Err(TransportError::Aborted) => {
                    // Transports that cut the connection without emitting the
                    // event still owe the caller an abort notification.
                    if !aborted {
                        self.hooks.on_abort(&TransportEvent::Aborted);
                    }
                    return DrainStatus::Aborted;
                }
                Err(error) => {
                    self.hooks.on_error(&error);
                    return DrainStatus::TransportFailed(error);
                }
            }
        }
    }

    /// Removes one queued unit by position; the optional callback runs whether
    /// or not anything was removed. Returns whether a unit was removed.
    pub fn remove(&mut self, index: usize, callback: Option<Box<dyn FnOnce()>>) -> bool {
        let removed = self.queue.remove(index).is_some();
        if let Some(callback) = callback {
            callback();
        }
        removed
    }

    /// Clears the queue unconditionally.
    pub fn remove_all(&mut self) {
        self.queue.clear();
    }

    /// Current queue length.
    pub fn count(&self) -> usize {
        self.queue.len()
    }

    /// Appends extra text fields to every queued unit (no-op when empty).
    pub fn add_fields_to_all(&mut self, fields: &[(String, String)]) {
        self.queue.add_fields_to_all(fields);
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (((sent as f64 / total as f64) * 100.0).round() as u64).min(100) as u8
}
