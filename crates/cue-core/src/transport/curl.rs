//! Blocking curl transport: multipart POST with upload progress and abort.

use super::{HttpResponse, Transport, TransportError, TransportEvent};
use crate::planner::{FieldValue, TransferUnit};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
// Abort if throughput drops below 1 KiB/s for 60s; hard cap so a completely
// stuck transfer eventually fails.
const LOW_SPEED_FLOOR: u32 = 1024;
const LOW_SPEED_WINDOW: Duration = Duration::from_secs(60);
const HARD_TIMEOUT: Duration = Duration::from_secs(3600);

/// Sends one transfer unit per `POST` via `curl::easy`.
///
/// An optional shared abort token lets another part of the program (signal
/// handler, UI) stop the in-flight transfer: the progress callback checks the
/// token and cancels the request, which surfaces as [`TransportError::Aborted`]
/// after an `Aborted` event.
pub struct CurlTransport {
    abort: Option<Arc<AtomicBool>>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self { abort: None }
    }

    pub fn with_abort_token(token: Arc<AtomicBool>) -> Self {
        Self { abort: Some(token) }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for CurlTransport {
    fn send(
        &mut self,
        unit: &TransferUnit,
        headers: &HashMap<String, String>,
        url: &str,
        events: &mut dyn FnMut(TransportEvent),
    ) -> Result<HttpResponse, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.connect_timeout(CONNECT_TIMEOUT)?;
        easy.low_speed_limit(LOW_SPEED_FLOOR)?;
        easy.low_speed_time(LOW_SPEED_WINDOW)?;
        easy.timeout(HARD_TIMEOUT)?;

        let mut form = curl::easy::Form::new();
        for field in unit.fields() {
            let mut part = form.part(&field.name);
            match &field.value {
                FieldValue::Text(value) => {
                    part.contents(value.as_bytes());
                }
                // libcurl wants an owned buffer for in-memory file parts; this
                // is the one copy of the chunk bytes on the upload path.
                FieldValue::Blob { data, filename } => {
                    part.buffer(filename, data.bytes().to_vec());
                }
            }
            part.add()?;
        }
        easy.httppost(form)?;

        if !headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (name, value) in headers {
                list.append(&format!("{}: {}", name.trim(), value.trim()))?;
            }
            easy.http_headers(list)?;
        }

        easy.progress(true)?;

        let abort = self.abort.clone();
        let mut body: Vec<u8> = Vec::new();
        let mut started = false;
        let mut aborted = false;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.progress_function(|_dl_total, _dl_now, ul_total, ul_now| {
                if let Some(token) = &abort {
                    if token.load(Ordering::Relaxed) {
                        aborted = true;
                        events(TransportEvent::Aborted);
                        return false;
                    }
                }
                if !started {
                    started = true;
                    events(TransportEvent::Started);
                }
                if ul_total > 0.0 {
                    events(TransportEvent::Progress {
                        sent: ul_now as u64,
                        total: ul_total as u64,
                    });
                }
                true
            })?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if aborted || e.is_aborted_by_callback() {
                return Err(TransportError::Aborted);
            }
            return Err(TransportError::Curl(e));
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(TransportError::Http { status });
        }

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}
