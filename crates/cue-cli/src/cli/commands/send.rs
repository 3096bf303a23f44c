//! `cue send <file>` – upload a file, chunked when above the threshold.

use anyhow::{bail, Context, Result};
use cue_core::checksum;
use cue_core::config::CueConfig;
use cue_core::engine::{DrainStatus, UploadEngine};
use cue_core::hooks::UploadHooks;
use cue_core::response::ServerResponse;
use cue_core::retry::{drain_with_retry, RetryPolicy};
use cue_core::source::UploadFile;
use cue_core::transport::{CurlTransport, TransportError, TransportEvent};
use std::io::Write;
use std::path::Path;

/// Per-invocation settings for `cue send`.
#[derive(Debug)]
pub struct SendOptions {
    pub file: String,
    pub url: String,
    pub id: Option<i64>,
    pub chunk_size: Option<u64>,
    /// Raw "Name: value" header specs from the command line.
    pub headers: Vec<String>,
    pub retry: bool,
    pub checksum: bool,
}

/// Hooks that report progress on stderr and the final payload on stdout.
#[derive(Default)]
struct ConsoleHooks {
    part: u32,
    line_open: bool,
}

impl ConsoleHooks {
    fn close_line(&mut self) {
        if self.line_open {
            eprintln!();
            self.line_open = false;
        }
    }
}

impl UploadHooks for ConsoleHooks {
    fn on_start(&mut self, _event: &TransportEvent) {
        self.part += 1;
    }

    fn on_progress(&mut self, percent: u8) {
        eprint!("\rpart {}: {:3}%", self.part, percent);
        let _ = std::io::stderr().flush();
        self.line_open = true;
    }

    fn on_abort(&mut self, _event: &TransportEvent) {
        self.close_line();
        eprintln!("upload aborted");
    }

    fn on_error(&mut self, error: &TransportError) {
        self.close_line();
        tracing::error!(%error, "transfer failed");
    }

    fn on_done(&mut self, last_response: Option<&ServerResponse>) {
        self.close_line();
        match last_response {
            Some(response) => println!("{}", response.payload),
            None => eprintln!("nothing to upload"),
        }
    }
}

pub fn run_send(cfg: &CueConfig, opts: SendOptions) -> Result<()> {
    let path = Path::new(&opts.file);
    let file = UploadFile::from_path(path)?;

    if opts.checksum {
        let digest = checksum::sha256_bytes(file.data());
        eprintln!("sha256: {}  {}", digest, path.display());
    }

    let mut config = cfg.session(opts.url.as_str());
    config.resource_id = opts.id;
    if opts.chunk_size.is_some() {
        config.chunk_size = opts.chunk_size;
    }
    for spec in &opts.headers {
        let (name, value) = spec
            .split_once(':')
            .with_context(|| format!("malformed header {:?}, expected \"Name: value\"", spec))?;
        config
            .headers
            .insert(name.trim().to_string(), value.trim().to_string());
    }
    config.validate()?;

    let mut engine = UploadEngine::new(CurlTransport::new());
    engine.init(config, Box::new(ConsoleHooks::default()));
    let queued = engine.enqueue(&file);
    eprintln!("{}: {} bytes in {} part(s)", file.name(), file.len(), queued);

    let status = if opts.retry {
        let retry_cfg = cfg.retry.clone().unwrap_or_default();
        drain_with_retry(&RetryPolicy::from_config(&retry_cfg), &mut engine)
    } else {
        engine.start()
    };

    match status {
        DrainStatus::Drained => Ok(()),
        DrainStatus::ServerRejected(message) => bail!(
            "server rejected upload: {}",
            message.as_deref().unwrap_or("no message")
        ),
        DrainStatus::TransportFailed(error) => {
            Err(anyhow::Error::new(error)).context("upload transport failed")
        }
        DrainStatus::Aborted => bail!("upload aborted"),
        DrainStatus::Busy => bail!("engine is already draining"),
        DrainStatus::NotConfigured => bail!("engine not configured"),
    }
}
