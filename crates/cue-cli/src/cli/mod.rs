//! CLI for the CUE multipart uploader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cue_core::config;
use std::path::Path;

use commands::{run_checksum, run_plan, run_send, SendOptions};

/// Top-level CLI for the CUE multipart uploader.
#[derive(Debug, Parser)]
#[command(name = "cue")]
#[command(about = "CUE: chunked multipart file uploader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a file to an endpoint, chunking it when it exceeds the threshold.
    Send {
        /// Path to the file to upload.
        file: String,

        /// Endpoint URL receiving the multipart POSTs.
        #[arg(long)]
        url: String,

        /// Resource identifier sent as the `id` form field.
        #[arg(long)]
        id: Option<i64>,

        /// Chunk-size threshold in bytes; files larger than this are split.
        /// Overrides the config file default.
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<u64>,

        /// Extra request header as "Name: value". Repeatable.
        #[arg(long, value_name = "HEADER")]
        header: Vec<String>,

        /// Retry transport failures with exponential backoff.
        #[arg(long)]
        retry: bool,

        /// Print the SHA-256 of the file before uploading.
        #[arg(long)]
        checksum: bool,
    },

    /// Show the transfer plan for a file without uploading anything.
    Plan {
        /// Path to the file to plan for.
        file: String,

        /// Chunk-size threshold in bytes. Overrides the config file default.
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<u64>,

        /// Resource identifier that would be sent as the `id` form field.
        #[arg(long)]
        id: Option<i64>,
    },

    /// Compute SHA-256 of a file (e.g. to verify server-side reassembly).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Send {
                file,
                url,
                id,
                chunk_size,
                header,
                retry,
                checksum,
            } => run_send(
                &cfg,
                SendOptions {
                    file,
                    url,
                    id,
                    chunk_size,
                    headers: header,
                    retry,
                    checksum,
                },
            )?,
            CliCommand::Plan {
                file,
                chunk_size,
                id,
            } => run_plan(&cfg, Path::new(&file), chunk_size, id)?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
        }

        Ok(())
    }
}
