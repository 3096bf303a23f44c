//! `cue plan <file>` – show the transfer plan without uploading.

use anyhow::Result;
use cue_core::config::CueConfig;
use cue_core::planner::{plan_units, FieldValue};
use cue_core::source::UploadFile;
use std::path::Path;

pub fn run_plan(
    cfg: &CueConfig,
    path: &Path,
    chunk_size: Option<u64>,
    id: Option<i64>,
) -> Result<()> {
    let file = UploadFile::from_path(path)?;

    // The endpoint URL is not consulted when planning.
    let mut config = cfg.session("");
    config.resource_id = id;
    if chunk_size.is_some() {
        config.chunk_size = chunk_size;
    }

    let units = plan_units(&file, &config);
    println!(
        "{}: {} bytes, {} unit(s)",
        file.name(),
        file.len(),
        units.len()
    );
    for unit in &units {
        for field in unit.fields() {
            match &field.value {
                FieldValue::Blob { data, filename } => {
                    let (start, end) = data.range();
                    println!(
                        "  {:<10} [{}..{})  {} bytes  filename={}",
                        field.name,
                        start,
                        end,
                        data.len(),
                        filename
                    );
                }
                FieldValue::Text(value) => {
                    println!("  {:<10} {}", field.name, value);
                }
            }
        }
    }
    Ok(())
}
