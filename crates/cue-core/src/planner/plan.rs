//! Unit planning over a file and session configuration.

use super::unit::{ChunkMeta, TransferUnit};
use crate::config::UploadConfig;
use crate::source::UploadFile;

/// Plans the transfer units for one file.
///
/// Without a chunk-size threshold (or when the file fits under it) the whole
/// file goes out as a single `image` field. Otherwise the file is cut into
/// `ceil(size / threshold)` chunks whose boundaries advance by
/// `ceil(size / count)` with the final end clamped to the file size. The step
/// is deliberately re-derived from the ceiling rather than fixed per chunk;
/// the endpoint contract was written against these exact boundaries.
pub fn plan_units(file: &UploadFile, config: &UploadConfig) -> Vec<TransferUnit> {
    let size = file.len();

    let threshold = match config.chunk_size {
        Some(t) if t > 0 && size > t => t,
        _ => {
            let mut unit = TransferUnit::new(None);
            if let Some(id) = config.resource_id {
                unit.push_text("id", id.to_string());
            }
            unit.push_blob("image", file.slice(0, size), file.name().to_string());
            return vec![unit];
        }
    };

    let count = size.div_ceil(threshold);
    let step = size.div_ceil(count);

    let mut units = Vec::with_capacity(count as usize);
    let mut start = 0u64;
    let mut end = step;
    for i in 1..=count {
        let mut unit = TransferUnit::new(Some(ChunkMeta {
            parts: count as u32,
            part: i as u32,
        }));
        if let Some(id) = config.resource_id {
            unit.push_text("id", id.to_string());
        }
        unit.push_text("chunked", "1");
        unit.push_text("parts", count.to_string());
        unit.push_text("part", i.to_string());
        let field = format!("chunk_{}", i);
        unit.push_blob(field.clone(), file.slice(start, end), field);
        units.push(unit);

        start = end;
        end += step;
        if size < end {
            end = size;
        }
    }

    units
}
