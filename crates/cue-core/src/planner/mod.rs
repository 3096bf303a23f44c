//! Chunk planning: file + configuration → ordered sequence of transfer units.
//!
//! Splits an upload into bounded-size multipart units with the wire fields the
//! endpoint expects (`id`, `image` or `chunked`/`parts`/`part`/`chunk_<i>`).
//! Pure arithmetic over the file size; no I/O, no side effects.

mod plan;
mod unit;

pub use plan::plan_units;
pub use unit::{ChunkMeta, FieldValue, FormField, TransferUnit};
