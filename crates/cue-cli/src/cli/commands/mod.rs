//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod plan;
mod send;

pub use checksum::run_checksum;
pub use plan::run_plan;
pub use send::{run_send, SendOptions};
