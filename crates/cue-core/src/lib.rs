pub mod config;
pub mod logging;

pub mod checksum;
pub mod engine;
pub mod hooks;
pub mod planner;
pub mod queue;
pub mod response;
pub mod retry;
pub mod source;
pub mod transport;
