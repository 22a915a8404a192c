pub mod attendance;
pub mod config;
pub mod import;
pub mod log;
pub mod report;
pub mod stats;
pub mod sweep;
