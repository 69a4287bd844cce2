//! Command handlers: bridge CLI args -> core engine -> output formatting.

pub mod config_cmd;
pub mod diagnose;
pub mod history_cmd;
