//! Input/output operations, configuration and error handling

/// Command-line interface definitions and subcommand dispatch
pub mod cli;
/// Constants and model configuration
pub mod configuration;
/// Error types and result aliases
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Dataset scan progress display
pub mod progress;
