//! Command line interface
//!
//! - Argument parsing with clap
//! - Merging CLI overrides into file-based configuration
//! - Dispatch of the `serve` and `token` commands

pub mod config_merger;
pub mod executor;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};
