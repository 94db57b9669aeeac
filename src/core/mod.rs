//! Core application functionality
//!
//! This module contains the application tier around the design library:
//! - CLI parsing and validation
//! - The JSON configuration file
//! - Stage orchestration and output artifacts

pub mod artifacts;
pub mod cli;
pub mod config_file;
pub mod pipeline;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::{CliArgs, Command};
pub use config_file::ConfigFile;
pub use pipeline::Pipeline;
pub use runner::run_app;
