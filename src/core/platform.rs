//! Process-level argument parsing and error reporting

use crate::core::cli::CliArgs;

/// Handle application errors.
///
/// Prints the full context chain to stderr and exits with code 1
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("Error: {error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate command line arguments.
///
/// Invalid arguments are reported the way clap reports its own errors
pub fn get_cli_args() -> CliArgs {
    use clap::{CommandFactory, Parser};

    let cli_args = CliArgs::parse();
    if let Err(message) = cli_args.validate() {
        CliArgs::command()
            .error(clap::error::ErrorKind::ValueValidation, message)
            .exit();
    }
    cli_args
}
