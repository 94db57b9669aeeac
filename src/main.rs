//! Classify, verify and index pixel font design files.

use pixel_glyph_design::{core, logging};

fn main() {
    let cli_args = core::platform::get_cli_args();

    let guard = match logging::init(cli_args.verbose, cli_args.log_file) {
        Ok(guard) => guard,
        Err(error) => core::platform::handle_error(error),
    };

    let result = core::run_app(cli_args);
    // Flush the log file before a possible exit
    drop(guard);
    if let Err(error) = result {
        core::platform::handle_error(error);
    }
}
