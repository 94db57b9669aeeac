//! Command line interface for the design pipeline
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Many CLI options are documented with
//! examples to help users understand the expected format.

use crate::core::config_file::ConfigFile;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Pixel glyph design CLI arguments
///
/// Examples:
///   pixel-glyph-design build                    # Run every stage for every size
///   pixel-glyph-design classify --size 12       # Reclassify the 12px designs
///   pixel-glyph-design -c fonts/design.json verify
///   pixel-glyph-design -vv collect -s 10 -s 12  # Collect two sizes with debug logs
///   pixel-glyph-design --new-config             # Write an example pixel-design.json
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pixel-glyph-design",
    version,
    about = "Classify, verify and index pixel font design files",
    long_about = "Organizes per-glyph PNG design files into a canonical layout keyed by Unicode block, checks their size and padding against Unicode character properties, and builds the alphabet and per-locale design file map used to compile the font."
)]
pub struct CliArgs {
    /// Path to the pipeline configuration file
    ///
    /// Defaults to ./pixel-design.json, then to the user config directory.
    #[clap(
        long = "config",
        short = 'c',
        global = true,
        help = "Configuration file (JSON)",
        long_help = "Path to the pipeline configuration file. When omitted, ./pixel-design.json is used if it exists, otherwise settings.json in the user config directory (e.g. ~/.config/pixel-glyph-design/settings.json)."
    )]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    ///
    /// RUST_LOG takes precedence when it is set.
    #[clap(
        short = 'v',
        long = "verbose",
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Also write logs to the user log directory
    #[clap(
        long = "log-file",
        global = true,
        help = "Also write logs to a dated file in the user log directory",
        long_help = "Write a copy of all log output to <config dir>/pixel-glyph-design/logs/pixel-glyph-design-<date>.log in addition to stderr."
    )]
    pub log_file: bool,

    /// Write an example configuration file and exit
    ///
    /// The file is written to the --config path, or ./pixel-design.json.
    /// An existing file is never overwritten.
    #[clap(
        long = "new-config",
        help = "Write an example configuration file and exit",
        long_help = "Write an example configuration file to the --config path (or ./pixel-design.json) and exit. An existing file is left untouched."
    )]
    pub new_config: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Pipeline stage to run
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rebuild raw design trees into the canonical block layout
    Classify(SizeArgs),
    /// Check design geometry and padding, then normalize the PNG files
    Verify(SizeArgs),
    /// Build the alphabet and design file map and write them to the outputs dir
    Collect(SizeArgs),
    /// Run classify, verify and collect in order
    Build(SizeArgs),
}

impl Command {
    pub fn size_args(&self) -> &SizeArgs {
        match self {
            Command::Classify(args)
            | Command::Verify(args)
            | Command::Collect(args)
            | Command::Build(args) => args,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Classify(_) => "classify",
            Command::Verify(_) => "verify",
            Command::Collect(_) => "collect",
            Command::Build(_) => "build",
        }
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeArgs {
    /// Pixel sizes to process (repeatable); defaults to every configured size
    #[clap(long = "size", short = 's', value_name = "PX")]
    pub sizes: Vec<u32>,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures the config path exists before anything runs,
    /// providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if self.new_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err(
                "No command given\nUse one of: classify, verify, collect, build".to_string(),
            );
        }

        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(format!(
                    "Config file does not exist: {}\nRun with --new-config to create one.",
                    path.display()
                ));
            }
        }

        if let Some(command) = &self.command {
            if let Some(zero) = command.size_args().sizes.iter().find(|&&px| px == 0) {
                return Err(format!("Invalid pixel size: {zero}"));
            }
        }

        Ok(())
    }

    /// Sizes selected on the command line, checked against the config
    ///
    /// Without --size every configured size is processed, in config order.
    pub fn resolve_sizes(&self, config: &ConfigFile) -> Result<Vec<u32>, String> {
        let requested = self
            .command
            .as_ref()
            .map(|command| command.size_args().sizes.clone())
            .unwrap_or_default();

        if requested.is_empty() {
            return Ok(config.font_sizes.clone());
        }

        let mut sizes = Vec::with_capacity(requested.len());
        for px in requested {
            if !config.font_sizes.contains(&px) {
                let available: Vec<String> =
                    config.font_sizes.iter().map(|px| px.to_string()).collect();
                return Err(format!(
                    "Unknown pixel size: {px}\nConfigured sizes: {}",
                    available.join(", ")
                ));
            }
            if !sizes.contains(&px) {
                sizes.push(px);
            }
        }
        Ok(sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("pixel-glyph-design").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_build_with_sizes() {
        let args = parse(&["-vv", "build", "-s", "12", "--size", "16"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Some(Command::Build(SizeArgs {
                sizes: vec![12, 16]
            }))
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = parse(&["verify", "--config", "design.json", "-v"]);
        assert_eq!(args.config, Some(PathBuf::from("design.json")));
        assert_eq!(args.verbose, 1);
        assert_eq!(args.command.as_ref().map(Command::name), Some("verify"));
    }

    #[test]
    fn test_validate_requires_command() {
        let args = parse(&[]);
        assert!(args.validate().is_err());

        let args = parse(&["--new-config"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_config_and_zero_size() {
        let args = parse(&["-c", "/definitely/not/here.json", "collect"]);
        assert!(args.validate().unwrap_err().contains("does not exist"));

        let args = parse(&["collect", "-s", "0"]);
        assert!(args.validate().unwrap_err().contains("Invalid pixel size"));
    }

    #[test]
    fn test_resolve_sizes() {
        let mut config = ConfigFile::example();
        config.font_sizes = vec![10, 12, 16];

        assert_eq!(parse(&["build"]).resolve_sizes(&config), Ok(vec![10, 12, 16]));
        assert_eq!(
            parse(&["build", "-s", "16", "-s", "12", "-s", "16"]).resolve_sizes(&config),
            Ok(vec![16, 12])
        );
        assert!(parse(&["build", "-s", "11"])
            .resolve_sizes(&config)
            .unwrap_err()
            .contains("10, 12, 16"));
    }
}
