//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use multimime_core::REGISTRY_PATH_ENV;

use crate::commands::Commands;

/// Command-line interface for checking uploads against a multi-MIME registry.
#[derive(Parser)]
#[command(name = "multimime")]
#[command(about = "Check file uploads against extensions that accept several MIME types")]
#[command(version)]
pub struct Cli {
    /// Registry file (JSON) with additional MIME types per extension
    #[arg(long = "registry", global = true, env = REGISTRY_PATH_ENV)]
    pub registry: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "multimime",
            "--verbose",
            "--registry",
            "/tmp/mimes.json",
            "table",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/mimes.json")));
        assert!(matches!(cli.command, Some(Commands::Table { .. })));
    }
}
