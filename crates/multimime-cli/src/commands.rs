//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::Subcommand;

use crate::registry_commands::RegistryCommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a file through the upload type check
    Check {
        /// File whose contents are sniffed
        file: PathBuf,
        /// Filename to evaluate instead of the file's own name
        #[arg(long)]
        name: Option<String>,
        /// Use this sniffed MIME type instead of inspecting the contents
        #[arg(long)]
        sniffed: Option<String>,
        /// Actor the registry is asked for
        #[arg(short, long)]
        actor: Option<String>,
        /// Explicit allow-list entry replacing the default table (EXT=MIME, repeatable)
        #[arg(long = "allow", value_parser = parse_allow_entry)]
        allow: Vec<(String, String)>,
        /// Behave as if content sniffing were unavailable
        #[arg(long)]
        no_sniff: bool,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the upload allow-list with primary MIME types applied
    Table {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the additional MIME registry
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },
}

/// Parse an `EXT=MIME` allow-list entry.
pub fn parse_allow_entry(raw: &str) -> Result<(String, String), String> {
    let (ext, mime) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected EXT=MIME, got '{raw}'"))?;
    let (ext, mime) = (ext.trim(), mime.trim());
    if ext.is_empty() || mime.is_empty() {
        return Err(format!("expected EXT=MIME, got '{raw}'"));
    }
    Ok((ext.to_string(), mime.to_string()))
}
