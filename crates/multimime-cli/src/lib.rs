//! Command-line adapter for multimime.
//!
//! Parses arguments, composes the core with the sniffing adapters in
//! [`bootstrap`], and dispatches to [`handlers`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependency used only by integration tests
#[cfg(test)]
use tempfile as _;

// Dependencies used by the binary's main.rs
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod registry_commands;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
pub use registry_commands::RegistryCommand;
