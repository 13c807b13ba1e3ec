//! Host-side adapters for multimime ports.
//!
//! - [`InferSniffer`]: magic-number content sniffing
//! - [`GuessResolver`]: filename resolution over the host table
//! - [`default_host_table`]: the host's built-in single-MIME table

#![deny(unused_crate_dependencies)]

mod host_table;
mod resolver;
mod sniffer;

pub use host_table::default_host_table;
pub use resolver::GuessResolver;
pub use sniffer::InferSniffer;

// Re-export the ports these adapters implement
pub use multimime_core::{ContentSnifferPort, ExtensionResolverPort, UnavailableSniffer};
