//! Port definitions (trait abstractions) for host collaborators.
//!
//! Ports define the interfaces the core expects from the host platform and
//! from integrators. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - Ports are synchronous; the host calls the core synchronously
//! - All ports are `Send + Sync` so adapters can be shared behind `Arc`
//! - No sniffing library types in any signature

pub mod additional_mimes;
pub mod content_sniffer;
pub mod extension_resolver;

pub use additional_mimes::{AdditionalMimesPort, FnMimeSource};
pub use content_sniffer::{ContentSnifferPort, UnavailableSniffer};
pub use extension_resolver::ExtensionResolverPort;

#[cfg(test)]
pub use additional_mimes::MockAdditionalMimesPort;
#[cfg(test)]
pub use content_sniffer::MockContentSnifferPort;
#[cfg(test)]
pub use extension_resolver::MockExtensionResolverPort;
