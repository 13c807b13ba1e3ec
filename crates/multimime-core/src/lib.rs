//! Core of multimime: lets one file extension accept several MIME types on a
//! host upload pipeline that only knows one type per extension.
//!
//! - [`domain`]: registry, table and upload types
//! - [`ports`]: traits the host and integrators implement
//! - [`services`]: projection, reconciliation and the host-facing filter
//! - [`settings`]: registry files, file-backed source and lint
//!
//! The core is synchronous and never fails on a decision path: "no decision"
//! is an empty [`ReconciliationResult`].

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ExtensionMimeSet, FileTypeGuess, MimeContext, MimeTable, OneOrMany, ReconciliationResult,
    UploadProbe, UploadVerdict, extension_of, normalize_extension,
};
pub use ports::{
    AdditionalMimesPort, ContentSnifferPort, ExtensionResolverPort, FnMimeSource,
    UnavailableSniffer,
};
pub use services::{
    ExtensionReconciler, FALLBACK_MIME, PrimaryMimeProjector, UploadMimeFilter, UploadRequest,
};
pub use settings::{
    ConfigError, ConfigFileMimeSource, LintScope, REGISTRY_PATH_ENV, RegistryConfig,
    RegistryWarning, lint_registry,
};
