//! Domain types for MIME registries and upload evaluation.
//!
//! Pure data with no infrastructure dependencies.

pub mod mime_set;
pub mod table;
pub mod upload;

pub use mime_set::{ExtensionMimeSet, OneOrMany, extension_of, normalize_extension};
pub use table::MimeTable;
pub use upload::{
    FileTypeGuess, MimeContext, ReconciliationResult, UploadProbe, UploadVerdict,
};
