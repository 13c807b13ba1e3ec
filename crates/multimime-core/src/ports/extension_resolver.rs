//! Host filename resolver port.
//!
//! Abstracts the host's standard single-MIME lookup: given a filename, which
//! extension does the host recognize and what type does it associate with it.

use crate::domain::{FileTypeGuess, MimeTable, extension_of};

/// Port for resolving an extension from a filename.
#[cfg_attr(test, mockall::automock)]
pub trait ExtensionResolverPort: Send + Sync {
    /// Resolve `filename` against the host's table.
    ///
    /// Returns `None` when the host does not recognize the extension.
    fn resolve(&self, filename: &str) -> Option<FileTypeGuess>;
}

/// Resolve against this table, the way the host resolves against its
/// allow-list.
impl ExtensionResolverPort for MimeTable {
    fn resolve(&self, filename: &str) -> Option<FileTypeGuess> {
        let extension = extension_of(filename)?;
        let (_, mime) = self.lookup(&extension)?;
        Some(FileTypeGuess::new(extension, Some(mime.to_string())))
    }
}
