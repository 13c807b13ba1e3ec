//! Filename resolver over a host table with `mime_guess` fallback.

use multimime_core::{ExtensionResolverPort, FileTypeGuess, MimeTable, extension_of};
use tracing::trace;

use crate::host_table::default_host_table;

/// Resolves filenames the way the host does.
///
/// The host's table is consulted first. Extensions it does not list fall
/// back to `mime_guess`'s database, so well-known types still resolve.
#[derive(Debug, Clone)]
pub struct GuessResolver {
    table: MimeTable,
}

impl GuessResolver {
    /// Resolve against `table`, typically the host's upload allow-list.
    pub const fn new(table: MimeTable) -> Self {
        Self { table }
    }

    /// Resolve against [`default_host_table`].
    pub fn with_default_table() -> Self {
        Self::new(default_host_table())
    }

    pub const fn table(&self) -> &MimeTable {
        &self.table
    }
}

impl Default for GuessResolver {
    fn default() -> Self {
        Self::with_default_table()
    }
}

impl ExtensionResolverPort for GuessResolver {
    fn resolve(&self, filename: &str) -> Option<FileTypeGuess> {
        if let Some(guess) = self.table.resolve(filename) {
            return Some(guess);
        }

        let extension = extension_of(filename)?;
        let mime = mime_guess::from_ext(&extension).first_raw()?;
        trace!(%extension, mime, "Resolved extension from mime_guess database");
        Some(FileTypeGuess::new(extension, Some(mime.to_string())))
    }
}
