//! Extension reconciler - second-chance acceptance of non-primary MIME types.
//!
//! The host's allow-list only knows each extension's primary type. When a
//! file's sniffed type is one of the other registered types for its
//! extension, the host rejects it; the reconciler checks the full list and
//! accepts it instead.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ExtensionMimeSet, ReconciliationResult, UploadProbe};
use crate::ports::ExtensionResolverPort;

/// Decides whether an upload matches a non-primary type of its extension.
pub struct ExtensionReconciler {
    resolver: Arc<dyn ExtensionResolverPort>,
}

impl ExtensionReconciler {
    /// Create a reconciler over the host's filename resolver.
    pub fn new(resolver: Arc<dyn ExtensionResolverPort>) -> Self {
        Self { resolver }
    }

    /// Reconcile one upload against the full registry.
    ///
    /// Returns [`ReconciliationResult::empty`] unless the sniffed type is a
    /// registered type of the file's extension. Short-circuits, in order:
    ///
    /// 1. a previous stage already resolved the type
    /// 2. content sniffing is unavailable (filename alone is not trusted)
    /// 3. the caller supplied its own non-empty allow-list
    pub fn reconcile(
        &self,
        probe: &UploadProbe,
        registry: &ExtensionMimeSet,
        can_sniff: bool,
    ) -> ReconciliationResult {
        if probe.already_resolved {
            debug!(filename = %probe.filename, "Type already resolved, leaving as is");
            return ReconciliationResult::empty();
        }
        if !can_sniff {
            debug!(filename = %probe.filename, "Content sniffing unavailable, skipping");
            return ReconciliationResult::empty();
        }
        if probe.has_caller_allowlist() {
            debug!(filename = %probe.filename, "Caller supplied an allow-list, skipping");
            return ReconciliationResult::empty();
        }

        let Some(guess) = self.resolver.resolve(&probe.filename) else {
            debug!(filename = %probe.filename, "No extension resolved");
            return ReconciliationResult::empty();
        };

        let Some(mimes) = registry.get(&guess.extension).filter(|m| !m.is_empty()) else {
            debug!(extension = %guess.extension, "Extension not registered for multiple types");
            return ReconciliationResult::empty();
        };

        if mimes.iter().any(|mime| *mime == probe.sniffed_type) {
            debug!(
                extension = %guess.extension,
                mime_type = %probe.sniffed_type,
                "Accepted registered MIME variant"
            );
            ReconciliationResult::accepted(guess.extension, probe.sniffed_type.as_str())
        } else {
            debug!(
                extension = %guess.extension,
                sniffed_type = %probe.sniffed_type,
                "Sniffed type not registered for extension"
            );
            ReconciliationResult::empty()
        }
    }
}
