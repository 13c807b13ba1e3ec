//! Primary MIME projection.
//!
//! Reduces a multi-MIME registry to the one-MIME-per-extension table the
//! host's allow-list understands. Uploads of an extension's primary type then
//! pass the host's own check without reaching the reconciler.

use crate::domain::{ExtensionMimeSet, MimeTable};

/// Projects a registry onto a host table by primary MIME type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryMimeProjector;

impl PrimaryMimeProjector {
    /// Merge the registry's primary types into `base`.
    ///
    /// Every registered extension with a non-empty list overwrites (or adds)
    /// `base[extension]` with its first MIME type. Everything else in `base`
    /// is left as it was. Pure and total.
    pub fn project(mut base: MimeTable, registry: &ExtensionMimeSet) -> MimeTable {
        for (extension, mimes) in registry.iter() {
            let Some(primary) = mimes.first() else {
                continue;
            };
            base.insert(extension, primary.as_str());
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MimeTable {
        MimeTable::new()
            .with("dwg", "application/octet-stream")
            .with("pdf", "application/pdf")
            .with("jpg|jpeg|jpe", "image/jpeg")
    }

    #[test]
    fn test_primary_overwrites_registered_extension() {
        let registry =
            ExtensionMimeSet::new().with("dwg", ["application/acad", "image/vnd.dwg"]);
        let table = PrimaryMimeProjector::project(base(), &registry);
        assert_eq!(table.get("dwg"), Some("application/acad"));
    }

    #[test]
    fn test_unregistered_entries_untouched() {
        let registry = ExtensionMimeSet::new().with("json", "application/json");
        let table = PrimaryMimeProjector::project(base(), &registry);

        for (key, mime) in base().iter() {
            assert_eq!(table.get(key), Some(mime));
        }
        assert_eq!(table.get("json"), Some("application/json"));
        assert_eq!(table.len(), base().len() + 1);
    }

    #[test]
    fn test_singleton_projects_to_itself() {
        let registry = ExtensionMimeSet::new().with("json", "application/json");
        let table = PrimaryMimeProjector::project(MimeTable::new(), &registry);
        assert_eq!(table.get("json"), Some("application/json"));
    }

    #[test]
    fn test_empty_list_is_skipped() {
        let registry = ExtensionMimeSet::new().with("dwg", Vec::<String>::new());
        let table = PrimaryMimeProjector::project(base(), &registry);
        assert_eq!(table.get("dwg"), Some("application/octet-stream"));
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let table = PrimaryMimeProjector::project(base(), &ExtensionMimeSet::new());
        assert_eq!(table, base());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let registry = ExtensionMimeSet::new()
            .with("dwg", ["application/acad", "image/vnd.dwg"])
            .with("svg", ["image/svg+xml", "text/xml"]);
        assert_eq!(
            PrimaryMimeProjector::project(base(), &registry),
            PrimaryMimeProjector::project(base(), &registry)
        );
    }
}
