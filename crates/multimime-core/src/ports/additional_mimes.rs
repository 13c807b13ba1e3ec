//! Additional-MIME source port.
//!
//! This is the single point where integrators register extension to MIME-set
//! mappings. The core asks for a fresh set on every call and never caches the
//! answer, so a source may return different sets per call or per actor.

use crate::domain::{ExtensionMimeSet, MimeContext};

/// Port supplying the multi-MIME registry.
///
/// Called with [`MimeContext::none()`] when the host builds its upload
/// allow-list, and with the current actor's context when it determines the
/// type of a single file.
#[cfg_attr(test, mockall::automock)]
pub trait AdditionalMimesPort: Send + Sync {
    /// Return the registry for this call. May be empty.
    fn additional_mimes(&self, context: &MimeContext) -> ExtensionMimeSet;
}

/// A fixed registry, identical for every context.
impl AdditionalMimesPort for ExtensionMimeSet {
    fn additional_mimes(&self, _context: &MimeContext) -> ExtensionMimeSet {
        self.clone()
    }
}

/// Adapts a closure into an [`AdditionalMimesPort`].
///
/// # Example
///
/// ```
/// use multimime_core::domain::{ExtensionMimeSet, MimeContext};
/// use multimime_core::ports::{AdditionalMimesPort, FnMimeSource};
///
/// let source = FnMimeSource::new(|ctx: &MimeContext| match ctx.actor_id() {
///     Some("cad-team") => ExtensionMimeSet::new().with("dwg", ["application/acad", "image/vnd.dwg"]),
///     _ => ExtensionMimeSet::new(),
/// });
///
/// assert!(source.additional_mimes(&MimeContext::none()).is_empty());
/// assert!(!source.additional_mimes(&MimeContext::actor("cad-team")).is_empty());
/// ```
pub struct FnMimeSource<F> {
    f: F,
}

impl<F> FnMimeSource<F>
where
    F: Fn(&MimeContext) -> ExtensionMimeSet + Send + Sync,
{
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> AdditionalMimesPort for FnMimeSource<F>
where
    F: Fn(&MimeContext) -> ExtensionMimeSet + Send + Sync,
{
    fn additional_mimes(&self, context: &MimeContext) -> ExtensionMimeSet {
        (self.f)(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_static_set_ignores_context() {
        let set = ExtensionMimeSet::new().with("json", "application/json");
        assert_eq!(set.additional_mimes(&MimeContext::none()), set);
        assert_eq!(set.additional_mimes(&MimeContext::actor("anyone")), set);
    }

    #[test]
    fn test_fn_source_is_called_every_time() {
        let calls = AtomicUsize::new(0);
        let source = FnMimeSource::new(|_ctx: &MimeContext| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            ExtensionMimeSet::new().with(&format!("v{n}"), "text/plain")
        });

        let first = source.additional_mimes(&MimeContext::none());
        let second = source.additional_mimes(&MimeContext::none());

        assert!(first.get("v0").is_some());
        assert!(second.get("v1").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
