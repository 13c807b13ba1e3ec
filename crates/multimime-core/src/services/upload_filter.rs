//! Upload MIME filter - the composition the host drives.
//!
//! Wires the additional-MIME source into the host's two call sites:
//! building the upload allow-list (no actor) and determining one file's type
//! (current actor). [`UploadMimeFilter::evaluate`] runs the whole host
//! pipeline for a single upload: allow-list first, reconciler second.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    MimeContext, MimeTable, ReconciliationResult, UploadProbe, UploadVerdict, extension_of,
};
use crate::ports::{AdditionalMimesPort, ContentSnifferPort, ExtensionResolverPort};

use super::projector::PrimaryMimeProjector;
use super::reconciler::ExtensionReconciler;

/// MIME type reported when sniffing recognizes nothing.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// One upload as handed to [`UploadMimeFilter::evaluate`].
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Filename claimed by the uploader.
    pub filename: String,
    /// Leading bytes of the file, used for sniffing.
    pub contents: Vec<u8>,
    /// Sniffed type computed elsewhere, used instead of asking the sniffer.
    /// Ignored when sniffing is unavailable.
    pub sniffed_type: Option<String>,
    /// Identity forwarded to the additional-MIME source.
    pub context: MimeContext,
    /// Explicit allow-list replacing the host default for this call.
    pub caller_allowlist: Option<MimeTable>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            contents,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sniffed_type(mut self, sniffed_type: Option<String>) -> Self {
        self.sniffed_type = sniffed_type;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: MimeContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_caller_allowlist(mut self, allowlist: Option<MimeTable>) -> Self {
        self.caller_allowlist = allowlist;
        self
    }
}

/// Host-facing filter over the additional-MIME source and host collaborators.
pub struct UploadMimeFilter {
    mimes: Arc<dyn AdditionalMimesPort>,
    sniffer: Arc<dyn ContentSnifferPort>,
    reconciler: ExtensionReconciler,
}

impl UploadMimeFilter {
    /// Create a filter from its injected ports.
    pub fn new(
        mimes: Arc<dyn AdditionalMimesPort>,
        resolver: Arc<dyn ExtensionResolverPort>,
        sniffer: Arc<dyn ContentSnifferPort>,
    ) -> Self {
        Self {
            mimes,
            sniffer,
            reconciler: ExtensionReconciler::new(resolver),
        }
    }

    /// Build the host's upload allow-list from its base table.
    ///
    /// Asks the source with no actor, then projects primary types.
    pub fn upload_mimes(&self, base: MimeTable) -> MimeTable {
        let registry = self.mimes.additional_mimes(&MimeContext::none());
        PrimaryMimeProjector::project(base, &registry)
    }

    /// Second-chance type check for one file.
    ///
    /// Asks the source for `context`, reads sniffing availability, and
    /// reconciles.
    pub fn check_filetype_and_ext(
        &self,
        probe: &UploadProbe,
        context: &MimeContext,
    ) -> ReconciliationResult {
        let registry = self.mimes.additional_mimes(context);
        self.reconciler
            .reconcile(probe, &registry, self.sniffer.is_available())
    }

    /// Run one upload through the host pipeline.
    ///
    /// The effective allow-list is the caller's when one is supplied,
    /// otherwise the projected `base`. A file whose sniffed type equals its
    /// extension's allow-listed type is accepted as primary. Anything else is
    /// handed to [`check_filetype_and_ext`](Self::check_filetype_and_ext).
    /// Without content sniffing the host trusts the filename, as it would
    /// without this filter.
    pub fn evaluate(&self, base: &MimeTable, request: &UploadRequest) -> UploadVerdict {
        let allowed = match &request.caller_allowlist {
            Some(table) if !table.is_empty() => table.clone(),
            _ => self.upload_mimes(base.clone()),
        };

        let extension = extension_of(&request.filename);
        let listed = extension
            .as_deref()
            .and_then(|ext| allowed.lookup(ext))
            .map(|(_, mime)| mime.to_string());

        let can_sniff = self.sniffer.is_available();
        let sniffed = if can_sniff {
            Some(
                request
                    .sniffed_type
                    .clone()
                    .or_else(|| self.sniffer.sniff(&request.contents))
                    .unwrap_or_else(|| FALLBACK_MIME.to_string()),
            )
        } else {
            None
        };

        debug!(
            filename = %request.filename,
            extension = ?extension,
            listed = ?listed,
            sniffed = ?sniffed,
            "Evaluating upload"
        );

        match (&extension, &listed, &sniffed) {
            (Some(ext), Some(mime), None) => {
                return UploadVerdict::AcceptedPrimary {
                    extension: ext.clone(),
                    mime_type: mime.clone(),
                };
            }
            (Some(ext), Some(mime), Some(real)) if mime == real => {
                return UploadVerdict::AcceptedPrimary {
                    extension: ext.clone(),
                    mime_type: mime.clone(),
                };
            }
            _ => {}
        }

        let Some(sniffed_type) = sniffed else {
            return UploadVerdict::Rejected {
                extension,
                sniffed_type: None,
            };
        };

        let probe = UploadProbe::new(request.filename.as_str(), sniffed_type.as_str())
            .with_hint(extension.clone(), listed)
            .with_caller_allowlist(request.caller_allowlist.clone());

        let result = self.check_filetype_and_ext(&probe, &request.context);
        if result.is_match() {
            info!(
                filename = %request.filename,
                mime_type = ?result.mime_type,
                "Accepted upload as registered MIME variant"
            );
            UploadVerdict::AcceptedVariant(result)
        } else {
            UploadVerdict::Rejected {
                extension,
                sniffed_type: Some(sniffed_type),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExtensionMimeSet;
    use crate::ports::{MockAdditionalMimesPort, MockContentSnifferPort, UnavailableSniffer};

    fn dwg_registry() -> ExtensionMimeSet {
        ExtensionMimeSet::new().with("dwg", ["application/acad", "image/vnd.dwg"])
    }

    fn host_base() -> MimeTable {
        MimeTable::new()
            .with("jpg|jpeg|jpe", "image/jpeg")
            .with("pdf", "application/pdf")
    }

    fn sniffer_returning(mime: Option<&'static str>) -> Arc<dyn ContentSnifferPort> {
        let mut sniffer = MockContentSnifferPort::new();
        sniffer.expect_is_available().return_const(true);
        sniffer
            .expect_sniff()
            .returning(move |_| mime.map(str::to_string));
        Arc::new(sniffer)
    }

    fn filter_with(
        mimes: Arc<dyn AdditionalMimesPort>,
        sniffer: Arc<dyn ContentSnifferPort>,
    ) -> UploadMimeFilter {
        let resolver = PrimaryMimeProjector::project(host_base(), &dwg_registry());
        UploadMimeFilter::new(mimes, Arc::new(resolver), sniffer)
    }

    #[test]
    fn test_upload_mimes_uses_no_actor() {
        let mut mimes = MockAdditionalMimesPort::new();
        mimes
            .expect_additional_mimes()
            .withf(|ctx| ctx.actor_id().is_none())
            .times(1)
            .returning(|_| dwg_registry());
        let filter = filter_with(Arc::new(mimes), Arc::new(UnavailableSniffer));

        let table = filter.upload_mimes(host_base());
        assert_eq!(table.get("dwg"), Some("application/acad"));
        assert_eq!(table.get("pdf"), Some("application/pdf"));
    }

    #[test]
    fn test_check_filetype_forwards_actor() {
        let mut mimes = MockAdditionalMimesPort::new();
        mimes
            .expect_additional_mimes()
            .withf(|ctx| ctx.actor_id() == Some("drafter"))
            .times(1)
            .returning(|_| dwg_registry());
        let filter = filter_with(Arc::new(mimes), sniffer_returning(None));

        let probe = UploadProbe::new("plan.dwg", "image/vnd.dwg");
        let result = filter.check_filetype_and_ext(&probe, &MimeContext::actor("drafter"));
        assert_eq!(result, ReconciliationResult::accepted("dwg", "image/vnd.dwg"));
    }

    #[test]
    fn test_check_filetype_without_sniffing_is_empty() {
        let filter = filter_with(Arc::new(dwg_registry()), Arc::new(UnavailableSniffer));
        let probe = UploadProbe::new("plan.dwg", "image/vnd.dwg");
        assert_eq!(
            filter.check_filetype_and_ext(&probe, &MimeContext::none()),
            ReconciliationResult::empty()
        );
    }

    #[test]
    fn test_evaluate_primary_type() {
        let filter = filter_with(
            Arc::new(dwg_registry()),
            sniffer_returning(Some("application/acad")),
        );
        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("plan.dwg", vec![0; 8]));
        assert_eq!(
            verdict,
            UploadVerdict::AcceptedPrimary {
                extension: "dwg".to_string(),
                mime_type: "application/acad".to_string(),
            }
        );
    }

    #[test]
    fn test_evaluate_secondary_type() {
        let filter = filter_with(
            Arc::new(dwg_registry()),
            sniffer_returning(Some("image/vnd.dwg")),
        );
        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("plan.dwg", vec![0; 8]));
        assert_eq!(
            verdict,
            UploadVerdict::AcceptedVariant(ReconciliationResult::accepted("dwg", "image/vnd.dwg"))
        );
    }

    #[test]
    fn test_evaluate_rejects_unregistered_type() {
        let filter = filter_with(
            Arc::new(dwg_registry()),
            sniffer_returning(Some("application/pdf")),
        );
        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("plan.dwg", vec![0; 8]));
        assert_eq!(
            verdict,
            UploadVerdict::Rejected {
                extension: Some("dwg".to_string()),
                sniffed_type: Some("application/pdf".to_string()),
            }
        );
    }

    #[test]
    fn test_evaluate_unrecognized_contents_fall_back() {
        let filter = filter_with(Arc::new(dwg_registry()), sniffer_returning(None));
        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("plan.dwg", Vec::new()));
        assert_eq!(
            verdict,
            UploadVerdict::Rejected {
                extension: Some("dwg".to_string()),
                sniffed_type: Some(FALLBACK_MIME.to_string()),
            }
        );
    }

    #[test]
    fn test_evaluate_sniffed_override_skips_sniffer() {
        let mut sniffer = MockContentSnifferPort::new();
        sniffer.expect_is_available().return_const(true);
        sniffer.expect_sniff().never();
        let filter = filter_with(Arc::new(dwg_registry()), Arc::new(sniffer));

        let request = UploadRequest::new("plan.dwg", Vec::new())
            .with_sniffed_type(Some("image/vnd.dwg".to_string()));
        assert!(matches!(
            filter.evaluate(&host_base(), &request),
            UploadVerdict::AcceptedVariant(_)
        ));
    }

    #[test]
    fn test_evaluate_without_sniffing_trusts_filename() {
        let filter = filter_with(Arc::new(dwg_registry()), Arc::new(UnavailableSniffer));

        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("plan.dwg", Vec::new()));
        assert_eq!(
            verdict,
            UploadVerdict::AcceptedPrimary {
                extension: "dwg".to_string(),
                mime_type: "application/acad".to_string(),
            }
        );

        let verdict = filter.evaluate(&host_base(), &UploadRequest::new("tool.exe", Vec::new()));
        assert_eq!(
            verdict,
            UploadVerdict::Rejected {
                extension: Some("exe".to_string()),
                sniffed_type: None,
            }
        );
    }

    #[test]
    fn test_evaluate_caller_allowlist_takes_control() {
        let filter = filter_with(
            Arc::new(dwg_registry()),
            sniffer_returning(Some("image/vnd.dwg")),
        );
        let request = UploadRequest::new("plan.dwg", vec![0; 8]).with_caller_allowlist(Some(
            MimeTable::new().with("dwg", "application/acad"),
        ));

        assert!(matches!(
            filter.evaluate(&host_base(), &request),
            UploadVerdict::Rejected { .. }
        ));
    }

    #[test]
    fn test_evaluate_caller_allowlist_key_case() {
        let filter = filter_with(
            Arc::new(dwg_registry()),
            sniffer_returning(Some("application/acad")),
        );
        let request = UploadRequest::new("plan.dwg", vec![0; 8]).with_caller_allowlist(Some(
            MimeTable::new().with("DWG", "application/acad"),
        ));

        assert_eq!(
            filter.evaluate(&host_base(), &request),
            UploadVerdict::AcceptedPrimary {
                extension: "dwg".to_string(),
                mime_type: "application/acad".to_string(),
            }
        );
    }

    #[test]
    fn test_evaluate_registry_is_fetched_per_call() {
        let mut mimes = MockAdditionalMimesPort::new();
        // allow-list construction + reconciliation, for each of two uploads
        mimes
            .expect_additional_mimes()
            .times(4)
            .returning(|_| dwg_registry());
        let filter = filter_with(Arc::new(mimes), sniffer_returning(Some("image/vnd.dwg")));

        let request = UploadRequest::new("plan.dwg", vec![0; 8]);
        let first = filter.evaluate(&host_base(), &request);
        let second = filter.evaluate(&host_base(), &request);
        assert_eq!(first, second);
    }
}
