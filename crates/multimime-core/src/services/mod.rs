//! Core services: projection, reconciliation and the host-facing filter.

pub mod projector;
pub mod reconciler;
pub mod upload_filter;

pub use projector::PrimaryMimeProjector;
pub use reconciler::ExtensionReconciler;
pub use upload_filter::{FALLBACK_MIME, UploadMimeFilter, UploadRequest};
