//! Upload evaluation types.
//!
//! These types describe one upload attempt as the host sees it, and the
//! decisions the core hands back.

use serde::{Deserialize, Serialize};

use super::table::MimeTable;

/// Opaque identity token passed to the additional-MIME source.
///
/// The core only forwards it; sources may use it to vary their answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MimeContext {
    actor: Option<String>,
}

impl MimeContext {
    /// No actor, used when the host builds its upload allow-list.
    pub const fn none() -> Self {
        Self { actor: None }
    }

    /// Context for a specific actor.
    pub fn actor(id: impl Into<String>) -> Self {
        Self {
            actor: Some(id.into()),
        }
    }

    /// Create from an optional actor id.
    pub fn from_actor(id: Option<String>) -> Self {
        Self { actor: id }
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

/// Result of the host's filename-based type lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeGuess {
    /// Canonical extension resolved from the filename.
    pub extension: String,
    /// MIME type the host associates with that extension, if any.
    pub default_type: Option<String>,
}

impl FileTypeGuess {
    pub fn new(extension: impl Into<String>, default_type: Option<String>) -> Self {
        Self {
            extension: extension.into(),
            default_type,
        }
    }
}

/// One upload attempt under evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadProbe {
    /// Filename claimed by the uploader.
    pub filename: String,
    /// Host's best-guess extension from the filename, before sniffing.
    pub extension_hint: Option<String>,
    /// MIME type the host associates with `extension_hint`.
    pub default_type: Option<String>,
    /// MIME type determined by content inspection.
    pub sniffed_type: String,
    /// Set when an earlier stage already determined the type.
    pub already_resolved: bool,
    /// Explicit allow-list the caller supplied for this call, if any.
    pub caller_allowlist: Option<MimeTable>,
}

impl UploadProbe {
    pub fn new(filename: impl Into<String>, sniffed_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sniffed_type: sniffed_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hint(mut self, extension: Option<String>, default_type: Option<String>) -> Self {
        self.extension_hint = extension;
        self.default_type = default_type;
        self
    }

    #[must_use]
    pub const fn resolved(mut self, already_resolved: bool) -> Self {
        self.already_resolved = already_resolved;
        self
    }

    #[must_use]
    pub fn with_caller_allowlist(mut self, allowlist: Option<MimeTable>) -> Self {
        self.caller_allowlist = allowlist;
        self
    }

    /// Whether the caller took explicit control with a non-empty allow-list.
    pub fn has_caller_allowlist(&self) -> bool {
        self.caller_allowlist
            .as_ref()
            .is_some_and(|table| !table.is_empty())
    }
}

/// Outcome of a reconciliation attempt.
///
/// Absent `extension` and `mime_type` mean "no decision"; the host keeps
/// whatever it would have done anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    /// Always false: files are never renamed, acceptance is only widened.
    pub filename_correction_needed: bool,
}

impl ReconciliationResult {
    /// The "no decision" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn accepted(extension: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
            mime_type: Some(mime_type.into()),
            filename_correction_needed: false,
        }
    }

    pub const fn is_match(&self) -> bool {
        self.extension.is_some() && self.mime_type.is_some()
    }
}

/// Final outcome of running an upload through the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum UploadVerdict {
    /// Matched the single-MIME allow-list directly.
    AcceptedPrimary { extension: String, mime_type: String },
    /// Accepted as a non-primary MIME variant of a multi-MIME extension.
    AcceptedVariant(ReconciliationResult),
    /// Neither the allow-list nor the reconciler accepted the file.
    Rejected {
        extension: Option<String>,
        sniffed_type: Option<String>,
    },
}

impl UploadVerdict {
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}
