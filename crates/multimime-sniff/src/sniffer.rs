//! Magic-number content sniffing via the `infer` crate.

use multimime_core::ContentSnifferPort;
use tracing::trace;

/// Number of leading bytes inspected by the text heuristic.
const TEXT_PROBE_LEN: usize = 1024;

/// Sniffs MIME types from file contents.
///
/// Binary formats are recognized by magic number. Contents with no known
/// signature that look like text are reported as `text/plain`, the way
/// system file-type tools report JSON, CSV and similar formats.
#[derive(Debug, Clone, Copy)]
pub struct InferSniffer {
    detect_text: bool,
}

impl InferSniffer {
    pub const fn new() -> Self {
        Self { detect_text: true }
    }

    /// Disable the `text/plain` heuristic; only magic numbers are reported.
    #[must_use]
    pub const fn without_text_detection(mut self) -> Self {
        self.detect_text = false;
        self
    }
}

impl Default for InferSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSnifferPort for InferSniffer {
    fn is_available(&self) -> bool {
        true
    }

    fn sniff(&self, contents: &[u8]) -> Option<String> {
        if let Some(kind) = infer::get(contents) {
            trace!(mime = kind.mime_type(), "Matched magic number");
            return Some(kind.mime_type().to_string());
        }

        if self.detect_text && looks_like_text(contents) {
            return Some("text/plain".to_string());
        }

        None
    }
}

fn looks_like_text(contents: &[u8]) -> bool {
    if contents.is_empty() {
        return false;
    }
    let head = &contents[..contents.len().min(TEXT_PROBE_LEN)];
    if head.contains(&0) {
        return false;
    }
    // A multi-byte character may be cut at the probe boundary.
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && e.valid_up_to() + 4 > head.len(),
    }
}
