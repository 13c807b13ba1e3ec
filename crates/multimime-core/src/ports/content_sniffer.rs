//! Content sniffing port.
//!
//! Implementations live in adapters (e.g. `multimime-sniff`); the core only
//! asks whether the capability exists and, in the full pipeline, for a type.

/// Port for determining a MIME type from file contents.
#[cfg_attr(test, mockall::automock)]
pub trait ContentSnifferPort: Send + Sync {
    /// Whether content inspection is available in this environment.
    fn is_available(&self) -> bool;

    /// MIME type detected from the leading bytes, if recognized.
    fn sniff(&self, contents: &[u8]) -> Option<String>;
}

/// Sniffer for environments without content inspection.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSniffer;

impl ContentSnifferPort for UnavailableSniffer {
    fn is_available(&self) -> bool {
        false
    }

    fn sniff(&self, _contents: &[u8]) -> Option<String> {
        None
    }
}
