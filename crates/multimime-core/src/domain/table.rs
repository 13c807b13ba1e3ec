//! Single-MIME-per-extension table, the shape the host's allow-list uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mime_set::normalize_extension;

/// Host allow-list: one MIME type per key.
///
/// Keys are either a single extension (`"png"`) or pipe-joined alternatives
/// sharing one type (`"jpg|jpeg|jpe"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeTable {
    entries: BTreeMap<String, String>,
}

impl MimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key, returning the previous MIME type.
    pub fn insert(&mut self, key: impl Into<String>, mime: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), mime.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, mime: impl Into<String>) -> Self {
        self.insert(key, mime);
        self
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Find the entry that covers `extension`.
    ///
    /// Keys compare case-insensitively. A single-extension key wins;
    /// otherwise the first pipe-joined key listing the extension is used.
    /// Returns the matching key and its MIME type.
    pub fn lookup(&self, extension: &str) -> Option<(&str, &str)> {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return None;
        }

        if let Some((key, mime)) = self.entries.get_key_value(&extension) {
            return Some((key.as_str(), mime.as_str()));
        }

        let covers = |key: &str| {
            key.split('|')
                .any(|alt| alt.trim().eq_ignore_ascii_case(&extension))
        };
        let single = self
            .entries
            .iter()
            .find(|(key, _)| !key.contains('|') && covers(key));
        single
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.contains('|') && covers(key))
            })
            .map(|(key, mime)| (key.as_str(), mime.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MimeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_table() -> MimeTable {
        [
            ("jpg|jpeg|jpe", "image/jpeg"),
            ("png", "image/png"),
            ("pdf", "application/pdf"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_exact_key() {
        let table = host_table();
        assert_eq!(table.lookup("png"), Some(("png", "image/png")));
        assert_eq!(table.lookup("PNG"), Some(("png", "image/png")));
    }

    #[test]
    fn test_lookup_pipe_alternatives() {
        let table = host_table();
        assert_eq!(table.lookup("jpeg"), Some(("jpg|jpeg|jpe", "image/jpeg")));
        assert_eq!(table.lookup("jp"), None);
    }

    #[test]
    fn test_exact_key_beats_pipe_key() {
        let table = host_table().with("jpg", "image/pjpeg");
        assert_eq!(table.lookup("jpg"), Some(("jpg", "image/pjpeg")));
        assert_eq!(table.lookup("jpe"), Some(("jpg|jpeg|jpe", "image/jpeg")));
    }

    #[test]
    fn test_lookup_ignores_key_case() {
        let table = MimeTable::new()
            .with("DWG", "application/acad")
            .with("DXF|DWG", "image/vnd.dwg");
        assert_eq!(table.lookup("dwg"), Some(("DWG", "application/acad")));
        assert_eq!(table.lookup("dxf"), Some(("DXF|DWG", "image/vnd.dwg")));
    }

    #[test]
    fn test_lookup_blank_extension() {
        assert_eq!(host_table().lookup(""), None);
    }
}
