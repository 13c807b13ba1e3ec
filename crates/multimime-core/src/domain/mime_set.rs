//! Extension to MIME-set registry types.
//!
//! Integrators describe acceptable MIME types per extension as either a single
//! string or a list. [`OneOrMany`] captures that shape, and [`ExtensionMimeSet`]
//! normalizes it once into ordered, de-duplicated lists keyed by canonical
//! extension.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A value supplied either as a single item or as a sequence of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalize into a sequence; a singleton becomes a one-element vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    /// Borrow the values as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Lenient deserialization: scalars are stringified, `null` and objects become
/// an empty list, and non-scalar sequence items are skipped.
impl<'de> Deserialize<'de> for OneOrMany<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OneOrManyVisitor)
    }
}

struct OneOrManyVisitor;

impl<'de> Visitor<'de> for OneOrManyVisitor {
    type Value = OneOrMany<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a MIME type string or a sequence of MIME type strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(OneOrMany::One(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OneOrMany::Many(Vec::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OneOrMany::Many(Vec::new()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::new();
        while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
            if let Some(value) = item {
                values.push(value);
            }
        }
        Ok(OneOrMany::Many(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(OneOrMany::Many(Vec::new()))
    }
}

/// A sequence item: `Some` for anything that reads as a scalar.
struct Scalar(Option<String>);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a MIME type string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Scalar(Some(v.to_string())))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Scalar(Some(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Scalar(Some(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Scalar(Some(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Scalar(Some(v.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Scalar(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Scalar(None))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar(None))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar(None))
    }
}

/// Canonical form of an extension key: trimmed, no leading dots, lowercase.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Extension of a filename in canonical form, if it has one.
///
/// Only the last component counts, so `archive.tar.gz` yields `gz`.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .map(normalize_extension)
        .filter(|ext| !ext.is_empty())
}

/// Ordered, de-duplicated MIME lists keyed by canonical extension.
///
/// Index 0 of each list is the extension's primary MIME type. An extension
/// may be present with an empty list; such an entry has no primary and never
/// matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtensionMimeSet {
    entries: BTreeMap<String, Vec<String>>,
}

impl ExtensionMimeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw integrator entries, normalizing keys and values.
    pub fn from_raw<I, K>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, OneOrMany<String>)>,
        K: AsRef<str>,
    {
        let mut set = Self::new();
        for (extension, mimes) in raw {
            set.insert(extension.as_ref(), mimes);
        }
        set
    }

    /// Add MIME types for an extension.
    ///
    /// Values are trimmed and blank strings dropped. When the canonical key is
    /// already present the new values are appended after the existing ones,
    /// skipping duplicates.
    pub fn insert(&mut self, extension: &str, mimes: impl Into<OneOrMany<String>>) -> &mut Self {
        let key = normalize_extension(extension);
        if key.is_empty() {
            tracing::debug!(raw = extension, "Ignoring registry entry with empty extension");
            return self;
        }

        let list = self.entries.entry(key).or_default();
        for mime in mimes.into().into_vec() {
            let mime = mime.trim();
            if !mime.is_empty() && !list.iter().any(|existing| existing == mime) {
                list.push(mime.to_string());
            }
        }
        self
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, extension: &str, mimes: impl Into<OneOrMany<String>>) -> Self {
        self.insert(extension, mimes);
        self
    }

    /// Replace entries with those of `overlay`, extension by extension.
    pub fn overlay(&mut self, overlay: Self) {
        self.entries.extend(overlay.entries);
    }

    /// Full MIME list for an extension.
    pub fn get(&self, extension: &str) -> Option<&[String]> {
        self.entries
            .get(&normalize_extension(extension))
            .map(Vec::as_slice)
    }

    /// Primary (first) MIME type for an extension.
    pub fn primary(&self, extension: &str) -> Option<&str> {
        self.get(extension)
            .and_then(|mimes| mimes.first())
            .map(String::as_str)
    }

    /// Exact, case-sensitive membership test.
    pub fn accepts(&self, extension: &str, mime: &str) -> bool {
        self.get(extension)
            .is_some_and(|mimes| mimes.iter().any(|m| m == mime))
    }

    /// Iterate entries. Order is unspecified; callers must not rely on it.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(ext, mimes)| (ext.as_str(), mimes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, OneOrMany<String>)> for ExtensionMimeSet {
    fn from_iter<I: IntoIterator<Item = (K, OneOrMany<String>)>>(iter: I) -> Self {
        Self::from_raw(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_normalized_to_list() {
        let set = ExtensionMimeSet::new().with("json", "application/json");
        assert_eq!(set.get("json"), Some(&["application/json".to_string()][..]));
        assert_eq!(set.primary("json"), Some("application/json"));
    }

    #[test]
    fn test_keys_are_canonicalized() {
        let set = ExtensionMimeSet::new().with(" .DWG ", ["application/acad", "image/vnd.dwg"]);
        assert!(set.get("dwg").is_some());
        assert!(set.get(".dwg").is_some());
        assert_eq!(set.iter().next().map(|(ext, _)| ext), Some("dwg"));
    }

    #[test]
    fn test_duplicates_dropped_order_kept() {
        let set = ExtensionMimeSet::new().with(
            "dwg",
            ["application/acad", "image/vnd.dwg", "application/acad"],
        );
        assert_eq!(
            set.get("dwg").unwrap(),
            &["application/acad".to_string(), "image/vnd.dwg".to_string()]
        );
    }

    #[test]
    fn test_same_canonical_key_merges() {
        let set = ExtensionMimeSet::new()
            .with("DWG", "application/acad")
            .with("dwg", ["image/vnd.dwg", "application/acad"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.primary("dwg"), Some("application/acad"));
        assert!(set.accepts("dwg", "image/vnd.dwg"));
    }

    #[test]
    fn test_empty_list_is_present_without_primary() {
        let set = ExtensionMimeSet::new().with("bin", Vec::<String>::new());
        assert_eq!(set.get("bin"), Some(&[][..]));
        assert_eq!(set.primary("bin"), None);
        assert!(!set.accepts("bin", "application/octet-stream"));
    }

    #[test]
    fn test_blank_extension_ignored() {
        let set = ExtensionMimeSet::new().with(" . ", "text/plain");
        assert!(set.is_empty());
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let set = ExtensionMimeSet::new().with("dwg", ["application/acad", "image/vnd.dwg"]);
        assert!(set.accepts("dwg", "image/vnd.dwg"));
        assert!(!set.accepts("dwg", "IMAGE/VND.DWG"));
    }

    #[test]
    fn test_overlay_replaces_per_extension() {
        let mut set = ExtensionMimeSet::new()
            .with("svg", "image/svg+xml")
            .with("json", "application/json");
        set.overlay(ExtensionMimeSet::new().with("svg", ["text/xml", "image/svg+xml"]));
        assert_eq!(set.primary("svg"), Some("text/xml"));
        assert_eq!(set.primary("json"), Some("application/json"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("drawing.DWG"), Some("dwg".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_lenient_deserialize() {
        let raw: BTreeMap<String, OneOrMany<String>> = serde_json::from_str(
            r#"{
                "json": "application/json",
                "dwg": ["application/acad", "image/vnd.dwg"],
                "odd": ["text/plain", 42, null, {"x": 1}, ["nested"]],
                "num": 7,
                "none": null,
                "obj": {"a": "b"}
            }"#,
        )
        .unwrap();

        assert_eq!(raw["json"], OneOrMany::One("application/json".to_string()));
        assert_eq!(raw["odd"].as_slice(), &["text/plain".to_string(), "42".to_string()]);
        assert_eq!(raw["num"], OneOrMany::One("7".to_string()));
        assert!(raw["none"].as_slice().is_empty());
        assert!(raw["obj"].as_slice().is_empty());

        let set = ExtensionMimeSet::from_raw(raw);
        assert_eq!(set.primary("dwg"), Some("application/acad"));
    }
}
