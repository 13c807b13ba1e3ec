//! Registry configuration types, file-backed source and lint.
//!
//! A registry file is JSON with a global `mimes` map and optional per-actor
//! overlays:
//!
//! ```json
//! {
//!   "mimes": { "dwg": ["application/acad", "image/vnd.dwg"], "json": "application/json" },
//!   "actors": { "editor": { "svg": "image/svg+xml" } }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::domain::{ExtensionMimeSet, MimeContext, OneOrMany, normalize_extension};
use crate::ports::AdditionalMimesPort;

/// Environment variable naming the registry file.
pub const REGISTRY_PATH_ENV: &str = "MULTIMIME_REGISTRY";

/// Raw registry entries as written by an integrator.
pub type RawMimeEntries = BTreeMap<String, OneOrMany<String>>;

/// Registry configuration.
///
/// Sections of the wrong shape are ignored with a warning rather than
/// failing the file; `null` reads as an empty section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Entries for every context.
    #[serde(deserialize_with = "deserialize_entries")]
    pub mimes: RawMimeEntries,
    /// Per-actor entries, replacing global entries extension by extension.
    #[serde(deserialize_with = "deserialize_actors")]
    pub actors: BTreeMap<String, RawMimeEntries>,
}

fn deserialize_entries<'de, D>(deserializer: D) -> Result<RawMimeEntries, D::Error>
where
    D: Deserializer<'de>,
{
    let LenientEntries(entries) = LenientEntries::deserialize(deserializer)?;
    Ok(entries.unwrap_or_else(|| {
        warn!("Ignoring `mimes`: expected a map of extension to MIME types");
        RawMimeEntries::new()
    }))
}

fn deserialize_actors<'de, D>(deserializer: D) -> Result<BTreeMap<String, RawMimeEntries>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ActorsVisitor)
}

/// An entries map; `None` when the value is not a map. `null` is an empty map.
struct LenientEntries(Option<RawMimeEntries>);

impl<'de> Deserialize<'de> for LenientEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EntriesVisitor).map(LenientEntries)
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Option<RawMimeEntries>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of extension to MIME types")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = RawMimeEntries::new();
        while let Some((extension, mimes)) = map.next_entry::<String, OneOrMany<String>>()? {
            entries.insert(extension, mimes);
        }
        Ok(Some(entries))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Some(RawMimeEntries::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Some(RawMimeEntries::new()))
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

struct ActorsVisitor;

impl<'de> Visitor<'de> for ActorsVisitor {
    type Value = BTreeMap<String, RawMimeEntries>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of actor to registry entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut actors = BTreeMap::new();
        while let Some((actor, LenientEntries(entries))) =
            map.next_entry::<String, LenientEntries>()?
        {
            match entries {
                Some(entries) => {
                    actors.insert(actor, entries);
                }
                None => warn!(%actor, "Ignoring actor overlay: expected a map"),
            }
        }
        Ok(actors)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<Self::Value, E> {
        Ok(ignored_actors())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(ignored_actors())
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Ok(ignored_actors())
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Ok(ignored_actors())
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(ignored_actors())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(ignored_actors())
    }
}

fn ignored_actors() -> BTreeMap<String, RawMimeEntries> {
    warn!("Ignoring `actors`: expected a map of actor to registry entries");
    BTreeMap::new()
}

/// Errors loading a registry file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read registry file {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("Invalid registry in {origin}: {reason}")]
    Parse { origin: String, reason: String },
}

impl RegistryConfig {
    /// Parse a registry from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            origin: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Read and parse a registry file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Normalized registry for a context.
    ///
    /// Starts from the global entries; an actor with overlays has them
    /// applied on top.
    pub fn registry_for(&self, context: &MimeContext) -> ExtensionMimeSet {
        let mut registry = ExtensionMimeSet::from_raw(self.mimes.clone());
        if let Some(overlay) = context.actor_id().and_then(|id| self.actors.get(id)) {
            registry.overlay(ExtensionMimeSet::from_raw(overlay.clone()));
        }
        registry
    }
}

impl AdditionalMimesPort for RegistryConfig {
    fn additional_mimes(&self, context: &MimeContext) -> ExtensionMimeSet {
        self.registry_for(context)
    }
}

/// Source that re-reads a registry file on every call.
///
/// Edits to the file take effect on the next call. A missing or invalid file
/// yields an empty registry, leaving the host's behavior unchanged.
#[derive(Debug, Clone)]
pub struct ConfigFileMimeSource {
    path: PathBuf,
}

impl ConfigFileMimeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AdditionalMimesPort for ConfigFileMimeSource {
    fn additional_mimes(&self, context: &MimeContext) -> ExtensionMimeSet {
        match RegistryConfig::load(&self.path) {
            Ok(config) => config.registry_for(context),
            Err(e) => {
                warn!(error = %e, "Registry unavailable, no additional MIME types");
                ExtensionMimeSet::new()
            }
        }
    }
}

/// Where in the configuration a warning was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintScope {
    Global,
    Actor(String),
}

impl fmt::Display for LintScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "mimes"),
            Self::Actor(id) => write!(f, "actors.{id}"),
        }
    }
}

/// Integrator misconfiguration. Reported, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWarning {
    /// Extension listed with no MIME types; it can never match.
    EmptyMimeList { scope: LintScope, extension: String },
    /// The same MIME type listed twice for one extension.
    DuplicateMime {
        scope: LintScope,
        extension: String,
        mime: String,
    },
    /// Key that is rewritten by normalization (case, dots, whitespace).
    NonCanonicalExtension {
        scope: LintScope,
        raw: String,
        normalized: String,
    },
    /// Value without a `type/subtype` shape.
    MalformedMime {
        scope: LintScope,
        extension: String,
        mime: String,
    },
    /// One MIME type registered under several extensions.
    SharedMime {
        scope: LintScope,
        mime: String,
        extensions: Vec<String>,
    },
}

impl fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMimeList { scope, extension } => {
                write!(f, "{scope}.{extension}: empty MIME list never matches")
            }
            Self::DuplicateMime {
                scope,
                extension,
                mime,
            } => write!(f, "{scope}.{extension}: '{mime}' listed more than once"),
            Self::NonCanonicalExtension {
                scope,
                raw,
                normalized,
            } => write!(f, "{scope}: key '{raw}' is treated as '{normalized}'"),
            Self::MalformedMime {
                scope,
                extension,
                mime,
            } => write!(f, "{scope}.{extension}: '{mime}' is not a type/subtype"),
            Self::SharedMime {
                scope,
                mime,
                extensions,
            } => write!(
                f,
                "{scope}: '{mime}' is registered for {}",
                extensions.join(", ")
            ),
        }
    }
}

/// Check a registry configuration for likely mistakes.
pub fn lint_registry(config: &RegistryConfig) -> Vec<RegistryWarning> {
    let mut warnings = lint_entries(&LintScope::Global, &config.mimes);
    for (actor, entries) in &config.actors {
        warnings.extend(lint_entries(&LintScope::Actor(actor.clone()), entries));
    }
    warnings
}

fn lint_entries(scope: &LintScope, entries: &RawMimeEntries) -> Vec<RegistryWarning> {
    let mut warnings = Vec::new();
    let mut by_mime: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for (raw, value) in entries {
        let extension = normalize_extension(raw);
        if extension != *raw {
            warnings.push(RegistryWarning::NonCanonicalExtension {
                scope: scope.clone(),
                raw: raw.clone(),
                normalized: extension.clone(),
            });
        }

        let mimes = value.as_slice();
        if mimes.iter().all(|m| m.trim().is_empty()) {
            warnings.push(RegistryWarning::EmptyMimeList {
                scope: scope.clone(),
                extension: extension.clone(),
            });
            continue;
        }

        let mut seen = BTreeSet::new();
        for mime in mimes.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            if !seen.insert(mime) {
                warnings.push(RegistryWarning::DuplicateMime {
                    scope: scope.clone(),
                    extension: extension.clone(),
                    mime: mime.to_string(),
                });
                continue;
            }
            if !is_type_subtype(mime) {
                warnings.push(RegistryWarning::MalformedMime {
                    scope: scope.clone(),
                    extension: extension.clone(),
                    mime: mime.to_string(),
                });
            }
            by_mime.entry(mime).or_default().insert(extension.clone());
        }
    }

    for (mime, extensions) in by_mime {
        if extensions.len() > 1 {
            warnings.push(RegistryWarning::SharedMime {
                scope: scope.clone(),
                mime: mime.to_string(),
                extensions: extensions.into_iter().collect(),
            });
        }
    }

    warnings
}

fn is_type_subtype(mime: &str) -> bool {
    mime.split_once('/').is_some_and(|(ty, sub)| {
        !ty.is_empty() && !sub.is_empty() && !sub.contains('/') && !mime.contains(char::is_whitespace)
    })
}
