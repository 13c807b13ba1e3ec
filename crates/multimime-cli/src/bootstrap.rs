//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where adapters are wired together for the
//! CLI. All concrete implementations are instantiated here:
//! - Additional-MIME source (registry file via multimime-core)
//! - Content sniffer and filename resolver (via multimime-sniff)
//! - Host base table (via multimime-sniff)
//!
//! Command handlers receive the composed context and build the upload filter
//! from it.

use std::path::PathBuf;
use std::sync::Arc;

use multimime_core::{
    AdditionalMimesPort, ConfigFileMimeSource, ContentSnifferPort, ExtensionMimeSet, MimeContext,
    MimeTable, PrimaryMimeProjector, RegistryConfig, UnavailableSniffer, UploadMimeFilter,
};
use multimime_sniff::{GuessResolver, InferSniffer, default_host_table};
use tracing::warn;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Registry file, if one is configured.
    pub registry_path: Option<PathBuf>,
    /// Whether content sniffing is available.
    pub sniffing: bool,
}

impl CliConfig {
    pub const fn new(registry_path: Option<PathBuf>) -> Self {
        Self {
            registry_path,
            sniffing: true,
        }
    }

    #[must_use]
    pub const fn without_sniffing(mut self) -> Self {
        self.sniffing = false;
        self
    }
}

/// Composed application context for CLI commands.
pub struct CliContext {
    /// Source of additional MIME types.
    pub mimes: Arc<dyn AdditionalMimesPort>,
    /// Content sniffer.
    pub sniffer: Arc<dyn ContentSnifferPort>,
    /// Host base table before additional MIME types.
    pub host_table: MimeTable,
    /// Registry file, if one is configured.
    pub registry_path: Option<PathBuf>,
}

impl CliContext {
    /// Build the upload filter.
    ///
    /// The host resolves filenames against its upload allow-list, so the
    /// resolver is built over the projected table.
    pub fn filter(&self) -> UploadMimeFilter {
        let registry = self.mimes.additional_mimes(&MimeContext::none());
        let upload_table = PrimaryMimeProjector::project(self.host_table.clone(), &registry);

        UploadMimeFilter::new(
            self.mimes.clone(),
            Arc::new(GuessResolver::new(upload_table)),
            self.sniffer.clone(),
        )
    }

    /// Load the raw registry file for inspection commands.
    pub fn load_registry(&self) -> Result<RegistryConfig, CliError> {
        let path = self.registry_path.as_ref().ok_or_else(|| {
            CliError::Config("no registry file configured (use --registry)".to_string())
        })?;
        Ok(RegistryConfig::load(path)?)
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let mimes: Arc<dyn AdditionalMimesPort> = match &config.registry_path {
        Some(path) => Arc::new(ConfigFileMimeSource::new(path.clone())),
        None => {
            warn!("No registry file configured, using host defaults only");
            Arc::new(ExtensionMimeSet::new())
        }
    };

    bootstrap_with(mimes, config.sniffing, config.registry_path)
}

/// Bootstrap with an injected source (for testing).
pub fn bootstrap_with(
    mimes: Arc<dyn AdditionalMimesPort>,
    sniffing: bool,
    registry_path: Option<PathBuf>,
) -> CliContext {
    let sniffer: Arc<dyn ContentSnifferPort> = if sniffing {
        Arc::new(InferSniffer::new())
    } else {
        Arc::new(UnavailableSniffer)
    };

    CliContext {
        mimes,
        sniffer,
        host_table: default_host_table(),
        registry_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimime_core::UploadProbe;

    #[test]
    fn test_filter_resolves_registered_extension() {
        let registry = ExtensionMimeSet::new().with("dwg", ["application/acad", "image/vnd.dwg"]);
        let ctx = bootstrap_with(Arc::new(registry), true, None);

        let probe = UploadProbe::new("plan.dwg", "image/vnd.dwg");
        let result = ctx.filter().check_filetype_and_ext(&probe, &MimeContext::none());
        assert!(result.is_match());
    }

    #[test]
    fn test_load_registry_requires_path() {
        let ctx = bootstrap(CliConfig::default());
        assert!(matches!(ctx.load_registry(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_without_sniffing() {
        let ctx = bootstrap(CliConfig::new(None).without_sniffing());
        assert!(!ctx.sniffer.is_available());
    }
}
