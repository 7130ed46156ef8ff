//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod show;

use std::path::PathBuf;

use azepug_config::{ConfigError, SiteConfig};
use clap::Args;

pub(crate) use check::CheckArgs;
pub(crate) use show::ShowArgs;

/// Where to load the configuration from.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to package.json (default: auto-discover from current directory).
    #[arg(short, long, env = "AZEPUG_DESCRIPTOR")]
    descriptor: Option<PathBuf>,

    /// Site source file (default: the bundled AzePUG site).
    #[arg(short, long)]
    source: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the site configuration.
    pub(crate) fn load(&self) -> Result<SiteConfig, ConfigError> {
        tracing::debug!(
            source = ?self.source,
            descriptor = ?self.descriptor,
            "Loading site configuration"
        );
        match &self.source {
            Some(source) => SiteConfig::load_from_file(source, self.descriptor.as_deref()),
            None => SiteConfig::load(self.descriptor.as_deref()),
        }
    }
}
