//! `azepug check` command implementation.

use azepug_config::{Plugin, SiteConfig};
use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Enable verbose output (show loader logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load()?;

        output.highlight(config.title());
        for line in summary(&config) {
            output.info(&line);
        }
        for warning in warnings(&config) {
            output.warning(&format!("Warning: {warning}"));
        }
        output.success("Configuration is valid");

        Ok(())
    }
}

/// Human-readable summary lines for a loaded configuration.
fn summary(config: &SiteConfig) -> Vec<String> {
    let theme = config.theme_config();
    let mut lines = vec![
        format!("Description: {}", config.description()),
        format!("Logo: {}", theme.logo()),
        format!("Head tags: {}", config.head().len()),
        format!("Nav entries: {}", theme.nav().len()),
    ];

    for (prefix, groups) in theme.sidebar() {
        let entries: usize = groups.iter().map(|g| g.children().len()).sum();
        lines.push(format!(
            "Sidebar {prefix}: {} group(s), {entries} entr(ies)",
            groups.len()
        ));
    }

    let plugins: Vec<&str> = config.plugins().iter().map(Plugin::id).collect();
    if plugins.is_empty() {
        lines.push("Plugins: none".to_owned());
    } else {
        lines.push(format!("Plugins: {}", plugins.join(", ")));
    }

    lines
}

/// Soft problems: the configuration loads, but the engine will ignore
/// or misrender part of it.
fn warnings(config: &SiteConfig) -> Vec<String> {
    let theme = config.theme_config();
    let mut warnings = Vec::new();

    if theme.edit_links() && theme.repo().is_none() {
        warnings.push("theme.edit_links is enabled but theme.repo is not set".to_owned());
    }
    if theme.docs_dir().is_some() && theme.repo().is_none() {
        warnings.push("theme.docs_dir has no effect without theme.repo".to_owned());
    }

    warnings
}
