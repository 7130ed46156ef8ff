//! `azepug show` command implementation.

use azepug_config::SiteConfig;
use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print JSON on a single line.
    #[arg(long)]
    compact: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load()?;
        output.data(&render_json(&config, self.compact)?);
        Ok(())
    }
}

fn render_json(config: &SiteConfig, compact: bool) -> Result<String, serde_json::Error> {
    if compact {
        serde_json::to_string(config)
    } else {
        serde_json::to_string_pretty(config)
    }
}
