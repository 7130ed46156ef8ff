//! Site configuration for the Azerbaijan Python User Group documentation site.
//!
//! The site source is a TOML document describing site identity, extra
//! `<head>` elements, navigation, sidebars and plugins. The group's own
//! source is bundled with the crate (`site.toml`). The site description is
//! read from the package descriptor (`package.json`), discovered in the
//! current directory or its parents unless a path is given.
//!
//! Loading is all-or-nothing: the result is either a fully validated
//! [`SiteConfig`] or a [`ConfigError`] naming the offending file or field.
//! A loaded config is immutable and can be shared by reference between any
//! number of readers.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `title`
//! - `theme.logo`
//! - `theme.repo`
//! - `theme.nav[].link`

mod descriptor;
mod error;
mod expand;
mod head;
mod plugin;
mod theme;
mod validate;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use descriptor::{DESCRIPTOR_FILENAME, PackageDescriptor};
pub use error::{ConfigError, ConfigLoadError, ConfigShapeError};
pub use head::HeadTag;
pub use plugin::{BACK_TO_TOP, MEDIUM_ZOOM, Plugin, PluginInit, PluginOptions, PluginRegistry};
pub use theme::{NavLink, SidebarChild, SidebarGroup, ThemeConfig};

use head::HeadTagRaw;
use plugin::PluginEntryRaw;
use theme::ThemeConfigRaw;
use validate::{require_non_empty, require_present};

/// The group's site source, compiled in.
pub const SITE_SOURCE: &str = include_str!("../site.toml");

/// Site source as parsed from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteConfigRaw {
    title: Option<String>,
    #[serde(default)]
    head: Vec<HeadTagRaw>,
    theme: Option<ThemeConfigRaw>,
    #[serde(default)]
    plugins: Vec<PluginEntryRaw>,
}

/// Fully resolved site configuration.
///
/// Serializes to the camelCase shape the site engine reads
/// (`themeConfig`, `editLinks`, ...).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    title: String,
    description: String,
    head: Vec<HeadTag>,
    theme_config: ThemeConfig,
    plugins: Vec<Plugin>,
}

impl SiteConfig {
    /// Load the bundled site source with the builtin plugin registry.
    ///
    /// `descriptor` is the package descriptor path; when `None`, `package.json`
    /// is searched for in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the descriptor is missing, malformed or
    /// lacks `description`, and `ConfigError::Shape` if the site source
    /// violates a shape rule.
    pub fn load(descriptor: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_registry(SITE_SOURCE, descriptor, &PluginRegistry::builtin())
    }

    /// Load a site source file instead of the bundled one.
    pub fn load_from_file(source: &Path, descriptor: Option<&Path>) -> Result<Self, ConfigError> {
        let content = read_source(source)?;
        Self::load_with_registry(&content, descriptor, &PluginRegistry::builtin())
    }

    /// Load `source` resolving plugins against `registry`.
    pub fn load_with_registry(
        source: &str,
        descriptor: Option<&Path>,
        registry: &PluginRegistry,
    ) -> Result<Self, ConfigError> {
        let descriptor = PackageDescriptor::load(descriptor)?;
        let config = Self::from_source(source, &descriptor.description, registry)?;

        tracing::info!(
            title = %config.title,
            descriptor = %descriptor.path.display(),
            nav = config.theme_config.nav().len(),
            plugins = config.plugins.len(),
            "Loaded site configuration"
        );

        Ok(config)
    }

    /// Build from an in-memory source and an already known description.
    ///
    /// Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns `ConfigShapeError` if the source does not parse or a field is
    /// absent or malformed.
    pub fn from_source(
        source: &str,
        description: &str,
        registry: &PluginRegistry,
    ) -> Result<Self, ConfigShapeError> {
        let raw: SiteConfigRaw = toml::from_str(source)?;

        let title = require_present(raw.title, "title")?;
        let title = expand::expand_env(&title, "title")?;
        require_non_empty(&title, "title")?;
        require_non_empty(description, "description")?;

        let head = raw
            .head
            .into_iter()
            .enumerate()
            .map(|(i, tag)| HeadTag::from_raw(tag, i))
            .collect::<Result<Vec<_>, _>>()?;

        let theme_config = ThemeConfig::from_raw(require_present(raw.theme, "theme")?)?;
        let plugins = registry.resolve(raw.plugins)?;

        Ok(Self {
            title,
            description: description.to_owned(),
            head,
            theme_config,
            plugins,
        })
    }

    /// Site display name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Site tagline, from the package descriptor.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Extra `<head>` elements in source order.
    #[must_use]
    pub fn head(&self) -> &[HeadTag] {
        &self.head
    }

    /// Theme configuration.
    #[must_use]
    pub fn theme_config(&self) -> &ThemeConfig {
        &self.theme_config
    }

    /// Plugins in activation order.
    #[must_use]
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Render the `<head>` elements as HTML, one per line.
    #[must_use]
    pub fn head_html(&self) -> String {
        self.head
            .iter()
            .map(HeadTag::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn read_source(path: &Path) -> Result<String, ConfigLoadError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigLoadError::NotFound(path.to_path_buf())
        } else {
            ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
