//! Plugin registry.
//!
//! Plugin identifiers in the site source are resolved against a
//! [`PluginRegistry`] while loading. Each identifier maps to an initializer
//! that validates the plugin's options and fills in defaults, so an unknown
//! plugin or a bad option fails the load instead of surfacing later in the
//! engine.
//!
//! ```toml
//! plugins = [
//!     "@vuepress/plugin-back-to-top",
//!     ["@vuepress/plugin-medium-zoom", { selector = ".content img" }],
//! ]
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ConfigShapeError;

/// "Back to top" button plugin.
pub const BACK_TO_TOP: &str = "@vuepress/plugin-back-to-top";

/// Image zoom plugin.
pub const MEDIUM_ZOOM: &str = "@vuepress/plugin-medium-zoom";

/// Images the zoom plugin attaches to unless `selector` is set.
const DEFAULT_ZOOM_SELECTOR: &str = ".theme-default-content :not(a) > img";

/// Plugin options as a JSON object.
pub type PluginOptions = Map<String, Value>;

/// Plugin initializer: validates options and returns them with defaults
/// applied. The error message is reported against the plugin's entry.
pub type PluginInit = fn(PluginOptions) -> Result<PluginOptions, String>;

/// Plugin entry as written in the site source.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PluginEntryRaw {
    Id(String),
    WithOptions(String, toml::Table),
}

/// A resolved plugin, ready for activation.
#[derive(Clone, Debug, PartialEq)]
pub struct Plugin {
    id: String,
    options: PluginOptions,
}

impl Plugin {
    /// Plugin identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Options after defaults were applied.
    #[must_use]
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }
}

impl Serialize for Plugin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            return serializer.serialize_str(&self.id);
        }
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.id)?;
        tuple.serialize_element(&self.options)?;
        tuple.end()
    }
}

/// Maps plugin identifiers to initializers.
#[derive(Clone, Debug)]
pub struct PluginRegistry {
    inits: BTreeMap<String, PluginInit>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PluginRegistry {
    /// Registry with no plugins.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inits: BTreeMap::new(),
        }
    }

    /// Registry with the plugins the site uses.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(BACK_TO_TOP, init_back_to_top);
        registry.register(MEDIUM_ZOOM, init_medium_zoom);
        registry
    }

    /// Register an initializer, returning the one it replaces.
    pub fn register(&mut self, id: impl Into<String>, init: PluginInit) -> Option<PluginInit> {
        self.inits.insert(id.into(), init)
    }

    /// Whether `id` has an initializer.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.inits.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.inits.keys().map(String::as_str)
    }

    /// Resolve source entries in order.
    pub(crate) fn resolve(
        &self,
        entries: Vec<PluginEntryRaw>,
    ) -> Result<Vec<Plugin>, ConfigShapeError> {
        let mut plugins: Vec<Plugin> = Vec::with_capacity(entries.len());

        for (i, entry) in entries.into_iter().enumerate() {
            let field = format!("plugins[{i}]");
            let (id, options) = match entry {
                PluginEntryRaw::Id(id) => (id, PluginOptions::new()),
                PluginEntryRaw::WithOptions(id, table) => {
                    let options = table_to_options(table, &field)?;
                    (id, options)
                }
            };

            let init = self
                .inits
                .get(&id)
                .ok_or_else(|| ConfigShapeError::UnknownPlugin {
                    field: field.clone(),
                    id: id.clone(),
                })?;

            if let Some(first) = plugins.iter().position(|p| p.id == id) {
                return Err(ConfigShapeError::invalid(
                    field,
                    format!("'{id}' duplicates plugins[{first}]"),
                ));
            }

            let options = init(options)
                .map_err(|message| ConfigShapeError::invalid(&field, format!("{id}: {message}")))?;
            tracing::debug!(plugin = %id, "Resolved plugin");

            plugins.push(Plugin { id, options });
        }

        Ok(plugins)
    }
}

fn table_to_options(table: toml::Table, field: &str) -> Result<PluginOptions, ConfigShapeError> {
    match serde_json::to_value(table) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigShapeError::invalid(field, "options must be a table")),
        Err(e) => Err(ConfigShapeError::invalid(
            field,
            format!("options cannot be represented as JSON: {e}"),
        )),
    }
}

fn init_back_to_top(options: PluginOptions) -> Result<PluginOptions, String> {
    if let Some(key) = options.keys().next() {
        return Err(format!("takes no options, got '{key}'"));
    }
    Ok(options)
}

fn init_medium_zoom(mut options: PluginOptions) -> Result<PluginOptions, String> {
    if let Some(key) = options
        .keys()
        .find(|key| !matches!(key.as_str(), "selector" | "options"))
    {
        return Err(format!("unknown option '{key}'"));
    }

    match options.get("selector") {
        None => {
            options.insert("selector".to_owned(), Value::from(DEFAULT_ZOOM_SELECTOR));
        }
        Some(Value::String(selector)) if !selector.trim().is_empty() => {}
        Some(_) => return Err("selector must be a non-empty string".to_owned()),
    }

    if let Some(zoom) = options.get("options")
        && !zoom.is_object()
    {
        return Err("options must be a table".to_owned());
    }

    Ok(options)
}
