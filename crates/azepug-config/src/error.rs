//! Configuration error types.

use std::path::PathBuf;

/// Configuration error.
///
/// Loading is all-or-nothing: any error aborts the load and no partially
/// populated [`SiteConfig`](crate::SiteConfig) is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An input file is missing, unreadable or lacks a required field.
    #[error(transparent)]
    Load(#[from] ConfigLoadError),
    /// The site source is malformed or violates a shape rule.
    #[error(transparent)]
    Shape(#[from] ConfigShapeError),
}

/// Failure to read an input file (the package descriptor or a site source).
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading a file.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Descriptor is not valid JSON.
    #[error("Malformed package descriptor {}: {source}", .path.display())]
    Parse {
        /// Descriptor path.
        path: PathBuf,
        /// JSON parse error.
        source: serde_json::Error,
    },
    /// Descriptor lacks a required field, or the field is empty.
    #[error("Package descriptor {} is missing field `{field}`", .path.display())]
    MissingField {
        /// Descriptor path.
        path: PathBuf,
        /// Name of the missing field (e.g., "description").
        field: String,
    },
}

/// A site source field is absent or malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigShapeError {
    /// TOML parsing error (syntax or type mismatch).
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Field value violates a shape rule.
    #[error("Invalid {field}: {message}")]
    Invalid {
        /// Field path (e.g., "`theme.nav[2].link`").
        field: String,
        /// What is wrong with the value.
        message: String,
    },
    /// Plugin identifier has no registered initializer.
    #[error("Unknown plugin in {field}: {id}")]
    UnknownPlugin {
        /// Field path (e.g., "`plugins[1]`").
        field: String,
        /// Plugin identifier as written in the source.
        id: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Field path (e.g., "`theme.repo`").
        field: String,
        /// Error message (e.g., "${`REPO_URL`} not set").
        message: String,
    },
}

impl ConfigShapeError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field path the error refers to, when it names one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Parse(_) => None,
            Self::Invalid { field, .. }
            | Self::UnknownPlugin { field, .. }
            | Self::EnvVar { field, .. } => Some(field),
        }
    }
}
