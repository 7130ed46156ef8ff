//! Package descriptor (`package.json`) reading.
//!
//! The site description is not part of the site source: it is taken from the
//! `description` field of the package descriptor, so the npm package and the
//! rendered site always advertise the same tagline.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigLoadError;

/// Descriptor filename to search for.
pub const DESCRIPTOR_FILENAME: &str = "package.json";

/// Fields read from the package descriptor.
///
/// Unknown fields (scripts, dependencies, ...) are ignored.
#[derive(Debug, Default, Deserialize)]
struct DescriptorRaw {
    description: Option<String>,
}

/// Package descriptor after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Path the descriptor was read from.
    pub path: PathBuf,
    /// Non-empty description string.
    pub description: String,
}

impl PackageDescriptor {
    /// Read the descriptor at `path`, or discover one when `path` is `None`.
    ///
    /// Discovery walks from the current directory up through its parents
    /// looking for `package.json`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|_| ConfigLoadError::NotFound(PathBuf::from(DESCRIPTOR_FILENAME)))?;
                Self::discover_from(&cwd)
            }
        }
    }

    /// Find the nearest descriptor in `start` or its parents and read it.
    pub fn discover_from(start: &Path) -> Result<Self, ConfigLoadError> {
        let discovered = discover_descriptor(start)
            .ok_or_else(|| ConfigLoadError::NotFound(PathBuf::from(DESCRIPTOR_FILENAME)))?;
        tracing::debug!(path = %discovered.display(), "Discovered package descriptor");
        Self::load_from_file(&discovered)
    }

    /// Read and validate the descriptor at `path`.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigLoadError::NotFound(path.to_path_buf())
            } else {
                ConfigLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&content, path)
    }

    /// Parse descriptor JSON. `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigLoadError> {
        let raw: DescriptorRaw =
            serde_json::from_str(content).map_err(|source| ConfigLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let description = raw
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ConfigLoadError::MissingField {
                path: path.to_path_buf(),
                field: "description".to_owned(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            description,
        })
    }
}

/// Search for the descriptor in `start` and its parents.
fn discover_descriptor(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DESCRIPTOR_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_descriptor(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(DESCRIPTOR_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_descriptor(
            dir.path(),
            r#"{"name": "azepug", "version": "0.0.1", "description": "Python community in Azerbaijan"}"#,
        );

        let descriptor = PackageDescriptor::load(Some(&path)).unwrap();
        assert_eq!(descriptor.description, "Python community in Azerbaijan");
        assert_eq!(descriptor.path, path);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DESCRIPTOR_FILENAME);

        let err = PackageDescriptor::load(Some(&path)).unwrap_err();
        assert!(
            matches!(&err, ConfigLoadError::NotFound(p) if *p == path),
            "Expected NotFound, got {err:?}"
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = PackageDescriptor::parse("{\"description\": ", Path::new("package.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_description_field() {
        let err = PackageDescriptor::parse(r#"{"name": "azepug"}"#, Path::new("package.json"))
            .unwrap_err();
        assert!(
            matches!(&err, ConfigLoadError::MissingField { field, .. } if field == "description"),
            "Expected MissingField, got {err:?}"
        );
    }

    #[test]
    fn test_blank_description_is_missing() {
        let err = PackageDescriptor::parse(r#"{"description": "  "}"#, Path::new("package.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingField { .. }));
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_descriptor(dir.path(), r#"{"description": "Found upward"}"#);
        let nested = dir.path().join("docs/src/.vuepress");
        std::fs::create_dir_all(&nested).unwrap();

        let descriptor = PackageDescriptor::discover_from(&nested).unwrap();
        assert_eq!(descriptor.path, path);
        assert_eq!(descriptor.description, "Found upward");
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(dir.path(), r#"{"description": "Outer"}"#);
        let inner = dir.path().join("docs");
        std::fs::create_dir_all(inner.join("src")).unwrap();
        write_descriptor(&inner, r#"{"description": "Inner"}"#);

        let descriptor = PackageDescriptor::discover_from(&inner.join("src")).unwrap();
        assert_eq!(descriptor.description, "Inner");
    }

    #[test]
    fn test_discover_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        // Only meaningful when no ancestor of the temp dir carries a package.json.
        if discover_descriptor(dir.path()).is_some() {
            return;
        }
        let err = PackageDescriptor::discover_from(&nested).unwrap_err();
        assert!(
            matches!(&err, ConfigLoadError::NotFound(p) if p == Path::new(DESCRIPTOR_FILENAME)),
            "Expected NotFound(package.json), got {err:?}"
        );
    }

    #[test]
    fn test_wrong_description_type() {
        let err = PackageDescriptor::parse(r#"{"description": 42}"#, Path::new("package.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
