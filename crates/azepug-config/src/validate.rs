//! Shape checks shared by the configuration sections.

use crate::ConfigShapeError;

/// Require a field to be present.
pub(crate) fn require_present<T>(value: Option<T>, field: &str) -> Result<T, ConfigShapeError> {
    value.ok_or_else(|| ConfigShapeError::invalid(field, "is required"))
}

/// Require a string field to be non-empty.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigShapeError> {
    if value.trim().is_empty() {
        return Err(ConfigShapeError::invalid(field, "cannot be empty"));
    }
    Ok(())
}

/// Require a link target: an http(s) URL with a host, or a root-relative path.
pub(crate) fn require_link(value: &str, field: &str) -> Result<(), ConfigShapeError> {
    require_non_empty(value, field)?;
    require_no_whitespace(value, field)?;

    if value.starts_with('/') {
        return Ok(());
    }

    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigShapeError::invalid(
                field,
                format!("'{value}' must start with / or http:// or https://"),
            )
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(ConfigShapeError::invalid(
            field,
            format!("'{value}' has no host"),
        ));
    }
    Ok(())
}

/// Require a path relative to its sidebar section (empty means the index).
pub(crate) fn require_relative_path(value: &str, field: &str) -> Result<(), ConfigShapeError> {
    require_no_whitespace(value, field)?;
    if value.starts_with('/') {
        return Err(ConfigShapeError::invalid(
            field,
            format!("'{value}' must be relative to the sidebar section"),
        ));
    }
    Ok(())
}

fn require_no_whitespace(value: &str, field: &str) -> Result<(), ConfigShapeError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigShapeError::invalid(
            field,
            format!("'{value}' cannot contain whitespace"),
        ));
    }
    Ok(())
}
