//! `${VAR}` expansion for site source strings.

use crate::ConfigShapeError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Bare `$VAR` is left as written, so literal dollar signs in URLs survive.
/// An unterminated `${` is also kept verbatim.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigShapeError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len + 1;
        expanded.push_str(&rest[..start]);
        expanded.push_str(&expand_span(&rest[start..end], field)?);
        rest = &rest[end..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Expand a single `${...}` span.
fn expand_span(span: &str, field: &str) -> Result<String, ConfigShapeError> {
    shellexpand::env_with_context(span, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigShapeError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);
