//! `${VAR}` and `${VAR:-default}` expansion in config values.
//!
//! Only the braced form is recognised; `$VAR` is kept literally. A braced
//! reference to an unset variable without a default is an error.

use std::env::VarError;

use crate::ConfigError;

/// Expand references in `value` from the process environment.
///
/// `field` names the config key in error messages, e.g. `kroki.url`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |name| {
        lookup(name).map(Some).ok_or(VarError::NotPresent)
    })
    .map_err(|err| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", err.var_name),
    })?;
    Ok(expanded.into_owned())
}
