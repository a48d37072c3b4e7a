//! Environment variable interpolation
//!
//! Both `$NAME` and `${NAME}` forms are expanded in every string of a YAML
//! document, keys included. Explicitly provided variables (such as
//! `PROJECT_ROOT`) take precedence over the process environment, which is
//! never modified.

use std::collections::BTreeMap;
use std::env::VarError;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

/// Name of the variable holding the project root
pub const PROJECT_ROOT_VAR: &str = "PROJECT_ROOT";

/// Variables available to interpolation in addition to the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolationContext {
    vars: BTreeMap<String, String>,
}

impl InterpolationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable that shadows the environment
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Expose `root` as `PROJECT_ROOT`
    pub fn with_project_root(self, root: &Path) -> Self {
        self.with_var(PROJECT_ROOT_VAR, root.to_string_lossy())
    }

    fn lookup(&self, name: &str) -> std::result::Result<Option<String>, VarError> {
        if let Some(value) = self.vars.get(name) {
            return Ok(Some(value.clone()));
        }
        std::env::var(name).map(Some)
    }
}

/// Expand every variable reference in `value`.
///
/// # Errors
///
/// Returns [`Error::ConfigInvalid`] when a referenced variable is not set.
pub fn interpolate(value: &str, ctx: &InterpolationContext) -> Result<String> {
    shellexpand::env_with_context(value, |name| ctx.lookup(name))
        .map(|expanded| expanded.into_owned())
        .map_err(|e| {
            Error::config_invalid(format!(
                "cannot expand `{}`: variable {} is {}",
                value,
                e.var_name,
                match e.cause {
                    VarError::NotPresent => "not set",
                    VarError::NotUnicode(_) => "not valid unicode",
                }
            ))
        })
}

/// Recursively interpolate every string key and value of a YAML document.
///
/// # Errors
///
/// Fails on an unset variable, or when two keys of the same mapping become
/// equal after expansion.
pub fn interpolate_value(value: Value, ctx: &InterpolationContext) -> Result<Value> {
    Ok(match value {
        Value::String(s) => Value::String(interpolate(&s, ctx)?),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| interpolate_value(item, ctx))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(mapping) => {
            let mut out = Mapping::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = interpolate_value(key, ctx)?;
                if out.contains_key(&key) {
                    return Err(Error::config_invalid(format!(
                        "key {} is declared more than once after variable expansion",
                        describe_key(&key)
                    )));
                }
                let item = interpolate_value(item, ctx)?;
                out.insert(key, item);
            }
            Value::Mapping(out)
        }
        Value::Tagged(mut tagged) => {
            tagged.value = interpolate_value(tagged.value, ctx)?;
            Value::Tagged(tagged)
        }
        other => other,
    })
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    }
}
