//! Settings loading.
//!
//! Runtime settings are a flat string map (`modules_{hook}` bindings,
//! `admin_actions`, front-page overrides). This module reads them from a
//! YAML mapping of scalars; anything nested is rejected at load time
//! rather than silently stringified.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use agora_dispatch::MapConfig;

use crate::setup::SetupError;

/// Parses a YAML mapping of scalar values into a settings store.
///
/// # Errors
///
/// [`SetupError::Yaml`] when the document is not a mapping;
/// [`SetupError::Config`] when a value is not a scalar.
pub fn settings_from_yaml(raw: &str) -> Result<MapConfig, SetupError> {
    let values: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(raw)?;
    let mut config = MapConfig::new();
    for (key, value) in values {
        let rendered = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            other => {
                return Err(SetupError::Config(format!(
                    "setting {key:?} must be a scalar, got {other:?}"
                )))
            }
        };
        config.set(key, rendered);
    }
    Ok(config)
}

/// Reads and parses a YAML settings file.
///
/// # Errors
///
/// [`SetupError::Io`] when the file cannot be read, plus everything
/// [`settings_from_yaml`] raises.
pub fn settings_from_yaml_file(path: &Path) -> Result<MapConfig, SetupError> {
    settings_from_yaml(&fs::read_to_string(path)?)
}
