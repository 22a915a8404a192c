//! Configuration file upgrades: detect keys missing from an older
//! `libgate.conf` and fill them with their default values.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;

    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

fn default_mapping(database: &str) -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::with_database(database)) {
        Ok(Value::Mapping(map)) => Ok(map),
        _ => Err(AppError::ConfigSave),
    }
}

/// Keys present in the current schema but absent from the file.
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let defaults = default_mapping("")?;

    Ok(defaults
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing key with its default value.
/// Returns `Ok(true)` when the file was rewritten.
pub fn migrate_config_file(path: &Path) -> AppResult<bool> {
    let mut current = read_mapping(path)?;

    let database = current
        .get("database")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Config::database_file().to_string_lossy().to_string());

    let defaults = default_mapping(&database)?;
    let mut added = Vec::new();

    for (k, v) in defaults {
        if !current.contains_key(&k) {
            if let Some(name) = k.as_str() {
                added.push(name.to_string());
            }
            current.insert(k, v);
        }
    }

    if added.is_empty() {
        info("Configuration is up to date.");
        return Ok(false);
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(current)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, yaml)?;

    success(format!("Configuration migrated, added: {}", added.join(", ")));
    Ok(true)
}
