use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

const CONFIG_FILE: &str = "config.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Read the config, returning both the parsed config and the raw document
/// for formatting-preserving edits. A missing file is an empty document.
pub fn read_config(todo_dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = todo_dir.join(CONFIG_FILE);
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?
    } else {
        String::new()
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Parsed config only; defaults when the file is missing
pub fn load_config(todo_dir: &Path) -> Result<Config, ConfigError> {
    read_config(todo_dir).map(|(config, _)| config)
}

/// Write the document back, preserving formatting and comments
pub fn write_config(todo_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = todo_dir.join(CONFIG_FILE);
    crate::io::store_io::atomic_write(&path, doc.to_string().as_bytes()).map_err(|e| {
        ConfigError::ReadError {
            path: path.clone(),
            source: e,
        }
    })
}

fn split_key(key: &str) -> Result<(&str, &str), ConfigError> {
    key.split_once('.')
        .filter(|(section, field)| !section.is_empty() && !field.is_empty())
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

/// Effective value of a dotted key such as `drag.long_press_ms`,
/// defaults included
pub fn get_value(config: &Config, key: &str) -> Result<String, ConfigError> {
    let (section, field) = split_key(key)?;
    let value = toml::Value::try_from(config).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    match value.get(section).and_then(|s| s.get(field)) {
        Some(toml::Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ConfigError::UnknownKey(key.to_string())),
    }
}

/// Set a dotted key in the document. The value must have the same type as
/// the field it replaces, and the edited document must still parse.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    raw: &str,
) -> Result<Config, ConfigError> {
    let (section, field) = split_key(key)?;
    let defaults = toml::Value::try_from(Config::default()).map_err(|e| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })?;
    let current = defaults
        .get(section)
        .and_then(|s| s.get(field))
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let value = match current {
        toml::Value::Integer(_) => {
            let n: i64 = raw.parse().map_err(|_| invalid("expected an integer"))?;
            if n < 0 {
                return Err(invalid("must not be negative"));
            }
            toml_edit::value(n)
        }
        toml::Value::Float(_) => {
            toml_edit::value(raw.parse::<f64>().map_err(|_| invalid("expected a number"))?)
        }
        _ => toml_edit::value(raw),
    };

    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[section][field] = value;
    let config: Config = toml::from_str(&doc.to_string())?;
    Ok(config)
}
