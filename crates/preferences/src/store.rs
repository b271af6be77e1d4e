use std::path::{Path, PathBuf};

use toml::{Table, Value};
use xash_launch_config::{CapabilityError, SettingsStore, parse_bool};

use crate::PreferencesError;

/// A preferences table bound to a file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    path: PathBuf,
    values: Table,
}

impl Preferences {
    /// Creates an empty table that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Table::new(),
        }
    }

    /// Loads preferences from `path`. A missing file yields an empty table.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Self::new(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let values: Table = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), keys = values.len(), "preferences loaded");
        Ok(Self { path, values })
    }

    /// Writes the table back to its file.
    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns the string stored under `key`, or `default`.
    pub fn string(&self, key: &str, default: &str) -> String {
        or_default(key, self.get_string(key)).unwrap_or_else(|| default.to_string())
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        or_default(key, self.get_int(key)).unwrap_or(default)
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        or_default(key, self.get_float(key)).unwrap_or(default)
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        or_default(key, self.get_bool(key)).unwrap_or(default)
    }
}

fn or_default<T>(key: &str, value: Result<Option<T>, CapabilityError>) -> Option<T> {
    value.unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "ignoring preference");
        None
    })
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> CapabilityError {
    CapabilityError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_str(),
    }
}

fn malformed(key: &str, raw: &str, reason: impl std::fmt::Display) -> CapabilityError {
    CapabilityError::Malformed {
        key: key.to_string(),
        reason: format!("{raw:?}: {reason}"),
    }
}

impl SettingsStore for Preferences {
    fn get_string(&self, key: &str) -> Result<Option<String>, CapabilityError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Integer(i)) => Ok(Some(i.to_string())),
            Some(Value::Float(f)) => Ok(Some(f.to_string())),
            Some(other) => Err(mismatch(key, "string", other)),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, CapabilityError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => parse_bool(key, s).map(Some),
            Some(other) => Err(mismatch(key, "boolean", other)),
        }
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>, CapabilityError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| malformed(key, s, e)),
            Some(other) => Err(mismatch(key, "integer", other)),
        }
    }

    fn get_float(&self, key: &str) -> Result<Option<f64>, CapabilityError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(Value::Integer(i)) => Ok(Some(*i as f64)),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| malformed(key, s, e)),
            Some(other) => Err(mismatch(key, "float", other)),
        }
    }
}
