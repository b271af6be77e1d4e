//! Persisted launcher settings and the store they are read from.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::CapabilityError;

/// Preference keys shared with the settings screen.
pub mod keys {
    pub const RESOLUTION_WIDTH: &str = "resolution_width";
    pub const RESOLUTION_HEIGHT: &str = "resolution_height";
    pub const RESOLUTION_SCALE: &str = "resolution_scale";
    pub const GLOBAL_ARGUMENTS: &str = "global_arguments";
    pub const STORAGE_TOGGLE: &str = "storage_toggle";
    pub const RESOLUTION_FIXED: &str = "resolution_fixed";
    pub const RESOLUTION_CUSTOM: &str = "resolution_custom";
    pub const RESOLUTION_ENCODING: &str = "resolution_encoding";
}

/// Typed read access to a persisted key/value store.
///
/// `Ok(None)` means the key is absent. Numeric settings are commonly stored
/// as strings, so the numeric accessors fall back to parsing
/// [`get_string`](Self::get_string).
pub trait SettingsStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, CapabilityError>;

    fn get_bool(&self, key: &str) -> Result<Option<bool>, CapabilityError>;

    fn get_int(&self, key: &str) -> Result<Option<i64>, CapabilityError> {
        self.get_string(key)?
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|e| CapabilityError::Malformed {
                    key: key.to_string(),
                    reason: format!("{raw:?}: {e}"),
                })
            })
            .transpose()
    }

    fn get_float(&self, key: &str) -> Result<Option<f64>, CapabilityError> {
        self.get_string(key)?
            .map(|raw| {
                raw.trim().parse::<f64>().map_err(|e| CapabilityError::Malformed {
                    key: key.to_string(),
                    reason: format!("{raw:?}: {e}"),
                })
            })
            .transpose()
    }
}

/// Parses a boolean stored as text: `true`/`1` or `false`/`0`.
pub fn parse_bool(key: &str, raw: &str) -> Result<bool, CapabilityError> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CapabilityError::Malformed {
            key: key.to_string(),
            reason: format!("{other:?} is not a boolean"),
        }),
    }
}

impl SettingsStore for BTreeMap<String, String> {
    fn get_string(&self, key: &str) -> Result<Option<String>, CapabilityError> {
        Ok(self.get(key).cloned())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, CapabilityError> {
        self.get(key).map(|raw| parse_bool(key, raw)).transpose()
    }
}

impl SettingsStore for HashMap<String, String> {
    fn get_string(&self, key: &str) -> Result<Option<String>, CapabilityError> {
        Ok(self.get(key).cloned())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, CapabilityError> {
        self.get(key).map(|raw| parse_bool(key, raw)).transpose()
    }
}

/// Settings that influence a launch, with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Custom width in pixels, 0 when unset.
    pub resolution_width: u32,
    /// Custom height in pixels, 0 when unset.
    pub resolution_height: u32,
    /// Divisor applied to the real display size, 1.0 when unset.
    pub resolution_scale: f32,
    /// Arguments appended to every launch, already trimmed.
    pub global_arguments: String,
    /// Prefer app-private storage when a game is not installed anywhere.
    pub use_internal_storage: bool,
    /// Render at a non-native resolution.
    pub resolution_fixed: bool,
    /// With `resolution_fixed`, use width/height instead of the scale.
    pub resolution_custom: bool,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            resolution_width: 0,
            resolution_height: 0,
            resolution_scale: 1.0,
            global_arguments: String::new(),
            use_internal_storage: false,
            resolution_fixed: false,
            resolution_custom: false,
        }
    }
}

impl StoredSettings {
    /// Reads every launch setting from `store`.
    ///
    /// Missing keys, store failures and malformed values all resolve to the
    /// default for that key.
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let resolution_width = read_dimension(store, keys::RESOLUTION_WIDTH);
        let resolution_height = read_dimension(store, keys::RESOLUTION_HEIGHT);

        let resolution_scale = match or_default(
            keys::RESOLUTION_SCALE,
            store.get_float(keys::RESOLUTION_SCALE),
            f64::from(defaults.resolution_scale),
        ) {
            s if s.is_finite() && s > 0.0 => s as f32,
            s => {
                tracing::warn!(
                    key = keys::RESOLUTION_SCALE,
                    value = s,
                    "scale must be positive, ignoring"
                );
                defaults.resolution_scale
            }
        };

        let global_arguments = or_default(
            keys::GLOBAL_ARGUMENTS,
            store.get_string(keys::GLOBAL_ARGUMENTS),
            String::new(),
        )
        .trim()
        .to_string();

        Self {
            resolution_width,
            resolution_height,
            resolution_scale,
            global_arguments,
            use_internal_storage: or_default(
                keys::STORAGE_TOGGLE,
                store.get_bool(keys::STORAGE_TOGGLE),
                defaults.use_internal_storage,
            ),
            resolution_fixed: or_default(
                keys::RESOLUTION_FIXED,
                store.get_bool(keys::RESOLUTION_FIXED),
                defaults.resolution_fixed,
            ),
            resolution_custom: or_default(
                keys::RESOLUTION_CUSTOM,
                store.get_bool(keys::RESOLUTION_CUSTOM),
                defaults.resolution_custom,
            ),
        }
    }

    /// Returns true when the scale setting differs from 1.0.
    pub fn has_scale(&self) -> bool {
        self.resolution_scale != 1.0
    }
}

fn read_dimension<S: SettingsStore + ?Sized>(store: &S, key: &str) -> u32 {
    let raw = or_default(key, store.get_int(key), 0);
    u32::try_from(raw).unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, "dimension out of range, ignoring");
        0
    })
}

fn or_default<T>(key: &str, value: Result<Option<T>, CapabilityError>, default: T) -> T {
    match value {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read setting, using default");
            default
        }
    }
}
