//! Launcher preferences stored as a flat TOML table.
//!
//! Mirrors the key/value preference store of the Android launcher:
//! every value is looked up by key and read through a typed accessor
//! that falls back to a caller-supplied default.
//!
//! Default location:
//! - `$XDG_CONFIG_HOME/xash/app_preferences.toml`
//! - `~/.config/xash/app_preferences.toml` otherwise

mod error;
mod store;

pub use error::PreferencesError;
pub use store::Preferences;

/// File name of the preferences table.
pub const PREFERENCES_FILE: &str = "app_preferences.toml";

/// Returns the default preferences path.
pub fn default_path() -> std::path::PathBuf {
    config_dir().join("xash").join(PREFERENCES_FILE)
}

fn config_dir() -> std::path::PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return std::path::PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    std::path::PathBuf::from(home).join(".config")
}
