//! Launch configuration resolution for the Xash3D engine.
//!
//! Turns a [`LaunchRequest`], persisted settings, storage probes and display
//! metrics into a [`ResolvedLaunchConfig`]: the base directory the engine
//! searches for game content, the environment the native process starts
//! with, and its argument vector.
//!
//! Platform access is injected through [`SettingsStore`], [`DirectoryProbe`]
//! and [`DisplayMetricsProvider`], so resolution itself never touches global
//! state and never fails.

mod args;
mod display;
mod error;
mod probe;
mod request;
mod resolver;
mod settings;

pub use args::{ArgLine, LEGACY_MOD_GAMEDIRS, needs_legacy_dll};
pub use display::{
    DisplayMetrics, DisplayMetricsProvider, MAX_SCALED_DIMENSION, MIN_HEIGHT, MIN_WIDTH,
    ResolutionOverride, ResolutionSource, compute_resolution_override,
};
pub use error::CapabilityError;
pub use probe::{DirectoryProbe, FsProbe, StorageRoots};
pub use request::LaunchRequest;
pub use resolver::{
    ResolutionEncoding, ResolvedLaunchConfig, ResolverOptions, build_argv, build_environment,
    resolve, resolve_base_directory,
};
pub use settings::{SettingsStore, StoredSettings, keys, parse_bool};

/// Game directory used when the request does not name one.
pub const DEFAULT_GAMEDIR: &str = "valve";

/// Engine arguments used when the request carries no argv override.
pub const DEFAULT_ARGV: &str = "-console -log";

/// Directory under the shared storage root that holds game content.
pub const SHARED_SUBDIR: &str = "xash";

/// Environment variables read by the native engine.
pub mod env {
    pub const BASEDIR: &str = "XASH3D_BASEDIR";
    pub const GAME: &str = "XASH3D_GAME";
    pub const GAMELIBDIR: &str = "XASH3D_GAMELIBDIR";
    pub const EXTRAS_PAK2: &str = "XASH3D_EXTRAS_PAK2";

    pub const SDL_WINDOW_WIDTH: &str = "SDL_VIDEO_WINDOW_WIDTH";
    pub const SDL_WINDOW_HEIGHT: &str = "SDL_VIDEO_WINDOW_HEIGHT";
    pub const SDL_FORCE_WIDTH: &str = "SDL_VIDEO_FORCE_WIDTH";
    pub const SDL_FORCE_HEIGHT: &str = "SDL_VIDEO_FORCE_HEIGHT";
    pub const RESOLUTION_WIDTH: &str = "XASH_RESOLUTION_WIDTH";
    pub const RESOLUTION_HEIGHT: &str = "XASH_RESOLUTION_HEIGHT";
}
