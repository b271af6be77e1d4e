//! The launch resolution pipeline.
//!
//! Base directory first, then the environment, then the argument line.
//! Each step is a free function so callers can run them separately;
//! [`resolve`] runs them all once settings and display metrics are read.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::args::{ArgLine, needs_legacy_dll};
use crate::display::{
    DisplayMetricsProvider, ResolutionOverride, ResolutionSource, compute_resolution_override,
};
use crate::probe::{DirectoryProbe, StorageRoots};
use crate::request::LaunchRequest;
use crate::settings::{SettingsStore, StoredSettings};
use crate::{DEFAULT_GAMEDIR, env};

/// How a resolution override is handed to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionEncoding {
    /// `-width W -height H` on the command line.
    #[default]
    Argv,
    /// SDL/Xash window size variables in the environment.
    Environment,
    /// Both of the above.
    Both,
}

impl ResolutionEncoding {
    pub fn uses_argv(self) -> bool {
        matches!(self, Self::Argv | Self::Both)
    }

    pub fn uses_environment(self) -> bool {
        matches!(self, Self::Environment | Self::Both)
    }
}

impl fmt::Display for ResolutionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argv => write!(f, "argv"),
            Self::Environment => write!(f, "environment"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl FromStr for ResolutionEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argv" | "args" => Ok(Self::Argv),
            "env" | "environment" => Ok(Self::Environment),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown resolution encoding: {other}")),
        }
    }
}

/// Knobs that are not part of the persisted settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub resolution_encoding: ResolutionEncoding,
}

/// Everything the native layer needs to start the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLaunchConfig {
    pub gamedir: String,
    pub basedir: PathBuf,
    pub environment: BTreeMap<String, String>,
    pub argv: Vec<String>,
    /// Render size the video layer should use instead of the display's.
    pub resolution: Option<ResolutionOverride>,
    /// Forward volume/camera/zoom keys to the engine.
    pub use_volume_keys: bool,
    /// Package whose assets back this launch.
    pub calling_package: Option<String>,
}

/// Picks the root directory the engine searches for `gamedir`.
///
/// An installed copy in app-private storage wins over one in
/// `<shared>/xash`. When neither exists the storage toggle decides.
pub fn resolve_base_directory<P: DirectoryProbe + ?Sized>(
    gamedir: &str,
    probe: &P,
    roots: &StorageRoots,
    settings: &StoredSettings,
) -> PathBuf {
    let internal = roots.app_private.join(gamedir);
    if probe_dir(probe, &internal) {
        tracing::debug!(path = %internal.display(), "game found in internal storage");
        return roots.app_private.clone();
    }

    let shared = roots.shared_basedir();
    let external = shared.join(gamedir);
    if probe_dir(probe, &external) {
        tracing::debug!(path = %external.display(), "game found in external storage");
        return shared;
    }

    let basedir = roots.preferred(settings.use_internal_storage);
    tracing::debug!(
        gamedir,
        internal = settings.use_internal_storage,
        basedir = %basedir.display(),
        "game not found, using default storage"
    );
    basedir
}

fn probe_dir<P: DirectoryProbe + ?Sized>(probe: &P, path: &Path) -> bool {
    match probe.is_dir(path) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "directory probe failed");
            false
        }
    }
}

/// Builds the environment of the engine process.
///
/// Window and resolution hints come before the caller-supplied pairs, so
/// the caller may replace them as well as the engine variables. The
/// `SDL_VIDEO_FORCE_*` pair of a fixed override is applied last.
pub fn build_environment(
    request: &LaunchRequest,
    basedir: &Path,
    resolution: Option<&ResolutionOverride>,
    options: &ResolverOptions,
) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert(env::BASEDIR.to_string(), basedir.to_string_lossy().into_owned());
    vars.insert(env::GAME.to_string(), request.gamedir().to_string());

    if let Some(dir) = &request.gamelibdir {
        vars.insert(env::GAMELIBDIR.to_string(), dir.clone());
    }
    if let Some(pak) = &request.pakfile {
        vars.insert(env::EXTRAS_PAK2.to_string(), pak.clone());
    }

    let hinted = resolution.filter(|_| options.resolution_encoding.uses_environment());
    if let Some(res) = hinted {
        let (w, h) = (res.width.to_string(), res.height.to_string());
        vars.insert(env::SDL_WINDOW_WIDTH.to_string(), w.clone());
        vars.insert(env::SDL_WINDOW_HEIGHT.to_string(), h.clone());
        vars.insert(env::RESOLUTION_WIDTH.to_string(), w);
        vars.insert(env::RESOLUTION_HEIGHT.to_string(), h);
    }

    for (key, value) in &request.env {
        vars.insert(key.clone(), value.clone());
    }

    if let Some(res) = hinted.filter(|res| res.source == ResolutionSource::Fixed) {
        vars.insert(env::SDL_FORCE_WIDTH.to_string(), res.width.to_string());
        vars.insert(env::SDL_FORCE_HEIGHT.to_string(), res.height.to_string());
    }

    vars
}

/// Builds the engine argument vector.
pub fn build_argv(
    request: &LaunchRequest,
    settings: &StoredSettings,
    resolution: Option<&ResolutionOverride>,
    options: &ResolverOptions,
) -> Vec<String> {
    let gamedir = request.gamedir();
    let mut line = ArgLine::new(request.argv());

    if let Some(res) = resolution.filter(|_| options.resolution_encoding.uses_argv()) {
        line.append(&format!("-width {} -height {}", res.width, res.height));
    }

    if !settings.global_arguments.is_empty() {
        tracing::debug!(args = %settings.global_arguments, "global arguments found");
        line.merge(&settings.global_arguments);
    }

    if !line.has_flag("-game") && gamedir != DEFAULT_GAMEDIR {
        line.append(&format!("-game {gamedir}"));
    }

    if !line.has_flag("-dll") && request.gamelibdir.is_none() && needs_legacy_dll(gamedir) {
        line.append("-dll @hl");
    }

    tracing::debug!(argv = %line, "final argv");
    line.into_argv()
}

/// Resolves the complete launch configuration for `request`.
///
/// Never fails: every capability error degrades to the matching default.
pub fn resolve<S, P, D>(
    request: &LaunchRequest,
    store: &S,
    probe: &P,
    roots: &StorageRoots,
    display: &D,
    options: &ResolverOptions,
) -> ResolvedLaunchConfig
where
    S: SettingsStore + ?Sized,
    P: DirectoryProbe + ?Sized,
    D: DisplayMetricsProvider + ?Sized,
{
    let settings = StoredSettings::load(store);
    let gamedir = request.gamedir();

    let basedir = resolve_base_directory(gamedir, probe, roots, &settings);
    tracing::info!(gamedir, basedir = %basedir.display(), "resolved base directory");

    let resolution = compute_resolution_override(&settings, display);
    let environment = build_environment(request, &basedir, resolution.as_ref(), options);
    let argv = build_argv(request, &settings, resolution.as_ref(), options);

    ResolvedLaunchConfig {
        gamedir: gamedir.to_string(),
        basedir,
        environment,
        argv,
        resolution,
        use_volume_keys: request.usevolume,
        calling_package: request.package.clone(),
    }
}
