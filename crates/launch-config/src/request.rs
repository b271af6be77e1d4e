//! Launch request: the per-launch parameters supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_ARGV, DEFAULT_GAMEDIR};

/// Parameters of a single engine launch.
///
/// Every field is optional; accessors apply the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchRequest {
    /// Game/mod content directory name.
    pub gamedir: Option<String>,
    /// Directory holding the mod's game-logic libraries.
    pub gamelibdir: Option<String>,
    /// Extra pak file mounted by the engine.
    pub pakfile: Option<String>,
    /// Argument line replacing [`DEFAULT_ARGV`].
    pub argv: Option<String>,
    /// Extra environment assignments, applied in order.
    pub env: Vec<(String, String)>,
    /// Whether volume/camera/zoom keys are forwarded to the engine.
    pub usevolume: bool,
    /// Package name of the app that requested the launch.
    pub package: Option<String>,
}

impl LaunchRequest {
    /// Creates a request for the given game directory.
    pub fn for_game(gamedir: impl Into<String>) -> Self {
        Self {
            gamedir: Some(gamedir.into()),
            ..Self::default()
        }
    }

    /// Returns the game directory, defaulting to `valve`.
    pub fn gamedir(&self) -> &str {
        self.gamedir.as_deref().unwrap_or(DEFAULT_GAMEDIR)
    }

    /// Returns the argument line, defaulting to `-console -log`.
    pub fn argv(&self) -> &str {
        self.argv.as_deref().unwrap_or(DEFAULT_ARGV)
    }

    /// Replaces the extra environment with pairs decoded from a flat
    /// `[key0, value0, key1, value1, ...]` list.
    ///
    /// A trailing key without a value is dropped.
    pub fn with_flat_env<S: AsRef<str>>(mut self, flat: &[S]) -> Self {
        if flat.len() % 2 != 0 {
            tracing::warn!(
                key = flat[flat.len() - 1].as_ref(),
                "dropping environment key without a value"
            );
        }

        self.env = flat
            .chunks_exact(2)
            .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
            .collect();
        self
    }
}
