//! Game directory scanning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xash_launch_config::{LaunchRequest, StorageRoots};

use crate::LibraryError;

/// Files that mark a directory as game content.
const GAME_MANIFESTS: &[&str] = &["gameinfo.txt", "liblist.gam"];

/// Storage a game was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    Internal,
    External,
}

/// A game directory found under one of the storage roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledGame {
    /// Directory name, used as the engine's gamedir.
    pub name: String,
    /// Title declared by the game manifest.
    pub title: Option<String>,
    /// Root the game directory lives in.
    pub basedir: PathBuf,
    pub location: StorageLocation,
}

impl InstalledGame {
    /// Returns the game's directory.
    pub fn path(&self) -> PathBuf {
        self.basedir.join(&self.name)
    }

    /// Returns the title, falling back to the directory name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Builds a launch request for this game.
    pub fn launch_request(&self) -> LaunchRequest {
        LaunchRequest::for_game(&self.name)
    }
}

/// Lists every installed game, app-private storage first.
///
/// A game present on both roots is reported once, from app-private
/// storage. Roots that cannot be read contribute nothing.
pub fn scan_games(roots: &StorageRoots) -> Vec<InstalledGame> {
    let mut games = list_or_empty(&roots.app_private, StorageLocation::Internal);

    for game in list_or_empty(&roots.shared_basedir(), StorageLocation::External) {
        if games.iter().any(|g| g.name == game.name) {
            tracing::debug!(game = %game.name, "external copy shadowed by internal storage");
            continue;
        }
        games.push(game);
    }

    tracing::info!(count = games.len(), "game library scanned");
    games
}

fn list_or_empty(basedir: &Path, location: StorageLocation) -> Vec<InstalledGame> {
    if !basedir.is_dir() {
        return Vec::new();
    }
    list_games(basedir, location).unwrap_or_else(|e| {
        tracing::warn!(basedir = %basedir.display(), error = %e, "failed to list games");
        Vec::new()
    })
}

/// Lists the game directories directly under `basedir`, sorted by name.
pub fn list_games(
    basedir: &Path,
    location: StorageLocation,
) -> Result<Vec<InstalledGame>, LibraryError> {
    if !basedir.is_dir() {
        return Err(LibraryError::NotADirectory(basedir.to_path_buf()));
    }

    let mut games: Vec<InstalledGame> = std::fs::read_dir(basedir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                return None;
            }
            let manifest = find_manifest(&entry.path())?;
            Some(InstalledGame {
                title: read_title(&manifest),
                name,
                basedir: basedir.to_path_buf(),
                location,
            })
        })
        .collect();

    games.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(games)
}

fn find_manifest(dir: &Path) -> Option<PathBuf> {
    GAME_MANIFESTS
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Reads the `game "Title"` entry of a gameinfo.txt or liblist.gam.
fn read_title(manifest: &Path) -> Option<String> {
    let content = std::fs::read(manifest).ok()?;
    parse_title(&String::from_utf8_lossy(&content))
}

fn parse_title(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("game")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim().trim_matches('"').trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}
