//! Opt-in permission normalization for official game directories.
//!
//! Content copied onto shared storage by other tools can end up unreadable
//! for the engine. This makes the known official game directories, and the
//! entries directly inside them, readable, writable and searchable by every
//! user. It broadens access on shared storage, so it only runs when a caller
//! asks for it; base directory resolution never calls it.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Official game directories eligible for normalization.
pub const OFFICIAL_GAMEDIRS: &[&str] = &[
    "valve", "cstrike", "czero", "gearbox", "bshift", "dmc", "hldms", "tfc", "wanted",
];

/// Returns true if `name` is an official game directory (case-insensitive).
pub fn is_official_gamedir(name: &str) -> bool {
    OFFICIAL_GAMEDIRS
        .iter()
        .any(|dir| dir.eq_ignore_ascii_case(name))
}

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReport {
    /// Game directories visited.
    pub directories: usize,
    /// Entries whose permissions were updated.
    pub updated: usize,
    /// Entries that could not be updated.
    pub failures: usize,
}

/// Normalizes permissions of the official game directories under `basedir`.
///
/// Best-effort: failures are counted and logged, never returned.
pub fn normalize_permissions(basedir: &Path) -> PermissionReport {
    let mut report = PermissionReport::default();

    let entries = match std::fs::read_dir(basedir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(
                basedir = %basedir.display(),
                error = %e,
                "skipping permission normalization"
            );
            return report;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_dir || !is_official_gamedir(&name) {
            continue;
        }

        report.directories += 1;
        let game_dir = entry.path();
        record(&mut report, &game_dir);

        match std::fs::read_dir(&game_dir) {
            Ok(children) => {
                for child in children.filter_map(|c| c.ok()) {
                    record(&mut report, &child.path());
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %game_dir.display(),
                    error = %e,
                    "failed to list game directory"
                );
                report.failures += 1;
            }
        }
    }

    tracing::info!(
        basedir = %basedir.display(),
        directories = report.directories,
        updated = report.updated,
        failures = report.failures,
        "permission normalization finished"
    );
    report
}

fn record(report: &mut PermissionReport, path: &Path) {
    match open_up(path) {
        Ok(()) => report.updated += 1,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to update permissions");
            report.failures += 1;
        }
    }
}

#[cfg(unix)]
fn open_up(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode | 0o777))
}

#[cfg(not(unix))]
fn open_up(path: &Path) -> std::io::Result<()> {
    let mut perms = std::fs::metadata(path)?.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}
