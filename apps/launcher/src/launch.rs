//! Resolves the launch configuration and starts the engine.

use std::path::Path;
use std::process::{Command, ExitCode};

use anyhow::Context;
use serde::Serialize;
use xash_game_library::{
    InstalledGame, PermissionReport, normalize_permissions, scan_games, storage_summary,
};
use xash_launch_config::{
    FsProbe, ResolutionEncoding, ResolvedLaunchConfig, ResolverOptions, StorageRoots,
    StoredSettings, keys, resolve,
};
use xash_preferences::Preferences;

use crate::cli::Cli;

/// Installed games, as printed by `--list-games --print`.
#[derive(Debug, Serialize)]
pub struct LibraryListing {
    pub storage: String,
    pub games: Vec<InstalledGame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSummary>,
}

/// Permission normalization outcome per storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSummary {
    pub internal: PermissionReport,
    pub external: PermissionReport,
}

pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let roots = cli.roots();
    let prefs = load_preferences(cli);

    let permissions = cli.fix_permissions.then(|| fix_permissions(&roots));

    if cli.list_games {
        let listing = library_listing(&roots, &prefs, permissions);
        if cli.print {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("{}", listing.storage);
            for game in &listing.games {
                println!(
                    "{}\t{}\t{}",
                    game.name,
                    game.display_name(),
                    game.basedir.display()
                );
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let options = resolver_options(cli, &prefs);
    let config = resolve(&cli.request(), &prefs, &FsProbe, &roots, &cli.display, &options);

    if cli.print {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    spawn(&cli.engine, &config)
}

fn fix_permissions(roots: &StorageRoots) -> PermissionSummary {
    let summary = PermissionSummary {
        internal: normalize_permissions(&roots.app_private),
        external: normalize_permissions(&roots.shared_basedir()),
    };
    tracing::info!(
        updated = summary.internal.updated + summary.external.updated,
        failures = summary.internal.failures + summary.external.failures,
        "game permissions normalized"
    );
    summary
}

fn library_listing(
    roots: &StorageRoots,
    prefs: &Preferences,
    permissions: Option<PermissionSummary>,
) -> LibraryListing {
    let settings = StoredSettings::load(prefs);
    LibraryListing {
        storage: storage_summary(roots, settings.use_internal_storage),
        games: scan_games(roots),
        permissions,
    }
}

fn load_preferences(cli: &Cli) -> Preferences {
    let path = cli
        .prefs
        .clone()
        .unwrap_or_else(xash_preferences::default_path);

    match Preferences::load(&path) {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load preferences, using defaults"
            );
            Preferences::new(path)
        }
    }
}

/// The command-line flag wins over the stored preference.
fn resolver_options(cli: &Cli, prefs: &Preferences) -> ResolverOptions {
    let resolution_encoding = cli.resolution_encoding.unwrap_or_else(|| {
        let raw = prefs.string(keys::RESOLUTION_ENCODING, "");
        if raw.is_empty() {
            return ResolutionEncoding::default();
        }
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored resolution encoding");
            ResolutionEncoding::default()
        })
    });

    ResolverOptions {
        resolution_encoding,
    }
}

/// Builds the engine process command for a resolved configuration.
pub fn engine_command(engine: &Path, config: &ResolvedLaunchConfig) -> Command {
    let mut command = Command::new(engine);
    command.args(&config.argv).envs(&config.environment);
    command
}

fn spawn(engine: &Path, config: &ResolvedLaunchConfig) -> anyhow::Result<ExitCode> {
    tracing::info!(
        engine = %engine.display(),
        gamedir = %config.gamedir,
        basedir = %config.basedir.display(),
        argv = ?config.argv,
        "starting engine"
    );

    let status = engine_command(engine, config)
        .status()
        .with_context(|| format!("failed to start engine {}", engine.display()))?;

    if !status.success() {
        tracing::warn!(%status, "engine exited with failure");
    }

    Ok(status.code().map(exit_code).unwrap_or(ExitCode::FAILURE))
}

/// Maps an engine exit status to ours. Codes outside 0..=255 are failures.
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
