//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use xash_launch_config::{DisplayMetrics, LaunchRequest, ResolutionEncoding, StorageRoots};

#[derive(Debug, Parser)]
#[command(
    name = "xash-launcher",
    version,
    about = "Resolve the Xash3D launch configuration and start the engine"
)]
pub struct Cli {
    /// Game directory to launch (defaults to valve).
    #[arg(long)]
    pub gamedir: Option<String>,

    /// Directory holding the mod's game libraries.
    #[arg(long)]
    pub gamelibdir: Option<String>,

    /// Extra pak file to mount.
    #[arg(long)]
    pub pakfile: Option<String>,

    /// Engine argument line (defaults to "-console -log").
    #[arg(long, allow_hyphen_values = true)]
    pub argv: Option<String>,

    /// Extra environment assignment, repeatable.
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Forward volume keys to the engine.
    #[arg(long)]
    pub usevolume: bool,

    /// Package name of the requesting app.
    #[arg(long)]
    pub package: Option<String>,

    /// Preferences file.
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// App-private storage root.
    #[arg(long)]
    pub internal_root: Option<PathBuf>,

    /// Shared storage root; games are looked up in its `xash` directory.
    #[arg(long)]
    pub shared_root: Option<PathBuf>,

    /// Real display size used for scaled resolutions.
    #[arg(long, value_name = "WxH", value_parser = parse_display)]
    pub display: Option<DisplayMetrics>,

    /// How a resolution override reaches the engine: argv, env or both.
    #[arg(long)]
    pub resolution_encoding: Option<ResolutionEncoding>,

    /// Engine executable.
    #[arg(long, default_value = "xash3d")]
    pub engine: PathBuf,

    /// Print the resolved configuration as JSON instead of launching.
    /// With `--list-games`, print the game library as JSON.
    #[arg(long)]
    pub print: bool,

    /// List installed games and exit.
    #[arg(long)]
    pub list_games: bool,

    /// Open up permissions of official game directories before launching.
    #[arg(long)]
    pub fix_permissions: bool,
}

impl Cli {
    pub fn request(&self) -> LaunchRequest {
        LaunchRequest {
            gamedir: self.gamedir.clone(),
            gamelibdir: self.gamelibdir.clone(),
            pakfile: self.pakfile.clone(),
            argv: self.argv.clone(),
            env: self.env.clone(),
            usevolume: self.usevolume,
            package: self.package.clone(),
        }
    }

    pub fn roots(&self) -> StorageRoots {
        StorageRoots::new(
            self.internal_root.clone().unwrap_or_else(default_internal_root),
            self.shared_root.clone().unwrap_or_else(home_dir),
        )
    }
}

/// `$XDG_DATA_HOME/xash`, or `~/.local/share/xash`.
fn default_internal_root() -> PathBuf {
    std::env::var_os("XDG_DATA_HOME")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local/share"))
        .join("xash")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn parse_display(raw: &str) -> Result<DisplayMetrics, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if width == 0 || height == 0 {
        return Err("display size must be non-zero".into());
    }
    Ok(DisplayMetrics::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_pair_parsing() {
        assert_eq!(
            parse_env_pair("LIBGL_DEBUG=1"),
            Ok(("LIBGL_DEBUG".to_string(), "1".to_string()))
        );
        assert_eq!(
            parse_env_pair("OPTS=a=b"),
            Ok(("OPTS".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_env_pair("EMPTY="), Ok(("EMPTY".to_string(), String::new())));
        assert!(parse_env_pair("=value").is_err());
        assert!(parse_env_pair("novalue").is_err());
    }

    #[test]
    fn display_parsing() {
        assert_eq!(parse_display("1920x1080"), Ok(DisplayMetrics::new(1920, 1080)));
        assert_eq!(parse_display("2340X1080"), Ok(DisplayMetrics::new(2340, 1080)));
        assert!(parse_display("1920").is_err());
        assert!(parse_display("0x1080").is_err());
        assert!(parse_display("wide x tall").is_err());
    }

    #[test]
    fn builds_request_from_flags() {
        let cli = Cli::parse_from([
            "xash-launcher",
            "--gamedir",
            "bshift",
            "--argv",
            "-dev 2",
            "--env",
            "A=1",
            "--env",
            "B=2",
            "--usevolume",
            "--internal-root",
            "/private",
            "--shared-root",
            "/shared",
            "--resolution-encoding",
            "both",
        ]);

        let request = cli.request();
        assert_eq!(request.gamedir(), "bshift");
        assert_eq!(request.argv(), "-dev 2");
        assert_eq!(
            request.env,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
        assert!(request.usevolume);
        assert_eq!(cli.roots(), StorageRoots::new("/private", "/shared"));
        assert_eq!(cli.resolution_encoding, Some(ResolutionEncoding::Both));
        assert!(!cli.print);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
