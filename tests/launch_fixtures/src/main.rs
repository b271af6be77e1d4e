fn main() {
    println!("Run `cargo test -p launch-fixtures` to execute launch scenario tests.");
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};
    use std::fs;
    use std::path::PathBuf;

    use serde::Deserialize;
    use xash_launch_config::{
        DisplayMetrics, LaunchRequest, ResolverOptions, StorageRoots, resolve,
    };

    /// A recorded launch: inputs plus the configuration they must produce.
    #[derive(Debug, Deserialize)]
    struct Scenario {
        request: LaunchRequest,
        #[serde(default)]
        preferences: BTreeMap<String, String>,
        roots: StorageRoots,
        #[serde(default)]
        existing_dirs: Vec<PathBuf>,
        #[serde(default)]
        display: Option<DisplayMetrics>,
        #[serde(default)]
        options: ResolverOptions,
        expected: Expected,
    }

    #[derive(Debug, Deserialize)]
    struct Expected {
        basedir: PathBuf,
        argv: Vec<String>,
        /// Entries that must be present with exactly these values.
        #[serde(default)]
        environment: BTreeMap<String, String>,
        /// Keys that must not be set.
        #[serde(default)]
        absent_environment: Vec<String>,
    }

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file into a [`Scenario`].
    fn load_scenario(name: &str) -> Scenario {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Resolves a scenario twice and checks both results against the
    /// expectation.
    fn run_scenario(name: &str) {
        let scenario = load_scenario(name);
        let probe: HashSet<PathBuf> = scenario.existing_dirs.iter().cloned().collect();

        let config = resolve(
            &scenario.request,
            &scenario.preferences,
            &probe,
            &scenario.roots,
            &scenario.display,
            &scenario.options,
        );
        let again = resolve(
            &scenario.request,
            &scenario.preferences,
            &probe,
            &scenario.roots,
            &scenario.display,
            &scenario.options,
        );
        assert_eq!(config, again, "{name}: resolution is not deterministic");

        let expected = &scenario.expected;
        assert_eq!(config.basedir, expected.basedir, "{name}: basedir");
        assert_eq!(config.argv, expected.argv, "{name}: argv");
        assert!(
            config.argv.iter().all(|a| !a.is_empty()),
            "{name}: empty argument in {:?}",
            config.argv
        );

        for (key, value) in &expected.environment {
            assert_eq!(
                config.environment.get(key),
                Some(value),
                "{name}: environment {key}"
            );
        }
        for key in &expected.absent_environment {
            assert!(
                !config.environment.contains_key(key),
                "{name}: unexpected environment {key}"
            );
        }
    }

    /// Every fixture file must be covered by a test below.
    #[test]
    fn all_fixtures_are_listed() {
        let mut found: Vec<String> = fs::read_dir(fixtures_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".json"))
            .collect();
        found.sort();

        let mut listed: Vec<String> = ALL.iter().map(|s| s.to_string()).collect();
        listed.sort();
        assert_eq!(found, listed);
    }

    const ALL: &[&str] = &[
        "default_valve.json",
        "internal_storage_wins.json",
        "toggle_fallback.json",
        "legacy_mod_shim.json",
        "explicit_dll.json",
        "fixed_custom_resolution.json",
        "scaled_resolution.json",
        "global_arguments_spacing.json",
        "caller_environment.json",
    ];

    #[test]
    fn fixture_default_valve() {
        run_scenario("default_valve.json");
    }

    #[test]
    fn fixture_internal_storage_wins() {
        run_scenario("internal_storage_wins.json");
    }

    #[test]
    fn fixture_toggle_fallback() {
        run_scenario("toggle_fallback.json");
    }

    #[test]
    fn fixture_legacy_mod_shim() {
        run_scenario("legacy_mod_shim.json");
    }

    #[test]
    fn fixture_explicit_dll() {
        run_scenario("explicit_dll.json");
    }

    #[test]
    fn fixture_fixed_custom_resolution() {
        run_scenario("fixed_custom_resolution.json");
    }

    #[test]
    fn fixture_scaled_resolution() {
        run_scenario("scaled_resolution.json");
    }

    #[test]
    fn fixture_global_arguments_spacing() {
        run_scenario("global_arguments_spacing.json");
    }

    #[test]
    fn fixture_caller_environment() {
        run_scenario("caller_environment.json");
    }
}
