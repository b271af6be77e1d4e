//! Engine argument line assembly.

use std::fmt;

/// Mods that ship without a usable mobile game library and run on the
/// Half-Life one instead (`-dll @hl`).
pub const LEGACY_MOD_GAMEDIRS: &[&str] = &[
    "aom",
    "bdlands",
    "biglolly",
    "bshift",
    "caseclosed",
    "hl_urbicide",
    "induction",
    "redempt",
    "secret",
    "sewer_beta",
    "tot",
    "vendetta",
];

/// Returns true if `gamedir` needs the Half-Life game library shim.
pub fn needs_legacy_dll(gamedir: &str) -> bool {
    LEGACY_MOD_GAMEDIRS.contains(&gamedir)
}

/// A growing engine command line.
///
/// Fragments are joined with single spaces; [`into_argv`](Self::into_argv)
/// splits on runs of whitespace so doubled separators never produce empty
/// arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgLine {
    line: String,
}

impl ArgLine {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            line: initial.into(),
        }
    }

    /// Appends a fragment after a single space.
    pub fn append(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        if !self.line.is_empty() {
            self.line.push(' ');
        }
        self.line.push_str(fragment.trim());
    }

    /// Merges user-wide extra arguments.
    ///
    /// A blank line is replaced by `extra`; otherwise `extra` follows the
    /// trimmed line after one space.
    pub fn merge(&mut self, extra: &str) {
        let extra = extra.trim();
        if extra.is_empty() {
            return;
        }
        if self.line.trim().is_empty() {
            self.line = extra.to_string();
        } else {
            self.line = format!("{} {extra}", self.line.trim());
        }
    }

    /// Returns true if any argument equals `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.tokens().any(|t| t == flag)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.line.split_whitespace()
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn into_argv(self) -> Vec<String> {
        self.tokens().map(str::to_string).collect()
    }
}

impl fmt::Display for ArgLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
