//! Errors reported by injected platform capabilities.

/// Failure of a settings store, directory probe or display query.
///
/// The resolver never propagates these: each one is logged where it occurs
/// and replaced by the documented default.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("setting `{key}` is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error("setting `{key}` has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("display metrics unavailable: {0}")]
    DisplayUnavailable(String),

    #[error("settings backend error: {0}")]
    Backend(String),
}
