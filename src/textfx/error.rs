//! Error types
//!
//!     Malformed tags, unknown names, failed validation and unbalanced closes are not
//!     errors: the text passes through untouched and processing continues. What remains
//!     here are the failures a caller has to see: a host index map that breaks its contract,
//!     an invalid wave configuration, bad parameter values when asked for a type, and
//!     configuration loading.

use thiserror::Error;

/// Failures of a reconciliation pass. The spans are left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error(
        "index map moved backwards at rendered position {rendered}: original index {found} after {previous}"
    )]
    IndexRegressed {
        rendered: usize,
        previous: usize,
        found: usize,
    },
    #[error("index map skipped rendered positions: expected {expected}, found {found}")]
    RenderedPositionSkipped { expected: usize, found: usize },
    #[error("index map refers to original index {original} in a text of {len} characters")]
    OriginalOutOfRange { original: usize, len: usize },
}

/// Invalid wave configuration, rejected when the wave is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveError {
    #[error("wave periods must not be negative (up {up}, down {down})")]
    NegativePeriod { up: f32, down: f32 },
    #[error("wave up and down periods must not both be zero")]
    ZeroCycle,
    #[error("wave velocity must not be negative (got {0})")]
    NegativeVelocity(f32),
    #[error("wave {field} must not be negative (got {value})")]
    NegativeWait { field: &'static str, value: f32 },
    #[error("wave {field} must be finite")]
    NonFinite { field: &'static str },
}

/// A parameter could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("missing parameter '{key}'")]
    Missing { key: String },
    #[error("parameter '{key}' = '{value}' is not a valid {expected}")]
    Invalid {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Configuration could not be loaded or does not describe a valid registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("unknown tag family '{0}'")]
    UnknownFamily(String),
    #[error("required parameter '{param}' of tag '{tag}' is not declared")]
    UndeclaredRequired { tag: String, param: String },
    #[error("invalid wave defaults: {0}")]
    Wave(#[from] WaveError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Wave(#[from] WaveError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_error_message() {
        let err = ReconcileError::IndexRegressed {
            rendered: 4,
            previous: 7,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "index map moved backwards at rendered position 4: original index 3 after 7"
        );
    }

    #[test]
    fn test_conversion_into_crate_error() {
        let err: Error = WaveError::ZeroCycle.into();
        assert!(matches!(err, Error::Wave(WaveError::ZeroCycle)));
    }
}
