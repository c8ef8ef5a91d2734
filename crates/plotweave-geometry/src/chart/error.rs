//! Chart error types.

use thiserror::Error;

/// Errors raised while drawing a plot definition.
///
/// The reconciler stores the rendered message on the failed record, so the
/// type is `Clone` and comparable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("series `{field}` has {actual} samples but x has {expected}")]
    SeriesLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid shape for `{field}`: {reason}")]
    InvalidShape { field: &'static str, reason: String },

    #[error("no renderer registered for kind `{0}`")]
    UnknownKind(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("unknown palette `{0}`")]
    UnknownPalette(String),
}

/// Errors raised while parsing a submitted definition set.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("malformed definition set: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = ChartError::SeriesLengthMismatch {
            field: "y",
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "series `y` has 3 samples but x has 4");
    }
}
