//! Error types for selectkit.

use thiserror::Error;

/// Errors raised when a control is built or fed inconsistent data.
///
/// User-level invalid operations (committing a disabled option, escape while
/// closed) are not errors; they are absorbed without a state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// Two options share a value
    #[error("duplicate option value at index {duplicate} (first defined at index {first}): {value}")]
    DuplicateValue {
        /// Index of the first option carrying the value
        first: usize,
        /// Index of the repeated option
        duplicate: usize,
        /// Debug rendering of the repeated value
        value: String,
    },

    /// Value shape does not match the selection mode
    #[error("{mode} control cannot hold a {got} value")]
    ModeMismatch {
        /// Mode of the control
        mode: &'static str,
        /// Shape of the rejected value
        got: &'static str,
    },
}

/// Result type for control operations.
pub type Result<T> = std::result::Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display() {
        let err = ControlError::DuplicateValue {
            first: 0,
            duplicate: 3,
            value: "\"mpm\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate option value at index 3 (first defined at index 0): \"mpm\""
        );
    }

    #[test]
    fn test_mode_mismatch_display() {
        let err = ControlError::ModeMismatch {
            mode: "single",
            got: "multi",
        };
        assert_eq!(err.to_string(), "single control cannot hold a multi value");
    }
}
