//! Engine error types
//!
//! Every engine failure is a logic or configuration error surfaced to the
//! host immediately; nothing here is transient or worth retrying.

use std::fmt;

/// Largest supported dimension (2^16 = 65536 vertices)
pub const MAX_DIMENSION: usize = 16;

/// Error type for engine operations
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Requested dimension is zero, too large, or below what a projection needs
    Dimension {
        /// The dimension that was asked for
        requested: usize,
        /// Why it was rejected
        reason: DimensionReason,
    },
    /// Angle vector length does not match `C(n, 2)` for the current dimension
    RotationParameter {
        /// `C(n, 2)` for the engine's dimension
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },
}

/// Why a dimension was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionReason {
    /// n must be at least 1
    NonPositive,
    /// n exceeds [`MAX_DIMENSION`]
    TooLarge,
    /// A projection model needs at least this many axes
    BelowProjectionMinimum(usize),
}

impl EngineError {
    /// Shorthand for a dimension error
    pub fn dimension(requested: usize, reason: DimensionReason) -> Self {
        EngineError::Dimension { requested, reason }
    }

    /// True for [`EngineError::Dimension`]
    pub fn is_dimension(&self) -> bool {
        matches!(self, EngineError::Dimension { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Dimension { requested, reason } => match reason {
                DimensionReason::NonPositive => {
                    write!(f, "Invalid dimension {}: must be at least 1", requested)
                }
                DimensionReason::TooLarge => write!(
                    f,
                    "Invalid dimension {}: at most {} is supported",
                    requested, MAX_DIMENSION
                ),
                DimensionReason::BelowProjectionMinimum(min) => write!(
                    f,
                    "Invalid dimension {}: projection needs at least {} axes",
                    requested, min
                ),
            },
            EngineError::RotationParameter { expected, actual } => write!(
                f,
                "Incorrect number of rotation parameters: expected {}, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// Check that `n` is a buildable dimension
pub fn validate_dimension(n: usize) -> Result<(), EngineError> {
    if n == 0 {
        return Err(EngineError::dimension(n, DimensionReason::NonPositive));
    }
    if n > MAX_DIMENSION {
        return Err(EngineError::dimension(n, DimensionReason::TooLarge));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(1).is_ok());
        assert!(validate_dimension(MAX_DIMENSION).is_ok());
        assert_eq!(
            validate_dimension(0),
            Err(EngineError::dimension(0, DimensionReason::NonPositive))
        );
        assert_eq!(
            validate_dimension(MAX_DIMENSION + 1),
            Err(EngineError::dimension(MAX_DIMENSION + 1, DimensionReason::TooLarge))
        );
    }

    #[test]
    fn test_dimension_error_display() {
        let err = EngineError::dimension(2, DimensionReason::BelowProjectionMinimum(3));
        let msg = err.to_string();
        assert!(msg.contains("dimension 2"));
        assert!(msg.contains("at least 3"));
        assert!(err.is_dimension());
    }

    #[test]
    fn test_rotation_parameter_display() {
        let err = EngineError::RotationParameter { expected: 6, actual: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("expected 6"));
        assert!(msg.contains("got 3"));
        assert!(!err.is_dimension());
    }
}
