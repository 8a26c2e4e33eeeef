//! Common validation utilities shared by request and config validation.
//!
//! Reusable validation functions for common parameter types
//! like unit intervals, ranges, and positive values.

use std::fmt;

/// Error type for common validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonValidationError {
    /// Human-readable error message.
    pub message: String,
}

impl CommonValidationError {
    /// Creates a new validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommonValidationError {}

/// Validate that a value is in [0, 1] (the unit interval).
///
/// # Arguments
/// * `name` - Name of the parameter (for error messages)
/// * `value` - Value to validate
///
/// # Returns
/// * `Ok(())` if value is in [0, 1]
/// * `Err(CommonValidationError)` if value is outside range or not finite
///
/// # Example
/// ```
/// use vose_spec::validation::common::validate_unit_interval;
///
/// assert!(validate_unit_interval("breath", 0.5).is_ok());
/// assert!(validate_unit_interval("breath", 1.5).is_err());
/// ```
pub fn validate_unit_interval(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(CommonValidationError::new(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is positive (> 0).
///
/// # Arguments
/// * `name` - Name of the parameter (for error messages)
/// * `value` - Value to validate
///
/// # Returns
/// * `Ok(())` if value is positive
/// * `Err(CommonValidationError)` if value is <= 0 or not finite
///
/// # Example
/// ```
/// use vose_spec::validation::common::validate_positive;
///
/// assert!(validate_positive("frame_period_ms", 1.0).is_ok());
/// assert!(validate_positive("frame_period_ms", 0.0).is_err());
/// assert!(validate_positive("frame_period_ms", -1.0).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    if value <= 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is non-negative (>= 0).
///
/// # Arguments
/// * `name` - Name of the parameter (for error messages)
/// * `value` - Value to validate
///
/// # Returns
/// * `Ok(())` if value is non-negative
/// * `Err(CommonValidationError)` if value is < 0 or not finite
///
/// # Example
/// ```
/// use vose_spec::validation::common::validate_non_negative;
///
/// assert!(validate_non_negative("edge_fade_ms", 0.0).is_ok());
/// assert!(validate_non_negative("edge_fade_ms", 1.0).is_ok());
/// assert!(validate_non_negative("edge_fade_ms", -1.0).is_err());
/// ```
pub fn validate_non_negative(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is within a specified range [min, max].
///
/// # Arguments
/// * `name` - Name of the parameter (for error messages)
/// * `value` - Value to validate
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
///
/// # Returns
/// * `Ok(())` if value is within range
/// * `Err(CommonValidationError)` if value is outside range or not finite
///
/// # Example
/// ```
/// use vose_spec::validation::common::validate_range;
///
/// assert!(validate_range("output_gain", 0.8, 0.0, 4.0).is_ok());
/// assert!(validate_range("output_gain", 5.0, 0.0, 4.0).is_err());
/// ```
pub fn validate_range(
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    if value < min || value > max {
        return Err(CommonValidationError::new(format!(
            "{} must be in [{}, {}], got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_unit_interval_bounds() {
        assert!(validate_unit_interval("gender", 0.0).is_ok());
        assert!(validate_unit_interval("gender", 1.0).is_ok());
        assert!(validate_unit_interval("gender", -0.01).is_err());
        assert!(validate_unit_interval("gender", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_positive_rejects_zero_and_infinity() {
        assert!(validate_positive("frame_period_ms", 5.0).is_ok());
        let err = validate_positive("frame_period_ms", 0.0).unwrap_err();
        assert!(err.message.contains("frame_period_ms"));
        assert!(validate_positive("frame_period_ms", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_range_message() {
        let err = validate_range("output_gain", 5.0, 0.0, 4.0).unwrap_err();
        assert_eq!(err.to_string(), "output_gain must be in [0, 4], got 5");
    }
}
