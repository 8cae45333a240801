use crate::error::RuntimeError;

/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// Converts an `f64` to `i64` if the value is finite, integral and within the
/// exactly-representable range.
///
/// ## Errors
/// Returns `RuntimeError::MathDomain` for non-finite, fractional or
/// out-of-range values.
///
/// ## Example
/// ```
/// use calcora::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(42.0, 1).unwrap(), 42);
/// assert!(f64_to_i64_checked(1.5, 1).is_err());
/// assert!(f64_to_i64_checked(f64::NAN, 1).is_err());
/// ```
pub fn f64_to_i64_checked(value: f64, line: usize) -> Result<i64, RuntimeError> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INT {
        return Err(RuntimeError::MathDomain { details: format!("Expected an integer, found {value}."),
                                              line });
    }

    #[allow(clippy::cast_possible_truncation)]
    Ok(value as i64)
}

/// Converts an `f64` to `usize` if the value is a non-negative integer in the
/// exactly-representable range.
///
/// Used for array indexing, where a fractional or negative index is a type
/// error rather than an out-of-bounds access.
///
/// ## Errors
/// Returns `RuntimeError::TypeMismatch` for negative, fractional, non-finite
/// or out-of-range values.
///
/// ## Example
/// ```
/// use calcora::util::num::f64_to_usize_checked;
///
/// assert_eq!(f64_to_usize_checked(3.0, 1).unwrap(), 3);
/// assert!(f64_to_usize_checked(-1.0, 1).is_err());
/// assert!(f64_to_usize_checked(0.5, 1).is_err());
/// ```
pub fn f64_to_usize_checked(value: f64, line: usize) -> Result<usize, RuntimeError> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > MAX_SAFE_INT {
        return Err(RuntimeError::TypeMismatch { details: format!("Expected a non-negative integer index, found {value}."),
                                                line });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::{f64_to_i64_checked, f64_to_usize_checked};

    #[test]
    fn rejects_fractional_and_negative() {
        assert!(f64_to_i64_checked(2.5, 0).is_err());
        assert_eq!(f64_to_i64_checked(-7.0, 0).unwrap(), -7);
        assert!(f64_to_usize_checked(-7.0, 0).is_err());
        assert!(f64_to_usize_checked(f64::INFINITY, 0).is_err());
    }
}
