/// Numeric conversion helpers.
///
/// This module provides safe conversions between `f64` and the integer types
/// the evaluator needs for indexing and integer-only builtins. All helpers
/// reject fractional, non-finite or out-of-range inputs instead of silently
/// truncating.
pub mod num;
