use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::EvalResult;
use crate::interpreter::value::quantity::{self, UnitMap};

/// How a unit symbol relates to its base unit: `1 km = 1000 m` is stored as
/// `factor: 1000.0, base: "m"`.
#[derive(Debug, Clone)]
struct UnitEntry {
    base:   String,
    factor: f64,
}

/// The table of unit symbols the interpreter understands.
///
/// Every symbol maps to a base unit and a conversion factor towards it. Two
/// unit maps are convertible when they reduce to the same base exponents.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    table: HashMap<String, UnitEntry>,
}

impl UnitRegistry {
    /// Creates a registry without any units.
    pub fn empty() -> Self {
        Self { table: HashMap::new() }
    }

    /// Creates the standard registry: metric lengths, times, masses, and the
    /// derived symbols `N` and `Hz`.
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.register("mm", "m", 0.001);
        registry.register("cm", "m", 0.01);
        registry.register("m", "m", 1.0);
        registry.register("km", "m", 1000.0);

        registry.register("ms", "s", 0.001);
        registry.register("s", "s", 1.0);
        registry.register("min", "s", 60.0);
        registry.register("h", "s", 3600.0);

        registry.register("mg", "kg", 1e-6);
        registry.register("g", "kg", 1e-3);
        registry.register("kg", "kg", 1.0);
        registry.register("t", "kg", 1000.0);

        registry.register("N", "N", 1.0);
        registry.register("Hz", "Hz", 1.0);

        registry
    }

    /// Adds a unit symbol worth `factor` of the given base unit.
    pub fn register(&mut self, symbol: &str, base: &str, factor: f64) {
        self.table.insert(symbol.to_string(), UnitEntry { base: base.to_string(), factor });
    }

    /// Returns `true` if `symbol` is a registered unit.
    pub fn contains(&self, symbol: &str) -> bool {
        self.table.contains_key(symbol)
    }

    /// Reduces a unit map to base-unit exponents, returning the base map and
    /// the factor that converts a magnitude in `units` into base units.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UnknownUnit`] when a symbol is not registered.
    pub fn simplify(&self, units: &UnitMap, line: usize) -> EvalResult<(UnitMap, f64)> {
        let mut base_units = UnitMap::new();
        let mut factor     = 1.0;

        for (symbol, exponent) in units {
            let entry = self.table
                            .get(symbol)
                            .ok_or_else(|| RuntimeError::UnknownUnit { symbol: symbol.clone(),
                                                                       line })?;

            factor *= entry.factor.powi(*exponent);
            *base_units.entry(entry.base.clone()).or_insert(0) += exponent;
        }

        base_units.retain(|_, exponent| *exponent != 0);

        Ok((base_units, factor))
    }

    /// Returns `true` if two unit maps reduce to the same base exponents.
    pub fn compatible(&self, left: &UnitMap, right: &UnitMap, line: usize) -> EvalResult<bool> {
        let (left_base, _)  = self.simplify(left, line)?;
        let (right_base, _) = self.simplify(right, line)?;

        Ok(left_base == right_base)
    }

    /// Computes the factor that converts a magnitude in `from` units into
    /// `to` units.
    ///
    /// # Errors
    /// Returns [`RuntimeError::IncompatibleUnits`] when the two maps reduce
    /// to different base exponents, and [`RuntimeError::UnknownUnit`] when a
    /// symbol is not registered.
    pub fn conversion_factor(&self, from: &UnitMap, to: &UnitMap, line: usize) -> EvalResult<f64> {
        let (from_base, from_factor) = self.simplify(from, line)?;
        let (to_base, to_factor)     = self.simplify(to, line)?;

        if from_base != to_base {
            return Err(RuntimeError::IncompatibleUnits {
                left: quantity::format_unit_map(from),
                right: quantity::format_unit_map(to),
                line,
            });
        }

        Ok(from_factor / to_factor)
    }

    /// Converts a magnitude between two textual unit expressions.
    ///
    /// # Example
    /// ```
    /// use calcora::interpreter::units::UnitRegistry;
    ///
    /// let registry = UnitRegistry::standard();
    ///
    /// assert_eq!(registry.convert(2.5, "km", "m", 1).unwrap(), 2500.0);
    /// ```
    pub fn convert(&self, value: f64, from: &str, to: &str, line: usize) -> EvalResult<f64> {
        let from_units = quantity::parse_unit_map(from, line)?;
        let to_units   = quantity::parse_unit_map(to, line)?;

        Ok(value * self.conversion_factor(&from_units, &to_units, line)?)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_scaled_symbols() {
        let registry = UnitRegistry::standard();

        assert_eq!(registry.convert(1.0, "km", "m", 1).unwrap(), 1000.0);
        assert!((registry.convert(90.0, "min", "h", 1).unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn converts_compound_units() {
        let registry = UnitRegistry::standard();
        let speed    = registry.convert(90.0, "km/h", "m/s", 1).unwrap();

        assert!((speed - 25.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_incompatible_dimensions() {
        let registry = UnitRegistry::standard();
        let result   = registry.convert(1.0, "kg", "m", 1);

        assert!(matches!(result, Err(RuntimeError::IncompatibleUnits { .. })));
    }

    #[test]
    fn rejects_unknown_symbols() {
        let registry = UnitRegistry::standard();
        let result   = registry.convert(1.0, "furlong", "m", 1);

        assert!(matches!(result, Err(RuntimeError::UnknownUnit { .. })));
    }

    #[test]
    fn compatibility_reduces_to_base_dimensions() {
        let registry = UnitRegistry::standard();
        let km  = quantity::parse_unit_map("km", 1).unwrap();
        let mm  = quantity::parse_unit_map("mm", 1).unwrap();
        let sec = quantity::parse_unit_map("s", 1).unwrap();

        assert!(registry.compatible(&km, &mm, 1).unwrap());
        assert!(!registry.compatible(&km, &sec, 1).unwrap());
    }

    #[test]
    fn simplify_cancels_to_base_exponents() {
        let registry = UnitRegistry::standard();
        let units    = quantity::parse_unit_map("km/h", 1).unwrap();

        let (base, factor) = registry.simplify(&units, 1).unwrap();

        assert_eq!(base, quantity::parse_unit_map("m/s", 1).unwrap());
        assert!((factor - 1000.0 / 3600.0).abs() < 1e-12);
    }
}
