use std::{collections::BTreeMap, fmt};

use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::EvalResult;

/// Maps a unit symbol to its integer exponent. Symbols with a zero exponent
/// are never stored.
pub type UnitMap = BTreeMap<String, i32>;

/// A numeric magnitude paired with a unit exponent map, e.g. `9.81 m/s^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValue {
    pub value: f64,
    pub units: UnitMap,
}

impl UnitValue {
    pub const fn new(value: f64, units: UnitMap) -> Self {
        Self { value, units }
    }

    /// Parses a textual unit expression and attaches it to a magnitude.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeMismatch`] when the unit expression is
    /// malformed.
    ///
    /// # Example
    /// ```
    /// use calcora::interpreter::value::quantity::UnitValue;
    ///
    /// let speed = UnitValue::parse(25.0, "m/s", 1).unwrap();
    /// assert_eq!(speed.to_string(), "25 m/s");
    /// ```
    pub fn parse(value: f64, unit_text: &str, line: usize) -> EvalResult<Self> {
        Ok(Self::new(value, parse_unit_map(unit_text, line)?))
    }

    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, UnitMap::new())
    }

    pub fn is_dimensionless(&self) -> bool {
        self.units.is_empty()
    }

    /// Multiplies two quantities, adding unit exponents.
    pub fn multiply(&self, other: &Self) -> Self {
        Self::new(self.value * other.value, combine_unit_maps(&self.units, &other.units, 1))
    }

    /// Divides two quantities, subtracting unit exponents.
    pub fn divide(&self, other: &Self) -> Self {
        Self::new(self.value / other.value, combine_unit_maps(&self.units, &other.units, -1))
    }

    /// Raises a quantity to a power, scaling every unit exponent.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeMismatch`] when the scaled exponent of any
    /// unit would not be an integer, e.g. `(1 m)^0.5`.
    pub fn pow_scaled(&self, exponent: f64, line: usize) -> EvalResult<Self> {
        let mut units = UnitMap::new();

        for (symbol, exp) in &self.units {
            let scaled = f64::from(*exp) * exponent;

            if scaled.fract() != 0.0 {
                return Err(RuntimeError::TypeMismatch {
                    details: format!("Unit '{symbol}' cannot be raised to the power {exponent}"),
                    line,
                });
            }

            if scaled != 0.0 {
                units.insert(symbol.clone(), scaled as i32);
            }
        }

        Ok(Self::new(self.value.powf(exponent), units))
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, format_unit_map(&self.units))
    }
}

/// Parses a unit expression such as `kg*m/s^2` into an exponent map.
///
/// The text is split on `/` into a numerator group and denominator groups,
/// each of which is split on `*`. Every token contributes a positive exponent
/// in the numerator and a negative one in a denominator; an optional `^n`
/// suffix scales the contribution.
///
/// # Errors
/// Returns [`RuntimeError::TypeMismatch`] on an empty or malformed token.
pub fn parse_unit_map(text: &str, line: usize) -> EvalResult<UnitMap> {
    let mut units = UnitMap::new();
    let trimmed  = text.trim();

    if trimmed.is_empty() {
        return Ok(units);
    }

    for (group_index, group) in trimmed.split('/').enumerate() {
        let sign = if group_index == 0 { 1 } else { -1 };

        for token in group.split('*') {
            let token = token.trim();

            // A bare `1` numerator, as in `1/s`, contributes nothing.
            if group_index == 0 && token == "1" {
                continue;
            }

            let (symbol, exponent) = parse_unit_token(token, line)?;
            let entry = units.entry(symbol).or_insert(0);

            *entry += sign * exponent;
        }
    }

    units.retain(|_, exponent| *exponent != 0);

    Ok(units)
}

fn parse_unit_token(token: &str, line: usize) -> EvalResult<(String, i32)> {
    let malformed = || RuntimeError::TypeMismatch {
        details: format!("Invalid unit format '{token}'"),
        line,
    };

    let (symbol, exponent) = match token.split_once('^') {
        Some((symbol, exponent)) => (symbol, exponent.parse::<i32>().map_err(|_| malformed())?),
        None                     => (token, 1),
    };

    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(malformed());
    }

    Ok((symbol.to_string(), exponent))
}

/// Merges two unit maps, adding exponents when `sign` is `1` and subtracting
/// them when `sign` is `-1`. Zero exponents are dropped from the result.
pub fn combine_unit_maps(left: &UnitMap, right: &UnitMap, sign: i32) -> UnitMap {
    let mut combined = left.clone();

    for (symbol, exponent) in right {
        *combined.entry(symbol.clone()).or_insert(0) += sign * exponent;
    }

    combined.retain(|_, exponent| *exponent != 0);

    combined
}

/// Renders a unit map canonically: positive exponents joined by `*`, negative
/// ones after a `/`, exponents other than one written as `^n`. An empty map
/// renders as `1`.
pub fn format_unit_map(units: &UnitMap) -> String {
    let render = |symbol: &str, exponent: i32| {
        if exponent == 1 {
            symbol.to_string()
        } else {
            format!("{symbol}^{exponent}")
        }
    };

    let numerator: Vec<String> = units.iter()
                                      .filter(|(_, exp)| **exp > 0)
                                      .map(|(symbol, exp)| render(symbol, *exp))
                                      .collect();
    let denominator: Vec<String> = units.iter()
                                        .filter(|(_, exp)| **exp < 0)
                                        .map(|(symbol, exp)| render(symbol, -*exp))
                                        .collect();

    let mut text = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("*")
    };

    if !denominator.is_empty() {
        text.push('/');
        text.push_str(&denominator.join("*"));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, i32)]) -> UnitMap {
        entries.iter()
               .map(|(symbol, exp)| (symbol.to_string(), *exp))
               .collect()
    }

    #[test]
    fn parses_compound_units() {
        let parsed = parse_unit_map("kg*m/s^2", 1).unwrap();

        assert_eq!(parsed, map(&[("kg", 1), ("m", 1), ("s", -2)]));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(parse_unit_map("m^x", 1).is_err());
        assert!(parse_unit_map("m/", 1).is_err());
        assert!(parse_unit_map("3m", 1).is_err());
    }

    #[test]
    fn division_cancels_shared_units() {
        let distance = UnitValue::parse(60.0, "km", 1).unwrap();
        let time     = UnitValue::parse(2.0, "km", 1).unwrap();
        let ratio    = distance.divide(&time);

        assert!(ratio.is_dimensionless());
        assert_eq!(ratio.value, 30.0);
    }

    #[test]
    fn power_scales_exponents() {
        let length = UnitValue::parse(3.0, "m", 1).unwrap();
        let area   = length.pow_scaled(2.0, 1).unwrap();

        assert_eq!(area.units, map(&[("m", 2)]));
        assert_eq!(area.value, 9.0);
    }

    #[test]
    fn fractional_unit_power_fails() {
        let length = UnitValue::parse(4.0, "m", 1).unwrap();

        assert!(length.pow_scaled(0.5, 1).is_err());
    }

    #[test]
    fn formats_canonically() {
        assert_eq!(format_unit_map(&map(&[("kg", 1), ("m", 2), ("s", -2)])), "kg*m^2/s^2");
        assert_eq!(format_unit_map(&map(&[("s", -1)])), "1/s");
        assert_eq!(format_unit_map(&UnitMap::new()), "1");
    }
}
