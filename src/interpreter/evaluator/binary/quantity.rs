use crate::ast::BinaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::value::{core::Value, quantity::UnitValue};

fn promote(value: &Value, line: usize) -> EvalResult<UnitValue> {
    match value {
        Value::Quantity(q) => Ok(q.clone()),
        Value::Number(n)   => Ok(UnitValue::dimensionless(*n)),
        other              => Err(RuntimeError::TypeMismatch {
            details: format!("Cannot combine a {} with a quantity", other.type_name()),
            line,
        }),
    }
}

impl Evaluator {
    /// Arithmetic where at least one operand carries units.
    ///
    /// Addition and subtraction convert the right operand into the left
    /// operand's units first, so `1 km + 200 m` yields `1.2 km`.
    /// Multiplication and division combine unit exponents; `^` requires a
    /// plain number exponent and scales them.
    pub(crate) fn eval_quantity(&self,
                                op: BinaryOperator,
                                left: &Value,
                                right: &Value,
                                line: usize)
                                -> EvalResult<Value> {
        match op {
            BinaryOperator::Add | BinaryOperator::Sub => {
                let l = promote(left, line)?;
                let r = promote(right, line)?;

                let factor    = self.units().conversion_factor(&r.units, &l.units, line)?;
                let converted = r.value * factor;
                let value     = if op == BinaryOperator::Add {
                    l.value + converted
                } else {
                    l.value - converted
                };

                Ok(Value::Quantity(UnitValue::new(value, l.units)))
            },

            BinaryOperator::Mul => {
                let l = promote(left, line)?;
                let r = promote(right, line)?;

                Ok(Value::Quantity(l.multiply(&r)))
            },

            BinaryOperator::Div => {
                let l = promote(left, line)?;
                let r = promote(right, line)?;

                Ok(Value::Quantity(l.divide(&r)))
            },

            BinaryOperator::Pow => {
                let Value::Quantity(base) = left else {
                    return Err(RuntimeError::TypeMismatch {
                        details: "Exponent base with units must stand on the left".to_string(),
                        line,
                    });
                };
                let exponent = right.as_number(line)?;

                Ok(Value::Quantity(base.pow_scaled(exponent, line)?))
            },

            _ => Err(RuntimeError::TypeMismatch {
                details: format!("'{op}' is not defined for quantities"),
                line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::quantity::parse_unit_map;

    fn quantity(value: f64, unit: &str) -> Value {
        Value::Quantity(UnitValue::parse(value, unit, 1).unwrap())
    }

    fn evaluator() -> Evaluator {
        Evaluator::new()
    }

    #[test]
    fn addition_converts_into_left_units() {
        let sum = evaluator().eval_quantity(BinaryOperator::Add,
                                            &quantity(1.0, "km"),
                                            &quantity(200.0, "m"),
                                            1).unwrap();

        assert_eq!(sum, quantity(1.2, "km"));
    }

    #[test]
    fn incompatible_addition_fails() {
        let result = evaluator().eval_quantity(BinaryOperator::Add,
                                               &quantity(1.0, "kg"),
                                               &quantity(1.0, "s"),
                                               1);

        assert!(matches!(result, Err(RuntimeError::IncompatibleUnits { .. })));
    }

    #[test]
    fn multiplication_combines_exponents() {
        let force = evaluator().eval_quantity(BinaryOperator::Mul,
                                              &quantity(2.0, "kg*m/s"),
                                              &quantity(3.0, "1/s"),
                                              1).unwrap();

        assert_eq!(force, quantity(6.0, "kg*m/s^2"));
    }

    #[test]
    fn division_by_plain_number_keeps_units() {
        let half = evaluator().eval_quantity(BinaryOperator::Div,
                                             &quantity(60.0, "km"),
                                             &Value::Number(2.0),
                                             1).unwrap();

        assert_eq!(half, quantity(30.0, "km"));
    }

    #[test]
    fn power_needs_a_plain_exponent() {
        let area = evaluator().eval_quantity(BinaryOperator::Pow,
                                             &quantity(3.0, "m"),
                                             &Value::Number(2.0),
                                             1).unwrap();

        assert_eq!(area.to_string(), "9 m^2");

        let bad = evaluator().eval_quantity(BinaryOperator::Pow,
                                            &quantity(3.0, "m"),
                                            &quantity(2.0, "s"),
                                            1);

        assert!(bad.is_err());
    }

    #[test]
    fn comparison_of_quantities_is_rejected() {
        let result = evaluator().eval_quantity(BinaryOperator::Less,
                                               &quantity(1.0, "m"),
                                               &quantity(2.0, "m"),
                                               1);

        assert!(result.is_err());
    }

    #[test]
    fn dimensionless_ratio_formats_as_one() {
        let ratio = evaluator().eval_quantity(BinaryOperator::Div,
                                              &quantity(60.0, "km"),
                                              &quantity(30.0, "km"),
                                              1).unwrap();

        let Value::Quantity(ratio) = ratio else { panic!("expected quantity") };

        assert!(ratio.is_dimensionless());
        assert_eq!(parse_unit_map("1", 1).unwrap(), ratio.units);
    }
}
