use crate::ast::UnaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::value::{core::Value, quantity::UnitValue};

impl Evaluator {
    /// Applies a unary operator to an already-evaluated operand.
    pub(crate) fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Plus => match value {
                Value::Number(_) | Value::Complex(_) | Value::Quantity(_) => Ok(value.clone()),
                other => Err(unsupported(op, other, line)),
            },

            UnaryOperator::Negate => match value {
                Value::Number(n)   => Ok(Value::Number(-n)),
                Value::Complex(z)  => Ok(Value::Complex(-*z)),
                Value::Quantity(q) => Ok(Value::Quantity(UnitValue::new(-q.value,
                                                                        q.units.clone()))),
                other => Err(unsupported(op, other, line)),
            },

            UnaryOperator::Factorial => factorial(value.as_number(line)?, line),
        }
    }
}

fn unsupported(op: UnaryOperator, value: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("Unary '{op}' is not defined for a {}",
                                                  value.type_name()),
                                 line }
}

/// Computes `n!` for a non-negative integer operand.
///
/// # Errors
/// [`RuntimeError::MathDomain`] for negative or fractional operands.
fn factorial(operand: f64, line: usize) -> EvalResult<Value> {
    if operand < 0.0 || operand.fract() != 0.0 || !operand.is_finite() {
        return Err(RuntimeError::MathDomain {
            details: format!("Factorial requires a non-negative integer, got {operand}"),
            line,
        });
    }

    let mut product = 1.0_f64;
    let mut factor  = 2.0_f64;

    while factor <= operand {
        product *= factor;
        factor += 1.0;
    }

    Ok(Value::Number(product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::complex::ComplexNumber;

    #[test]
    fn negation_covers_numeric_domains() {
        let negated = Evaluator::eval_unary(UnaryOperator::Negate,
                                            &Value::Complex(ComplexNumber::new(1.0, -2.0)),
                                            1).unwrap();

        assert_eq!(negated, Value::Complex(ComplexNumber::new(-1.0, 2.0)));
    }

    #[test]
    fn factorial_of_zero_is_one() {
        assert_eq!(factorial(0.0, 1).unwrap(), Value::Number(1.0));
        assert_eq!(factorial(5.0, 1).unwrap(), Value::Number(120.0));
    }

    #[test]
    fn factorial_rejects_negative_and_fractional() {
        assert!(factorial(-1.0, 1).is_err());
        assert!(factorial(2.5, 1).is_err());
    }
}
