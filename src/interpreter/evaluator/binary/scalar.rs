use crate::ast::BinaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::EvalResult;
use crate::interpreter::value::core::Value;

fn unsupported(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("'{op}' is not defined for {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 line }
}

/// Arithmetic where at least one operand is complex. The other operand is
/// promoted from a plain number; only `+ - * /` are defined.
pub(crate) fn eval_complex(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
    let l = left.as_complex(line)?;
    let r = right.as_complex(line)?;

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Sub => l - r,
        BinaryOperator::Mul => l * r,
        BinaryOperator::Div => l / r,
        _ => return Err(unsupported(op, left, right, line)),
    };

    // Results that land back on the real axis stay complex; extracting the
    // real part is what `.real` is for.
    Ok(Value::Complex(result))
}

/// String handling: `+` concatenates the display forms of both operands and
/// nothing else is defined.
pub(crate) fn eval_string(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
    if op == BinaryOperator::Add {
        return Ok(Value::Str(format!("{left}{right}")));
    }

    Err(unsupported(op, left, right, line))
}

/// Arithmetic, comparison and logic on plain numbers and booleans.
pub(crate) fn eval_scalar(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
    if let (Value::Number(l), Value::Number(r)) = (left, right) {
        return Ok(match op {
            BinaryOperator::Add => Value::Number(l + r),
            BinaryOperator::Sub => Value::Number(l - r),
            BinaryOperator::Mul => Value::Number(l * r),
            BinaryOperator::Div => Value::Number(l / r),
            BinaryOperator::Pow => Value::Number(l.powf(*r)),

            BinaryOperator::Less         => Value::Bool(l < r),
            BinaryOperator::LessEqual    => Value::Bool(l <= r),
            BinaryOperator::Greater      => Value::Bool(l > r),
            BinaryOperator::GreaterEqual => Value::Bool(l >= r),
            BinaryOperator::Equal        => Value::Bool(l == r),
            BinaryOperator::NotEqual     => Value::Bool(l != r),

            _ => return Err(unsupported(op, left, right, line)),
        });
    }

    if let (Value::Bool(l), Value::Bool(r)) = (left, right) {
        return Ok(match op {
            BinaryOperator::And      => Value::Bool(*l && *r),
            BinaryOperator::Or       => Value::Bool(*l || *r),
            BinaryOperator::Equal    => Value::Bool(l == r),
            BinaryOperator::NotEqual => Value::Bool(l != r),

            _ => return Err(unsupported(op, left, right, line)),
        });
    }

    Err(unsupported(op, left, right, line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::complex::ComplexNumber;

    #[test]
    fn complex_promotes_plain_numbers() {
        let product = eval_complex(BinaryOperator::Mul,
                                   &Value::Number(2.0),
                                   &Value::Complex(ComplexNumber::new(0.0, 1.0)),
                                   1).unwrap();

        assert_eq!(product, Value::Complex(ComplexNumber::new(0.0, 2.0)));
    }

    #[test]
    fn complex_rejects_comparisons() {
        let result = eval_complex(BinaryOperator::Less,
                                  &Value::Complex(ComplexNumber::new(1.0, 1.0)),
                                  &Value::Number(2.0),
                                  1);

        assert!(result.is_err());
    }

    #[test]
    fn string_concatenation_stringifies_the_other_operand() {
        let joined = eval_string(BinaryOperator::Add,
                                 &Value::Str("n = ".to_string()),
                                 &Value::Number(3.0),
                                 1).unwrap();

        assert_eq!(joined, Value::Str("n = 3".to_string()));
    }

    #[test]
    fn booleans_only_support_logic_and_equality() {
        assert_eq!(eval_scalar(BinaryOperator::And,
                               &Value::Bool(true),
                               &Value::Bool(false),
                               1).unwrap(),
                   Value::Bool(false));
        assert!(eval_scalar(BinaryOperator::Add, &Value::Bool(true), &Value::Bool(true), 1)
                .is_err());
    }

    #[test]
    fn mixed_number_and_boolean_fails() {
        assert!(eval_scalar(BinaryOperator::Equal, &Value::Number(1.0), &Value::Bool(true), 1)
                .is_err());
    }
}
