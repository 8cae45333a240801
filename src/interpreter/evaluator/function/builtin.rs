use crate::ast::UnaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::value::core::Value;
use crate::util::num;

/// How many arguments a built-in accepts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    pub(crate) fn accepts(self, found: usize) -> bool {
        match self {
            Self::Exact(expected) => expected == found,
            Self::OneOf(choices)  => choices.contains(&found),
        }
    }

    /// The argument count reported in arity errors; for flexible built-ins
    /// this is the largest accepted count.
    pub(crate) fn reported(self) -> usize {
        match self {
            Self::Exact(expected) => expected,
            Self::OneOf(choices)  => choices.iter().copied().max().unwrap_or(0),
        }
    }
}

/// A built-in function entry.
pub(crate) struct Builtin {
    pub(crate) name:  &'static str,
    pub(crate) arity: Arity,
    pub(crate) func:  fn(&[Value], usize) -> EvalResult<Value>,
}

macro_rules! builtin_functions {
    ($( $name:literal => ($arity:expr, $func:expr) ),+ $(,)?) => {
        pub(crate) const BUILTINS: &[Builtin] = &[
            $( Builtin { name: $name, arity: $arity, func: $func } ),+
        ];
    };
}

builtin_functions! {
    "sin"       => (Arity::Exact(1), sin),
    "cos"       => (Arity::Exact(1), cos),
    "tan"       => (Arity::Exact(1), tan),
    "asin"      => (Arity::Exact(1), asin),
    "acos"      => (Arity::Exact(1), acos),
    "atan"      => (Arity::Exact(1), atan),
    "sinh"      => (Arity::Exact(1), sinh),
    "cosh"      => (Arity::Exact(1), cosh),
    "tanh"      => (Arity::Exact(1), tanh),
    "sqrt"      => (Arity::Exact(1), sqrt),
    "root"      => (Arity::Exact(2), root),
    "exp"       => (Arity::Exact(1), exp),
    "ln"        => (Arity::Exact(1), ln),
    "log"       => (Arity::OneOf(&[1, 2]), log),
    "abs"       => (Arity::Exact(1), abs),
    "floor"     => (Arity::Exact(1), floor),
    "ceil"      => (Arity::Exact(1), ceil),
    "round"     => (Arity::Exact(1), round),
    "sign"      => (Arity::Exact(1), sign),
    "min"       => (Arity::Exact(2), min),
    "max"       => (Arity::Exact(2), max),
    "gcd"       => (Arity::Exact(2), gcd),
    "lcm"       => (Arity::Exact(2), lcm),
    "factorial" => (Arity::Exact(1), factorial),
}

/// Looks up a built-in by name.
pub(crate) fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Returns `true` if `name` denotes a built-in function. The lexer uses this
/// to classify identifiers.
pub(crate) fn is_builtin(name: &str) -> bool {
    find(name).is_some()
}

fn sin(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.sin()))
}

fn cos(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.cos()))
}

fn tan(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.tan()))
}

fn asin(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.asin()))
}

fn acos(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.acos()))
}

fn atan(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.atan()))
}

fn sinh(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.sinh()))
}

fn cosh(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.cosh()))
}

fn tanh(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.tanh()))
}

fn sqrt(args: &[Value], line: usize) -> EvalResult<Value> {
    let operand = args[0].as_number(line)?;

    if operand < 0.0 {
        return Err(RuntimeError::MathDomain {
            details: format!("Square root of a negative number: {operand}"),
            line,
        });
    }

    Ok(Value::Number(operand.sqrt()))
}

/// `root(x, n)` computes the n-th root. Odd integer roots of negative
/// numbers are defined (`root(-8, 3)` is `-2`); even or fractional roots of
/// negative numbers and the degree-zero root are domain errors.
fn root(args: &[Value], line: usize) -> EvalResult<Value> {
    let operand = args[0].as_number(line)?;
    let degree  = args[1].as_number(line)?;

    if degree == 0.0 {
        return Err(RuntimeError::MathDomain { details: "Root of degree zero".to_string(),
                                              line });
    }

    if operand < 0.0 {
        let odd_integer = degree.fract() == 0.0 && (degree as i64) % 2 != 0;

        if !odd_integer {
            return Err(RuntimeError::MathDomain {
                details: format!("Even root of a negative number: root({operand}, {degree})"),
                line,
            });
        }

        return Ok(Value::Number(-(-operand).powf(1.0 / degree)));
    }

    Ok(Value::Number(operand.powf(1.0 / degree)))
}

fn exp(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.exp()))
}

fn ln(args: &[Value], line: usize) -> EvalResult<Value> {
    let operand = args[0].as_number(line)?;

    if operand <= 0.0 {
        return Err(RuntimeError::MathDomain {
            details: format!("Logarithm of a non-positive number: {operand}"),
            line,
        });
    }

    Ok(Value::Number(operand.ln()))
}

/// `log(x)` is the base-10 logarithm; `log(x, b)` uses base `b`.
fn log(args: &[Value], line: usize) -> EvalResult<Value> {
    let operand = args[0].as_number(line)?;

    if operand <= 0.0 {
        return Err(RuntimeError::MathDomain {
            details: format!("Logarithm of a non-positive number: {operand}"),
            line,
        });
    }

    let Some(base) = args.get(1) else {
        return Ok(Value::Number(operand.log10()));
    };

    let base = base.as_number(line)?;

    if base <= 0.0 || base == 1.0 {
        return Err(RuntimeError::MathDomain {
            details: format!("Invalid logarithm base: {base}"),
            line,
        });
    }

    Ok(Value::Number(operand.log(base)))
}

fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Number(n)   => Ok(Value::Number(n.abs())),
        Value::Complex(z)  => Ok(Value::Number(z.magnitude())),
        Value::Quantity(q) => {
            Ok(Value::Quantity(crate::interpreter::value::quantity::UnitValue::new(
                q.value.abs(),
                q.units.clone(),
            )))
        },
        other => Err(RuntimeError::TypeMismatch {
            details: format!("Cannot take the absolute value of a {}", other.type_name()),
            line,
        }),
    }
}

fn floor(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.floor()))
}

fn ceil(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.ceil()))
}

fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.round()))
}

fn sign(args: &[Value], line: usize) -> EvalResult<Value> {
    let operand = args[0].as_number(line)?;

    // `f64::signum` maps zero to one; this keeps `sign(0)` at zero.
    let result = if operand > 0.0 {
        1.0
    } else if operand < 0.0 {
        -1.0
    } else {
        operand
    };

    Ok(Value::Number(result))
}

fn min(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.min(args[1].as_number(line)?)))
}

fn max(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.max(args[1].as_number(line)?)))
}

fn integer_pair(args: &[Value], line: usize) -> EvalResult<(i64, i64)> {
    let a = num::f64_to_i64_checked(args[0].as_number(line)?, line)?;
    let b = num::f64_to_i64_checked(args[1].as_number(line)?, line)?;

    Ok((a, b))
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();

    while b != 0 {
        (a, b) = (b, a % b);
    }

    a
}

fn gcd(args: &[Value], line: usize) -> EvalResult<Value> {
    let (a, b) = integer_pair(args, line)?;

    Ok(Value::Number(gcd_i64(a, b) as f64))
}

fn lcm(args: &[Value], line: usize) -> EvalResult<Value> {
    let (a, b) = integer_pair(args, line)?;
    let divisor = gcd_i64(a, b);

    if divisor == 0 {
        return Ok(Value::Number(0.0));
    }

    Ok(Value::Number(((a / divisor) * b).abs() as f64))
}

fn factorial(args: &[Value], line: usize) -> EvalResult<Value> {
    Evaluator::eval_unary(UnaryOperator::Factorial, &args[0], line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_f64(value: Value) -> f64 {
        match value {
            Value::Number(n) => n,
            other            => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn roots_of_negative_numbers() {
        let cube_root = as_f64(root(&[Value::Number(-8.0), Value::Number(3.0)], 1).unwrap());

        assert!((cube_root + 2.0).abs() < 1e-12);
        assert!(root(&[Value::Number(-4.0), Value::Number(2.0)], 1).is_err());
        assert!(root(&[Value::Number(4.0), Value::Number(0.0)], 1).is_err());
    }

    #[test]
    fn log_defaults_to_base_ten() {
        assert!((as_f64(log(&[Value::Number(1000.0)], 1).unwrap()) - 3.0).abs() < 1e-12);
        assert!((as_f64(log(&[Value::Number(8.0), Value::Number(2.0)], 1).unwrap()) - 3.0).abs()
                < 1e-12);
        assert!(log(&[Value::Number(-1.0)], 1).is_err());
        assert!(log(&[Value::Number(4.0), Value::Number(1.0)], 1).is_err());
    }

    #[test]
    fn abs_spans_the_numeric_domains() {
        use crate::interpreter::value::complex::ComplexNumber;

        assert_eq!(abs(&[Value::Number(-3.0)], 1).unwrap(), Value::Number(3.0));
        assert_eq!(abs(&[Value::Complex(ComplexNumber::new(3.0, 4.0))], 1).unwrap(),
                   Value::Number(5.0));
    }

    #[test]
    fn gcd_and_lcm_require_integers() {
        assert_eq!(gcd(&[Value::Number(12.0), Value::Number(18.0)], 1).unwrap(),
                   Value::Number(6.0));
        assert_eq!(lcm(&[Value::Number(4.0), Value::Number(6.0)], 1).unwrap(),
                   Value::Number(12.0));
        assert!(gcd(&[Value::Number(1.5), Value::Number(2.0)], 1).is_err());
    }

    #[test]
    fn sign_keeps_zero() {
        assert_eq!(sign(&[Value::Number(0.0)], 1).unwrap(), Value::Number(0.0));
        assert_eq!(sign(&[Value::Number(-7.0)], 1).unwrap(), Value::Number(-1.0));
    }
}
