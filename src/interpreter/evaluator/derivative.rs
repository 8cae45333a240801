use std::collections::HashMap;

use crate::ast::{self, BinaryOperator, Expr, UnaryOperator};
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{Env, EvalResult};
use crate::interpreter::value::core::Value;

/// Symbolically differentiates `expr` with respect to `variable`.
///
/// The result is a new expression tree which the evaluator runs immediately
/// against current bindings. User-defined functions found in `env` are
/// inlined by substituting their arguments into the body before
/// differentiating.
///
/// # Errors
/// [`RuntimeError::UnsupportedDifferentiation`] for constructs without a
/// rule.
pub fn differentiate(expr: &Expr, variable: &str, env: &Env) -> EvalResult<Expr> {
    let line = expr.line_number();

    match expr {
        Expr::Number { .. } => Ok(Expr::number(0.0, line)),

        Expr::Variable { name, .. } => {
            Ok(Expr::number(if name == variable { 1.0 } else { 0.0 }, line))
        },

        Expr::UnaryOp { op, expr, .. } => {
            let inner = differentiate(expr, variable, env)?;

            // Only negation carries through; `+` is transparent.
            if *op == UnaryOperator::Negate {
                Ok(Expr::UnaryOp { op:   UnaryOperator::Negate,
                                   expr: Box::new(inner),
                                   line })
            } else {
                Ok(inner)
            }
        },

        Expr::BinaryOp { left, op, right, .. } => {
            diff_binary(left, *op, right, variable, env, line)
        },

        Expr::Call { name, args, .. } => diff_call(name, args, variable, env, line),

        other => Err(RuntimeError::UnsupportedDifferentiation {
            what: describe(other),
            line,
        }),
    }
}

fn diff_binary(left: &Expr,
               op: BinaryOperator,
               right: &Expr,
               variable: &str,
               env: &Env,
               line: usize)
               -> EvalResult<Expr> {
    match op {
        BinaryOperator::Add | BinaryOperator::Sub => {
            let l = differentiate(left, variable, env)?;
            let r = differentiate(right, variable, env)?;

            Ok(ast::binary(op, l, r, line))
        },

        // Product rule: (uv)' = u'v + uv'
        BinaryOperator::Mul => {
            let l = differentiate(left, variable, env)?;
            let r = differentiate(right, variable, env)?;

            Ok(ast::binary(BinaryOperator::Add,
                           ast::binary(BinaryOperator::Mul, l, right.clone(), line),
                           ast::binary(BinaryOperator::Mul, left.clone(), r, line),
                           line))
        },

        // Quotient rule: (u/v)' = (u'v - uv') / v^2
        BinaryOperator::Div => {
            let l = differentiate(left, variable, env)?;
            let r = differentiate(right, variable, env)?;

            let numerator =
                ast::binary(BinaryOperator::Sub,
                            ast::binary(BinaryOperator::Mul, l, right.clone(), line),
                            ast::binary(BinaryOperator::Mul, left.clone(), r, line),
                            line);
            let denominator =
                ast::binary(BinaryOperator::Pow, right.clone(), Expr::number(2.0, line), line);

            Ok(ast::binary(BinaryOperator::Div, numerator, denominator, line))
        },

        BinaryOperator::Pow => diff_power(left, right, variable, env, line),

        _ => Err(RuntimeError::UnsupportedDifferentiation {
            what: format!("the operator '{op}'"),
            line,
        }),
    }
}

// Power rule: (u^n)' = n * u^(n-1) * u', for a literal numeric exponent
// only. A variable exponent is not differentiable here.
fn diff_power(base: &Expr,
              exponent: &Expr,
              variable: &str,
              env: &Env,
              line: usize)
              -> EvalResult<Expr> {
    let Expr::Number { value, .. } = exponent else {
        return Err(RuntimeError::UnsupportedDifferentiation {
            what: "a power whose exponent is not a constant number".to_string(),
            line,
        });
    };

    let power  = ast::binary(BinaryOperator::Pow,
                             base.clone(),
                             Expr::number(value - 1.0, line),
                             line);
    let scaled = ast::binary(BinaryOperator::Mul, Expr::number(*value, line), power, line);
    let inner  = differentiate(base, variable, env)?;

    Ok(ast::binary(BinaryOperator::Mul, scaled, inner, line))
}

fn diff_call(name: &str,
             args: &[Expr],
             variable: &str,
             env: &Env,
             line: usize)
             -> EvalResult<Expr> {
    // Chain rule table for the differentiable built-ins.
    if matches!(name, "sin" | "cos" | "tan" | "sqrt" | "ln") {
        let [argument] = args else {
            return Err(RuntimeError::UnsupportedDifferentiation {
                what: format!("'{name}' with {} arguments", args.len()),
                line,
            });
        };

        let inner = differentiate(argument, variable, env)?;
        let call = |callee: &str| Expr::Call { name: callee.to_string(),
                                               args: vec![argument.clone()],
                                               line };

        let outer = match name {
            "sin" => call("cos"),
            "cos" => Expr::UnaryOp { op:   UnaryOperator::Negate,
                                     expr: Box::new(call("sin")),
                                     line },
            "tan" => {
                let squared = ast::binary(BinaryOperator::Pow,
                                          call("cos"),
                                          Expr::number(2.0, line),
                                          line);

                return Ok(ast::binary(BinaryOperator::Div, inner, squared, line));
            },
            "sqrt" => {
                let doubled = ast::binary(BinaryOperator::Mul,
                                          Expr::number(2.0, line),
                                          call("sqrt"),
                                          line);

                return Ok(ast::binary(BinaryOperator::Div, inner, doubled, line));
            },
            "ln" => return Ok(ast::binary(BinaryOperator::Div, inner, argument.clone(), line)),
            _ => unreachable!("matched above"),
        };

        return Ok(ast::binary(BinaryOperator::Mul, outer, inner, line));
    }

    // User-defined functions are inlined: substitute the arguments into the
    // body, then differentiate the result.
    if let Some(Value::Function(def)) = env.get(name) {
        if def.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch { name:     name.to_string(),
                                                     expected: def.params.len(),
                                                     found:    args.len(),
                                                     line });
        }

        let substitutions: HashMap<String, Expr> = def.params
                                                      .iter()
                                                      .cloned()
                                                      .zip(args.iter().cloned())
                                                      .collect();
        let inlined = substitute(&def.body, &substitutions)?;

        return differentiate(&inlined, variable, env);
    }

    Err(RuntimeError::UnsupportedDifferentiation {
        what: format!("the function '{name}'"),
        line,
    })
}

/// Replaces variables by expressions throughout a tree. Used to inline
/// function bodies before differentiation.
pub fn substitute(expr: &Expr, substitutions: &HashMap<String, Expr>) -> EvalResult<Expr> {
    let line = expr.line_number();

    match expr {
        Expr::Number { .. } | Expr::String { .. } => Ok(expr.clone()),

        Expr::Variable { name, .. } => {
            Ok(substitutions.get(name).cloned().unwrap_or_else(|| expr.clone()))
        },

        Expr::UnaryOp { op, expr, .. } => Ok(Expr::UnaryOp {
            op:   *op,
            expr: Box::new(substitute(expr, substitutions)?),
            line,
        }),

        Expr::BinaryOp { left, op, right, .. } => {
            Ok(ast::binary(*op,
                           substitute(left, substitutions)?,
                           substitute(right, substitutions)?,
                           line))
        },

        Expr::Call { name, args, .. } => {
            let mut substituted = Vec::with_capacity(args.len());

            for arg in args {
                substituted.push(substitute(arg, substitutions)?);
            }

            Ok(Expr::Call { name: name.clone(),
                            args: substituted,
                            line })
        },

        Expr::Conditional { condition, then_expr, else_expr, .. } => Ok(Expr::Conditional {
            condition: Box::new(substitute(condition, substitutions)?),
            then_expr: Box::new(substitute(then_expr, substitutions)?),
            else_expr: Box::new(substitute(else_expr, substitutions)?),
            line,
        }),

        other => Err(RuntimeError::UnsupportedSubstitution {
            what: describe(other),
            line,
        }),
    }
}

fn describe(expr: &Expr) -> String {
    let noun = match expr {
        Expr::Array { .. }              => "an array literal",
        Expr::Matrix { .. }             => "a matrix literal",
        Expr::Conditional { .. }        => "a conditional",
        Expr::Lambda { .. }             => "a lambda",
        Expr::Assignment { .. }         => "an assignment",
        Expr::FunctionDefinition(_)     => "a function definition",
        Expr::Derivative { .. }         => "a nested derivative",
        Expr::Block { .. }              => "a block",
        Expr::Unit { .. }               => "a unit-annotated value",
        Expr::PropertyAccess { .. }     => "a property access",
        Expr::ComplexLiteral { .. }     => "a complex literal",
        Expr::String { .. }             => "a string",
        _                               => "this expression",
    };

    noun.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::evaluator::core::Evaluator;
    use crate::interpreter::{lexer, parser};

    fn eval_number(source: &str) -> f64 {
        let mut evaluator = Evaluator::new();
        let tokens  = lexer::tokenize(source, evaluator.units()).expect("tokenize");
        let program = parser::core::parse_program(&mut tokens.iter().peekable()).expect("parse");

        match evaluator.eval(&program).expect("eval") {
            Some(Value::Number(n)) => n,
            other                  => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn power_rule() {
        assert_eq!(eval_number("x = 3; d/dx (x^2)"), 6.0);
        assert_eq!(eval_number("x = 2; d/dx (x^3 + 2 x)"), 14.0);
    }

    #[test]
    fn chain_rule_through_builtins() {
        assert_eq!(eval_number("x = 0; d/dx (sin(x))"), 1.0);
        assert_eq!(eval_number("x = 1; d/dx (ln(x))"), 1.0);
    }

    #[test]
    fn quotient_rule() {
        // d/dx (1/x) at x = 2 is -1/4.
        assert_eq!(eval_number("x = 2; d/dx (1 / x)"), -0.25);
    }

    #[test]
    fn user_functions_are_inlined() {
        assert_eq!(eval_number("f(t) = t^2; x = 5; d/dx (f(x))"), 10.0);
    }

    #[test]
    fn variable_exponents_are_unsupported() {
        let mut evaluator = Evaluator::new();
        let tokens  = lexer::tokenize("x = 0; d/dx (2^x)", evaluator.units()).expect("tokenize");
        let program = parser::core::parse_program(&mut tokens.iter().peekable()).expect("parse");

        assert!(matches!(evaluator.eval(&program),
                         Err(RuntimeError::UnsupportedDifferentiation { .. })));
    }

    #[test]
    fn other_variables_are_constants() {
        assert_eq!(eval_number("x = 1; y = 7; d/dx (y + x)"), 1.0);
    }

    #[test]
    fn unsupported_nodes_are_reported() {
        let env = Env::new();
        let array = Expr::Array { elements: vec![], line: 1 };

        assert!(matches!(differentiate(&array, "x", &env),
                         Err(RuntimeError::UnsupportedDifferentiation { .. })));
    }
}
