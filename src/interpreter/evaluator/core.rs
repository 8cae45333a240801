use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::ast::Expr;
use crate::error::RuntimeError;
use crate::interpreter::constants;
use crate::interpreter::evaluator::derivative;
use crate::interpreter::units::UnitRegistry;
use crate::interpreter::value::complex::ComplexNumber;
use crate::interpreter::value::core::{Closure, NativeFn, NativeFunction, Value};
use crate::interpreter::value::quantity::{self, UnitValue};

/// Convenience alias for evaluation results.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A variable environment: names bound to values.
pub type Env = HashMap<String, Value>;

/// Walks expression trees and produces values.
///
/// The evaluator owns a shared, mutable environment and an immutable unit
/// registry. Function calls run on a private copy of the caller's
/// environment, so callee bindings never leak back out.
///
/// # Example
/// ```
/// use calcora::interpreter::{evaluator::core::Evaluator,
///                            lexer,
///                            parser::core,
///                            value::core::Value};
///
/// let mut evaluator = Evaluator::new();
/// let tokens  = lexer::tokenize("x = 3; x^2", evaluator.units()).unwrap();
/// let program = core::parse_program(&mut tokens.iter().peekable()).unwrap();
///
/// assert_eq!(evaluator.eval(&program).unwrap(), Some(Value::Number(9.0)));
/// ```
pub struct Evaluator {
    env:   Rc<RefCell<Env>>,
    units: Rc<UnitRegistry>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with an empty environment and the standard unit
    /// registry.
    pub fn new() -> Self {
        Self::with_units(UnitRegistry::standard())
    }

    /// Creates an evaluator with an empty environment and the given unit
    /// registry.
    pub fn with_units(units: UnitRegistry) -> Self {
        Self { env:   Rc::new(RefCell::new(Env::new())),
               units: Rc::new(units) }
    }

    /// The unit registry this evaluator resolves unit symbols against.
    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// Binds a host-provided function under `name`.
    pub fn bind_native(&mut self, name: &'static str, func: NativeFn) {
        self.env
            .borrow_mut()
            .insert(name.to_string(), Value::Native(NativeFunction { name, func }));
    }

    /// Looks up a binding in the current environment.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.borrow().get(name).cloned()
    }

    /// Mutable access to the environment for sibling modules.
    pub(crate) fn env_mut(&self) -> std::cell::RefMut<'_, Env> {
        self.env.borrow_mut()
    }

    /// Creates an evaluator over a private copy of this one's environment.
    pub(crate) fn fork(&self) -> Self {
        let copy = self.env.borrow().clone();

        self.fork_from(copy)
    }

    /// Creates an evaluator over the given environment, sharing the unit
    /// registry.
    pub(crate) fn fork_from(&self, env: Env) -> Self {
        Self { env:   Rc::new(RefCell::new(env)),
               units: Rc::clone(&self.units) }
    }

    /// Evaluates an expression.
    ///
    /// # Returns
    /// `Some` value for value-producing expressions; `None` for an empty
    /// block (and transitively for a program whose last statement is one).
    ///
    /// # Errors
    /// Any [`RuntimeError`] raised while walking the tree.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Number { value, .. } => Ok(Some(Value::Number(*value))),

            Expr::String { value, .. } => Ok(Some(Value::Str(value.clone()))),

            Expr::Variable { name, line } => self.eval_variable(name, *line).map(Some),

            Expr::BinaryOp { left, op, right, line } => {
                let left_value  = self.eval_operand(left)?;
                let right_value = self.eval_operand(right)?;

                self.eval_binary(*op, &left_value, &right_value, *line).map(Some)
            },

            Expr::UnaryOp { op, expr, line } => {
                let value = self.eval_operand(expr)?;

                Self::eval_unary(*op, &value, *line).map(Some)
            },

            Expr::Call { name, args, line } => {
                let mut values = Vec::with_capacity(args.len());

                for arg in args {
                    values.push(self.eval_operand(arg)?);
                }

                self.eval_call(name, values, *line).map(Some)
            },

            Expr::Assignment { target, value, line } => {
                let Expr::Variable { name, .. } = target.as_ref() else {
                    return Err(RuntimeError::InvalidAssignmentTarget { line: *line });
                };

                let bound = self.eval_operand(value)?;

                self.env.borrow_mut().insert(name.clone(), bound.clone());

                Ok(Some(bound))
            },

            Expr::FunctionDefinition(def) => {
                let function = Value::Function(Rc::clone(def));

                self.env.borrow_mut().insert(def.name.clone(), function.clone());

                Ok(Some(function))
            },

            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());

                for element in elements {
                    values.push(self.eval_operand(element)?);
                }

                Ok(Some(Value::Array(Rc::new(values))))
            },

            Expr::Matrix { rows, .. } => {
                let mut value_rows = Vec::with_capacity(rows.len());

                for row in rows {
                    let mut values = Vec::with_capacity(row.len());

                    for element in row {
                        values.push(self.eval_operand(element)?);
                    }

                    value_rows.push(values);
                }

                Ok(Some(Value::Matrix(Rc::new(value_rows))))
            },

            Expr::ComplexLiteral { real, imag, line } => {
                let real = self.eval_operand(real)?.as_number(*line)?;
                let imag = self.eval_operand(imag)?.as_number(*line)?;

                Ok(Some(Value::Complex(ComplexNumber::new(real, imag))))
            },

            Expr::Derivative { variable, expression, line } => {
                self.eval_derivative(variable, expression, *line).map(Some)
            },

            Expr::Conditional { condition, then_expr, else_expr, line } => {
                let chosen = if self.eval_operand(condition)?.as_bool(*line)? {
                    then_expr
                } else {
                    else_expr
                };

                self.eval(chosen)
            },

            Expr::Lambda { params, body, .. } => {
                Ok(Some(Value::Closure(Closure { params: params.clone(),
                                                 body:   Rc::new(body.as_ref().clone()),
                                                 env:    Rc::clone(&self.env) })))
            },

            Expr::Unit { value, unit, line } => {
                let magnitude = self.eval_operand(value)?.as_number(*line)?;
                let quantity  = UnitValue::parse(magnitude, unit, *line)?;

                // Reject unit symbols the registry does not know about right
                // away instead of at the first conversion.
                self.units.simplify(&quantity.units, *line)?;

                Ok(Some(Value::Quantity(quantity)))
            },

            Expr::Block { statements, .. } => {
                let mut result = None;

                for statement in statements {
                    result = self.eval(statement)?;
                }

                Ok(result)
            },

            Expr::PropertyAccess { object, property, line } => {
                let value = self.eval_operand(object)?;

                Self::eval_property(&value, property, *line).map(Some)
            },
        }
    }

    /// Evaluates an expression in a position that requires a value.
    ///
    /// # Errors
    /// [`RuntimeError::MissingValue`] when the expression produced none.
    pub(crate) fn eval_operand(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.eval(expr)?
            .ok_or(RuntimeError::MissingValue { line: expr.line_number() })
    }

    fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(value) = self.env.borrow().get(name) {
            return Ok(value.clone());
        }

        constants::lookup(name).ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.to_string(),
            line,
        })
    }

    fn eval_derivative(&self, variable: &str, expression: &Expr, _line: usize) -> EvalResult<Value> {
        let derived = {
            let env = self.env.borrow();

            derivative::differentiate(expression, variable, &env)?
        };

        // The derivative tree is evaluated immediately, in a private copy of
        // the environment so it can read current bindings without changing
        // them.
        self.fork().eval_operand(&derived)
    }

    fn eval_property(value: &Value, property: &str, line: usize) -> EvalResult<Value> {
        match (value, property) {
            (Value::Complex(z), "real") => Ok(Value::Number(z.real)),
            (Value::Complex(z), "imag") => Ok(Value::Number(z.imag)),

            (Value::Quantity(q), "value") => Ok(Value::Number(q.value)),
            (Value::Quantity(q), "unit")  => {
                Ok(Value::Str(quantity::format_unit_map(&q.units)))
            },

            (other, _) => Err(RuntimeError::UnsupportedProperty {
                property: property.to_string(),
                on:       other.type_name().to_string(),
                line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> EvalResult<Option<Value>> {
        let mut evaluator = Evaluator::new();
        let tokens = crate::interpreter::lexer::tokenize(source, evaluator.units())
            .expect("tokenize");
        let program = crate::interpreter::parser::core::parse_program(&mut tokens.iter()
                                                                                 .peekable())
            .expect("parse");

        evaluator.eval(&program)
    }

    #[test]
    fn assignment_returns_and_binds_the_value() {
        assert_eq!(eval("x = 4; x * x").unwrap(), Some(Value::Number(16.0)));
    }

    #[test]
    fn undefined_variable_reports_its_name() {
        let error = eval("nope").unwrap_err();

        assert!(matches!(error, RuntimeError::UndefinedVariable { ref name, line: 1 }
                         if name == "nope"));
    }

    #[test]
    fn constants_resolve_without_bindings() {
        assert_eq!(eval("tau / 2").unwrap(),
                   Some(Value::Number(std::f64::consts::PI)));
    }

    #[test]
    fn variables_shadow_constants() {
        assert_eq!(eval("pi = 3; pi").unwrap(), Some(Value::Number(3.0)));
    }

    #[test]
    fn empty_program_produces_no_value() {
        assert_eq!(eval("").unwrap(), None);
        assert_eq!(eval(";;").unwrap(), None);
    }

    #[test]
    fn conditional_requires_a_boolean() {
        assert_eq!(eval("if(2 > 1, 'yes', 'no')").unwrap(),
                   Some(Value::Str("yes".to_string())));
        assert!(matches!(eval("1 ? 2 : 3").unwrap_err(),
                         RuntimeError::TypeMismatch { .. }));
    }

    #[test]
    fn properties_read_complex_and_quantity_parts() {
        assert_eq!(eval("z = 3 + 4i; z.imag").unwrap(), Some(Value::Number(4.0)));
        assert_eq!(eval("q = 60 km/h; q.unit").unwrap(),
                   Some(Value::Str("km/h".to_string())));
    }

    #[test]
    fn native_functions_are_callable() {
        fn double(args: &[Value], line: usize) -> EvalResult<Value> {
            Ok(Value::Number(args[0].as_number(line)? * 2.0))
        }

        let mut evaluator = Evaluator::new();

        evaluator.bind_native("double", double);

        let tokens  = crate::interpreter::lexer::tokenize("double(21)", evaluator.units()).unwrap();
        let program = crate::interpreter::parser::core::parse_program(&mut tokens.iter()
                                                                                 .peekable())
            .unwrap();

        assert_eq!(evaluator.eval(&program).unwrap(), Some(Value::Number(42.0)));
    }
}
