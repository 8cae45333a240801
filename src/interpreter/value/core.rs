use std::{cell::RefCell, fmt, rc::Rc};

use crate::ast::{Expr, FunctionDef};
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{Env, EvalResult};
use crate::interpreter::value::{complex::ComplexNumber, quantity::UnitValue};

/// Signature shared by every host-provided function: the evaluated arguments
/// and the line number of the call site.
pub type NativeFn = fn(&[Value], usize) -> EvalResult<Value>;

/// A lambda value together with the environment it was created in. The
/// environment is shared by reference, so bindings made after the lambda was
/// built are visible when it is invoked.
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body:   Rc<Expr>,
    pub env:    Rc<RefCell<Env>>,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured environment may contain this closure, so it is
        // deliberately left out of the output.
        f.debug_struct("Closure")
         .field("params", &self.params)
         .field("body", &self.body)
         .finish_non_exhaustive()
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body && Rc::ptr_eq(&self.env, &other.env)
    }
}

/// A function implemented by the embedding host rather than in the language.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("name", &self.name).finish_non_exhaustive()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::fn_addr_eq(self.func, other.func)
    }
}

/// Every value an expression can evaluate to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Complex(ComplexNumber),
    Bool(bool),
    Str(String),
    Array(Rc<Vec<Value>>),
    Matrix(Rc<Vec<Vec<Value>>>),
    Quantity(UnitValue),
    Function(Rc<FunctionDef>),
    Closure(Closure),
    Native(NativeFunction),
}

impl Value {
    /// A short noun describing the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_)   => "number",
            Self::Complex(_)  => "complex number",
            Self::Bool(_)     => "boolean",
            Self::Str(_)      => "string",
            Self::Array(_)    => "array",
            Self::Matrix(_)   => "matrix",
            Self::Quantity(_) => "quantity",
            Self::Function(_) => "function",
            Self::Closure(_)  => "lambda",
            Self::Native(_)   => "native function",
        }
    }

    /// Extracts a plain number.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeMismatch`] for any other value type.
    pub fn as_number(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other           => Err(RuntimeError::TypeMismatch {
                details: format!("Expected a number, found a {}", other.type_name()),
                line,
            }),
        }
    }

    /// Extracts a boolean.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeMismatch`] for any other value type.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other         => Err(RuntimeError::TypeMismatch {
                details: format!("Expected a boolean, found a {}", other.type_name()),
                line,
            }),
        }
    }

    /// Extracts a complex number, promoting a plain number to one with a zero
    /// imaginary part.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeMismatch`] for any other value type.
    pub fn as_complex(&self, line: usize) -> EvalResult<ComplexNumber> {
        match self {
            Self::Complex(z) => Ok(*z),
            Self::Number(n)  => Ok(ComplexNumber::from_real(*n)),
            other            => Err(RuntimeError::TypeMismatch {
                details: format!("Expected a complex number, found a {}", other.type_name()),
                line,
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n)   => write!(f, "{n}"),
            Self::Complex(z)  => write!(f, "{z}"),
            Self::Bool(b)     => write!(f, "{b}"),
            Self::Str(s)      => write!(f, "{s}"),
            Self::Array(elements) => {
                write!(f, "[")?;

                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{element}")?;
                }

                write!(f, "]")
            },
            Self::Matrix(rows) => {
                write!(f, "[")?;

                for (index, row) in rows.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{}", Self::Array(Rc::new(row.clone())))?;
                }

                write!(f, "]")
            },
            Self::Quantity(q)  => write!(f, "{q}"),
            Self::Function(d)  => write!(f, "<function {}>", d.name),
            Self::Closure(c)   => write!(f, "<lambda({})>", c.params.join(", ")),
            Self::Native(n)    => write!(f, "<native {}>", n.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_accessor_rejects_other_types() {
        assert_eq!(Value::Number(2.5).as_number(1).unwrap(), 2.5);
        assert!(Value::Bool(true).as_number(1).is_err());
    }

    #[test]
    fn complex_accessor_promotes_numbers() {
        let promoted = Value::Number(3.0).as_complex(1).unwrap();

        assert_eq!(promoted, ComplexNumber::new(3.0, 0.0));
    }

    #[test]
    fn display_nests_matrix_rows() {
        let matrix = Value::Matrix(Rc::new(vec![vec![Value::Number(1.0), Value::Number(2.0)],
                                                vec![Value::Number(3.0), Value::Number(4.0)]]));

        assert_eq!(matrix.to_string(), "[[1, 2], [3, 4]]");
    }
}
