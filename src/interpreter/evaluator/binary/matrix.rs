use std::rc::Rc;

use crate::ast::BinaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::value::core::Value;
use crate::util::num;

/// Indexes an array (element) or a matrix (row). Indices are zero-based and
/// bounds-checked.
pub(crate) fn eval_index(target: &Value, index: &Value, line: usize) -> EvalResult<Value> {
    let position = num::f64_to_usize_checked(index.as_number(line)?, line)?;

    match target {
        Value::Array(elements) => {
            elements.get(position)
                    .cloned()
                    .ok_or(RuntimeError::IndexOutOfBounds { max: elements.len().saturating_sub(1),
                                                            found: position,
                                                            line })
        },

        Value::Matrix(rows) => {
            rows.get(position)
                .map(|row| Value::Array(Rc::new(row.clone())))
                .ok_or(RuntimeError::IndexOutOfBounds { max: rows.len().saturating_sub(1),
                                                        found: position,
                                                        line })
        },

        other => Err(RuntimeError::TypeMismatch {
            details: format!("Cannot index a {}", other.type_name()),
            line,
        }),
    }
}

impl Evaluator {
    /// Applies an operator where both operands are arrays or matrices.
    pub(crate) fn eval_aggregate(&self,
                                 op: BinaryOperator,
                                 left: &Value,
                                 right: &Value,
                                 line: usize)
                                 -> EvalResult<Value> {
        match (op, left, right) {
            (BinaryOperator::Add | BinaryOperator::Sub,
             Value::Array(l),
             Value::Array(r)) => self.elementwise_arrays(op, l, r, line),

            (BinaryOperator::Add | BinaryOperator::Sub,
             Value::Matrix(l),
             Value::Matrix(r)) => self.elementwise_matrices(op, l, r, line),

            (BinaryOperator::Mul, Value::Matrix(l), Value::Matrix(r)) => {
                self.matrix_multiply(l, r, line)
            },

            _ => Err(RuntimeError::TypeMismatch {
                details: format!("'{op}' is not defined for {} and {}",
                                 left.type_name(),
                                 right.type_name()),
                line,
            }),
        }
    }

    /// Multiplies every element of an array or matrix by a scalar. The
    /// scalar may stand on either side.
    pub(crate) fn eval_broadcast(&self,
                                 left: &Value,
                                 right: &Value,
                                 line: usize)
                                 -> EvalResult<Value> {
        let (aggregate, scalar) = match (left, right) {
            (Value::Number(_), aggregate) => (aggregate, left),
            (aggregate, _)                => (aggregate, right),
        };

        match aggregate {
            Value::Array(elements) => {
                let mut scaled = Vec::with_capacity(elements.len());

                for element in elements.iter() {
                    scaled.push(self.eval_binary(BinaryOperator::Mul, element, scalar, line)?);
                }

                Ok(Value::Array(Rc::new(scaled)))
            },

            Value::Matrix(rows) => {
                let mut scaled_rows = Vec::with_capacity(rows.len());

                for row in rows.iter() {
                    let mut scaled = Vec::with_capacity(row.len());

                    for element in row {
                        scaled.push(self.eval_binary(BinaryOperator::Mul, element, scalar, line)?);
                    }

                    scaled_rows.push(scaled);
                }

                Ok(Value::Matrix(Rc::new(scaled_rows)))
            },

            other => Err(RuntimeError::TypeMismatch {
                details: format!("Cannot scale a {}", other.type_name()),
                line,
            }),
        }
    }

    fn elementwise_arrays(&self,
                          op: BinaryOperator,
                          left: &[Value],
                          right: &[Value],
                          line: usize)
                          -> EvalResult<Value> {
        if left.len() != right.len() {
            return Err(RuntimeError::ShapeMismatch {
                details: format!("Array lengths differ: {} vs {}", left.len(), right.len()),
                line,
            });
        }

        let mut combined = Vec::with_capacity(left.len());

        for (l, r) in left.iter().zip(right) {
            combined.push(self.eval_binary(op, l, r, line)?);
        }

        Ok(Value::Array(Rc::new(combined)))
    }

    fn elementwise_matrices(&self,
                            op: BinaryOperator,
                            left: &[Vec<Value>],
                            right: &[Vec<Value>],
                            line: usize)
                            -> EvalResult<Value> {
        if left.len() != right.len()
           || left.iter().zip(right).any(|(l, r)| l.len() != r.len())
        {
            return Err(RuntimeError::ShapeMismatch {
                details: "Matrix dimensions differ".to_string(),
                line,
            });
        }

        let mut rows = Vec::with_capacity(left.len());

        for (l_row, r_row) in left.iter().zip(right) {
            let mut row = Vec::with_capacity(l_row.len());

            for (l, r) in l_row.iter().zip(r_row) {
                row.push(self.eval_binary(op, l, r, line)?);
            }

            rows.push(row);
        }

        Ok(Value::Matrix(Rc::new(rows)))
    }

    /// Standard matrix multiplication: the left operand's column count must
    /// equal the right operand's row count, and both must be rectangular.
    fn matrix_multiply(&self,
                       left: &[Vec<Value>],
                       right: &[Vec<Value>],
                       line: usize)
                       -> EvalResult<Value> {
        let inner = left.first().map_or(0, Vec::len);

        let rectangular = left.iter().all(|row| row.len() == inner)
                          && right.iter()
                                  .all(|row| row.len() == right[0].len());

        if !rectangular || inner != right.len() || right.is_empty() {
            return Err(RuntimeError::ShapeMismatch {
                details: format!("Cannot multiply a {}x{} matrix by a {}x{} matrix",
                                 left.len(),
                                 inner,
                                 right.len(),
                                 right.first().map_or(0, Vec::len)),
                line,
            });
        }

        let columns = right[0].len();
        let mut rows = Vec::with_capacity(left.len());

        for l_row in left {
            let mut row = Vec::with_capacity(columns);

            for column in 0..columns {
                let mut sum = Value::Number(0.0);

                for (k, l_value) in l_row.iter().enumerate() {
                    let product =
                        self.eval_binary(BinaryOperator::Mul, l_value, &right[k][column], line)?;

                    sum = self.eval_binary(BinaryOperator::Add, &sum, &product, line)?;
                }

                row.push(sum);
            }

            rows.push(row);
        }

        Ok(Value::Matrix(Rc::new(rows)))
    }
}
