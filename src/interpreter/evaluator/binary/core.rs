use crate::ast::BinaryOperator;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::binary::{matrix, scalar};
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::value::core::Value;

impl Evaluator {
    /// Applies a binary operator to two already-evaluated operands.
    ///
    /// Dispatch order follows the operand domains, checked in sequence:
    /// complex numbers, quantities, strings, indexing, arrays and matrices,
    /// and finally plain scalars. The first rule whose operand pattern
    /// matches decides the semantics.
    pub(crate) fn eval_binary(&self,
                              op: BinaryOperator,
                              left: &Value,
                              right: &Value,
                              line: usize)
                              -> EvalResult<Value> {
        if matches!(left, Value::Complex(_)) || matches!(right, Value::Complex(_)) {
            return scalar::eval_complex(op, left, right, line);
        }

        if matches!(left, Value::Quantity(_)) || matches!(right, Value::Quantity(_)) {
            return self.eval_quantity(op, left, right, line);
        }

        if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
            return scalar::eval_string(op, left, right, line);
        }

        if op == BinaryOperator::Index {
            return matrix::eval_index(left, right, line);
        }

        match (left, right) {
            (Value::Array(_) | Value::Matrix(_), Value::Array(_) | Value::Matrix(_)) => {
                self.eval_aggregate(op, left, right, line)
            },

            (Value::Array(_) | Value::Matrix(_), Value::Number(_))
            | (Value::Number(_), Value::Array(_) | Value::Matrix(_))
                if op == BinaryOperator::Mul =>
            {
                self.eval_broadcast(left, right, line)
            },

            (Value::Array(_) | Value::Matrix(_), _) | (_, Value::Array(_) | Value::Matrix(_)) => {
                Err(RuntimeError::TypeMismatch {
                    details: format!("'{op}' is not defined for {} and {}",
                                     left.type_name(),
                                     right.type_name()),
                    line,
                })
            },

            _ => scalar::eval_scalar(op, left, right, line),
        }
    }
}
