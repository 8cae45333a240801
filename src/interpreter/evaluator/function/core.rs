use std::rc::Rc;

use crate::ast::FunctionDef;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Evaluator};
use crate::interpreter::evaluator::function::builtin;
use crate::interpreter::value::core::{Closure, Value};

impl Evaluator {
    /// Calls a function by name with already-evaluated arguments.
    ///
    /// Built-ins are checked first; they cannot be shadowed because the
    /// lexer classifies their names before the parser ever sees them. Then
    /// the environment is consulted for user definitions, closures and
    /// native bindings.
    pub(crate) fn eval_call(&mut self,
                            name: &str,
                            args: Vec<Value>,
                            line: usize)
                            -> EvalResult<Value> {
        if let Some(builtin) = builtin::find(name) {
            if !builtin.arity.accepts(args.len()) {
                return Err(RuntimeError::ArityMismatch { name:     name.to_string(),
                                                         expected: builtin.arity.reported(),
                                                         found:    args.len(),
                                                         line });
            }

            return (builtin.func)(&args, line);
        }

        let bound = self.get(name);

        match bound {
            Some(Value::Function(def)) => self.call_function(&def, args, line),
            Some(Value::Closure(closure)) => self.call_closure(&closure, args, line),
            Some(Value::Native(native)) => (native.func)(&args, line),
            Some(_) => Err(RuntimeError::NotCallable { name: name.to_string(), line }),
            None => Err(RuntimeError::UndefinedFunction { name: name.to_string(), line }),
        }
    }

    /// Invokes a user-defined function on a private copy of the caller's
    /// environment. The callee sees the caller's bindings (which is what
    /// makes recursion through the function's own name work), but nothing it
    /// binds survives the call.
    fn call_function(&self,
                     def: &Rc<FunctionDef>,
                     args: Vec<Value>,
                     line: usize)
                     -> EvalResult<Value> {
        if def.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch { name:     def.name.clone(),
                                                     expected: def.params.len(),
                                                     found:    args.len(),
                                                     line });
        }

        let mut callee = self.fork();

        callee.bind_args(&def.params, args);
        callee.eval_operand(&def.body)
    }

    /// Invokes a closure on a private copy of its captured environment.
    fn call_closure(&self, closure: &Closure, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        if closure.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch { name:     "<lambda>".to_string(),
                                                     expected: closure.params.len(),
                                                     found:    args.len(),
                                                     line });
        }

        let captured   = closure.env.borrow().clone();
        let mut callee = self.fork_from(captured);

        callee.bind_args(&closure.params, args);
        callee.eval_operand(&closure.body)
    }

    fn bind_args(&mut self, params: &[String], args: Vec<Value>) {
        let mut env = self.env_mut();

        for (param, arg) in params.iter().zip(args) {
            env.insert(param.clone(), arg);
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
    fn user_functions_see_caller_bindings() {
        assert_eq!(eval("a = 10; f(x) = x + a; f(5)").unwrap(), Some(Value::Number(15.0)));
    }

    #[test]
    fn callee_bindings_do_not_leak() {
        let result = eval("f(x) = x * 2; f(3); x");

        assert!(matches!(result.unwrap_err(), RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn recursion_terminates() {
        assert_eq!(eval("fact(n) = if(n <= 1, 1, n * fact(n - 1)); fact(5)").unwrap(),
                   Some(Value::Number(120.0)));
    }

    #[test]
    fn closures_capture_their_environment_by_reference() {
        assert_eq!(eval("a = 1; f = ->(x) x + a; a = 2; f(1)").unwrap(),
                   Some(Value::Number(3.0)));
    }

    #[test]
    fn arity_errors_name_the_callee() {
        let error = eval("f(x, y) = x + y; f(1)").unwrap_err();

        assert!(matches!(error,
                         RuntimeError::ArityMismatch { ref name, expected: 2, found: 1, .. }
                         if name == "f"));
    }

    #[test]
    fn calling_a_plain_value_fails() {
        assert!(matches!(eval("x = 3; x(1)").unwrap_err(),
                         RuntimeError::NotCallable { .. }));
        assert!(matches!(eval("g(4)").unwrap_err(),
                         RuntimeError::UndefinedFunction { .. }));
    }
}
