//! # calcora
//!
//! calcora is a mathematical expression interpreter written in Rust.
//! It tokenizes, parses, and evaluates expressions with support for complex
//! numbers, arrays and matrices, physical units, closures, and symbolic
//! differentiation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{evaluator::core::Evaluator, lexer, parser, value::core::Value};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser and traversed by the evaluator and the differentiator.
///
/// # Responsibilities
/// - Defines expression types for all language constructs.
/// - Attaches source line numbers to AST nodes for error reporting.
/// - Enables extensible and robust handling of parsed code.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or evaluating code. It standardizes error reporting and carries detailed
/// information about failures, including source locations for debugging and
/// user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, unit conversion, error handling, and all supporting
/// infrastructure to provide a complete runtime for source code evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are
/// used throughout the interpreter, parser, and evaluator.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Provide general utility functions used in multiple modules.
pub mod util;

/// Tokenizes, parses and evaluates a source string against a fresh
/// environment with the standard unit registry.
///
/// # Returns
/// The value of the program's last statement, or `None` when the program is
/// empty.
///
/// # Errors
/// Returns an error if tokenizing, parsing, or evaluation fails.
///
/// # Examples
/// ```
/// use calcora::{eval_source, interpreter::value::core::Value};
///
/// let result = eval_source("r = 2; pi r^2").unwrap();
///
/// assert_eq!(result, Some(Value::Number(4.0 * std::f64::consts::PI)));
/// ```
pub fn eval_source(source: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut evaluator = Evaluator::new();
    let tokens = match lexer::tokenize(source, evaluator.units()) {
        Ok(tokens) => tokens,
        Err(e)     => return Err(Box::new(e)),
    };

    let mut iter = tokens.iter().peekable();

    let program = match parser::core::parse_program(&mut iter) {
        Ok(program) => program,
        Err(e)      => return Err(Box::new(e)),
    };

    match evaluator.eval(&program) {
        Ok(result) => Ok(result),
        Err(e)     => Err(Box::new(e)),
    }
}

/// Executes a source string and optionally prints the final result.
///
/// This is the command line entry point: with `auto_print` set, the value of
/// the program's last statement (if any) is written to standard output.
///
/// # Errors
/// Returns an error if parsing or evaluation fails, or if any runtime error
/// occurs.
///
/// # Examples
/// ```
/// use calcora::get_result;
///
/// // Simple expression: the result will be calculated and no error should occur.
/// let res = get_result("x = 2 + 2", false);
/// assert!(res.is_ok());
///
/// // Example with an intentional error (unknown variable).
/// let res = get_result("y = x + 1", false); // 'x' is not defined
/// assert!(res.is_err());
/// ```
pub fn get_result(source: &str, auto_print: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = eval_source(source)?;

    if auto_print && let Some(value) = result {
        println!("{value}");
    }

    Ok(())
}
