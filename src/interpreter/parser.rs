/// Binary operator precedence ladder.
pub mod binary;
/// Program and expression entry points.
pub mod core;
/// Statements: assignments, function definitions and blocks.
pub mod statement;
/// Prefix and postfix unary operators, implicit multiplication and primary
/// expressions.
pub mod unary;
/// Small shared parsing helpers.
pub mod utils;
