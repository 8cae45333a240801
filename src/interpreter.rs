/// Built-in mathematical constants (`pi`, `e`, `tau`, `i`, `true`, `false`).
pub mod constants;
/// Tree-walking evaluation of parsed expressions.
pub mod evaluator;
/// Tokenization of source text, including number-unit merging and implicit
/// multiplication insertion.
pub mod lexer;
/// Recursive descent parsing of token streams into expression trees.
pub mod parser;
/// The unit symbol registry and unit conversion arithmetic.
pub mod units;
/// Runtime value types.
pub mod value;
