/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include unrecognized characters, unterminated strings,
/// unexpected tokens and premature end of input, each carrying the 1-based
/// source position at which it was detected.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unresolved
/// names, arity and type mismatches, shape mismatches, unit-algebra failures,
/// math domain errors, and unsupported differentiation or substitution
/// requests.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
