/// Binary operator evaluation across the value domains.
pub mod binary;
/// The evaluator itself: environments and the expression walk.
pub mod core;
/// Symbolic differentiation and parameter substitution.
pub mod derivative;
/// Function calls: built-ins, user definitions, closures and natives.
pub mod function;
/// Unary operator evaluation.
pub mod unary;
