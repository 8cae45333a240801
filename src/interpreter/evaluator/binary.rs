/// Operand-type dispatch for binary operators.
pub mod core;
/// Array and matrix operations: elementwise arithmetic, multiplication,
/// scalar broadcasting and indexing.
pub mod matrix;
/// Quantity (unit-carrying) arithmetic.
pub mod quantity;
/// Plain number, complex, string and boolean operations.
pub mod scalar;
