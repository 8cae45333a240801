/// Complex number arithmetic.
///
/// Defines the `ComplexNumber` type with the usual field operations and a
/// human-readable display form (`3 + 4i`).
pub mod complex;
/// Core runtime value representation.
///
/// Declares the `Value` enum covering every type an expression can evaluate
/// to, together with checked accessors and display formatting.
pub mod core;
/// Physical quantities with units.
///
/// Defines `UnitValue` (a magnitude paired with a unit exponent map) and the
/// unit-expression parsing, combination and formatting routines.
pub mod quantity;
