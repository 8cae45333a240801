/// The table of built-in mathematical functions.
pub mod builtin;
/// Call dispatch: built-ins, user-defined functions, closures and natives.
pub mod core;
