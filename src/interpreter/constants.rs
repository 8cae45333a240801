use crate::interpreter::value::{complex::ComplexNumber, core::Value};

/// Resolves a built-in constant by name.
///
/// # Returns
/// The constant's value, or `None` when the name is not a constant.
///
/// # Example
/// ```
/// use calcora::interpreter::{constants, value::core::Value};
///
/// assert_eq!(constants::lookup("pi"), Some(Value::Number(std::f64::consts::PI)));
/// assert_eq!(constants::lookup("gravity"), None);
/// ```
pub fn lookup(name: &str) -> Option<Value> {
    match name {
        "pi"    => Some(Value::Number(std::f64::consts::PI)),
        "e"     => Some(Value::Number(std::f64::consts::E)),
        "tau"   => Some(Value::Number(std::f64::consts::TAU)),
        "i"     => Some(Value::Complex(ComplexNumber::new(0.0, 1.0))),
        "true"  => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _       => None,
    }
}

/// Returns `true` if `name` denotes a built-in constant.
pub fn is_constant(name: &str) -> bool {
    lookup(name).is_some()
}
