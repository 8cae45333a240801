#[derive(Debug)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function.
    UndefinedFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a function or closure.
    ArityMismatch {
        /// The name of the callee (or `"<lambda>"`).
        name:     String,
        /// The number of parameters the callee declares.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to call a value that is not callable.
    NotCallable {
        /// The name the call was made through.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of an assignment was not a bare variable.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operator was applied to an operand combination it does not support,
    /// or a value had an unexpected type.
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A property was accessed on a value that does not expose it.
    UnsupportedProperty {
        /// The property name.
        property: String,
        /// A description of the value the access was attempted on.
        on:       String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Array or matrix dimensions do not match for an elementwise operation
    /// or a multiplication.
    ShapeMismatch {
        /// Details about the mismatching shapes.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Tried to access an array element outside the allowed bounds.
    IndexOutOfBounds {
        /// The largest valid index.
        max:   usize,
        /// The index that was actually requested.
        found: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A unit symbol is absent from the unit registry.
    UnknownUnit {
        /// The unknown symbol.
        symbol: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Two unit expressions do not reduce to the same base dimensions.
    IncompatibleUnits {
        /// Canonical form of the left operand's unit.
        left:  String,
        /// Canonical form of the right operand's unit.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An argument was outside a function's mathematical domain.
    MathDomain {
        /// Details about the violation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operand position required a value but the expression produced none
    /// (e.g. an empty block).
    MissingValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The differentiation rules do not cover a node or operator.
    UnsupportedDifferentiation {
        /// Description of the unsupported construct.
        what: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The substitution transform hit a node kind it cannot recurse through.
    UnsupportedSubstitution {
        /// Description of the unsupported construct.
        what: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "Error on line {line}: Undefined variable '{name}'.")
            },

            Self::UndefinedFunction { name, line } => {
                write!(f, "Error on line {line}: Undefined function '{name}'.")
            },

            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  line, } => {
                write!(f,
                       "Error on line {line}: '{name}' expects {expected} argument(s), got {found}.")
            },

            Self::NotCallable { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not a function.")
            },

            Self::InvalidAssignmentTarget { line } => {
                write!(f, "Error on line {line}: Left side of assignment must be a variable.")
            },

            Self::TypeMismatch { details, line } => {
                write!(f, "Error on line {line}: {details}")
            },

            Self::UnsupportedProperty { property, on, line } => {
                write!(f, "Error on line {line}: Unknown property '{property}' on {on}.")
            },

            Self::ShapeMismatch { details, line } => {
                write!(f, "Error on line {line}: {details}")
            },

            Self::IndexOutOfBounds { max, found, line } => {
                write!(f,
                       "Error on line {line}: Index {found} is out of bounds (largest valid index is {max}).")
            },

            Self::UnknownUnit { symbol, line } => {
                write!(f, "Error on line {line}: Unknown unit '{symbol}'.")
            },

            Self::IncompatibleUnits { left, right, line } => {
                write!(f, "Error on line {line}: Incompatible units '{left}' and '{right}'.")
            },

            Self::MathDomain { details, line } => {
                write!(f, "Error on line {line}: {details}")
            },

            Self::MissingValue { line } => {
                write!(f, "Error on line {line}: Expression produced no value.")
            },

            Self::UnsupportedDifferentiation { what, line } => {
                write!(f, "Error on line {line}: Cannot differentiate {what}.")
            },

            Self::UnsupportedSubstitution { what, line } => {
                write!(f, "Error on line {line}: Cannot substitute into {what}.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
