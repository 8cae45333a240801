#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer hit a character it has no rule for.
    UnrecognizedCharacter {
        /// The offending input slice.
        text:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A string literal was opened but never closed before the end of the
    /// line or input.
    UnterminatedString {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// A description of what was expected instead.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Reached the end of input while more tokens were expected.
    UnexpectedEndOfInput {
        /// A description of what was expected.
        expected: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedCharacter { text, line, column } => {
                write!(f, "Parse error at ({line}, {column}): Unrecognized character '{text}'.")
            },

            Self::UnterminatedString { line, column } => {
                write!(f, "Parse error at ({line}, {column}): Unterminated string literal.")
            },

            Self::UnexpectedToken { token,
                                    expected,
                                    line,
                                    column, } => {
                write!(f,
                       "Parse error at ({line}, {column}): Unexpected token '{token}', expected {expected}.")
            },

            Self::UnexpectedEndOfInput { expected } => {
                write!(f, "Parse error at end of input: expected {expected}.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
