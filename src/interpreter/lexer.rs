use logos::{Lexer, Logos, Skip};

use crate::error::ParseError;
use crate::interpreter::{constants, evaluator::function::builtin, units::UnitRegistry};

/// Line and line-start bookkeeping threaded through the raw lexer so token
/// positions can be reported as line and column pairs.
#[derive(Debug, Clone, Copy)]
pub struct LexerExtras {
    line:       usize,
    line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1, line_start: 0 }
    }
}

fn newline_callback(lexer: &mut Lexer<RawToken>) -> Skip {
    lexer.extras.line += 1;
    lexer.extras.line_start = lexer.span().end;

    Skip
}

fn block_comment_callback(lexer: &mut Lexer<RawToken>) -> Skip {
    let remainder  = lexer.remainder();
    let length     = remainder.find("*/").map_or(remainder.len(), |end| end + 2);
    let body_start = lexer.span().end;

    for (index, byte) in remainder[..length].bytes().enumerate() {
        if byte == b'\n' {
            lexer.extras.line += 1;
            lexer.extras.line_start = body_start + index + 1;
        }
    }

    lexer.bump(length);

    Skip
}

fn string_callback(lexer: &mut Lexer<RawToken>) -> String {
    let slice = lexer.slice();

    slice[1..slice.len() - 1].to_string()
}

/// Tokens as the scanner sees them, before identifier classification.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?",       |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+([eE][+-]?[0-9]+)?",         |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"'[^'\n]*'", string_callback)]
    Str(String),

    #[token("if")]
    If,
    #[token("else")]
    Else,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("=")]
    Equals,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // The comment body is consumed by the callback; an unclosed comment
    // runs to the end of the input.
    #[token("/*", block_comment_callback)]
    BlockComment,
    #[token("\n", newline_callback)]
    Newline,
}

/// Classified tokens as the parser consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    /// A name naming a built-in constant, e.g. `pi`.
    Constant(String),
    /// A name naming a built-in function, e.g. `sin`.
    Func(String),
    /// A name naming a registered unit symbol, e.g. `km`.
    Unit(String),
    Identifier(String),
    If,
    Else,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    Equals,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Arrow,
    Dot,
    Question,
    Colon,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

impl Token {
    /// The identifier text carried by any name-like token. Classification
    /// is a lexical guess, so the parser accepts every name-like token
    /// wherever an identifier is grammatical.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Identifier(name)
            | Self::Constant(name)
            | Self::Func(name)
            | Self::Unit(name) => Some(name),
            _ => None,
        }
    }
}

/// The line and column of a token, both counted from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line:   usize,
    pub column: usize,
}

fn classify(name: String, units: &UnitRegistry) -> Token {
    if constants::is_constant(&name) {
        Token::Constant(name)
    } else if builtin::is_builtin(&name) {
        Token::Func(name)
    } else if units.contains(&name) {
        Token::Unit(name)
    } else {
        Token::Identifier(name)
    }
}

/// Tokenizes the source text into a classified token stream.
///
/// Beyond raw scanning this performs the language's lexical conveniences:
/// an identifier glued directly onto a number either becomes that number's
/// unit (`2km`) or has a `*` inserted before it (`2x`, `4i`), an identifier
/// that follows a number and names a registered unit becomes a unit token
/// even when spaced (`30 min`), and every other bare identifier is
/// classified as constant, built-in function, unit or plain identifier, in
/// that order.
///
/// # Parameters
/// - `source`: The program text.
/// - `units`: The registry used to recognize unit symbols.
///
/// # Returns
/// The tokens paired with their source positions.
///
/// # Errors
/// - [`ParseError::UnterminatedString`] when a `'` is never closed on its
///   line.
/// - [`ParseError::UnrecognizedCharacter`] for any other unscannable input.
///
/// # Example
/// ```
/// use calcora::interpreter::{lexer::{self, Token}, units::UnitRegistry};
///
/// let units  = UnitRegistry::standard();
/// let tokens = lexer::tokenize("2x", &units).unwrap();
/// let kinds: Vec<&Token> = tokens.iter().map(|(token, _)| token).collect();
///
/// assert_eq!(kinds,
///            vec![&Token::Number(2.0), &Token::Star, &Token::Identifier("x".to_string())]);
/// ```
pub fn tokenize(source: &str, units: &UnitRegistry) -> Result<Vec<(Token, Pos)>, ParseError> {
    let mut lexer  = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut last_end = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let pos  = Pos { line:   lexer.extras.line,
                         column: span.start - lexer.extras.line_start + 1 };

        let raw = match result {
            Ok(raw)  => raw,
            Err(())  => {
                let text = lexer.slice();

                return Err(if text.starts_with('\'') {
                    ParseError::UnterminatedString { line: pos.line, column: pos.column }
                } else {
                    ParseError::UnrecognizedCharacter { text: text.to_string(),
                                                        line: pos.line,
                                                        column: pos.column }
                });
            },
        };

        let token = match raw {
            RawToken::Number(value)    => Token::Number(value),
            RawToken::Str(text)        => Token::Str(text),
            RawToken::Identifier(name) => {
                let after_number = matches!(tokens.last(), Some((Token::Number(_), _)));

                // In unit position the registry wins over the other
                // classifications, so `30 min` is minutes even though a
                // bare `min` is the built-in function.
                if after_number && units.contains(&name) {
                    Token::Unit(name)
                } else {
                    if after_number && span.start == last_end {
                        tokens.push((Token::Star, pos));
                    }

                    classify(name, units)
                }
            },
            RawToken::If           => Token::If,
            RawToken::Else         => Token::Else,
            RawToken::Plus         => Token::Plus,
            RawToken::Minus        => Token::Minus,
            RawToken::Star         => Token::Star,
            RawToken::Slash        => Token::Slash,
            RawToken::Caret        => Token::Caret,
            RawToken::Bang         => Token::Bang,
            RawToken::Equals       => Token::Equals,
            RawToken::EqualEqual   => Token::EqualEqual,
            RawToken::NotEqual     => Token::NotEqual,
            RawToken::Less         => Token::Less,
            RawToken::LessEqual    => Token::LessEqual,
            RawToken::Greater      => Token::Greater,
            RawToken::GreaterEqual => Token::GreaterEqual,
            RawToken::And          => Token::And,
            RawToken::Or           => Token::Or,
            RawToken::Arrow        => Token::Arrow,
            RawToken::Dot          => Token::Dot,
            RawToken::Question     => Token::Question,
            RawToken::Colon        => Token::Colon,
            RawToken::Comma        => Token::Comma,
            RawToken::Semicolon    => Token::Semicolon,
            RawToken::LParen       => Token::LParen,
            RawToken::RParen       => Token::RParen,
            RawToken::LBracket     => Token::LBracket,
            RawToken::RBracket     => Token::RBracket,
            RawToken::LBrace       => Token::LBrace,
            RawToken::RBrace       => Token::RBrace,
            RawToken::BlockComment | RawToken::Newline => unreachable!("skipped by callback"),
        };

        last_end = span.end;
        tokens.push((token, pos));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source, &UnitRegistry::standard()).unwrap()
                                                   .into_iter()
                                                   .map(|(token, _)| token)
                                                   .collect()
    }

    #[test]
    fn merges_number_and_unit() {
        assert_eq!(kinds("2km"),
                   vec![Token::Number(2.0), Token::Unit("km".to_string())]);
    }

    #[test]
    fn inserts_multiplication_before_glued_identifier() {
        assert_eq!(kinds("4i"),
                   vec![Token::Number(4.0), Token::Star, Token::Constant("i".to_string())]);
        assert_eq!(kinds("2sin"),
                   vec![Token::Number(2.0), Token::Star, Token::Func("sin".to_string())]);
    }

    #[test]
    fn spaced_identifier_is_not_merged() {
        assert_eq!(kinds("2 x"),
                   vec![Token::Number(2.0), Token::Identifier("x".to_string())]);
    }

    #[test]
    fn classifies_names_in_priority_order() {
        assert_eq!(kinds("pi"), vec![Token::Constant("pi".to_string())]);
        assert_eq!(kinds("sqrt"), vec![Token::Func("sqrt".to_string())]);
        assert_eq!(kinds("kg"), vec![Token::Unit("kg".to_string())]);
        assert_eq!(kinds("radius"), vec![Token::Identifier("radius".to_string())]);
        // `min` is shadowed by the built-in function of the same name.
        assert_eq!(kinds("min"), vec![Token::Func("min".to_string())]);
    }

    #[test]
    fn unit_position_beats_builtin_classification() {
        assert_eq!(kinds("30 min"),
                   vec![Token::Number(30.0), Token::Unit("min".to_string())]);
    }

    #[test]
    fn scans_number_forms() {
        assert_eq!(kinds("1.5 .5 2e3 1.5e-2"),
                   vec![Token::Number(1.5),
                        Token::Number(0.5),
                        Token::Number(2000.0),
                        Token::Number(0.015)]);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("x = 1\n  y", &UnitRegistry::standard()).unwrap();
        let positions: Vec<Pos> = tokens.iter().map(|(_, pos)| *pos).collect();

        assert_eq!(positions,
                   vec![Pos { line: 1, column: 1 },
                        Pos { line: 1, column: 3 },
                        Pos { line: 1, column: 5 },
                        Pos { line: 2, column: 3 }]);
    }

    #[test]
    fn skips_comments() {
        assert_eq!(kinds("1 + /* two\nlines */ 2 // trailing"),
                   vec![Token::Number(1.0), Token::Plus, Token::Number(2.0)]);
        assert_eq!(kinds("1 /* inline */ + 2"),
                   vec![Token::Number(1.0), Token::Plus, Token::Number(2.0)]);
        assert_eq!(kinds("7 /* unclosed"), vec![Token::Number(7.0)]);
    }

    #[test]
    fn tracks_lines_across_block_comments() {
        let tokens = tokenize("1 /* a\nb */ x", &UnitRegistry::standard()).unwrap();

        assert_eq!(tokens[1].1, Pos { line: 2, column: 6 });
    }

    #[test]
    fn reports_unterminated_string() {
        let result = tokenize("'oops", &UnitRegistry::standard());

        assert!(matches!(result, Err(ParseError::UnterminatedString { line: 1, column: 1 })));
    }

    #[test]
    fn reports_unrecognized_character() {
        let result = tokenize("1 @ 2", &UnitRegistry::standard());

        assert!(matches!(result, Err(ParseError::UnrecognizedCharacter { line: 1, column: 3, .. })));
    }
}
