use std::iter::Peekable;

use crate::error::ParseError;
use crate::interpreter::lexer::{Pos, Token};
use crate::interpreter::parser::core::{ParseResult, TokenItem};

/// Builds the error for a token that does not fit the grammar at this point.
pub(crate) fn unexpected(token: &Token, pos: Pos, expected: &str) -> ParseError {
    ParseError::UnexpectedToken { token:    format!("{token:?}"),
                                  expected: expected.to_string(),
                                  line:     pos.line,
                                  column:   pos.column }
}

/// Builds the error for running out of tokens mid-construct.
pub(crate) fn end_of_input(expected: &str) -> ParseError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string() }
}

/// Consumes the next token, requiring it to equal `wanted`.
///
/// # Returns
/// The position of the consumed token.
pub(crate) fn expect<'a, I>(tokens: &mut Peekable<I>,
                            wanted: &Token,
                            expected: &str)
                            -> ParseResult<Pos>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    match tokens.next() {
        Some((token, pos)) if token == wanted => Ok(*pos),
        Some((token, pos))                    => Err(unexpected(token, *pos, expected)),
        None                                  => Err(end_of_input(expected)),
    }
}

/// Consumes the next token, requiring it to carry a name. Constant, unit
/// and built-in names are accepted so that `pi = 3` or a parameter named
/// `t` stay legal.
pub(crate) fn expect_identifier<'a, I>(tokens: &mut Peekable<I>,
                                       expected: &str)
                                       -> ParseResult<(String, Pos)>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    match tokens.next() {
        Some((token, pos)) => match token.name() {
            Some(name) => Ok((name.to_string(), *pos)),
            None       => Err(unexpected(token, *pos, expected)),
        },
        None => Err(end_of_input(expected)),
    }
}

/// Returns `true` if the next token equals `wanted` without consuming it.
pub(crate) fn peek_is<'a, I>(tokens: &mut Peekable<I>, wanted: &Token) -> bool
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    tokens.peek().is_some_and(|(token, _)| token == wanted)
}

/// Consumes the next token if it equals `wanted`.
pub(crate) fn eat<'a, I>(tokens: &mut Peekable<I>, wanted: &Token) -> bool
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    if peek_is(tokens, wanted) {
        tokens.next();

        true
    } else {
        false
    }
}
