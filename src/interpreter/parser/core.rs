use std::iter::Peekable;

use crate::ast::Expr;
use crate::error::ParseError;
use crate::interpreter::lexer::{Pos, Token};
use crate::interpreter::parser::{binary, statement, utils};

/// Convenience alias for parsing results.
pub type ParseResult<T> = Result<T, ParseError>;
/// A classified token together with its source position.
pub type TokenItem = (Token, Pos);

/// Parses a whole token stream into a single [`Expr::Block`] of statements.
///
/// Statements are separated by semicolons; stray semicolons are allowed and
/// skipped. An empty stream parses to an empty block.
///
/// # Errors
/// Any [`ParseError`] produced while parsing a statement.
///
/// # Example
/// ```
/// use calcora::interpreter::{lexer, parser::core, units::UnitRegistry};
///
/// let units   = UnitRegistry::standard();
/// let tokens  = lexer::tokenize("x = 2; x + 1", &units).unwrap();
/// let program = core::parse_program(&mut tokens.iter().peekable()).unwrap();
///
/// assert!(matches!(program, calcora::ast::Expr::Block { .. }));
/// ```
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut statements = Vec::new();

    while tokens.peek().is_some() {
        if utils::eat(tokens, &Token::Semicolon) {
            continue;
        }

        statements.push(statement::parse_statement(tokens)?);
    }

    Ok(Expr::Block { statements, line: 1 })
}

/// Parses a single expression at the lowest precedence level.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_conditional(tokens)
}

/// Parses the ternary conditional `condition ? then : else`. The branches
/// are themselves conditionals, so the operator nests to the right.
fn parse_conditional<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let condition = binary::parse_logical_or(tokens)?;

    if !utils::eat(tokens, &Token::Question) {
        return Ok(condition);
    }

    let line      = condition.line_number();
    let then_expr = parse_conditional(tokens)?;

    utils::expect(tokens, &Token::Colon, "':' between conditional branches")?;

    let else_expr = parse_conditional(tokens)?;

    Ok(Expr::Conditional { condition: Box::new(condition),
                           then_expr: Box::new(then_expr),
                           else_expr: Box::new(else_expr),
                           line })
}
