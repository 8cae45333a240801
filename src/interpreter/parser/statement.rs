use std::iter::Peekable;
use std::rc::Rc;

use crate::ast::{Expr, FunctionDef};
use crate::interpreter::lexer::Token;
use crate::interpreter::parser::core::{self, ParseResult, TokenItem};
use crate::interpreter::parser::utils;

/// Parses one statement: a block, a function definition, an assignment, or
/// a bare expression.
pub(crate) fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    if utils::peek_is(tokens, &Token::LBrace) {
        return parse_block(tokens);
    }

    if tokens.peek().is_some_and(|(token, _)| token.name().is_some()) {
        if is_function_definition(tokens) {
            return parse_function_definition(tokens);
        }

        let mut ahead = tokens.clone();

        ahead.next();

        if matches!(ahead.peek(), Some((Token::Equals, _))) {
            return parse_assignment(tokens);
        }
    }

    core::parse_expression(tokens)
}

/// Scans ahead for `name ( … ) =` without consuming anything. The scan
/// tracks parenthesis depth so nested calls inside the parameter list do not
/// end it early.
fn is_function_definition<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut ahead = tokens.clone();

    if !ahead.next().is_some_and(|(token, _)| token.name().is_some()) {
        return false;
    }

    if !matches!(ahead.next(), Some((Token::LParen, _))) {
        return false;
    }

    let mut depth = 1_usize;

    for (token, _) in ahead.by_ref() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;

                if depth == 0 {
                    break;
                }
            },
            _ => {},
        }
    }

    depth == 0 && matches!(ahead.next(), Some((Token::Equals, _)))
}

fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let (name, pos) = utils::expect_identifier(tokens, "a function name")?;

    utils::expect(tokens, &Token::LParen, "'(' after function name")?;

    let mut params = Vec::new();

    if !utils::peek_is(tokens, &Token::RParen) {
        loop {
            params.push(utils::expect_identifier(tokens, "a parameter name")?.0);

            if !utils::eat(tokens, &Token::Comma) {
                break;
            }
        }
    }

    utils::expect(tokens, &Token::RParen, "')' to close parameter list")?;
    utils::expect(tokens, &Token::Equals, "'=' before function body")?;

    let body = core::parse_expression(tokens)?;

    Ok(Expr::FunctionDefinition(Rc::new(FunctionDef { name,
                                                      params,
                                                      body,
                                                      line: pos.line })))
}

fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let (name, pos) = utils::expect_identifier(tokens, "a variable name")?;

    utils::expect(tokens, &Token::Equals, "'=' in assignment")?;

    // The value is a statement so that assignments chain: `x = y = 2`.
    let value = parse_statement(tokens)?;

    Ok(Expr::Assignment { target: Box::new(Expr::Variable { name, line: pos.line }),
                          value:  Box::new(value),
                          line:   pos.line })
}

/// Parses `{ statement; … }`. Semicolons between statements are optional
/// and stray ones are skipped.
pub(crate) fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let pos = utils::expect(tokens, &Token::LBrace, "'{'")?;
    let mut statements = Vec::new();

    loop {
        while utils::eat(tokens, &Token::Semicolon) {}

        if utils::eat(tokens, &Token::RBrace) {
            break;
        }

        if tokens.peek().is_none() {
            return Err(utils::end_of_input("'}' to close block"));
        }

        statements.push(parse_statement(tokens)?);
    }

    Ok(Expr::Block { statements, line: pos.line })
}
