use std::iter::Peekable;

use crate::ast::{self, BinaryOperator, Expr};
use crate::interpreter::lexer::Token;
use crate::interpreter::parser::core::{ParseResult, TokenItem};
use crate::interpreter::parser::unary;

/// Parses one left-associative precedence level: `operand (op operand)*`.
fn parse_level<'a, I, F>(tokens: &mut Peekable<I>,
                         operand: F,
                         operator: fn(&Token) -> Option<BinaryOperator>)
                         -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone,
          F: Fn(&mut Peekable<I>) -> ParseResult<Expr>
{
    let mut node = operand(tokens)?;

    while let Some(op) = tokens.peek().and_then(|(token, _)| operator(token)) {
        tokens.next();

        let right = operand(tokens)?;
        let line  = node.line_number();

        node = ast::binary(op, node, right, line);
    }

    Ok(node)
}

pub(crate) fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, parse_logical_and, |token| match token {
        Token::Or => Some(BinaryOperator::Or),
        _         => None,
    })
}

fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, parse_equality, |token| match token {
        Token::And => Some(BinaryOperator::And),
        _          => None,
    })
}

fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, parse_relational, |token| match token {
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::NotEqual   => Some(BinaryOperator::NotEqual),
        _                 => None,
    })
}

fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, parse_additive, |token| match token {
        Token::Less         => Some(BinaryOperator::Less),
        Token::LessEqual    => Some(BinaryOperator::LessEqual),
        Token::Greater      => Some(BinaryOperator::Greater),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        _                   => None,
    })
}

fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, parse_multiplicative, |token| match token {
        Token::Plus  => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        _            => None,
    })
}

fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    parse_level(tokens, unary::parse_unary, |token| match token {
        Token::Star  => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        _            => None,
    })
}
