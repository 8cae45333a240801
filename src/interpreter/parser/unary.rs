use std::iter::Peekable;

use crate::ast::{self, BinaryOperator, Expr, UnaryOperator};
use crate::interpreter::lexer::{Pos, Token};
use crate::interpreter::parser::core::{self, ParseResult, TokenItem};
use crate::interpreter::parser::utils;

/// Parses prefix `+` and `-`, which bind looser than postfix `!`:
/// `-4!` negates the factorial.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Plus, _))  => Some(UnaryOperator::Plus),
        Some((Token::Minus, _)) => Some(UnaryOperator::Negate),
        _                       => None,
    };

    let Some(op) = op else {
        return parse_postfix(tokens);
    };

    let Some((_, pos)) = tokens.next() else { unreachable!("peeked above") };
    let operand = parse_unary(tokens)?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(operand),
                       line: pos.line })
}

/// Parses the postfix factorial. It applies after an entire implicit
/// multiplication chain, so `2 x!` is `(2*x)!`.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut node = parse_implicit_multiplication(tokens)?;

    while utils::eat(tokens, &Token::Bang) {
        let line = node.line_number();

        node = Expr::UnaryOp { op:   UnaryOperator::Factorial,
                               expr: Box::new(node),
                               line };
    }

    Ok(node)
}

fn is_implicit_trigger(token: &Token) -> bool {
    matches!(token,
             Token::Number(_)
             | Token::Identifier(_)
             | Token::Constant(_)
             | Token::Func(_)
             | Token::Unit(_)
             | Token::LParen
             | Token::LBracket)
}

/// Parses juxtaposed factors as multiplication: `2x`, `pi r^2`, `2(x+3)`.
///
/// The chain is left-associative and each factor absorbs a trailing
/// exponent first, so `2 x^2` parses as `2 * (x^2)`.
fn parse_implicit_multiplication<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut node = parse_power(tokens)?;

    while tokens.peek().is_some_and(|(token, _)| is_implicit_trigger(token)) {
        let right = parse_power(tokens)?;
        let line  = node.line_number();

        node = ast::binary(BinaryOperator::Mul, node, right, line);
    }

    Ok(node)
}

/// Parses `base (^ exponent)*` left-associatively: `2^3^2` is `(2^3)^2`.
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut node = parse_primary(tokens)?;

    while utils::eat(tokens, &Token::Caret) {
        let right = parse_exponent(tokens)?;
        let line  = node.line_number();

        node = ast::binary(BinaryOperator::Pow, node, right, line);
    }

    Ok(node)
}

/// Parses a single exponent: an optional sign, a primary, and any trailing
/// factorials. A following `^` is left for the caller's loop, which keeps
/// the chain left-to-right.
fn parse_exponent<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Plus, _))  => Some(UnaryOperator::Plus),
        Some((Token::Minus, _)) => Some(UnaryOperator::Negate),
        _                       => None,
    };

    if let Some(op) = op {
        let Some((_, pos)) = tokens.next() else { unreachable!("peeked above") };
        let operand = parse_exponent(tokens)?;

        return Ok(Expr::UnaryOp { op,
                                  expr: Box::new(operand),
                                  line: pos.line });
    }

    let mut node = parse_primary(tokens)?;

    while utils::eat(tokens, &Token::Bang) {
        let line = node.line_number();

        node = Expr::UnaryOp { op:   UnaryOperator::Factorial,
                               expr: Box::new(node),
                               line };
    }

    Ok(node)
}

fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let (token, pos) = match tokens.peek() {
        Some((token, pos)) => (token.clone(), *pos),
        None               => return Err(utils::end_of_input("an expression")),
    };

    match token {
        Token::Number(value) => {
            tokens.next();

            parse_unit_suffix(tokens, value, pos)
        },

        Token::Str(text) => {
            tokens.next();

            Ok(Expr::String { value: text, line: pos.line })
        },

        // Constants resolve through the evaluator's constant registry, so a
        // plain variable reference suffices here. A `(` after a constant is
        // implicit multiplication, not a call.
        Token::Constant(name) => {
            tokens.next();

            parse_access_chain(tokens, Expr::Variable { name, line: pos.line })
        },

        // Built-in and unit names are lexical guesses; in expression
        // position they behave like any identifier, so `g(4)` reaches the
        // evaluator and `f(t) = t` can use `t` as a variable.
        Token::Func(name) | Token::Unit(name) | Token::Identifier(name) => {
            parse_identifier_expression(tokens, name, pos)
        },

        Token::If => parse_if_expression(tokens),

        Token::LParen => {
            tokens.next();

            let inner = core::parse_expression(tokens)?;

            utils::expect(tokens, &Token::RParen, "')' to close grouping")?;
            parse_access_chain(tokens, inner)
        },

        Token::LBracket => parse_array(tokens),

        Token::Arrow => parse_lambda(tokens),

        other => Err(utils::unexpected(&other, pos, "an expression")),
    }
}

/// Attaches a unit annotation to a number literal when one follows directly.
/// A compound unit continues over `/` or `*` only when the symbol after the
/// operator is itself a unit token, so `60 km / 2` stays a division.
fn parse_unit_suffix<'a, I>(tokens: &mut Peekable<I>, value: f64, pos: Pos) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let symbol = match tokens.peek() {
        Some((Token::Unit(symbol), _)) => symbol.clone(),
        _                              => return Ok(Expr::Number { value, line: pos.line }),
    };

    tokens.next();

    let mut unit_text = symbol;

    loop {
        let mut ahead = tokens.clone();

        let separator = match (ahead.next(), ahead.next()) {
            (Some((Token::Slash, _)), Some((Token::Unit(next), _))) => ('/', next.clone()),
            (Some((Token::Star, _)), Some((Token::Unit(next), _)))  => ('*', next.clone()),
            _                                                       => break,
        };

        tokens.next();
        tokens.next();
        unit_text.push(separator.0);
        unit_text.push_str(&separator.1);
    }

    Ok(Expr::Unit { value: Box::new(Expr::Number { value, line: pos.line }),
                    unit:  unit_text,
                    line:  pos.line })
}

/// Parses an expression starting at a plain identifier: a derivative request
/// (`d/dx (…)`), a call, or a variable with optional property and index
/// accesses.
fn parse_identifier_expression<'a, I>(tokens: &mut Peekable<I>,
                                      name: String,
                                      pos: Pos)
                                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    if name == "d" {
        if let Some(variable) = peek_derivative_variable(tokens) {
            return parse_derivative(tokens, variable, pos);
        }
    }

    tokens.next();

    if utils::peek_is(tokens, &Token::LParen) {
        tokens.next();

        let args = parse_call_args(tokens)?;

        return Ok(Expr::Call { name, args, line: pos.line });
    }

    parse_access_chain(tokens, Expr::Variable { name, line: pos.line })
}

/// Looks ahead for the `d / d<var>` pattern and extracts the variable name.
fn peek_derivative_variable<'a, I>(tokens: &Peekable<I>) -> Option<String>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut ahead = tokens.clone();

    ahead.next(); // the leading `d`

    match (ahead.next(), ahead.next()) {
        (Some((Token::Slash, _)), Some((Token::Identifier(denominator), _)))
            if denominator.len() > 1 && denominator.starts_with('d') =>
        {
            Some(denominator[1..].to_string())
        },
        _ => None,
    }
}

fn parse_derivative<'a, I>(tokens: &mut Peekable<I>,
                           variable: String,
                           pos: Pos)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    tokens.next(); // `d`
    tokens.next(); // `/`
    tokens.next(); // `dx`

    // The operand needs no parentheses: `d/dx x^2` differentiates the
    // whole juxtaposition chain, while `+` and beyond stay outside.
    let expression = if utils::peek_is(tokens, &Token::LParen) {
        tokens.next();

        let inner = core::parse_expression(tokens)?;

        utils::expect(tokens, &Token::RParen, "')' to close derivative expression")?;
        inner
    } else {
        parse_implicit_multiplication(tokens)?
    };

    Ok(Expr::Derivative { variable,
                          expression: Box::new(expression),
                          line: pos.line })
}

/// Parses trailing `.property` and `[index]` accesses onto a node.
fn parse_access_chain<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    loop {
        if utils::eat(tokens, &Token::Dot) {
            let (property, pos) = utils::expect_identifier(tokens, "a property name")?;

            node = Expr::PropertyAccess { object:   Box::new(node),
                                          property,
                                          line: pos.line };
        } else if utils::peek_is(tokens, &Token::LBracket) {
            tokens.next();

            let index = core::parse_expression(tokens)?;
            let line  = node.line_number();

            utils::expect(tokens, &Token::RBracket, "']' to close index")?;

            node = ast::binary(BinaryOperator::Index, node, index, line);
        } else {
            return Ok(node);
        }
    }
}

fn parse_call_args<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let mut args = Vec::new();

    if !utils::peek_is(tokens, &Token::RParen) {
        loop {
            args.push(core::parse_expression(tokens)?);

            if !utils::eat(tokens, &Token::Comma) {
                break;
            }
        }
    }

    utils::expect(tokens, &Token::RParen, "')' to close argument list")?;

    Ok(args)
}

/// Parses both conditional spellings: the call form `if(cond, a, b)` and the
/// clause form `if (cond) a else b`. The forms are told apart by whether a
/// comma follows the condition.
fn parse_if_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let pos = utils::expect(tokens, &Token::If, "'if'")?;

    utils::expect(tokens, &Token::LParen, "'(' after 'if'")?;

    let condition = core::parse_expression(tokens)?;

    let (then_expr, else_expr) = if utils::eat(tokens, &Token::Comma) {
        let then_expr = core::parse_expression(tokens)?;

        utils::expect(tokens, &Token::Comma, "',' before else branch")?;

        let else_expr = core::parse_expression(tokens)?;

        utils::expect(tokens, &Token::RParen, "')' to close 'if'")?;

        (then_expr, else_expr)
    } else {
        utils::expect(tokens, &Token::RParen, "')' after condition")?;

        let then_expr = core::parse_expression(tokens)?;

        utils::expect(tokens, &Token::Else, "'else' after if branch")?;

        (then_expr, core::parse_expression(tokens)?)
    };

    Ok(Expr::Conditional { condition: Box::new(condition),
                           then_expr: Box::new(then_expr),
                           else_expr: Box::new(else_expr),
                           line:      pos.line })
}

/// Parses an array literal, promoting it to a matrix when every element is
/// itself an array literal.
fn parse_array<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let pos = utils::expect(tokens, &Token::LBracket, "'['")?;
    let mut elements = Vec::new();

    if !utils::peek_is(tokens, &Token::RBracket) {
        loop {
            elements.push(core::parse_expression(tokens)?);

            if !utils::eat(tokens, &Token::Comma) {
                break;
            }
        }
    }

    utils::expect(tokens, &Token::RBracket, "']' to close array")?;

    let is_matrix = !elements.is_empty()
                    && elements.iter().all(|element| matches!(element, Expr::Array { .. }));

    if is_matrix {
        let rows = elements.into_iter()
                           .map(|element| match element {
                               Expr::Array { elements, .. } => elements,
                               _ => unreachable!("checked above"),
                           })
                           .collect();

        return parse_access_chain(tokens, Expr::Matrix { rows, line: pos.line });
    }

    parse_access_chain(tokens, Expr::Array { elements, line: pos.line })
}

/// Parses a lambda literal. The parameter list is parenthesized
/// (`->(x, y) x + y`) or a single bare name (`-> x x + 1`).
fn parse_lambda<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a TokenItem> + Clone
{
    let pos = utils::expect(tokens, &Token::Arrow, "'->'")?;
    let mut params = Vec::new();

    if tokens.peek().is_some_and(|(token, _)| token.name().is_some()) {
        params.push(utils::expect_identifier(tokens, "a parameter name")?.0);
    } else {
        utils::expect(tokens, &Token::LParen, "'(' after '->'")?;

        if !utils::peek_is(tokens, &Token::RParen) {
            loop {
                params.push(utils::expect_identifier(tokens, "a parameter name")?.0);

                if !utils::eat(tokens, &Token::Comma) {
                    break;
                }
            }
        }

        utils::expect(tokens, &Token::RParen, "')' to close parameter list")?;
    }

    let body = core::parse_expression(tokens)?;

    Ok(Expr::Lambda { params,
                      body: Box::new(body),
                      line: pos.line })
}
