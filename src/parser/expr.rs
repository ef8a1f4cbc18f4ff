use std::rc::Rc;

use crate::{
    ast::{
        ast::{AssignTarget, Expr, ExprKind, Literal},
        operators::BinaryOperator,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_token()),
    };

    let left = nud(parser)?;

    parse_led_chain(parser, left, bp)
}

/// Extends an already parsed `left` with every infix form binding tighter than `bp`.
pub fn parse_led_chain(parser: &mut Parser, mut left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected_token()),
        };

        let led_bp = parser.current_binding_power();
        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

/// Parses expressions separated by any of `separators` until one of `terminators`.
///
/// The terminator is left for the caller to consume. A single expression is
/// returned as-is rather than wrapped in a sequence.
pub fn parse_sequence(parser: &mut Parser, terminators: &[TokenKind], separators: &[TokenKind]) -> Result<Expr, Error> {
    let start = parser.get_position();
    let mut expressions = vec![];

    if !terminators.contains(&parser.current_token_kind()) {
        expressions.push(parse_expr(parser, BindingPower::Default)?);

        while separators.contains(&parser.current_token_kind()) {
            parser.advance();
            if terminators.contains(&parser.current_token_kind()) {
                break;
            }
            expressions.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    if expressions.len() == 1 {
        return Ok(expressions.remove(0));
    }

    Ok(Expr::new(ExprKind::Sequence(expressions), parser.span_from(start)))
}

/// Parses `{ e1; e2; ... }` and returns the individual expressions.
fn parse_block_items(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    let body = parse_sequence(parser, &[TokenKind::CloseCurly], &[TokenKind::Semicolon])?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(match body.kind {
        ExprKind::Sequence(expressions) => expressions,
        _ => vec![body],
    })
}

/// Parses `{ e1; e2; ... }` as a single expression.
fn parse_block(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    let body = parse_sequence(parser, &[TokenKind::CloseCurly], &[TokenKind::Semicolon])?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(body)
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let literal = match token.kind {
        TokenKind::Integer => Literal::Int(token.value.parse().map_err(|_| {
            Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
        })?),
        TokenKind::Float => Literal::Float(token.value.parse().map_err(|_| {
            Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
        })?),
        TokenKind::String => Literal::String(token.value.clone()),
        TokenKind::True => Literal::Bool(true),
        TokenKind::False => Literal::Bool(false),
        _ => {
            return Err(Error::new(ErrorImpl::UnexpectedToken { token: token.value }, token.span.start));
        }
    };

    Ok(Expr::new(ExprKind::Literal(literal), token.span))
}

pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    Ok(Expr::new(
        ExprKind::VarRef { name: token.value, binding: None },
        token.span,
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let operator = BinaryOperator::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(ErrorImpl::UnexpectedToken { token: operator_token.value.clone() }, operator_token.span.start.clone())
    })?;

    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };

    Ok(Expr::new(
        ExprKind::BinOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

/// `-e`: negative literals fold directly, anything else becomes `0 - e`.
///
/// The operand binds like a multiplicative rhs, so `^` still binds tighter.
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Multiplicative)?;

    let span = Span {
        start: operator_token.span.start.clone(),
        end: rhs.span.end.clone(),
    };

    let kind = match rhs.kind {
        ExprKind::Literal(Literal::Int(value)) => ExprKind::Literal(Literal::Int(-value)),
        ExprKind::Literal(Literal::Float(value)) => ExprKind::Literal(Literal::Float(-value)),
        kind => ExprKind::BinOp {
            operator: BinaryOperator::Subtract,
            left: Box::new(Expr::new(ExprKind::Literal(Literal::Int(0)), operator_token.span)),
            right: Box::new(Expr::new(kind, rhs.span)),
        },
    };

    Ok(Expr::new(kind, span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `[a, b, c]` or the array initialiser `[(value, size)]`.
pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let mut elements = vec![];

    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        let first = parse_expr(parser, BindingPower::Default)?;

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            let size = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::CloseParen)?;
            parser.expect(TokenKind::CloseBracket)?;

            return Ok(Expr::new(
                ExprKind::ArrayInit {
                    value: Box::new(first),
                    size: Box::new(size),
                },
                parser.span_from(start),
            ));
        }

        // Just a parenthesised first element.
        parser.expect(TokenKind::CloseParen)?;
        elements.push(parse_led_chain(parser, first, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            parser.expect(TokenKind::CloseBracket)?;
            return Ok(Expr::new(ExprKind::Array(elements), parser.span_from(start)));
        }
    }

    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::new(ExprKind::Array(elements), parser.span_from(start)))
}

pub fn parse_map_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let mut entries = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let key = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;

        entries.push((key, value));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::new(ExprKind::Map(entries), parser.span_from(start)))
}

/// `let name be value in body end`; further `in` clauses extend the body sequence.
pub fn parse_let_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier after `let`"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Be)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::In)?;

    let body = parse_sequence(parser, &[TokenKind::End], &[TokenKind::Semicolon, TokenKind::In])?;
    parser.expect(TokenKind::End)?;

    Ok(Expr::new(
        ExprKind::Let {
            name,
            value: Box::new(value),
            body: Box::new(body),
        },
        parser.span_from(start),
    ))
}

pub fn parse_fun_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parser.expect(TokenKind::Identifier)?.value);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Is)?;

    let body = parse_block(parser)?;

    Ok(Expr::new(
        ExprKind::Fun {
            params,
            body: Rc::new(body),
        },
        parser.span_from(start),
    ))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_block(parser)?;
    parser.expect(TokenKind::Then)?;
    let then_branch = parse_block(parser)?;
    parser.expect(TokenKind::Else)?;
    let else_branch = parse_block(parser)?;
    parser.expect(TokenKind::End)?;

    Ok(Expr::new(
        ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        },
        parser.span_from(start),
    ))
}

/// `while { cond } do { s1 } { s2; s3 } end`: the braced groups form one flat body.
pub fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_block(parser)?;
    parser.expect(TokenKind::Do)?;

    let mut body = vec![];
    while parser.current_token_kind() == TokenKind::OpenCurly {
        body.extend(parse_block_items(parser)?);
    }

    parser.expect(TokenKind::End)?;

    Ok(Expr::new(
        ExprKind::While {
            condition: Box::new(condition),
            body,
        },
        parser.span_from(start),
    ))
}

/// `print(e)`, `input(e)` and `sort(e)`.
pub fn parse_builtin_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let keyword = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    let argument = Box::new(parse_expr(parser, BindingPower::Default)?);
    parser.expect(TokenKind::CloseParen)?;

    let kind = match keyword.kind {
        TokenKind::Print => ExprKind::Print(argument),
        TokenKind::Input => ExprKind::Input(argument),
        TokenKind::Sort => ExprKind::Sort(argument),
        _ => return Err(Error::new(ErrorImpl::UnexpectedToken { token: keyword.value }, keyword.span.start)),
    };

    Ok(Expr::new(kind, parser.span_from(keyword.span.start)))
}

/// `left := value`, rewritten by the shape of `left`.
pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    // Right associative: `a := b := 1` assigns both.
    let value = Box::new(parse_expr(parser, BindingPower::Default)?);

    let span = Span {
        start: left.span.start.clone(),
        end: value.span.end.clone(),
    };

    let kind = match left.kind {
        ExprKind::VarRef { name, .. } => ExprKind::Assign {
            name,
            target: AssignTarget::Unresolved,
            value,
        },
        ExprKind::ArrayIndex { array, index } => ExprKind::ArrayAssign { array, index, value },
        ExprKind::MapAccess { map, key } => ExprKind::MapAssign { map, key, value },
        _ => return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, left.span.start)),
    };

    Ok(Expr::new(kind, span))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let span = parser.span_from(left.span.start.clone());

    Ok(Expr::new(
        ExprKind::Call {
            callee: Box::new(left),
            arguments,
        },
        span,
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    let span = parser.span_from(left.span.start.clone());

    Ok(Expr::new(
        ExprKind::ArrayIndex {
            array: Box::new(left),
            index: Box::new(index),
        },
        span,
    ))
}

/// `m.key` reads the String key `"key"`; any other primary is evaluated as the key.
pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let key = if parser.current_token_kind() == TokenKind::Identifier {
        let token = parser.advance().clone();
        Expr::new(ExprKind::Literal(Literal::String(token.value)), token.span)
    } else {
        parse_expr(parser, BindingPower::Primary)?
    };

    let span = parser.span_from(left.span.start.clone());

    Ok(Expr::new(
        ExprKind::MapAccess {
            map: Box::new(left),
            key: Box::new(key),
        },
        span,
    ))
}
