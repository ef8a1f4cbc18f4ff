use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let operator = match kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Dash => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Modulo,
            TokenKind::Caret => BinaryOperator::Power,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::LessEquals => BinaryOperator::LessEquals,
            TokenKind::GreaterEquals => BinaryOperator::GreaterEquals,
            TokenKind::Equals => BinaryOperator::Equals,
            TokenKind::NotEquals => BinaryOperator::NotEquals,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            _ => return None,
        };

        Some(operator)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
