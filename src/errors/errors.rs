use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Returns the name of the error family this error belongs to.
    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidAssignmentTarget => "SyntaxError",
            ErrorImpl::UnboundVariable { .. } | ErrorImpl::UnresolvedVariable { .. } => {
                "UnboundVariableError"
            }
            ErrorImpl::TypeMismatch { .. } | ErrorImpl::InvalidOperands { .. } => "TypeError",
            ErrorImpl::DivisionByZero { .. } => "ZeroDivisionError",
            ErrorImpl::IndexOutOfBounds { .. } | ErrorImpl::InvalidArraySize { .. } => "IndexError",
            ErrorImpl::KeyNotFound { .. } => "KeyError",
            ErrorImpl::ArityMismatch { .. } => "ArityError",
            ErrorImpl::IntegerOverflow { .. } => "OverflowError",
            ErrorImpl::InputFailure { .. } => "InputError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only names, array elements and map entries can be assigned to",
            )),
            ErrorImpl::UnboundVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::UnresolvedVariable { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` was never resolved, run the resolver before evaluating",
                variable
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidOperands { operator, left, right } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::DivisionByZero { operator } => {
                ErrorTip::Suggestion(format!("Right operand of `{}` is zero", operator))
            }
            ErrorImpl::IndexOutOfBounds { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is outside an array of length {}",
                index, length
            )),
            ErrorImpl::InvalidArraySize { size } => {
                ErrorTip::Suggestion(format!("Array size {} is negative or too large to allocate", size))
            }
            ErrorImpl::KeyNotFound { key } => {
                ErrorTip::Suggestion(format!("Key `{}` is not present in the map", key))
            }
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::IntegerOverflow { operator } => ErrorTip::Suggestion(format!(
                "Result of `{}` does not fit in a 64-bit integer",
                operator
            )),
            ErrorImpl::InputFailure { message } => {
                ErrorTip::Suggestion(format!("Failed to read input: {}", message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_error_name(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("unbound variable: {variable}")]
    UnboundVariable { variable: String },
    #[error("variable {variable:?} reached evaluation unresolved")]
    UnresolvedVariable { variable: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("invalid operation: {left} {operator} {right}")]
    InvalidOperands { operator: String, left: String, right: String },
    #[error("division by zero in {operator:?}")]
    DivisionByZero { operator: String },
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("invalid array size {size}")]
    InvalidArraySize { size: i64 },
    #[error("key {key:?} not found")]
    KeyNotFound { key: String },
    #[error("arity mismatch: expected {expected:?}, received {received:?}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("integer overflow in {operator:?}")]
    IntegerOverflow { operator: String },
    #[error("input failure: {message}")]
    InputFailure { message: String },
}
