//! Unit tests for error handling.
//!
//! This module contains tests for error families, positions and tips.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at_zero(error: ErrorImpl) -> Error {
    Error::new(error, Position(0, Rc::new("test.cr".to_string())))
}

#[test]
fn test_error_creation() {
    let error = at_zero(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.cr".to_string()));
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.cr");
}

#[test]
fn test_syntax_family() {
    let errors = [
        ErrorImpl::UnexpectedToken { token: "}".to_string() },
        ErrorImpl::UnexpectedTokenDetailed {
            token: "1".to_string(),
            message: "expected identifier".to_string(),
        },
        ErrorImpl::NumberParseError { token: "99999999999999999999".to_string() },
        ErrorImpl::InvalidAssignmentTarget,
    ];

    for error in errors {
        assert_eq!(at_zero(error).get_error_name(), "SyntaxError");
    }
}

#[test]
fn test_unbound_variable_error() {
    let error = at_zero(ErrorImpl::UnboundVariable {
        variable: "foo".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnboundVariableError");
    assert_eq!(error.get_tip().to_string(), "Variable `foo` not declared");
}

#[test]
fn test_type_errors() {
    let mismatch = at_zero(ErrorImpl::TypeMismatch {
        expected: "Bool".to_string(),
        received: "Int".to_string(),
    });
    let operands = at_zero(ErrorImpl::InvalidOperands {
        operator: "-".to_string(),
        left: "String".to_string(),
        right: "Int".to_string(),
    });

    assert_eq!(mismatch.get_error_name(), "TypeError");
    assert_eq!(operands.get_error_name(), "TypeError");
    assert_eq!(
        operands.get_tip().to_string(),
        "Operator `-` cannot be applied to `String` and `Int`"
    );
}

#[test]
fn test_runtime_families() {
    assert_eq!(
        at_zero(ErrorImpl::DivisionByZero { operator: "/".to_string() }).get_error_name(),
        "ZeroDivisionError"
    );
    assert_eq!(
        at_zero(ErrorImpl::IndexOutOfBounds { index: 10, length: 3 }).get_error_name(),
        "IndexError"
    );
    assert_eq!(
        at_zero(ErrorImpl::KeyNotFound { key: "a".to_string() }).get_error_name(),
        "KeyError"
    );
    assert_eq!(
        at_zero(ErrorImpl::ArityMismatch { expected: 2, received: 1 }).get_error_name(),
        "ArityError"
    );
    assert_eq!(
        at_zero(ErrorImpl::IntegerOverflow { operator: "*".to_string() }).get_error_name(),
        "OverflowError"
    );
}

#[test]
fn test_error_tip_none() {
    let error = at_zero(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = at_zero(ErrorImpl::UnexpectedToken {
        token: "}".to_string(),
    });

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_family() {
    let error = at_zero(ErrorImpl::KeyNotFound { key: "z".to_string() });

    assert_eq!(error.to_string(), "KeyError: key \"z\" not found");
}
