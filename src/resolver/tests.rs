use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    ast::ast::{AssignTarget, Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::resolver::{resolve, resolve_expr, Resolver};

fn parse_source(source: &str) -> Expr {
    let tokens = tokenize(source, Some("test.cr".to_string())).unwrap();
    parse(tokens, Rc::new("test.cr".to_string())).unwrap()
}

fn resolve_source(source: &str) -> Result<Expr, Error> {
    resolve(parse_source(source))
}

fn children(expr: &Expr) -> Vec<&Expr> {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::VarRef { .. } => vec![],
        ExprKind::BinOp { left, right, .. } => vec![&**left, &**right],
        ExprKind::Let { value, body, .. } => vec![&**value, &**body],
        ExprKind::Assign { value, .. } => vec![&**value],
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => vec![&**condition, &**then_branch, &**else_branch],
        ExprKind::While { condition, body } => std::iter::once(condition.as_ref()).chain(body.iter()).collect(),
        ExprKind::Fun { body, .. } => vec![body.as_ref()],
        ExprKind::Call { callee, arguments } => std::iter::once(callee.as_ref()).chain(arguments.iter()).collect(),
        ExprKind::Array(elements) | ExprKind::Sequence(elements) => elements.iter().collect(),
        ExprKind::ArrayIndex { array, index } => vec![&**array, &**index],
        ExprKind::ArrayAssign { array, index, value } => vec![&**array, &**index, &**value],
        ExprKind::ArrayInit { value, size } => vec![&**size, &**value],
        ExprKind::Map(entries) => entries.iter().flat_map(|(key, value)| [key, value]).collect(),
        ExprKind::MapAccess { map, key } => vec![&**map, &**key],
        ExprKind::MapAssign { map, key, value } => vec![&**map, &**key, &**value],
        ExprKind::Print(argument) | ExprKind::Input(argument) | ExprKind::Sort(argument) => vec![&**argument],
    }
}

/// Every reference in evaluation order, with its resolved depth.
fn references(expr: &Expr) -> Vec<(String, Option<usize>)> {
    let mut found = vec![];
    if let ExprKind::VarRef { name, binding } = &expr.kind {
        found.push((name.clone(), *binding));
    }
    for child in children(expr) {
        found.extend(references(child));
    }
    found
}

/// Every assignment in evaluation order, with its target.
fn assignments(expr: &Expr) -> Vec<(String, AssignTarget)> {
    let mut found = vec![];
    for child in children(expr) {
        found.extend(assignments(child));
    }
    if let ExprKind::Assign { name, target, .. } = &expr.kind {
        found.push((name.clone(), *target));
    }
    found
}

fn depths(source: &str) -> Vec<(String, Option<usize>)> {
    references(&resolve_source(source).unwrap())
}

fn refs(expected: &[(&str, usize)]) -> Vec<(String, Option<usize>)> {
    expected
        .iter()
        .map(|(name, depth)| (name.to_string(), Some(*depth)))
        .collect()
}

#[test]
fn test_resolve_let() {
    assert_eq!(depths("let x be 5 in x + 3 end"), refs(&[("x", 0)]));
    assert_eq!(
        depths("let x be 1 in let y be 2 in x + y end end"),
        refs(&[("x", 1), ("y", 0)])
    );
}

#[test]
fn test_resolve_shadowing() {
    assert_eq!(depths("let x be 1 in let x be 2 in x end end"), refs(&[("x", 0)]));
    assert_eq!(
        depths("let x be 1 in let x be x + 1 in x end end"),
        refs(&[("x", 0), ("x", 0)])
    );
}

#[test]
fn test_resolve_let_value_cannot_see_its_name() {
    let error = resolve_source("let x be x + 1 in x end").unwrap_err();

    assert_eq!(error.get_error(), &ErrorImpl::UnboundVariable { variable: "x".to_string() });
    assert_eq!(error.get_position().0, 9);
}

#[test]
fn test_resolve_recursive_function() {
    assert_eq!(
        depths("let f be fun(n) is { f(n - 1) } in f(3) end"),
        refs(&[("f", 1), ("n", 0), ("f", 0)])
    );
}

#[test]
fn test_resolve_function_parameters_and_captures() {
    assert_eq!(depths("fun(a, b) is { a - b }"), refs(&[("a", 1), ("b", 0)]));
    assert_eq!(
        depths("let k be 10 in fun(a) is { a + k } end"),
        refs(&[("a", 0), ("k", 1)])
    );
}

#[test]
fn test_resolve_parameters_do_not_escape() {
    let error = resolve_source("let f be fun(a) is { a } in a end").unwrap_err();

    assert_eq!(error.get_error_name(), "UnboundVariableError");
}

#[test]
fn test_resolve_assignment_targets() {
    let tree = resolve_source("x := 1; x := 2; x").unwrap();

    assert_eq!(
        assignments(&tree),
        vec![
            ("x".to_string(), AssignTarget::Fresh),
            ("x".to_string(), AssignTarget::Existing(0)),
        ]
    );
    assert_eq!(references(&tree), refs(&[("x", 0)]));
}

#[test]
fn test_resolve_assignment_to_outer_binding() {
    let tree = resolve_source("let a be 1 in let b be 2 in a := b end end").unwrap();

    assert_eq!(assignments(&tree), vec![("a".to_string(), AssignTarget::Existing(1))]);
}

#[test]
fn test_resolve_assignment_value_cannot_see_fresh_name() {
    let error = resolve_source("y := y + 1").unwrap_err();

    assert_eq!(error.get_error(), &ErrorImpl::UnboundVariable { variable: "y".to_string() });
}

#[test]
fn test_resolve_if_branches_are_scoped() {
    let error = resolve_source("if {true} then {y := 1} else {2} end; y").unwrap_err();

    assert_eq!(error.get_error(), &ErrorImpl::UnboundVariable { variable: "y".to_string() });
}

#[test]
fn test_resolve_while_body_bindings() {
    let tree = resolve_source("let i be 0 in while {i < 3} do { t := i; i := t + 1 } end in i end").unwrap();

    assert_eq!(
        references(&tree),
        refs(&[("i", 0), ("i", 0), ("t", 0), ("i", 0)])
    );
    assert_eq!(
        assignments(&tree),
        vec![
            ("t".to_string(), AssignTarget::Fresh),
            ("i".to_string(), AssignTarget::Existing(1)),
        ]
    );
}

#[test]
fn test_resolve_while_bindings_do_not_escape() {
    let error = resolve_source("while {false} do { t := 1 } end; t").unwrap_err();

    assert_eq!(error.get_error_name(), "UnboundVariableError");
}

#[test]
fn test_resolve_array_init_resolves_size_first() {
    let error = resolve_source("[(n := 1, n)]").unwrap_err();
    assert_eq!(error.get_error(), &ErrorImpl::UnboundVariable { variable: "n".to_string() });

    assert_eq!(depths("[(n, n := 2)]"), refs(&[("n", 0)]));
}

#[test]
fn test_resolve_with_bindings() {
    let mut resolver = Resolver::with_bindings(["a", "b"]);
    let tree = resolve_expr(&mut resolver, parse_source("a + b")).unwrap();

    assert_eq!(references(&tree), refs(&[("a", 1), ("b", 0)]));
    assert_eq!(resolver.scope(), &["a".to_string(), "b".to_string()]);
}

#[test]
fn test_resolve_scope_restored_after_error() {
    let mut resolver = Resolver::with_bindings(["a"]);
    let result = resolve_expr(&mut resolver, parse_source("let b be 1 in c end"));

    assert!(result.is_err());
    assert_eq!(resolver.scope(), &["a".to_string()]);
}

#[test]
fn test_resolve_every_reference() {
    let tree = resolve_source(
        "m := {\"k\": [1, 2]}; m.k[0] := sort(m.k)[1]; print(input(\"x\")); let f be fun(a) is { a } in f(m) end",
    )
    .unwrap();

    assert!(references(&tree).iter().all(|(_, binding)| binding.is_some()));
}
