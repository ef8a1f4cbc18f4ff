use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::ast::{AssignTarget, Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
};

/// Static scope used while resolving a tree.
///
/// `scope` mirrors the runtime environment name for name: whenever the
/// evaluator would push a binding, the resolver pushes the same name, and
/// wherever the evaluator truncates, so does the resolver.
#[derive(Debug, Default)]
pub struct Resolver {
    scope: Vec<String>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver { scope: vec![] }
    }

    /// Starts from a scope that already contains `names`, outermost first.
    pub fn with_bindings<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Resolver {
            scope: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Depth of the innermost binding called `name`, 0 being the top of the stack.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.scope
            .iter()
            .rev()
            .position(|binding| binding == name)
    }

    pub fn declare(&mut self, name: String) {
        self.scope.push(name);
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Runs `f`, then drops every name it declared, on success or failure.
    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Resolver) -> Result<T, Error>) -> Result<T, Error> {
        let mark = self.scope.len();
        let result = f(self);
        self.scope.truncate(mark);
        result
    }
}

fn resolve_boxed(resolver: &mut Resolver, expr: Box<Expr>) -> Result<Box<Expr>, Error> {
    Ok(Box::new(resolve_expr(resolver, *expr)?))
}

fn resolve_all(resolver: &mut Resolver, exprs: Vec<Expr>) -> Result<Vec<Expr>, Error> {
    exprs.into_iter().map(|expr| resolve_expr(resolver, expr)).collect()
}

fn resolve_fun(resolver: &mut Resolver, params: Vec<String>, body: Rc<Expr>) -> Result<ExprKind, Error> {
    let body = Rc::try_unwrap(body).unwrap_or_else(|shared| (*shared).clone());

    let body = resolver.in_scope(|resolver| {
        for param in params.iter() {
            resolver.declare(param.clone());
        }
        resolve_expr(resolver, body)
    })?;

    Ok(ExprKind::Fun {
        params,
        body: Rc::new(body),
    })
}

/// Resolves `expr` against the resolver's current scope.
///
/// Children are visited in exactly the order the evaluator runs them, so a
/// binding introduced by an assignment is visible to everything evaluated
/// after it and nothing before.
pub fn resolve_expr(resolver: &mut Resolver, expr: Expr) -> Result<Expr, Error> {
    let Expr { kind, span } = expr;

    let kind = match kind {
        ExprKind::Literal(literal) => ExprKind::Literal(literal),
        ExprKind::VarRef { name, .. } => match resolver.lookup(&name) {
            Some(depth) => {
                trace!(name = %name, depth, "resolved reference");
                ExprKind::VarRef {
                    name,
                    binding: Some(depth),
                }
            }
            None => return Err(Error::new(ErrorImpl::UnboundVariable { variable: name }, span.start)),
        },
        ExprKind::BinOp { operator, left, right } => {
            let left = resolve_boxed(resolver, left)?;
            let right = resolve_boxed(resolver, right)?;
            ExprKind::BinOp { operator, left, right }
        }
        ExprKind::Let { name, value, body } => resolver.in_scope(|resolver| {
            let Expr { kind: value_kind, span: value_span } = *value;

            let value = match value_kind {
                // The function sees its own name so it can call itself.
                ExprKind::Fun { params, body } => {
                    resolver.declare(name.clone());
                    let kind = resolve_fun(resolver, params, body)?;
                    Box::new(Expr::new(kind, value_span))
                }
                kind => {
                    let value = resolve_expr(resolver, Expr::new(kind, value_span))?;
                    resolver.declare(name.clone());
                    Box::new(value)
                }
            };

            let body = resolve_boxed(resolver, body)?;
            Ok(ExprKind::Let { name, value, body })
        })?,
        ExprKind::Assign { name, value, .. } => {
            let value = resolve_boxed(resolver, value)?;

            let target = match resolver.lookup(&name) {
                Some(depth) => AssignTarget::Existing(depth),
                None => {
                    debug!(name = %name, position = span.start.0, "assignment declares a new binding");
                    resolver.declare(name.clone());
                    AssignTarget::Fresh
                }
            };

            ExprKind::Assign { name, target, value }
        }
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition = resolve_boxed(resolver, condition)?;
            let then_branch = resolver.in_scope(|resolver| resolve_boxed(resolver, then_branch))?;
            let else_branch = resolver.in_scope(|resolver| resolve_boxed(resolver, else_branch))?;

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            }
        }
        ExprKind::While { condition, body } => resolver.in_scope(|resolver| {
            let condition = resolve_boxed(resolver, condition)?;
            let body = resolve_all(resolver, body)?;
            Ok(ExprKind::While { condition, body })
        })?,
        ExprKind::Fun { params, body } => resolve_fun(resolver, params, body)?,
        ExprKind::Call { callee, arguments } => {
            let callee = resolve_boxed(resolver, callee)?;
            let arguments = resolve_all(resolver, arguments)?;
            ExprKind::Call { callee, arguments }
        }
        ExprKind::Array(elements) => ExprKind::Array(resolve_all(resolver, elements)?),
        ExprKind::ArrayIndex { array, index } => {
            let array = resolve_boxed(resolver, array)?;
            let index = resolve_boxed(resolver, index)?;
            ExprKind::ArrayIndex { array, index }
        }
        ExprKind::ArrayAssign { array, index, value } => {
            let array = resolve_boxed(resolver, array)?;
            let index = resolve_boxed(resolver, index)?;
            let value = resolve_boxed(resolver, value)?;
            ExprKind::ArrayAssign { array, index, value }
        }
        ExprKind::ArrayInit { value, size } => {
            let size = resolve_boxed(resolver, size)?;
            let value = resolve_boxed(resolver, value)?;
            ExprKind::ArrayInit { value, size }
        }
        ExprKind::Map(entries) => {
            let mut resolved = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = resolve_expr(resolver, key)?;
                let value = resolve_expr(resolver, value)?;
                resolved.push((key, value));
            }
            ExprKind::Map(resolved)
        }
        ExprKind::MapAccess { map, key } => {
            let map = resolve_boxed(resolver, map)?;
            let key = resolve_boxed(resolver, key)?;
            ExprKind::MapAccess { map, key }
        }
        ExprKind::MapAssign { map, key, value } => {
            let map = resolve_boxed(resolver, map)?;
            let key = resolve_boxed(resolver, key)?;
            let value = resolve_boxed(resolver, value)?;
            ExprKind::MapAssign { map, key, value }
        }
        ExprKind::Print(argument) => ExprKind::Print(resolve_boxed(resolver, argument)?),
        ExprKind::Input(argument) => ExprKind::Input(resolve_boxed(resolver, argument)?),
        ExprKind::Sort(argument) => ExprKind::Sort(resolve_boxed(resolver, argument)?),
        ExprKind::Sequence(expressions) => ExprKind::Sequence(resolve_all(resolver, expressions)?),
    };

    Ok(Expr::new(kind, span))
}

/// Resolves a whole program against an empty scope.
pub fn resolve(tree: Expr) -> Result<Expr, Error> {
    let mut resolver = Resolver::new();
    resolve_expr(&mut resolver, tree)
}
