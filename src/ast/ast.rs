use std::rc::Rc;

use crate::Span;

use super::operators::BinaryOperator;

/// Literal values as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

/// Where an assignment writes, as decided by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    /// Not yet visited by the resolver.
    Unresolved,
    /// Overwrite the binding `depth` entries below the top of the environment.
    Existing(usize),
    /// The name had no enclosing binding; the assignment declares it.
    Fresh,
}

/// A syntax tree node together with the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression Kinds
///
/// The closed set of tree shapes produced by the parser. `VarRef::binding`
/// and `Assign::target` are filled in by the resolver; everything else is
/// fixed at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// `binding` is the de Bruijn depth: how many bindings sit above this one.
    VarRef {
        name: String,
        binding: Option<usize>,
    },
    BinOp {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Let {
        name: String,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    Assign {
        name: String,
        target: AssignTarget,
        value: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    While {
        condition: Box<Expr>,
        body: Vec<Expr>,
    },
    /// The body is shared with every closure built from this node.
    Fun {
        params: Vec<String>,
        body: Rc<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array(Vec<Expr>),
    ArrayIndex {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayAssign {
        array: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    ArrayInit {
        value: Box<Expr>,
        size: Box<Expr>,
    },
    Map(Vec<(Expr, Expr)>),
    MapAccess {
        map: Box<Expr>,
        key: Box<Expr>,
    },
    MapAssign {
        map: Box<Expr>,
        key: Box<Expr>,
        value: Box<Expr>,
    },
    Print(Box<Expr>),
    Input(Box<Expr>),
    Sort(Box<Expr>),
    Sequence(Vec<Expr>),
}
