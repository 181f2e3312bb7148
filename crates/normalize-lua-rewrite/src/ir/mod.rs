//! Syntax tree shared by the reader, the rewrite engine, and the writer.
//!
//! The shapes follow Python's grammar closely enough for the reader to map
//! each statement one-to-one, and stay small enough that the rewrite rules
//! can match on them exhaustively.
//!
//! # Ownership
//!
//! Every node is owned by exactly one parent slot, with one exception:
//! [`Stmt::Assign`] keeps its value behind an [`Rc`] so that splitting
//! `a = b = v` can hand the *same* value subtree to every resulting
//! assignment. Shared values are read-only.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `def name(params): body`
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },

    /// `if test: body` followed by `orelse`.
    ///
    /// `orelse` is either empty, a single chained `If` (an `elif`), or a
    /// plain `else` body.
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },

    /// `for target in iter: body`
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
    },

    /// `while test: body`
    While { test: Expr, body: Vec<Stmt> },

    /// `t1 = t2 = ... = value`
    Assign { targets: Vec<Expr>, value: Rc<Expr> },

    /// `target op= value`
    AugAssign {
        target: Expr,
        op: Operator,
        value: Expr,
    },

    /// `return [value]`
    Return(Option<Expr>),

    /// Expression evaluated for its side effects.
    Expr(Expr),

    Pass,
    Break,
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },

    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// `left op1 c1 op2 c2 ...`; `ops` and `comparators` have equal length.
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },

    BoolOp {
        op: BoolOperator,
        values: Vec<Expr>,
    },

    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },

    Name(String),
    Constant(Constant),

    /// `value.attr`
    Attribute {
        value: Box<Expr>,
        attr: String,
    },

    /// `value[index]`
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },

    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Neg,
    Pos,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOp {
    /// `in` / `not in`.
    pub fn is_membership(self) -> bool {
        matches!(self, CmpOp::In | CmpOp::NotIn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOperator {
    And,
    Or,
}

// Builder helpers

impl Stmt {
    pub fn function(name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Stmt::FunctionDef {
            name: name.into(),
            params,
            body,
        }
    }

    pub fn if_stmt(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Self {
        Stmt::If { test, body, orelse }
    }

    pub fn for_loop(target: Expr, iter: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For { target, iter, body }
    }

    pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While { test, body }
    }

    /// Single-target assignment.
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            targets: vec![target],
            value: Rc::new(value),
        }
    }

    /// Chained assignment `t1 = t2 = ... = value`.
    pub fn assign_many(targets: Vec<Expr>, value: Expr) -> Self {
        Stmt::Assign {
            targets,
            value: Rc::new(value),
        }
    }

    pub fn aug_assign(target: Expr, op: Operator, value: Expr) -> Self {
        Stmt::AugAssign { target, op, value }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    /// Node kind name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::FunctionDef { .. } => "FunctionDef",
            Stmt::If { .. } => "If",
            Stmt::For { .. } => "For",
            Stmt::While { .. } => "While",
            Stmt::Assign { .. } => "Assign",
            Stmt::AugAssign { .. } => "AugAssign",
            Stmt::Return(_) => "Return",
            Stmt::Expr(_) => "Expr",
            Stmt::Pass => "Pass",
            Stmt::Break => "Break",
        }
    }

    /// The `test`/`body` pair carried by branch-shaped statements.
    pub fn branch(&self) -> Option<(&Expr, &[Stmt])> {
        match self {
            Stmt::If { test, body, .. } | Stmt::While { test, body } => Some((test, body)),
            _ => None,
        }
    }
}

impl Expr {
    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name(id.into())
    }

    pub fn int(n: i64) -> Self {
        Expr::Constant(Constant::Int(n))
    }

    pub fn float(n: f64) -> Self {
        Expr::Constant(Constant::Float(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Constant(Constant::Str(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Constant(Constant::Bool(b))
    }

    pub fn none() -> Self {
        Expr::Constant(Constant::None)
    }

    pub fn binary(left: Expr, op: Operator, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Single comparison `left op right`.
    pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    pub fn bool_op(op: BoolOperator, values: Vec<Expr>) -> Self {
        Expr::BoolOp { op, values }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
        }
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn subscript(value: Expr, index: Expr) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expr::BinOp { .. } => "BinOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::Compare { .. } => "Compare",
            Expr::BoolOp { .. } => "BoolOp",
            Expr::Call { .. } => "Call",
            Expr::Name(_) => "Name",
            Expr::Constant(_) => "Constant",
            Expr::Attribute { .. } => "Attribute",
            Expr::Subscript { .. } => "Subscript",
            Expr::List(_) => "List",
            Expr::Tuple(_) => "Tuple",
            Expr::Dict(_) => "Dict",
        }
    }

    /// Whether this is a string literal.
    pub fn is_string_literal(&self) -> bool {
        matches!(self, Expr::Constant(Constant::Str(_)))
    }

    /// Identifier of a bare `Name`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Direct sub-expressions, in source order.
    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Expr::BinOp { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            Expr::UnaryOp { operand, .. } => vec![operand.as_mut()],
            Expr::Compare {
                left, comparators, ..
            } => std::iter::once(left.as_mut())
                .chain(comparators.iter_mut())
                .collect(),
            Expr::BoolOp { values, .. } => values.iter_mut().collect(),
            Expr::Call { func, args } => std::iter::once(func.as_mut())
                .chain(args.iter_mut())
                .collect(),
            Expr::Name(_) | Expr::Constant(_) => Vec::new(),
            Expr::Attribute { value, .. } => vec![value.as_mut()],
            Expr::Subscript { value, index } => vec![value.as_mut(), index.as_mut()],
            Expr::List(items) | Expr::Tuple(items) => items.iter_mut().collect(),
            Expr::Dict(pairs) => pairs.iter_mut().flat_map(|(k, v)| [k, v]).collect(),
        }
    }
}
