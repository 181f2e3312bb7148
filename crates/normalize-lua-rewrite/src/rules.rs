//! Per-kind rewrite rules.
//!
//! Each rule looks at one node and reports what should happen to it; it
//! never walks children and never mutates its input. Applying the result is
//! the engine's job (see [`crate::engine`]).

use crate::config::RewriteConfig;
use crate::ir::{CmpOp, Expr, Operator, Stmt, UnaryOperator};
use crate::scope::{ScopeFrame, ScopeStack};
use std::rc::Rc;

/// Outcome of applying a rule to one node.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteResult<T> {
    /// Keep the node as it is.
    Unchanged,
    /// Swap the node for another one.
    Replaced(T),
    /// Splice a sequence in place of the node.
    Expanded(Vec<T>),
    /// Drop the node.
    Removed,
}

/// A node that does not have the shape its rule requires.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RewriteError {
    #[error("cannot rewrite {kind}: {reason}")]
    Precondition { kind: &'static str, reason: String },
}

impl RewriteError {
    pub fn precondition(kind: &'static str, reason: impl Into<String>) -> Self {
        RewriteError::Precondition {
            kind,
            reason: reason.into(),
        }
    }
}

type RuleResult<T> = Result<RewriteResult<T>, RewriteError>;

/// The fixed rule set, parameterized by the names in [`RewriteConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<'a> {
    config: &'a RewriteConfig,
}

impl<'a> RuleSet<'a> {
    pub fn new(config: &'a RewriteConfig) -> Self {
        Self { config }
    }

    /// Apply the statement rule for `stmt`'s kind.
    pub fn rewrite_stmt(&self, stmt: &Stmt, scope: &ScopeStack) -> RuleResult<Stmt> {
        match stmt {
            Stmt::FunctionDef { name, params, body } => Ok(self.function_def(name, params, body)),
            Stmt::If { test, body, orelse } => if_chain(test, body, orelse),
            Stmt::For { target, iter, body } => self.for_range(target, iter, body),
            Stmt::Assign { targets, value } => split_assign(targets, value),
            Stmt::Return(value) => Ok(self.return_value(value.as_ref(), scope)),
            Stmt::While { .. }
            | Stmt::AugAssign { .. }
            | Stmt::Expr(_)
            | Stmt::Pass
            | Stmt::Break => Ok(RewriteResult::Unchanged),
        }
    }

    /// Apply the expression rule for `expr`'s kind.
    ///
    /// Expression rules only ever replace; they never expand or remove.
    pub fn rewrite_expr(&self, expr: &Expr) -> RuleResult<Expr> {
        match expr {
            Expr::BinOp { left, op, right } => Ok(floor_div(left, *op, right)),
            // `not` is spelled the same in Lua.
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => Ok(RewriteResult::Unchanged),
            Expr::Compare {
                left,
                ops,
                comparators,
            } => membership(left, ops, comparators),
            Expr::Call { func, args } => self.length_call(func, args),
            Expr::UnaryOp { .. }
            | Expr::BoolOp { .. }
            | Expr::Name(_)
            | Expr::Constant(_)
            | Expr::Attribute { .. }
            | Expr::Subscript { .. }
            | Expr::List(_)
            | Expr::Tuple(_)
            | Expr::Dict(_) => Ok(RewriteResult::Unchanged),
        }
    }

    /// The statement injected at the top of every function body.
    pub fn diagnostic(&self) -> Stmt {
        let diagnostic = &self.config.diagnostic;
        Stmt::expr(Expr::call(
            Expr::name(&diagnostic.callee),
            vec![Expr::string(&diagnostic.message)],
        ))
    }

    fn function_def(&self, name: &str, params: &[String], body: &[Stmt]) -> RewriteResult<Stmt> {
        let mut new_body = Vec::with_capacity(body.len() + 1);
        new_body.push(self.diagnostic());
        new_body.extend(body.iter().cloned());
        RewriteResult::Replaced(Stmt::function(name, params.to_vec(), new_body))
    }

    fn for_range(&self, target: &Expr, iter: &Expr, body: &[Stmt]) -> RuleResult<Stmt> {
        let Some(var) = target.as_name() else {
            return Err(RewriteError::precondition(
                "For",
                format!("loop target must be a name, got {}", target.kind()),
            ));
        };
        let (start, stop, step) = self.range_args(iter)?;

        let init = Stmt::assign(Expr::name(var), start.clone());
        let test = Expr::compare(Expr::name(var), CmpOp::Lt, stop.clone());

        let mut loop_body = Vec::with_capacity(body.len() + 1);
        loop_body.extend(body.iter().cloned());
        loop_body.push(match step {
            Some(step) => Stmt::assign(
                Expr::name(var),
                Expr::binary(Expr::name(var), Operator::Add, step.clone()),
            ),
            None => Stmt::aug_assign(Expr::name(var), Operator::Add, Expr::int(1)),
        });

        Ok(RewriteResult::Expanded(vec![
            init,
            Stmt::while_loop(test, loop_body),
        ]))
    }

    /// Split `range(start, stop[, step])` into its arguments.
    fn range_args<'e>(&self, iter: &'e Expr) -> Result<(&'e Expr, &'e Expr, Option<&'e Expr>), RewriteError> {
        let range = self.config.range_builtin.as_str();
        match iter {
            Expr::Call { func, args } if func.as_name() == Some(range) => match args.as_slice() {
                [start, stop] => Ok((start, stop, None)),
                [start, stop, step] => Ok((start, stop, Some(step))),
                _ => Err(RewriteError::precondition(
                    "For",
                    format!("{range}() needs 2 or 3 arguments, got {}", args.len()),
                )),
            },
            other => Err(RewriteError::precondition(
                "For",
                format!(
                    "only {range}(start, stop[, step]) can be iterated, got {}",
                    other.kind()
                ),
            )),
        }
    }

    fn length_call(&self, func: &Expr, args: &[Expr]) -> RuleResult<Expr> {
        let length = &self.config.length;
        if func.as_name() != Some(length.builtin.as_str()) {
            return Ok(RewriteResult::Unchanged);
        }
        let Some(first) = args.first() else {
            return Err(RewriteError::precondition(
                "Call",
                format!("{}() called without an argument", length.builtin),
            ));
        };

        let callee = if first.is_string_literal() {
            &length.string
        } else {
            &length.collection
        };
        Ok(RewriteResult::Replaced(Expr::call(
            Expr::name(callee),
            args.to_vec(),
        )))
    }

    fn return_value(&self, value: Option<&Expr>, scope: &ScopeStack) -> RewriteResult<Stmt> {
        if scope.current() != Some(ScopeFrame::Function) {
            return RewriteResult::Unchanged;
        }
        // A bare `return` hands back `None`.
        let value = value.cloned().unwrap_or_else(Expr::none);
        let retval = self.config.retval_name.as_str();
        RewriteResult::Expanded(vec![
            Stmt::assign(Expr::name(retval), value),
            Stmt::return_stmt(Some(Expr::name(retval))),
        ])
    }
}

/// Relink a flat `orelse` of branches into a chain of `If` nodes joined
/// through single-entry `orelse` slots.
///
/// An `orelse` that is empty, already a single `If` link, or an `else` body
/// (opening with a statement that has no test/body of its own) is left
/// alone. Anything else must consist of branches only: an `If` is linked as
/// it is, a `While` becomes an `If` over its test and body.
fn if_chain(test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> RuleResult<Stmt> {
    let already_linked = matches!(orelse, [Stmt::If { .. }]);
    let else_body = orelse.first().is_some_and(|stmt| stmt.branch().is_none());
    if orelse.is_empty() || already_linked || else_body {
        return Ok(RewriteResult::Unchanged);
    }

    // (test, body, own else) per branch, in source order.
    let mut links: Vec<(Expr, Vec<Stmt>, Vec<Stmt>)> = vec![(test.clone(), body.to_vec(), Vec::new())];

    for entry in orelse {
        if links.last().is_some_and(|(_, _, own_else)| !own_else.is_empty()) {
            return Err(RewriteError::precondition(
                "If",
                format!("elif branch with its own else is followed by {}", entry.kind()),
            ));
        }
        let link = match entry {
            Stmt::If { test, body, orelse } => (test.clone(), body.clone(), orelse.clone()),
            Stmt::While { test, body } => (test.clone(), body.clone(), Vec::new()),
            plain => {
                return Err(RewriteError::precondition(
                    "If",
                    format!("{} statement after an elif branch", plain.kind()),
                ));
            }
        };
        links.push(link);
    }

    let chain = links
        .into_iter()
        .rev()
        .fold(None, |next: Option<Stmt>, (test, body, own_else)| {
            let orelse = match next {
                Some(next) => vec![next],
                None => own_else,
            };
            Some(Stmt::if_stmt(test, body, orelse))
        });
    Ok(chain.map_or(RewriteResult::Unchanged, RewriteResult::Replaced))
}

/// `a = b = v` becomes `a = v; b = v`, every statement holding the same `v`.
fn split_assign(targets: &[Expr], value: &Rc<Expr>) -> RuleResult<Stmt> {
    if targets.is_empty() {
        return Err(RewriteError::precondition("Assign", "assignment has no target"));
    }
    if let Some(target) = targets.iter().find(|target| !is_assignable(target)) {
        return Err(RewriteError::precondition(
            "Assign",
            format!("cannot assign to {}", target.kind()),
        ));
    }
    if targets.len() == 1 {
        return Ok(RewriteResult::Unchanged);
    }

    Ok(RewriteResult::Expanded(
        targets
            .iter()
            .map(|target| Stmt::Assign {
                targets: vec![target.clone()],
                value: Rc::clone(value),
            })
            .collect(),
    ))
}

fn is_assignable(target: &Expr) -> bool {
    matches!(
        target,
        Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. }
    )
}

fn floor_div(left: &Expr, op: Operator, right: &Expr) -> RewriteResult<Expr> {
    if op != Operator::FloorDiv {
        return RewriteResult::Unchanged;
    }
    RewriteResult::Replaced(Expr::binary(left.clone(), Operator::Div, right.clone()))
}

/// `a in b` becomes `a == b`. Only the first operator is looked at.
fn membership(left: &Expr, ops: &[CmpOp], comparators: &[Expr]) -> RuleResult<Expr> {
    if ops.is_empty() || ops.len() != comparators.len() {
        return Err(RewriteError::precondition(
            "Compare",
            format!(
                "{} operators for {} comparators",
                ops.len(),
                comparators.len()
            ),
        ));
    }
    if ops[1..].iter().any(|op| op.is_membership()) {
        return Err(RewriteError::precondition(
            "Compare",
            "membership test past the first operator of a chained comparison",
        ));
    }
    if ops[0] != CmpOp::In {
        return Ok(RewriteResult::Unchanged);
    }

    let mut ops = ops.to_vec();
    ops[0] = CmpOp::Eq;
    Ok(RewriteResult::Replaced(Expr::Compare {
        left: Box::new(left.clone()),
        ops,
        comparators: comparators.to_vec(),
    }))
}
