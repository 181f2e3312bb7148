//! Tree walk that applies [`RuleSet`] results.
//!
//! # Order
//!
//! For each statement:
//!
//! 1. its own expression slots are rewritten (operators, calls);
//! 2. its statement rule runs, with the scope stack as it stands;
//! 3. the result is applied: kept, swapped, spliced into the enclosing
//!    body, or dropped;
//! 4. the walk descends into the nested bodies of whatever survived.
//!
//! Statements produced by an expansion are descended into but never offered
//! back to a statement rule, so a rule cannot re-fire on its own output.
//! Because expressions are final before step 2, a value a rule moves or
//! shares never needs rewriting afterwards.

use crate::config::RewriteConfig;
use crate::ir::{Expr, Module, Stmt};
use crate::rules::{RewriteError, RewriteResult, RuleSet};
use crate::scope::{ScopeFrame, ScopeStack};
use std::rc::Rc;
use tracing::debug;

/// Applies the rule set to whole modules.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    config: RewriteConfig,
}

impl Rewriter {
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrite a module. The scope stack starts and ends empty.
    pub fn rewrite_module(&self, mut module: Module) -> Result<Module, RewriteError> {
        let mut scope = ScopeStack::new();
        scope.within(ScopeFrame::Module, |scope| {
            self.rewrite_block(&mut module.body, scope)
        })?;
        debug_assert!(scope.is_empty(), "unbalanced scope stack");
        Ok(module)
    }

    /// Rewrite a statement sequence in place under an existing scope.
    pub fn rewrite_block(
        &self,
        body: &mut Vec<Stmt>,
        scope: &mut ScopeStack,
    ) -> Result<(), RewriteError> {
        Walk {
            rules: RuleSet::new(&self.config),
        }
        .block(body, scope)
    }
}

struct Walk<'a> {
    rules: RuleSet<'a>,
}

impl Walk<'_> {
    /// Rebuild `body`, splicing each statement's replacement at its position.
    fn block(&self, body: &mut Vec<Stmt>, scope: &mut ScopeStack) -> Result<(), RewriteError> {
        let stmts = std::mem::take(body);
        body.reserve(stmts.len());
        for stmt in stmts {
            body.extend(self.stmt(stmt, scope)?);
        }
        Ok(())
    }

    fn stmt(&self, mut stmt: Stmt, scope: &mut ScopeStack) -> Result<Vec<Stmt>, RewriteError> {
        self.stmt_exprs(&mut stmt)?;

        let kind = stmt.kind();
        match self.rules.rewrite_stmt(&stmt, scope)? {
            RewriteResult::Unchanged => {
                self.descend(&mut stmt, scope)?;
                Ok(vec![stmt])
            }
            RewriteResult::Replaced(mut replacement) => {
                debug!(kind, with = replacement.kind(), "replaced statement");
                // Release the original so its subtrees are uniquely owned again.
                drop(stmt);
                self.descend(&mut replacement, scope)?;
                Ok(vec![replacement])
            }
            RewriteResult::Expanded(mut stmts) => {
                debug!(kind, count = stmts.len(), "expanded statement");
                drop(stmt);
                for stmt in &mut stmts {
                    self.descend(stmt, scope)?;
                }
                Ok(stmts)
            }
            RewriteResult::Removed => {
                debug!(kind, "removed statement");
                Ok(Vec::new())
            }
        }
    }

    /// Walk the nested bodies of a statement, pushing the frame each opens.
    fn descend(&self, stmt: &mut Stmt, scope: &mut ScopeStack) -> Result<(), RewriteError> {
        match stmt {
            Stmt::FunctionDef { body, .. } => {
                scope.within(ScopeFrame::Function, |scope| self.block(body, scope))
            }
            Stmt::If { body, orelse, .. } => {
                self.block(body, scope)?;
                self.block(orelse, scope)
            }
            Stmt::For { body, .. } | Stmt::While { body, .. } => {
                scope.within(ScopeFrame::Loop, |scope| self.block(body, scope))
            }
            Stmt::Assign { .. }
            | Stmt::AugAssign { .. }
            | Stmt::Return(_)
            | Stmt::Expr(_)
            | Stmt::Pass
            | Stmt::Break => Ok(()),
        }
    }

    /// Rewrite the expressions a statement holds directly (not those in
    /// nested bodies).
    fn stmt_exprs(&self, stmt: &mut Stmt) -> Result<(), RewriteError> {
        match stmt {
            Stmt::If { test, .. } | Stmt::While { test, .. } => self.expr(test),
            Stmt::For { target, iter, .. } => {
                self.expr(target)?;
                self.expr(iter)
            }
            Stmt::Assign { targets, value } => {
                for target in targets {
                    self.expr(target)?;
                }
                self.shared_expr(value)
            }
            Stmt::AugAssign { target, value, .. } => {
                self.expr(target)?;
                self.expr(value)
            }
            Stmt::Return(Some(value)) | Stmt::Expr(value) => self.expr(value),
            Stmt::FunctionDef { .. } | Stmt::Return(None) | Stmt::Pass | Stmt::Break => Ok(()),
        }
    }

    /// Rewrite a value that other statements may share.
    ///
    /// A uniquely owned value is rewritten in place. A shared one is never
    /// mutated: it is rewritten as a private copy, which replaces this
    /// statement's handle only if something actually changed.
    fn shared_expr(&self, value: &mut Rc<Expr>) -> Result<(), RewriteError> {
        if let Some(expr) = Rc::get_mut(value) {
            return self.expr(expr);
        }

        let mut copy = Expr::clone(value);
        self.expr(&mut copy)?;
        if copy != **value {
            debug!(kind = copy.kind(), "detached shared value");
            *value = Rc::new(copy);
        }
        Ok(())
    }

    /// Pre-order: apply the rule, then recurse into the (possibly new)
    /// children.
    fn expr(&self, expr: &mut Expr) -> Result<(), RewriteError> {
        match self.rules.rewrite_expr(expr)? {
            RewriteResult::Unchanged => {}
            RewriteResult::Replaced(replacement) => {
                debug!(kind = expr.kind(), "replaced expression");
                *expr = replacement;
            }
            RewriteResult::Expanded(_) | RewriteResult::Removed => {
                return Err(RewriteError::precondition(
                    expr.kind(),
                    "an expression can only be kept or replaced",
                ));
            }
        }

        for child in expr.children_mut() {
            self.expr(child)?;
        }
        Ok(())
    }
}
