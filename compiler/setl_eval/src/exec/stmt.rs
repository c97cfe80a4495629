//! Statement execution.
//!
//! Statements return `Ok(())` or a [`ControlAction`]. Each construct
//! intercepts only the signals it owns: loops take `Break`/`Continue`,
//! `try` takes catchable errors, `check` takes `Backtrack`. Everything else
//! travels on to the enclosing construct.

use setl_ir::{Block, Expr, IfThenBranch, IterBinding, Name, Stmt, StmtKind, SwitchBranch};
use setl_patterns::errors::thrown;
use setl_patterns::{ControlAction, ExecResult, Value};
use setl_stack::ensure_sufficient_stack;
use tracing::trace;

use super::LoopAction;
use crate::Interpreter;

impl Interpreter {
    /// Execute one statement.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        trace!(kind = ?stmt.node_kind(), "exec");
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
            .map_err(|action| action.with_span_if_error(stmt.span))
    }

    /// Execute statements in order, stopping at the first signal.
    pub fn exec_block(&mut self, block: &Block) -> ExecResult {
        for stmt in &block.stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.eval(expr).map(|_| ()),
            StmtKind::IfThen(branches) => self.exec_if_then(branches),
            StmtKind::Switch(branches) => self.exec_switch(branches),
            StmtKind::Match { subject, branches } => self.exec_match(subject, branches),
            StmtKind::For {
                iterators,
                condition,
                body,
            } => self.exec_for(iterators, condition.as_ref(), body),
            StmtKind::While { condition, body } => self.exec_while(condition, body),
            StmtKind::DoWhile { body, condition } => self.exec_do_while(body, condition),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(e) => self.eval(e)?,
                    None => Value::Undefined,
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Break => Err(ControlAction::Break),
            StmtKind::Continue => Err(ControlAction::Continue),
            StmtKind::TryCatch {
                body,
                error_var,
                recovery,
            } => self.exec_try_catch(body, error_var, recovery),
            StmtKind::Throw(value) => {
                let value = self.eval(value)?;
                Err(thrown(value).into())
            }
            StmtKind::Check { body, recovery } => self.exec_check(body, recovery.as_ref()),
            StmtKind::Backtrack => Err(ControlAction::Backtrack),
        }
    }

    fn exec_if_then(&mut self, branches: &[IfThenBranch]) -> ExecResult {
        for branch in branches {
            let taken = match &branch.condition {
                Some(condition) => self.eval_condition(condition)?,
                None => true,
            };
            if taken {
                return self.exec_block(&branch.body);
            }
        }
        Ok(())
    }

    fn exec_switch(&mut self, branches: &[SwitchBranch]) -> ExecResult {
        for branch in branches {
            let taken = match &branch.condition {
                Some(condition) => self.eval_condition(condition)?,
                None => true,
            };
            if taken {
                return self.exec_block(&branch.body);
            }
        }
        Ok(())
    }

    fn exec_for(
        &mut self,
        iterators: &[IterBinding],
        condition: Option<&Expr>,
        body: &Block,
    ) -> ExecResult {
        self.iterate(iterators, &mut |interp: &mut Interpreter| {
            if let Some(condition) = condition {
                if !interp.eval_condition(condition)? {
                    return Ok(());
                }
            }
            interp.exec_block(body)
        })
    }

    fn exec_while(&mut self, condition: &Expr, body: &Block) -> ExecResult {
        while self.eval_condition(condition)? {
            let outcome = self.with_env_scope(|scoped| scoped.exec_block(body));
            if LoopAction::from_outcome(outcome)? == LoopAction::Break {
                break;
            }
        }
        Ok(())
    }

    fn exec_do_while(&mut self, body: &Block, condition: &Expr) -> ExecResult {
        loop {
            let outcome = self.with_env_scope(|scoped| scoped.exec_block(body));
            if LoopAction::from_outcome(outcome)? == LoopAction::Break {
                break;
            }
            if !self.eval_condition(condition)? {
                break;
            }
        }
        Ok(())
    }

    /// Run `body`; a catchable error becomes the value of `error_var` in a
    /// fresh frame for `recovery`. `Backtrack` and internal errors pass.
    fn exec_try_catch(&mut self, body: &Block, error_var: &Name, recovery: &Block) -> ExecResult {
        match self.exec_block(body) {
            Err(ControlAction::Error(error)) if error.is_catchable() => {
                trace!(error = %error, "caught");
                let value = error.into_catch_value();
                self.with_bindings([(error_var.clone(), value)], |scoped| {
                    scoped.exec_block(recovery)
                })
            }
            other => other,
        }
    }

    /// Run `body`; a `Backtrack` escaping it runs `recovery` instead.
    fn exec_check(&mut self, body: &Block, recovery: Option<&Block>) -> ExecResult {
        match self.exec_block(body) {
            Err(ControlAction::Backtrack) => {
                trace!("backtrack intercepted by check");
                match recovery {
                    Some(recovery) => self.exec_block(recovery),
                    None => Ok(()),
                }
            }
            other => other,
        }
    }
}
