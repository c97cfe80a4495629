//! Assignment targets.
//!
//! A target is a variable, `_`, an explicit list of targets, or a chain of
//! collection and member accesses rooted at a variable (`x[i].m[j]`). For
//! chains the root value is taken out of its frame while the update runs,
//! so a list held by one variable only is changed in place instead of
//! being copied.

use setl_ir::{CollectionBuilder, Expr, ExprKind, Name};
use setl_patterns::errors::{no_such_member, not_assignable};
use setl_patterns::{ControlAction, EvalError, ExecResult, Value, ValueResult};

use super::expr::member_of;
use super::iterate::destructure;
use crate::{ExecutionFlags, Interpreter};

/// Whether `expr` can receive a value written back by a call.
pub(crate) fn is_assignable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Variable(_) => true,
        ExprKind::CollectionAccess { target, .. } | ExprKind::MemberAccess { target, .. } => {
            is_assignable(target)
        }
        _ => false,
    }
}

/// One access on the way from the root variable to the assigned slot.
enum Step {
    Index(Value),
    Member(Name),
}

impl Step {
    fn get(&self, container: &Value) -> ValueResult {
        match self {
            Step::Index(key) => container.get_member(key),
            Step::Member(name) => member_of(container, name),
        }
    }

    fn set(&self, container: &mut Value, value: Value) -> Result<(), EvalError> {
        match self {
            Step::Index(key) => container.set_member(key, value),
            Step::Member(name) => match container {
                Value::Object(object) => {
                    object.set(name.clone(), value);
                    Ok(())
                }
                _ => Err(no_such_member(name.as_str(), container)),
            },
        }
    }
}

/// Write `value` at the end of `steps`, starting from `container`.
fn store(container: &mut Value, steps: &[Step], value: Value) -> Result<(), EvalError> {
    match steps {
        [] => {
            *container = value;
            Ok(())
        }
        [step] => step.set(container, value),
        [step, rest @ ..] => {
            let mut child = step.get(container)?;
            store(&mut child, rest, value)?;
            step.set(container, child)
        }
    }
}

impl Interpreter {
    /// `target := value`.
    pub(crate) fn assign_to(&mut self, target: &Expr, value: Value) -> ExecResult {
        match &target.kind {
            ExprKind::Variable(name) => {
                self.assign_variable(name.clone(), value);
                Ok(())
            }
            ExprKind::Ignore => Ok(()),
            ExprKind::List(CollectionBuilder::Explicit { elements, .. }) => {
                let members = destructure(elements.len(), &value)?;
                for (element, member) in elements.iter().zip(members) {
                    self.assign_to(element, member)?;
                }
                Ok(())
            }
            ExprKind::CollectionAccess { .. } | ExprKind::MemberAccess { .. } => {
                let (root, steps) = self.resolve_place(target)?;
                self.store_into(&root, &steps, value)?;
                Ok(())
            }
            _ => Err(not_assignable(&target.to_string()).into()),
        }
    }

    fn assign_variable(&mut self, name: Name, value: Value) {
        if self.flags.contains(ExecutionFlags::TRACE_ASSIGNMENTS) {
            self.trace_assignment(&name, &value);
        }
        self.env.assign(name, value);
    }

    fn trace_assignment(&self, name: &Name, value: &Value) {
        self.print_handler.trace_assignment(name.as_str(), value);
    }

    /// Root variable and evaluated access steps of an access chain. Index
    /// expressions are evaluated from the root outwards.
    fn resolve_place(&mut self, target: &Expr) -> Result<(Name, Vec<Step>), ControlAction> {
        let mut chain = Vec::new();
        let mut node = target;
        let root = loop {
            match &node.kind {
                ExprKind::Variable(name) => break name.clone(),
                ExprKind::CollectionAccess { target: inner, .. }
                | ExprKind::MemberAccess { target: inner, .. } => {
                    chain.push(node);
                    node = &**inner;
                }
                _ => return Err(not_assignable(&target.to_string()).into()),
            }
        };
        let mut steps = Vec::with_capacity(chain.len());
        for access in chain.into_iter().rev() {
            match &access.kind {
                ExprKind::CollectionAccess { args, .. } => {
                    let mut keys = self.eval_args(args)?;
                    let key = if keys.len() == 1 {
                        keys.pop().unwrap_or_default()
                    } else {
                        Value::list(keys)
                    };
                    steps.push(Step::Index(key));
                }
                ExprKind::MemberAccess { member, .. } => steps.push(Step::Member(member.clone())),
                _ => return Err(not_assignable(&target.to_string()).into()),
            }
        }
        Ok((root, steps))
    }

    fn store_into(&mut self, root: &Name, steps: &[Step], value: Value) -> Result<(), EvalError> {
        let tracing = self.flags.contains(ExecutionFlags::TRACE_ASSIGNMENTS);
        let updated = match self.env.take_assignable(root.as_str()) {
            Some((frame, mut current)) => {
                let outcome = store(&mut current, steps, value);
                let traced = (tracing && outcome.is_ok()).then(|| current.clone());
                frame.borrow_mut().define(root.clone(), current);
                outcome?;
                traced
            }
            None => {
                let mut current = self.env.lookup(root.as_str()).unwrap_or_default();
                store(&mut current, steps, value)?;
                let traced = tracing.then(|| current.clone());
                self.env.assign(root.clone(), current);
                traced
            }
        };
        if let Some(value) = updated {
            self.trace_assignment(root, &value);
        }
        Ok(())
    }
}
