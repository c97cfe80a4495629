//! Static classification of variable occurrences.
//!
//! [`VariableSets`] records, for a code fragment, which variables are
//! written before being read (`bound`), read without a prior write
//! (`unbound`), and read after being written (`used`). Constructs whose
//! bindings only live for one iteration, one branch or one recovery are
//! rolled back after collection; conditionals only keep the bindings made
//! in every branch, and only when an exhaustive branch exists.
//!
//! Constructs with effects the pass cannot see through (quantifiers,
//! calls, closures) add [`Name::PREVENT_OPTIMIZATION`] to `unbound`, which
//! makes [`Expr::is_constant`] false for every enclosing expression.

use crate::ast::{
    Block, CollectionBuilder, Expr, ExprKind, IterBinding, MatchBranch, ProcedureKind, Stmt,
    StmtKind,
};
use crate::Name;
use setl_stack::ensure_sufficient_stack;

/// Result of the binding analysis; all lists keep first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableSets {
    pub bound: Vec<Name>,
    pub unbound: Vec<Name>,
    pub used: Vec<Name>,
}

impl VariableSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already bound set, e.g. procedure parameters.
    pub fn with_bound(bound: impl IntoIterator<Item = Name>) -> Self {
        VariableSets {
            bound: bound.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Record a read of `name`.
    pub fn read(&mut self, name: &Name) {
        if self.bound.contains(name) {
            if !self.used.contains(name) {
                self.used.push(name.clone());
            }
        } else if !self.unbound.contains(name) {
            self.unbound.push(name.clone());
        }
    }

    /// Record a write of `name`.
    pub fn bind(&mut self, name: &Name) {
        if !self.bound.contains(name) {
            self.bound.push(name.clone());
        }
    }

    pub fn prevent_optimization(&mut self) {
        let sentinel = Name::prevent_optimization();
        if !self.unbound.contains(&sentinel) {
            self.unbound.push(sentinel);
        }
    }

    /// Unbound names without the sentinel.
    pub fn free_variables(&self) -> impl Iterator<Item = &Name> {
        self.unbound.iter().filter(|n| !n.is_prevent_optimization())
    }

    /// Remove bindings made after `mark` (a previous `bound.len()`).
    fn rollback(&mut self, mark: usize) {
        self.bound.truncate(mark);
    }
}

impl Expr {
    /// Classify every variable occurrence in this expression.
    pub fn collect_variables(&self, vars: &mut VariableSets) {
        ensure_sufficient_stack(|| collect_expr(self, vars));
    }

    /// No free variables and no hidden effects: evaluating twice yields
    /// the same value.
    pub fn is_constant(&self) -> bool {
        let mut vars = VariableSets::new();
        self.collect_variables(&mut vars);
        vars.unbound.is_empty()
    }
}

impl Stmt {
    pub fn collect_variables(&self, vars: &mut VariableSets) {
        ensure_sufficient_stack(|| collect_stmt(self, vars));
    }
}

impl Block {
    pub fn collect_variables(&self, vars: &mut VariableSets) {
        for stmt in &self.stmts {
            stmt.collect_variables(vars);
        }
    }

    /// Names read somewhere in the block before any write.
    pub fn unbound_variables(&self) -> Vec<Name> {
        let mut vars = VariableSets::new();
        self.collect_variables(&mut vars);
        vars.free_variables().cloned().collect()
    }
}

fn collect_expr(expr: &Expr, vars: &mut VariableSets) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Ignore => {}
        ExprKind::Variable(name) => vars.read(name),
        ExprKind::Binary { op, left, right } => {
            left.collect_variables(vars);
            if op.is_short_circuit() {
                let mark = vars.bound.len();
                right.collect_variables(vars);
                vars.rollback(mark);
            } else {
                right.collect_variables(vars);
            }
        }
        ExprKind::Unary { operand, .. } => operand.collect_variables(vars),
        ExprKind::Assign { target, value } => {
            value.collect_variables(vars);
            collect_assigned(target, vars);
            vars.prevent_optimization();
        }
        ExprKind::CompoundAssign { target, value, .. } => {
            target.collect_variables(vars);
            value.collect_variables(vars);
            collect_assigned(target, vars);
            vars.prevent_optimization();
        }
        ExprKind::Call { callee, args } => {
            callee.collect_variables(vars);
            for arg in args {
                arg.collect_variables(vars);
            }
            vars.prevent_optimization();
        }
        ExprKind::CollectionAccess { target, args } => {
            target.collect_variables(vars);
            for arg in args {
                arg.collect_variables(vars);
            }
        }
        ExprKind::AccessRange { target, low, high } => {
            target.collect_variables(vars);
            for bound in [low, high].into_iter().flatten() {
                bound.collect_variables(vars);
            }
        }
        ExprKind::CollectMap { target, arg } => {
            target.collect_variables(vars);
            arg.collect_variables(vars);
        }
        ExprKind::MemberAccess { target, .. } => target.collect_variables(vars),
        ExprKind::List(builder) | ExprKind::Set(builder) => collect_builder(builder, vars),
        ExprKind::Exists {
            iterators,
            condition,
        }
        | ExprKind::Forall {
            iterators,
            condition,
        } => {
            let mark = vars.bound.len();
            collect_iterators(iterators, vars);
            condition.collect_variables(vars);
            vars.rollback(mark);
            vars.prevent_optimization();
        }
        ExprKind::Procedure(def) => {
            if def.kind == ProcedureKind::Procedure {
                return;
            }
            // Free variables of a closure are read from the defining scope.
            let mut inner = VariableSets::with_bound(def.params.iter().map(|p| p.name.clone()));
            def.body.collect_variables(&mut inner);
            for name in inner.free_variables() {
                vars.read(name);
            }
            vars.prevent_optimization();
        }
        ExprKind::Class(_) => {}
        ExprKind::Term { args, .. } => {
            for arg in args {
                arg.collect_variables(vars);
            }
        }
        ExprKind::Quote(inner) => inner.collect_variables(vars),
    }
}

fn collect_builder(builder: &CollectionBuilder, vars: &mut VariableSets) {
    match builder {
        CollectionBuilder::Explicit { elements } => {
            for e in elements.iter() {
                e.collect_variables(vars);
            }
        }
        CollectionBuilder::Range {
            first,
            second,
            last,
        } => {
            first.collect_variables(vars);
            if let Some(second) = second {
                second.collect_variables(vars);
            }
            last.collect_variables(vars);
        }
        CollectionBuilder::Iteration {
            element,
            iterators,
            condition,
        } => {
            let mark = vars.bound.len();
            collect_iterators(iterators, vars);
            if let Some(condition) = condition {
                condition.collect_variables(vars);
            }
            element.collect_variables(vars);
            vars.rollback(mark);
        }
    }
}

/// Collections are read left to right, each target bound before the next
/// collection, mirroring nested evaluation.
fn collect_iterators(iterators: &[IterBinding], vars: &mut VariableSets) {
    for it in iterators {
        it.collection.collect_variables(vars);
        collect_assigned(&it.target, vars);
    }
}

/// Variables written by an assignment to `target`.
fn collect_assigned(target: &Expr, vars: &mut VariableSets) {
    match &target.kind {
        ExprKind::Variable(name) => vars.bind(name),
        ExprKind::List(CollectionBuilder::Explicit { elements }) => {
            for e in elements.iter() {
                collect_assigned(e, vars);
            }
        }
        ExprKind::CollectionAccess { target, args } => {
            for arg in args {
                arg.collect_variables(vars);
            }
            collect_assigned(target, vars);
        }
        ExprKind::MemberAccess { target, .. } => collect_assigned(target, vars),
        _ => target.collect_variables(vars),
    }
}

/// Names a match pattern binds: every variable occurring in it.
fn pattern_names(patterns: &[Expr]) -> Vec<Name> {
    let mut temp = VariableSets::new();
    for p in patterns {
        p.collect_variables(&mut temp);
    }
    temp.free_variables().cloned().collect()
}

/// Run `f` for each branch starting from the same bound set, then keep the
/// bindings common to all branches if `exhaustive`.
fn merge_branches<'a, T: 'a>(
    branches: impl IntoIterator<Item = &'a T>,
    exhaustive: bool,
    vars: &mut VariableSets,
    mut f: impl FnMut(&'a T, &mut VariableSets),
) {
    let before = vars.bound.clone();
    let mut common: Option<Vec<Name>> = None;
    for branch in branches {
        vars.bound.clone_from(&before);
        f(branch, vars);
        let added: Vec<Name> = vars.bound[before.len()..].to_vec();
        common = Some(match common {
            None => added,
            Some(mut prev) => {
                prev.retain(|n| added.contains(n));
                prev
            }
        });
    }
    vars.bound = before;
    if exhaustive {
        for name in common.unwrap_or_default() {
            vars.bind(&name);
        }
    }
}

fn collect_stmt(stmt: &Stmt, vars: &mut VariableSets) {
    match &stmt.kind {
        StmtKind::Expr(e) | StmtKind::Throw(e) => e.collect_variables(vars),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                value.collect_variables(vars);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Backtrack => {}
        StmtKind::IfThen(branches) => {
            let exhaustive = branches.last().is_some_and(|b| b.condition.is_none());
            merge_branches(branches, exhaustive, vars, |branch, vars| {
                if let Some(cond) = &branch.condition {
                    cond.collect_variables(vars);
                }
                branch.body.collect_variables(vars);
            });
        }
        StmtKind::Switch(branches) => {
            let exhaustive = branches.last().is_some_and(|b| b.condition.is_none());
            merge_branches(branches, exhaustive, vars, |branch, vars| {
                if let Some(cond) = &branch.condition {
                    cond.collect_variables(vars);
                }
                branch.body.collect_variables(vars);
            });
        }
        StmtKind::Match { subject, branches } => {
            subject.collect_variables(vars);
            let exhaustive = branches
                .iter()
                .any(|b| matches!(b, MatchBranch::Default { .. }));
            merge_branches(branches, exhaustive, vars, collect_match_branch);
        }
        StmtKind::For {
            iterators,
            condition,
            body,
        } => {
            let mark = vars.bound.len();
            collect_iterators(iterators, vars);
            if let Some(cond) = condition {
                cond.collect_variables(vars);
            }
            body.collect_variables(vars);
            vars.rollback(mark);
        }
        StmtKind::While { condition, body } => {
            let mark = vars.bound.len();
            condition.collect_variables(vars);
            body.collect_variables(vars);
            vars.rollback(mark);
        }
        StmtKind::DoWhile { body, condition } => {
            let mark = vars.bound.len();
            body.collect_variables(vars);
            condition.collect_variables(vars);
            vars.rollback(mark);
        }
        StmtKind::TryCatch {
            body,
            error_var,
            recovery,
        } => {
            body.collect_variables(vars);
            let mark = vars.bound.len();
            vars.bind(error_var);
            recovery.collect_variables(vars);
            vars.rollback(mark);
        }
        StmtKind::Check { body, recovery } => {
            body.collect_variables(vars);
            let mark = vars.bound.len();
            if let Some(recovery) = recovery {
                recovery.collect_variables(vars);
            }
            vars.rollback(mark);
        }
    }
}

/// Pattern variables are bound only for the guard and body of the branch.
fn collect_match_branch(branch: &MatchBranch, vars: &mut VariableSets) {
    let (temp, condition) = match branch {
        MatchBranch::Case {
            patterns,
            condition,
            ..
        } => (pattern_names(patterns), condition.as_ref()),
        MatchBranch::SplitList {
            heads,
            rest,
            condition,
            ..
        } => {
            let mut all = heads.clone();
            all.push((**rest).clone());
            (pattern_names(&all), condition.as_ref())
        }
        MatchBranch::Default { .. } => (Vec::new(), None),
    };
    let mark = vars.bound.len();
    let fresh: Vec<Name> = temp
        .into_iter()
        .filter(|n| !vars.bound.contains(n))
        .collect();
    vars.bound.extend(fresh.iter().cloned());
    if let Some(cond) = condition {
        cond.collect_variables(vars);
    }
    branch.body().collect_variables(vars);
    vars.bound.drain(mark..mark + fresh.len());
}

#[cfg(test)]
mod tests;
