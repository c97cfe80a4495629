//! Expression evaluation.

use std::rc::Rc;

use setl_ir::{
    BinaryOp, CollectionBuilder, Expr, ExprKind, IterBinding, Literal, Name,
    ProcedureDef, VariableSets,
};
use setl_patterns::errors::{
    incompatible_type, index_out_of_range, no_such_member, not_a_boolean, not_an_integer,
};
use setl_patterns::{ControlAction, EvalResult, Matrix, Value, ValueResult};
use setl_stack::ensure_sufficient_stack;
use tracing::debug;

use super::iterate::RationalRange;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{ExecutionFlags, Interpreter};

impl Interpreter {
    /// Evaluate an expression.
    ///
    /// Errors raised anywhere below get this node's span unless a deeper
    /// node already attached one.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr))
            .map_err(|action| action.with_span_if_error(expr.span))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(eval_literal(literal)),
            ExprKind::Variable(name) => Ok(self.eval_variable(name)),
            ExprKind::Ignore => Ok(Value::Ignore),

            ExprKind::Binary { op, left, right } if op.is_short_circuit() => {
                self.eval_short_circuit(*op, left, right)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Ok(evaluate_binary(left, right, *op, &*self.linear_algebra)?)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                Ok(evaluate_unary(operand, *op, &*self.linear_algebra)?)
            }

            ExprKind::Assign { target, value } => {
                let value = self.eval(value)?;
                self.assign_to(target, value.clone())?;
                Ok(value)
            }
            ExprKind::CompoundAssign { op, target, value } => {
                let current = self.eval(target)?;
                let rhs = self.eval(value)?;
                let result =
                    evaluate_binary(current, rhs, op.binary_op(), &*self.linear_algebra)?;
                self.assign_to(target, result.clone())?;
                Ok(result)
            }

            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::CollectionAccess { target, args } => {
                let target = self.eval(target)?;
                let args = self.eval_args(args)?;
                Ok(access(&target, args)?)
            }
            ExprKind::AccessRange { target, low, high } => {
                let target = self.eval(target)?;
                let low = match low {
                    Some(e) => Some(self.eval(e)?),
                    None => None,
                };
                let high = match high {
                    Some(e) => Some(self.eval(e)?),
                    None => None,
                };
                Ok(target.slice(low.as_ref(), high.as_ref())?)
            }
            ExprKind::CollectMap { target, arg } => {
                let target = self.eval(target)?;
                let key = self.eval(arg)?;
                Ok(target.collect_map(&key)?)
            }
            ExprKind::MemberAccess { target, member } => {
                let target = self.eval(target)?;
                Ok(member_of(&target, member)?)
            }

            ExprKind::List(builder) => self.build_collection(expr, builder, false),
            ExprKind::Set(builder) => self.build_collection(expr, builder, true),

            ExprKind::Exists {
                iterators,
                condition,
            } => self.eval_exists(iterators, condition),
            ExprKind::Forall {
                iterators,
                condition,
            } => self.eval_forall(iterators, condition),

            ExprKind::Procedure(def) => Ok(self.make_procedure(def)),
            ExprKind::Class(def) => Ok(Value::Class(Rc::clone(def))),

            ExprKind::Term {
                functional_character,
                args,
            } => {
                let args = self.eval_args(args)?;
                Ok(Value::term(functional_character.clone(), args))
            }
            ExprKind::Quote(inner) => self.to_term_quoted(inner),
        }
    }

    /// A variable's value; unassigned names of predefined procedures are
    /// those procedures, any other unassigned name is `om`.
    fn eval_variable(&self, name: &Name) -> Value {
        if let Some(value) = self.env.lookup(name.as_str()) {
            return value;
        }
        if self.builtins.contains(name.as_str()) {
            return Value::Builtin(name.clone());
        }
        Value::Undefined
    }

    /// Evaluate arguments left to right.
    pub(crate) fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, ControlAction> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// Evaluate a condition, which must be a boolean.
    pub(crate) fn eval_condition(&mut self, condition: &Expr) -> Result<bool, ControlAction> {
        let value = self.eval(condition)?;
        value
            .as_bool()
            .ok_or_else(|| not_a_boolean("Condition", &value).into())
    }

    /// `&&`, `||` and `=>` leave the right operand alone when the left one
    /// decides the result.
    fn eval_short_circuit(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let lhs = self.eval(left)?;
        let Some(l) = lhs.as_bool() else {
            return Err(not_a_boolean("Left-hand side", &lhs).into());
        };
        let decided = match op {
            BinaryOp::Conjunction => (!l).then_some(false),
            BinaryOp::Disjunction => l.then_some(true),
            BinaryOp::Implication => (!l).then_some(true),
            _ => None,
        };
        if let Some(result) = decided {
            return Ok(Value::Bool(result));
        }
        let rhs = self.eval(right)?;
        match rhs.as_bool() {
            Some(r) => Ok(Value::Bool(r)),
            None => Err(not_a_boolean("Right-hand side", &rhs).into()),
        }
    }

    // Collection builders

    /// Fill a list or set from any of the three builder forms.
    fn build_collection(
        &mut self,
        expr: &Expr,
        builder: &CollectionBuilder,
        as_set: bool,
    ) -> EvalResult {
        match builder {
            CollectionBuilder::Explicit { elements } => {
                let seen = match self.constants.get(elements) {
                    Some(Some(cached)) => return Ok(cached.clone()),
                    Some(None) => true,
                    None => false,
                };
                let members = self.eval_args(elements)?;
                let value = finish_collection(members, as_set);
                if !seen {
                    let cached = expr.is_constant().then(|| value.clone());
                    self.constants.insert(elements, cached);
                }
                Ok(value)
            }
            CollectionBuilder::Range {
                first,
                second,
                last,
            } => {
                let first = self.eval(first)?;
                let second = match second {
                    Some(e) => Some(self.eval(e)?),
                    None => None,
                };
                let last = self.eval(last)?;
                let members = RationalRange::new(&first, second.as_ref(), &last)?.collect();
                Ok(finish_collection(members, as_set))
            }
            CollectionBuilder::Iteration {
                element,
                iterators,
                condition,
            } => {
                let mut members = Vec::new();
                self.iterate(iterators, &mut |interp: &mut Interpreter| {
                    if let Some(condition) = condition {
                        if !interp.eval_condition(condition)? {
                            return Ok(());
                        }
                    }
                    members.push(interp.eval(element)?);
                    Ok(())
                })?;
                Ok(finish_collection(members, as_set))
            }
        }
    }

    // Quantifiers

    /// `exists (x in s | c)`: stops at the first member satisfying `c` and
    /// assigns that member's bindings in the enclosing frame.
    fn eval_exists(&mut self, iterators: &[IterBinding], condition: &Expr) -> EvalResult {
        let names = iteration_variables(iterators);
        let mut witness: Option<Vec<(Name, Value)>> = None;
        self.iterate(iterators, &mut |interp: &mut Interpreter| {
            if interp.eval_condition(condition)? {
                let bindings = names.iter().map(|name| {
                    let value = interp.env.lookup(name.as_str()).unwrap_or_default();
                    (name.clone(), value)
                });
                witness = Some(bindings.collect());
                return Err(ControlAction::Break);
            }
            Ok(())
        })?;
        match witness {
            Some(bindings) => {
                for (name, value) in bindings {
                    self.env.assign(name, value);
                }
                Ok(Value::Bool(true))
            }
            None => Ok(Value::Bool(false)),
        }
    }

    /// `forall (x in s | c)`: stops at the first member violating `c`. No
    /// bindings leave the quantifier.
    fn eval_forall(&mut self, iterators: &[IterBinding], condition: &Expr) -> EvalResult {
        let mut holds = true;
        self.iterate(iterators, &mut |interp: &mut Interpreter| {
            if interp.eval_condition(condition)? {
                return Ok(());
            }
            holds = false;
            Err(ControlAction::Break)
        })?;
        Ok(Value::Bool(holds))
    }

    /// Procedure value; closures and lambdas capture the current frame.
    fn make_procedure(&self, def: &Rc<ProcedureDef>) -> Value {
        let captured = def
            .kind
            .captures_scope()
            .then(|| self.env.current().clone());
        if captured.is_some() && self.flags.contains(ExecutionFlags::RUNTIME_DEBUGGING) {
            let mut vars = VariableSets::with_bound(def.params.iter().map(|p| p.name.clone()));
            def.body.collect_variables(&mut vars);
            let free: Vec<&Name> = vars.free_variables().collect();
            debug!(?free, kind = ?def.kind, "closure captures its defining frame");
        }
        Value::procedure(Rc::clone(def), captured)
    }
}

fn eval_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Om => Value::Undefined,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Integer(i) => Value::integer(i.clone()),
        Literal::Float(f) => Value::float(*f),
        Literal::Str(s) => Value::string(s.as_str()),
    }
}

/// Lists never end in `om`; sets never contain it.
fn finish_collection(mut members: Vec<Value>, as_set: bool) -> Value {
    if as_set {
        return Value::set(members.into_iter().filter(|v| !v.is_undefined()));
    }
    while members.last().is_some_and(Value::is_undefined) {
        members.pop();
    }
    Value::list(members)
}

/// `target[args]`. Matrices take a row and a column; several arguments on
/// a map form a list key.
pub(crate) fn access(target: &Value, mut args: Vec<Value>) -> ValueResult {
    match (target, args.len()) {
        (Value::Matrix(m), 2) => matrix_cell(m, &args[0], &args[1]),
        (_, 1) => target.get_member(&args[0]),
        (Value::Set(_), n) if n > 1 => target.map_lookup(&Value::list(std::mem::take(&mut args))),
        (_, n) => Err(incompatible_type(format!(
            "\"{target}\" cannot be accessed with {n} arguments."
        ))),
    }
}

fn matrix_cell(m: &Matrix, row: &Value, col: &Value) -> ValueResult {
    let r = row.as_i64().ok_or_else(|| not_an_integer("Row index", row))?;
    let c = col.as_i64().ok_or_else(|| not_an_integer("Column index", col))?;
    let zero_based = |i: i64| i.checked_sub(1).and_then(|i| usize::try_from(i).ok());
    zero_based(r)
        .zip(zero_based(c))
        .and_then(|(r, c)| m.get(r, c))
        .map(Value::float)
        .ok_or_else(|| index_out_of_range(format!("[{r}, {c}]"), m.rows()))
}

/// `target.member`; a member that was never set reads as `om`.
pub(crate) fn member_of(target: &Value, member: &Name) -> ValueResult {
    match target {
        Value::Object(object) => Ok(object.get(member.as_str()).cloned().unwrap_or_default()),
        _ => Err(no_such_member(member.as_str(), target)),
    }
}

/// Names bound by the targets of an iterator chain, in order.
fn iteration_variables(iterators: &[IterBinding]) -> Vec<Name> {
    fn collect(target: &Expr, names: &mut Vec<Name>) {
        match &target.kind {
            ExprKind::Variable(name) => names.push(name.clone()),
            ExprKind::List(CollectionBuilder::Explicit { elements, .. }) => {
                for element in elements.iter() {
                    collect(element, names);
                }
            }
            _ => {}
        }
    }
    let mut names = Vec::new();
    for link in iterators {
        collect(&link.target, &mut names);
    }
    names
}
