//! Procedure, builtin, class and method calls.
//!
//! A call evaluates its arguments left to right, runs the callee in a fresh
//! frame and hands back the result together with the final values of its
//! `rw` parameters. Write-back into the caller's argument expressions
//! happens after the callee's frame is gone, so no two names ever alias the
//! same storage.

use std::collections::BTreeMap;
use std::rc::Rc;

use setl_ir::{ClassDef, Expr, ExprKind, Name};
use setl_patterns::errors::{no_such_member, unknown_function, wrong_arg_count};
use setl_patterns::{ControlAction, EvalError, EvalResult, FrameKind, ProcedureValue, Value};
use tracing::debug;

use super::assign::is_assignable;
use super::expr::access;
use crate::{ExecutionFlags, Interpreter};

/// What a call produced besides its result.
pub(crate) struct CallOutcome {
    pub(crate) result: Value,
    /// Argument position and final value of every `rw` parameter.
    pub(crate) write_back: Vec<(usize, Value)>,
    /// Receiver after a method call.
    pub(crate) this: Option<Value>,
}

impl CallOutcome {
    fn value(result: Value) -> Self {
        CallOutcome {
            result,
            write_back: Vec::new(),
            this: None,
        }
    }
}

impl Interpreter {
    /// `callee(args)`.
    pub(crate) fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult {
        if let ExprKind::MemberAccess { target, member } = &callee.kind {
            return self.eval_method_call(target, member, args);
        }
        let function = self.eval(callee)?;
        if !function.is_callable() && !matches!(function, Value::Set(_)) {
            return Err(unknown_function(&callee.to_string()).into());
        }
        let values = self.eval_args(args)?;
        let outcome = self.call_value(&function, values, None)?;
        self.write_back(args, outcome.write_back)?;
        Ok(outcome.result)
    }

    /// `receiver.member(args)`: the method runs with `this` bound to the
    /// receiver, and the receiver is updated with the final `this`.
    fn eval_method_call(&mut self, target: &Expr, member: &Name, args: &[Expr]) -> EvalResult {
        let receiver = self.eval(target)?;
        let method = match &receiver {
            Value::Object(object) => object.get(member.as_str()).cloned().unwrap_or_default(),
            _ => return Err(no_such_member(member.as_str(), &receiver).into()),
        };
        if !method.is_callable() {
            return Err(no_such_member(member.as_str(), &receiver).into());
        }
        let values = self.eval_args(args)?;
        let outcome = self.call_value(&method, values, Some(receiver.clone()))?;
        self.write_back(args, outcome.write_back)?;
        if let Some(updated) = outcome.this {
            if updated != receiver && is_assignable(target) {
                self.assign_to(target, updated)?;
            }
        }
        Ok(outcome.result)
    }

    /// Call an already evaluated function value.
    pub(crate) fn call_value(
        &mut self,
        function: &Value,
        args: Vec<Value>,
        this: Option<Value>,
    ) -> Result<CallOutcome, ControlAction> {
        match function {
            Value::Procedure(procedure) => self.call_procedure(procedure, args, this),
            Value::Builtin(name) => self.call_builtin(name, args),
            Value::Class(def) => self.instantiate(def, args).map(CallOutcome::value),
            Value::Set(_) => Ok(CallOutcome::value(access(function, args)?)),
            _ => Err(unknown_function(&function.to_string()).into()),
        }
    }

    /// Call a function value from host code; `rw` write-back is dropped.
    pub fn call_function(
        &mut self,
        function: &Value,
        args: Vec<Value>,
    ) -> Result<Value, EvalError> {
        self.call_value(function, args, None)
            .map(|outcome| outcome.result)
            .map_err(ControlAction::into_eval_error)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(arity = procedure.arity()))]
    fn call_procedure(
        &mut self,
        procedure: &Rc<ProcedureValue>,
        args: Vec<Value>,
        this: Option<Value>,
    ) -> Result<CallOutcome, ControlAction> {
        let def = &procedure.def;
        if args.len() != def.params.len() {
            let name = signature("procedure", def.params.iter().map(|p| &p.name));
            return Err(wrong_arg_count(&name, def.params.len(), args.len()).into());
        }
        self.check_recursion_limit()?;
        let (parent, kind) = match &procedure.captured {
            Some(frame) => (frame.clone(), FrameKind::Closure),
            None => (self.env.global().clone(), FrameKind::Procedure),
        };
        if self.flags.contains(ExecutionFlags::RUNTIME_DEBUGGING) {
            debug!(depth = self.call_depth, ?kind, "enter procedure");
        }

        self.call_depth += 1;
        let (outcome, frame) = {
            let mut scoped = self.scoped_on(parent, kind);
            for (param, value) in def.params.iter().zip(args) {
                scoped.env.define(param.name.clone(), value);
            }
            if let Some(this) = this {
                scoped.env.define(Name::from(Name::THIS), this);
            }
            let outcome = scoped.exec_block(&def.body);
            (outcome, scoped.env.current().clone())
        };
        self.call_depth -= 1;

        let result = match outcome {
            Ok(()) => Value::Undefined,
            Err(ControlAction::Return(value)) => value,
            Err(signal @ (ControlAction::Break | ControlAction::Continue)) => {
                return Err(signal.into_eval_error().into());
            }
            Err(other) => return Err(other),
        };

        let scope = frame.borrow();
        let write_back = def
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_read_write())
            .map(|(i, p)| (i, scope.get_local(p.name.as_str()).cloned().unwrap_or_default()))
            .collect();
        let this = scope.get_local(Name::THIS).cloned();
        Ok(CallOutcome {
            result,
            write_back,
            this,
        })
    }

    fn call_builtin(
        &mut self,
        name: &Name,
        mut args: Vec<Value>,
    ) -> Result<CallOutcome, ControlAction> {
        let builtins = Rc::clone(&self.builtins);
        let Some(builtin) = builtins.get(name.as_str()) else {
            return Err(unknown_function(name.as_str()).into());
        };
        builtin.check_arity(name.as_str(), args.len())?;
        let result = (builtin.func)(self, &mut args)?;
        let write_back = builtin
            .read_write
            .iter()
            .filter_map(|&i| args.get(i).map(|v| (i, v.clone())))
            .collect();
        Ok(CallOutcome {
            result,
            write_back,
            this: None,
        })
    }

    /// Run a class body in a fresh frame; its bindings become the members
    /// of the new object.
    fn instantiate(&mut self, def: &Rc<ClassDef>, args: Vec<Value>) -> EvalResult {
        if args.len() != def.params.len() {
            let name = signature("class", def.params.iter().map(|p| &p.name));
            return Err(wrong_arg_count(&name, def.params.len(), args.len()).into());
        }
        self.check_recursion_limit()?;
        let parent = self.env.global().clone();
        self.call_depth += 1;
        let outcome = {
            let mut scoped = self.scoped_on(parent, FrameKind::Procedure);
            for (param, value) in def.params.iter().zip(args) {
                scoped.env.define(param.name.clone(), value);
            }
            match scoped.exec_block(&def.body) {
                Ok(()) => Ok(scoped.env.local_bindings()),
                Err(action @ (ControlAction::Error(_) | ControlAction::Backtrack)) => Err(action),
                Err(signal) => Err(signal.into_eval_error().into()),
            }
        };
        self.call_depth -= 1;
        let members: BTreeMap<Name, Value> = outcome?.into_iter().collect();
        Ok(Value::object(Rc::clone(def), members))
    }

    /// Store the final values of `rw` parameters into the argument
    /// expressions that can hold them.
    fn write_back(
        &mut self,
        args: &[Expr],
        updates: Vec<(usize, Value)>,
    ) -> Result<(), ControlAction> {
        for (i, value) in updates {
            if let Some(arg) = args.get(i).filter(|arg| is_assignable(arg)) {
                self.assign_to(arg, value)?;
            }
        }
        Ok(())
    }
}

/// `procedure(x, y)`, naming an anonymous callee in arity errors.
fn signature<'a>(keyword: &str, params: impl Iterator<Item = &'a Name>) -> String {
    let params: Vec<&str> = params.map(Name::as_str).collect();
    format!("{keyword}({})", params.join(", "))
}
