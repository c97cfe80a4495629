//! The iterator protocol.
//!
//! An iterator chain `x in s, y in t` is a cartesian product nested left
//! to right; the collection of a later link is evaluated once per member of
//! the links before it, with their bindings visible. Every combination runs
//! in a fresh block frame holding only the bindings of its own link.

use setl_ir::{CollectionBuilder, Expr, ExprKind, IterBinding};
use setl_patterns::errors::{incompatible_type, not_a_collection, undefined_operation};
use setl_patterns::{ControlAction, ExecResult, FrameKind, Members, Rational, Value};

use crate::Interpreter;

/// What a loop does after one pass of its body.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LoopAction {
    /// Go on with the next combination.
    Continue,
    /// Leave the whole chain.
    Break,
}

impl LoopAction {
    /// Sort a body outcome into loop actions and signals the loop does not
    /// handle.
    pub(crate) fn from_outcome(outcome: ExecResult) -> Result<LoopAction, ControlAction> {
        match outcome {
            Ok(()) | Err(ControlAction::Continue) => Ok(LoopAction::Continue),
            Err(ControlAction::Break) => Ok(LoopAction::Break),
            Err(other) => Err(other),
        }
    }
}

/// Members of an integer or rational range, produced on demand.
pub(crate) struct RationalRange {
    next: Rational,
    step: Rational,
    last: Rational,
}

impl RationalRange {
    /// `[first..last]`, or `[first, second..last]` with step
    /// `second - first`.
    pub(crate) fn new(
        first: &Value,
        second: Option<&Value>,
        last: &Value,
    ) -> Result<Self, ControlAction> {
        let start = range_bound(first)?;
        let end = range_bound(last)?;
        let step = match second {
            Some(second) => range_bound(second)?.sub(&start),
            None => Rational::one(),
        };
        if step.is_zero() {
            return Err(undefined_operation("Step size of a range must not be zero.").into());
        }
        Ok(RationalRange {
            next: start,
            step,
            last: end,
        })
    }
}

fn range_bound(value: &Value) -> Result<Rational, ControlAction> {
    match value {
        Value::Rational(r) => Ok(r.clone()),
        _ => Err(incompatible_type(format!(
            "Range bound \"{value}\" is not a rational number."
        ))
        .into()),
    }
}

impl Iterator for RationalRange {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let in_range = if self.step.is_negative() {
            self.next >= self.last
        } else {
            self.next <= self.last
        };
        if !in_range {
            return None;
        }
        let current = self.next.clone();
        self.next = self.next.add(&self.step);
        Some(Value::Rational(current))
    }
}

/// Source of one iterator link.
enum Source {
    Range(RationalRange),
    Members(Members),
}

impl Iterator for Source {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Source::Range(r) => r.next(),
            Source::Members(m) => m.next(),
        }
    }
}

impl Interpreter {
    /// Run `body` once per combination of `iterators`.
    ///
    /// `body` may answer `Break` to stop every link and `Continue` to move
    /// on; `Return`, errors and `Backtrack` propagate unchanged.
    pub(crate) fn iterate<F>(&mut self, iterators: &[IterBinding], body: &mut F) -> ExecResult
    where
        F: FnMut(&mut Interpreter) -> ExecResult,
    {
        self.iterate_links(iterators, body).map(|_| ())
    }

    fn iterate_links<F>(
        &mut self,
        iterators: &[IterBinding],
        body: &mut F,
    ) -> Result<LoopAction, ControlAction>
    where
        F: FnMut(&mut Interpreter) -> ExecResult,
    {
        let Some((link, rest)) = iterators.split_first() else {
            return LoopAction::from_outcome(body(self));
        };
        let source = self.iteration_source(&link.collection)?;
        for member in source {
            let mut scoped = self.scoped(FrameKind::Block);
            scoped.bind_target(&link.target, member)?;
            if scoped.iterate_links(rest, body)? == LoopAction::Break {
                return Ok(LoopAction::Break);
            }
        }
        Ok(LoopAction::Continue)
    }

    /// Ranges written in place are walked lazily; anything else iterates
    /// over a snapshot of its members.
    fn iteration_source(&mut self, collection: &Expr) -> Result<Source, ControlAction> {
        if let ExprKind::List(CollectionBuilder::Range {
            first,
            second,
            last,
        }) = &collection.kind
        {
            let first = self.eval(first)?;
            let second = match second {
                Some(e) => Some(self.eval(e)?),
                None => None,
            };
            let last = self.eval(last)?;
            return Ok(Source::Range(RationalRange::new(&first, second.as_ref(), &last)?));
        }
        let value = self.eval(collection)?;
        match value.members() {
            Ok(members) => Ok(Source::Members(members)),
            Err(_) => Err(not_a_collection(&value).with_span(collection.span).into()),
        }
    }

    /// Bind an iteration variable in the current frame: a variable, `_`,
    /// or an explicit list of targets.
    pub(crate) fn bind_target(&mut self, target: &Expr, value: Value) -> ExecResult {
        match &target.kind {
            ExprKind::Variable(name) => {
                self.env.define(name.clone(), value);
                Ok(())
            }
            ExprKind::Ignore => Ok(()),
            ExprKind::List(CollectionBuilder::Explicit { elements, .. }) => {
                let members = destructure(elements.len(), &value)?;
                for (element, member) in elements.iter().zip(members) {
                    self.bind_target(element, member)?;
                }
                Ok(())
            }
            _ => Err(incompatible_type(format!(
                "\"{target}\" cannot be used as an iteration variable."
            ))
            .into()),
        }
    }
}

/// Members of `value` for a list of `count` targets; a shorter list pads
/// with `om`.
pub(crate) fn destructure(count: usize, value: &Value) -> Result<Vec<Value>, ControlAction> {
    let Value::List(items) = value else {
        return Err(incompatible_type(format!(
            "\"{value}\" is not a list and cannot be split into {count} targets."
        ))
        .into());
    };
    if items.len() > count {
        return Err(incompatible_type(format!(
            "\"{value}\" has more members than the {count} targets it is assigned to."
        ))
        .into());
    }
    let mut members = items.to_vec();
    members.resize(count, Value::Undefined);
    Ok(members)
}

