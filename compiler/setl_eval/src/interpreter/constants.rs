//! Memoised values of constant collection literals.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use setl_ir::Expr;
use setl_patterns::Value;

/// Outcome of the first evaluation of each explicit `[...]`/`{...}`
/// literal, keyed by the literal's shared element list.
///
/// `Some(value)` for literals without free variables or effects, `None`
/// for literals that must be re-evaluated. Every entry holds a reference
/// to its element list, so a key address is never reused while cached.
#[derive(Default)]
pub(crate) struct ConstantCache {
    entries: FxHashMap<*const Expr, (Rc<[Expr]>, Option<Value>)>,
}

impl ConstantCache {
    fn key(elements: &Rc<[Expr]>) -> *const Expr {
        Rc::as_ptr(elements).cast::<Expr>()
    }

    /// `None` when the literal has not been evaluated yet.
    pub(crate) fn get(&self, elements: &Rc<[Expr]>) -> Option<&Option<Value>> {
        self.entries.get(&Self::key(elements)).map(|(_, value)| value)
    }

    pub(crate) fn insert(&mut self, elements: &Rc<[Expr]>, value: Option<Value>) {
        self.entries
            .insert(Self::key(elements), (Rc::clone(elements), value));
    }
}
