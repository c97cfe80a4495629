//! Variable frames.
//!
//! A frame holds the bindings of one lexical level and points to its parent.
//! Frames are shared: a closure keeps the frame it was defined in alive for
//! as long as the closure value exists.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use setl_ir::Name;

use crate::value::Value;

/// Single-threaded shared cell for frames.
///
/// All frame allocations go through [`LocalScope::new`]; the wrapper keeps
/// `Rc<RefCell<_>>` out of the rest of the evaluator.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether both handles point at the same frame.
    #[inline]
    pub fn ptr_eq(&self, other: &LocalScope<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Frames form cycles through captured closures; print only the address.
impl<T> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalScope({:p})", Rc::as_ptr(&self.0))
    }
}

/// What created a frame; decides where assignments land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Program level.
    Global,
    /// Body of a procedure call. Assignments never look past it.
    Procedure,
    /// Body of a closure or lambda call; its parent is the captured frame.
    Closure,
    /// Loop iteration, match branch, catch block or class body run.
    /// New names assigned here go to the nearest non-block frame.
    Block,
}

impl FrameKind {
    /// Whether new variables assigned in nested blocks are created here.
    pub fn owns_assignments(self) -> bool {
        !matches!(self, FrameKind::Block)
    }
}

/// One frame of variable bindings.
#[derive(Debug)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
    kind: FrameKind,
}

impl Scope {
    /// Root frame.
    pub fn global() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
            kind: FrameKind::Global,
        }
    }

    pub fn with_parent(parent: LocalScope<Scope>, kind: FrameKind) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
            kind,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }

    /// Bind `name` in this frame, shadowing outer bindings.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Binding in this frame only.
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Remove a binding from this frame only.
    pub fn remove_local(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Bindings of this frame, in no particular order.
    pub fn local_bindings(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.bindings.iter()
    }

    /// Look `name` up in this frame and its ancestors.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        let mut next = self.parent.clone();
        while let Some(frame) = next {
            let frame = frame.borrow();
            if let Some(value) = frame.bindings.get(name) {
                return Some(value.clone());
            }
            next = frame.parent.clone();
        }
        None
    }

    /// Overwrite an existing binding of `name` in this frame or an ancestor
    /// reachable without crossing a procedure frame. Returns the value back
    /// when no such binding exists.
    pub fn assign_existing(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        if self.kind == FrameKind::Procedure {
            return Err(value);
        }
        let mut next = self.parent.clone();
        while let Some(frame) = next {
            let mut borrowed = frame.borrow_mut();
            if let Some(slot) = borrowed.bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            if borrowed.kind == FrameKind::Procedure {
                return Err(value);
            }
            next = borrowed.parent.clone();
        }
        Err(value)
    }

    /// Number of bindings in this frame.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl LocalScope<Scope> {
    /// `name := value` as seen from this frame: update an existing binding
    /// if one is visible, otherwise create it in the nearest frame that owns
    /// assignments.
    pub fn assign(&self, name: Name, value: Value) {
        let value = match self.borrow_mut().assign_existing(name.as_str(), value) {
            Ok(()) => return,
            Err(value) => value,
        };
        self.owner().borrow_mut().define(name, value);
    }

    /// Nearest frame (this one or an ancestor) that owns assignments.
    pub fn owner(&self) -> LocalScope<Scope> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let scope = frame.borrow();
                if scope.kind.owns_assignments() {
                    return frame.clone();
                }
                scope.parent.clone()
            };
            match parent {
                Some(p) => frame = p,
                None => return frame,
            }
        }
    }
}

#[cfg(test)]
mod tests;
