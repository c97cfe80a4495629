//! Environment for variable scoping in the interpreter.
//!
//! The environment is a pointer to the innermost frame of a chain of
//! [`Scope`]s plus the global frame. Frames are pushed for loop iterations,
//! match branches and calls, and released by moving the pointer back; a
//! closure keeps its defining frame alive through its own reference.

use setl_ir::Name;
use setl_patterns::{FrameKind, LocalScope, Scope, Value};

pub struct Environment {
    /// Innermost frame.
    current: LocalScope<Scope>,
    /// Program-level frame, parent of every procedure call frame.
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::global());
        Environment {
            current: global.clone(),
            global,
        }
    }

    #[inline]
    pub fn current(&self) -> &LocalScope<Scope> {
        &self.current
    }

    #[inline]
    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    /// Number of frames between the current one and the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut next = self.current.borrow().parent().cloned();
        while let Some(frame) = next {
            depth += 1;
            next = frame.borrow().parent().cloned();
        }
        depth
    }

    /// Push a frame of `kind` on top of the current one.
    #[inline]
    pub fn push_frame(&mut self, kind: FrameKind) -> LocalScope<Scope> {
        let parent = self.current.clone();
        self.enter(LocalScope::new(Scope::with_parent(parent, kind)))
    }

    /// Make `frame` current and return the frame it replaces.
    #[inline]
    pub fn enter(&mut self, frame: LocalScope<Scope>) -> LocalScope<Scope> {
        std::mem::replace(&mut self.current, frame)
    }

    /// Make `frame` current again, dropping whatever was pushed since.
    #[inline]
    pub fn restore(&mut self, frame: LocalScope<Scope>) {
        self.current = frame;
    }

    /// Bind `name` in the current frame.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.current.borrow_mut().define(name, value);
    }

    /// Bind `name` in the global frame.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global.borrow_mut().define(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.current.borrow().lookup(name)
    }

    /// `name := value` from the current frame.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) {
        self.current.assign(name, value);
    }

    /// Remove the binding `name := ...` would overwrite and return it with
    /// its frame, so the value can be mutated without sharing its storage.
    /// Put it back with [`Scope::define`] on the returned frame.
    pub fn take_assignable(&mut self, name: &str) -> Option<(LocalScope<Scope>, Value)> {
        let mut frame = self.current.clone();
        loop {
            let next = {
                let mut scope = frame.borrow_mut();
                if let Some(value) = scope.remove_local(name) {
                    drop(scope);
                    return Some((frame, value));
                }
                if scope.kind() == FrameKind::Procedure {
                    return None;
                }
                scope.parent().cloned()
            };
            frame = next?;
        }
    }

    /// Bindings of the current frame.
    pub fn local_bindings(&self) -> Vec<(Name, Value)> {
        self.current
            .borrow()
            .local_bindings()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
