//! RAII scope guards for frame management.
//!
//! [`ScopedInterpreter`] remembers the frame that was current when it was
//! created and makes it current again when dropped, so a frame is released
//! whether its construct finishes normally, through a `ControlAction` or
//! through unwinding.
//!
//! ```text
//! let mut scoped = interpreter.scoped(FrameKind::Block);
//! scoped.env.define(name, value);
//! scoped.exec_block(body)?;
//! // previous frame current again here
//! ```

use std::ops::{Deref, DerefMut};

use setl_ir::Name;
use setl_patterns::{FrameKind, LocalScope, Scope, Value};

use super::Interpreter;

/// Guard that restores the previous frame on drop.
///
/// Derefs to [`Interpreter`], so all evaluation methods are available on it.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
    previous: Option<LocalScope<Scope>>,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.interpreter.env.restore(previous);
        }
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a frame of `kind` on top of the current one.
    pub fn scoped(&mut self, kind: FrameKind) -> ScopedInterpreter<'_> {
        let previous = self.env.push_frame(kind);
        ScopedInterpreter {
            interpreter: self,
            previous: Some(previous),
        }
    }

    /// Run in a fresh frame of `kind` whose parent is `parent` rather than
    /// the current frame. Used for calls, whose frames hang off the global
    /// frame or a captured one.
    pub fn scoped_on(&mut self, parent: LocalScope<Scope>, kind: FrameKind) -> ScopedInterpreter<'_> {
        let frame = LocalScope::new(Scope::with_parent(parent, kind));
        let previous = self.env.enter(frame);
        ScopedInterpreter {
            interpreter: self,
            previous: Some(previous),
        }
    }

    /// Run `f` in a fresh block frame.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped(FrameKind::Block);
        f(&mut scoped)
    }

    /// Run `f` in a fresh block frame holding `bindings`.
    pub fn with_bindings<T, F, I>(&mut self, bindings: I, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
        I: IntoIterator<Item = (Name, Value)>,
    {
        self.with_env_scope(|scoped| {
            for (name, value) in bindings {
                scoped.env.define(name, value);
            }
            f(scoped)
        })
    }
}
