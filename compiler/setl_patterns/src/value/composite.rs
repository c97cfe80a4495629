//! Composite value types: terms, procedures and objects.
//!
//! Each holds its children behind `Rc`, so cloning a value never copies
//! more than a pointer.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use setl_ir::{ClassDef, Name, ProcedureDef, ProcedureKind};

use super::Value;
use crate::scope::{LocalScope, Scope};

// TermValue

/// `fc(args...)`: a user term or the term form of a code node.
#[derive(Clone, Debug)]
pub struct TermValue {
    functional_character: Name,
    args: Rc<Vec<Value>>,
}

impl TermValue {
    pub fn new(functional_character: impl Into<Name>, args: Vec<Value>) -> Self {
        TermValue {
            functional_character: functional_character.into(),
            args: Rc::new(args),
        }
    }

    pub fn functional_character(&self) -> &Name {
        &self.functional_character
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Exclusive access to the arguments, cloning them if shared.
    pub fn args_mut(&mut self) -> &mut Vec<Value> {
        Rc::make_mut(&mut self.args)
    }

    /// Whether this term represents a code node (`^sum`, `^variable`, ...).
    pub fn is_code_term(&self) -> bool {
        self.functional_character.as_str().starts_with('^')
    }
}

// ProcedureValue

/// A procedure, closure or lambda together with the frame it captured.
pub struct ProcedureValue {
    pub def: Rc<ProcedureDef>,
    /// Defining frame for closures and lambdas; procedures run with the
    /// global frame as parent and capture nothing.
    pub captured: Option<LocalScope<Scope>>,
}

impl ProcedureValue {
    pub fn new(def: Rc<ProcedureDef>, captured: Option<LocalScope<Scope>>) -> Self {
        ProcedureValue { def, captured }
    }

    pub fn kind(&self) -> ProcedureKind {
        self.def.kind
    }

    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

// The captured frame may contain this very procedure.
impl fmt::Debug for ProcedureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureValue")
            .field("kind", &self.def.kind)
            .field("params", &self.def.params)
            .field("captures", &self.captured.is_some())
            .finish()
    }
}

// ObjectValue

/// Instance of a class: its members plus the class it was built from.
#[derive(Clone, Debug)]
pub struct ObjectValue {
    class: Rc<ClassDef>,
    members: Rc<BTreeMap<Name, Value>>,
}

impl ObjectValue {
    pub fn new(class: Rc<ClassDef>, members: BTreeMap<Name, Value>) -> Self {
        ObjectValue {
            class,
            members: Rc::new(members),
        }
    }

    pub fn class(&self) -> &Rc<ClassDef> {
        &self.class
    }

    pub fn members(&self) -> &BTreeMap<Name, Value> {
        &self.members
    }

    pub fn get(&self, member: &str) -> Option<&Value> {
        self.members.get(member)
    }

    /// Set a member, cloning the member table if it is shared.
    pub fn set(&mut self, member: Name, value: Value) {
        Rc::make_mut(&mut self.members).insert(member, value);
    }

    pub fn same_class(&self, other: &ObjectValue) -> bool {
        Rc::ptr_eq(&self.class, &other.class)
    }
}
