//! Identifier names.
//!
//! A [`Name`] is a shared, immutable string. Cloning is a reference count
//! bump, so names can be stored in scope frames, term values and the code
//! tree without copying. Equality and ordering are by content.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// An identifier: variable, parameter, member or functional character.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Rc<str>);

impl Name {
    /// Marker injected into the unbound set by constructs whose result must
    /// never be cached. It cannot collide with a user identifier.
    pub const PREVENT_OPTIMIZATION: &'static str = "$PREVENT_OPTIMIZATION$";

    /// Name of the receiver inside methods.
    pub const THIS: &'static str = "this";

    #[inline]
    pub fn new(s: &str) -> Self {
        Name(Rc::from(s))
    }

    /// The sentinel name, see [`Name::PREVENT_OPTIMIZATION`].
    pub fn prevent_optimization() -> Self {
        Name::new(Self::PREVENT_OPTIMIZATION)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shared backing storage, used when a name becomes a term value.
    #[inline]
    pub fn as_rc(&self) -> &Rc<str> {
        &self.0
    }

    pub fn is_prevent_optimization(&self) -> bool {
        &*self.0 == Self::PREVENT_OPTIMIZATION
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(Rc::from(s))
    }
}

impl From<Rc<str>> for Name {
    fn from(s: Rc<str>) -> Self {
        Name(s)
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests;
