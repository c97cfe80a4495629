//! Copy-on-write strings.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Shared string; mutation clones the text first if another value holds it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SetlString(Rc<String>);

impl SetlString {
    pub fn new(s: impl Into<String>) -> Self {
        SetlString(Rc::new(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exclusive access to the text.
    pub fn make_mut(&mut self) -> &mut String {
        Rc::make_mut(&mut self.0)
    }

    /// Number of characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Byte offset of the character at `index` (0-based); `char_len()`
    /// maps to the end of the string.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(0);
        }
        self.0
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.0.len()))
            .nth(index)
    }

    /// Character at `index` (0-based) as a one-character string.
    pub fn char_at(&self, index: usize) -> Option<&str> {
        let start = self.byte_offset(index)?;
        let c = self.0[start..].chars().next()?;
        Some(&self.0[start..start + c.len_utf8()])
    }

    pub(crate) fn shares_storage(&self, other: &SetlString) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn rc(&self) -> &Rc<String> {
        &self.0
    }
}

impl Deref for SetlString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SetlString {
    fn from(s: &str) -> Self {
        SetlString::new(s)
    }
}

impl From<String> for SetlString {
    fn from(s: String) -> Self {
        SetlString::new(s)
    }
}

impl fmt::Debug for SetlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}
