//! Structural matching of pattern terms against subject terms.
//!
//! Both sides are terms: patterns come from [`super::expr_to_term`] and
//! subjects from [`super::value_to_term`]. A failed match never leaves
//! partial bindings behind.

use smallvec::SmallVec;

use setl_ir::{Name, NodeKind};
use setl_stack::ensure_sufficient_stack;

use super::term_to_value;
use crate::value::{TermValue, Value};

type Bindings = SmallVec<[(Name, Value); 4]>;

/// Outcome of a match: success plus the variables it bound, in the order
/// they first occur in the pattern.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    matched: bool,
    bindings: Bindings,
}

impl MatchResult {
    pub fn failed() -> Self {
        MatchResult::default()
    }

    fn success(bindings: Bindings) -> Self {
        MatchResult {
            matched: true,
            bindings,
        }
    }

    #[inline]
    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn bindings(&self) -> &[(Name, Value)] {
        &self.bindings
    }

    pub fn into_bindings(self) -> impl Iterator<Item = (Name, Value)> {
        self.bindings.into_iter()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }
}

/// Name of a `^variable("x")` pattern.
fn pattern_variable(t: &TermValue) -> Option<&str> {
    if t.functional_character().as_str() != NodeKind::Variable.functional_character() {
        return None;
    }
    match t.args() {
        [Value::Str(name)] => Some(name.as_str()),
        _ => None,
    }
}

fn bind(name: &str, subject: &Value, bindings: &mut Bindings) -> bool {
    let value = term_to_value(subject);
    if let Some((_, bound)) = bindings.iter().find(|(n, _)| n.as_str() == name) {
        return *bound == value;
    }
    bindings.push((Name::from(name), value));
    true
}

fn match_into(pattern: &Value, subject: &Value, bindings: &mut Bindings) -> bool {
    ensure_sufficient_stack(|| match (pattern, subject) {
        (Value::Ignore, _) => true,
        (Value::Term(p), _) => {
            if let Some(name) = pattern_variable(p) {
                return bind(name, subject, bindings);
            }
            let Value::Term(s) = subject else {
                return false;
            };
            p.functional_character() == s.functional_character()
                && p.args().len() == s.args().len()
                && all_match(p.args(), s.args(), bindings)
        }
        (Value::List(p), Value::List(s)) => p.len() == s.len() && all_match(p, s, bindings),
        (Value::Set(p), Value::Set(s)) => {
            if p.len() != s.len() {
                return false;
            }
            let patterns: Vec<&Value> = p.iter().collect();
            let subjects: Vec<&Value> = s.iter().collect();
            let mut used = vec![false; subjects.len()];
            match_set(&patterns, &subjects, &mut used, bindings)
        }
        _ => pattern == subject,
    })
}

fn all_match(patterns: &[Value], subjects: &[Value], bindings: &mut Bindings) -> bool {
    patterns
        .iter()
        .zip(subjects)
        .all(|(p, s)| match_into(p, s, bindings))
}

/// Assign every pattern element to a distinct subject element, undoing
/// bindings of assignments that lead nowhere.
fn match_set(
    patterns: &[&Value],
    subjects: &[&Value],
    used: &mut [bool],
    bindings: &mut Bindings,
) -> bool {
    let Some((first, rest)) = patterns.split_first() else {
        return true;
    };
    for i in 0..subjects.len() {
        if used[i] {
            continue;
        }
        let mark = bindings.len();
        if match_into(first, subjects[i], bindings) {
            used[i] = true;
            if match_set(rest, subjects, used, bindings) {
                return true;
            }
            used[i] = false;
        }
        bindings.truncate(mark);
    }
    false
}

/// Match `pattern` against `subject`.
pub fn match_term(pattern: &Value, subject: &Value) -> MatchResult {
    let mut bindings = Bindings::new();
    if match_into(pattern, subject, &mut bindings) {
        MatchResult::success(bindings)
    } else {
        MatchResult::failed()
    }
}

/// Match `[h1, ..., hn | rest]` against a list or string with at least `n`
/// members; `rest` matches the remaining members as a list or string.
pub fn match_split_list(heads: &[Value], rest: &Value, subject: &Value) -> MatchResult {
    let (members, remainder): (Vec<Value>, Value) = match subject {
        Value::List(items) if items.len() >= heads.len() => (
            items[..heads.len()].to_vec(),
            Value::list(items[heads.len()..].to_vec()),
        ),
        Value::Str(s) if s.char_len() >= heads.len() => {
            let split = s.byte_offset(heads.len()).unwrap_or(s.len());
            (
                s[..split].chars().map(Value::string).collect(),
                Value::string(&s[split..]),
            )
        }
        _ => return MatchResult::failed(),
    };
    let mut bindings = Bindings::new();
    if all_match(heads, &members, &mut bindings) && match_into(rest, &remainder, &mut bindings) {
        MatchResult::success(bindings)
    } else {
        MatchResult::failed()
    }
}
