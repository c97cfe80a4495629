//! Collection capabilities: sizes, 1-based indexing, slicing, map access
//! and member iteration.
//!
//! Indexes are 1-based; negative indexes count from the end, so `-1` is the
//! last member. Index `0` and indexes past either end are errors, except
//! where an assignment may grow the collection.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::rc::Rc;

use num_traits::ToPrimitive;

use super::Value;
use crate::errors::{
    incompatible_type, index_out_of_range, not_a_collection, not_an_integer, number_too_large,
    EvalError, ValueResult,
};

/// Indexes must fit into a 32-bit signed integer.
const MAX_INDEX: i64 = 2_147_483_647;

/// The integer value of an index argument.
fn index_value(index: &Value) -> Result<i64, EvalError> {
    let Some(i) = index.as_integer() else {
        return Err(not_an_integer("Index", index));
    };
    match i.to_i64() {
        Some(i) if i.abs() <= MAX_INDEX => Ok(i),
        _ => Err(number_too_large(index)),
    }
}

/// 0-based position of `index` in a collection of `len` members.
fn position(index: &Value, len: usize) -> Result<usize, EvalError> {
    let i = index_value(index)?;
    resolve(i, len).ok_or_else(|| index_out_of_range(i, len))
}

fn resolve(i: i64, len: usize) -> Option<usize> {
    let len_i = i64::try_from(len).ok()?;
    let p = if i > 0 { i - 1 } else { len_i + i };
    if i == 0 || p < 0 || p >= len_i {
        return None;
    }
    usize::try_from(p).ok()
}

/// Drop trailing `om` members; lists never end with `om`.
fn trim_undefined(items: &mut Vec<Value>) {
    while items.last().is_some_and(Value::is_undefined) {
        items.pop();
    }
}

impl Value {
    /// Number of members (`#c`).
    pub fn size(&self) -> Result<usize, EvalError> {
        match self {
            Value::List(items) => Ok(items.len()),
            Value::Set(items) => Ok(items.len()),
            Value::Str(s) => Ok(s.char_len()),
            Value::Term(t) => Ok(t.args().len()),
            Value::Matrix(m) => Ok(m.rows()),
            Value::Object(o) => Ok(o.members().len()),
            _ => Err(not_a_collection(self)),
        }
    }

    /// `c[index]`. On a set of pairs this is a map lookup.
    pub fn get_member(&self, index: &Value) -> ValueResult {
        match self {
            Value::List(items) => Ok(items[position(index, items.len())?].clone()),
            Value::Str(s) => {
                let p = position(index, s.char_len())?;
                Ok(Value::string(s.char_at(p).unwrap_or_default()))
            }
            Value::Term(t) => Ok(t.args()[position(index, t.args().len())?].clone()),
            Value::Set(_) => self.map_lookup(index),
            Value::Matrix(m) => {
                let p = position(index, m.rows())?;
                let row = m.row(p).unwrap_or_default();
                Ok(Value::list(row.iter().map(|x| Value::float(*x)).collect()))
            }
            _ => Err(incompatible_type(format!(
                "\"{self}\" is not a list, string, term or map."
            ))),
        }
    }

    /// `c[index] := value`.
    ///
    /// Lists grow and pad with `om` when assigned past their end, strings
    /// accept `#s + 1` to append, and maps replace every image of `index`
    /// (`om` removes the key).
    pub fn set_member(&mut self, index: &Value, value: Value) -> Result<(), EvalError> {
        match self {
            Value::List(items) => {
                let i = index_value(index)?;
                let len = items.len();
                if i > 0 {
                    let p = usize::try_from(i - 1).map_err(|_| number_too_large(i))?;
                    let items = Rc::make_mut(items);
                    if p < len {
                        items[p] = value;
                    } else if !value.is_undefined() {
                        items.resize(p, Value::Undefined);
                        items.push(value);
                    }
                    trim_undefined(items);
                    Ok(())
                } else {
                    let p = resolve(i, len).ok_or_else(|| index_out_of_range(i, len))?;
                    let items = Rc::make_mut(items);
                    items[p] = value;
                    trim_undefined(items);
                    Ok(())
                }
            }
            Value::Str(s) => {
                let Some(replacement) = value.as_str() else {
                    return Err(incompatible_type(format!(
                        "Only strings can be assigned into a string, not \"{value}\"."
                    )));
                };
                let i = index_value(index)?;
                let len = s.char_len();
                let p = if i > 0 && usize::try_from(i).ok() == Some(len + 1) {
                    len
                } else {
                    resolve(i, len).ok_or_else(|| index_out_of_range(i, len))?
                };
                let start = s.byte_offset(p).unwrap_or(s.len());
                let end = s.byte_offset(p + 1).unwrap_or(s.len());
                s.make_mut().replace_range(start..end, replacement);
                Ok(())
            }
            Value::Set(items) => {
                let items = Rc::make_mut(items);
                let stale: Vec<Value> = pairs_with_key(items, index).cloned().collect();
                for pair in stale {
                    items.remove(&pair);
                }
                if !value.is_undefined() {
                    items.insert(Value::pair(index.clone(), value));
                }
                Ok(())
            }
            Value::Term(t) => {
                let p = position(index, t.args().len())?;
                t.args_mut()[p] = value;
                Ok(())
            }
            _ => Err(incompatible_type(format!(
                "\"{self}\" does not support indexed assignment."
            ))),
        }
    }

    /// First member in iteration order, `om` when empty.
    pub fn first_member(&self) -> ValueResult {
        match self {
            Value::List(items) => Ok(items.first().cloned().unwrap_or_default()),
            Value::Set(items) => Ok(items.first().cloned().unwrap_or_default()),
            Value::Str(s) => Ok(s
                .chars()
                .next()
                .map_or(Value::Undefined, Value::string)),
            _ => Err(not_a_collection(self)),
        }
    }

    /// Last member in iteration order, `om` when empty.
    pub fn last_member(&self) -> ValueResult {
        match self {
            Value::List(items) => Ok(items.last().cloned().unwrap_or_default()),
            Value::Set(items) => Ok(items.last().cloned().unwrap_or_default()),
            Value::Str(s) => Ok(s
                .chars()
                .next_back()
                .map_or(Value::Undefined, Value::string)),
            _ => Err(not_a_collection(self)),
        }
    }

    /// Remove and return the first member; `om` when empty.
    pub fn remove_first_member(&mut self) -> ValueResult {
        match self {
            Value::List(items) if items.is_empty() => Ok(Value::Undefined),
            Value::List(items) => Ok(Rc::make_mut(items).remove(0)),
            Value::Set(items) => Ok(Rc::make_mut(items).pop_first().unwrap_or_default()),
            Value::Str(s) => {
                let Some(c) = s.chars().next() else {
                    return Ok(Value::Undefined);
                };
                s.make_mut().replace_range(..c.len_utf8(), "");
                Ok(Value::string(c))
            }
            _ => Err(not_a_collection(self)),
        }
    }

    /// Remove and return the last member; `om` when empty.
    pub fn remove_last_member(&mut self) -> ValueResult {
        match self {
            Value::List(items) => Ok(Rc::make_mut(items).pop().unwrap_or_default()),
            Value::Set(items) => Ok(Rc::make_mut(items).pop_last().unwrap_or_default()),
            Value::Str(s) => {
                if s.is_empty() {
                    return Ok(Value::Undefined);
                }
                Ok(s.make_mut().pop().map_or(Value::Undefined, Value::string))
            }
            _ => Err(not_a_collection(self)),
        }
    }

    /// `element in self`; on strings this is a substring test.
    pub fn contains(&self, element: &Value) -> Result<bool, EvalError> {
        match self {
            Value::List(items) => Ok(items.contains(element)),
            Value::Set(items) => Ok(items.contains(element)),
            Value::Str(s) => match element.as_str() {
                Some(needle) => Ok(s.contains(needle)),
                None => Err(incompatible_type(format!(
                    "Cannot search for \"{element}\" inside the string {self}."
                ))),
            },
            _ => Err(not_a_collection(self)),
        }
    }

    /// `self[low..high]`, both bounds inclusive and optional.
    pub fn slice(&self, low: Option<&Value>, high: Option<&Value>) -> ValueResult {
        let len = match self {
            Value::List(items) => items.len(),
            Value::Str(s) => s.char_len(),
            _ => {
                return Err(incompatible_type(format!(
                    "\"{self}\" is neither a list nor a string and cannot be sliced."
                )))
            }
        };
        let len_i = i64::try_from(len).map_err(|_| number_too_large(len))?;
        let lo = match low {
            Some(v) => index_value(v)?,
            None => 1,
        };
        let hi = match high {
            Some(v) => index_value(v)?,
            None => len_i,
        };
        let lo_abs = if lo < 0 { len_i + lo + 1 } else { lo };
        let hi_abs = if hi < 0 { len_i + hi + 1 } else { hi };
        if lo_abs < 1 || lo_abs > len_i + 1 {
            return Err(index_out_of_range(lo, len));
        }
        if hi_abs > len_i {
            return Err(index_out_of_range(hi, len));
        }
        let start = usize::try_from(lo_abs - 1).unwrap_or(len);
        let end = usize::try_from(hi_abs).unwrap_or(0).max(start);
        match self {
            Value::List(items) => Ok(Value::list(items[start..end].to_vec())),
            Value::Str(s) => {
                let from = s.byte_offset(start).unwrap_or(s.len());
                let to = s.byte_offset(end).unwrap_or(s.len());
                Ok(Value::string(&s[from..to]))
            }
            _ => Err(not_a_collection(self)),
        }
    }

    /// `m[key]` on a set of pairs: the unique image of `key`, or `om` when
    /// `key` has no image or several.
    pub fn map_lookup(&self, key: &Value) -> ValueResult {
        let Value::Set(items) = self else {
            return Err(incompatible_type(format!("\"{self}\" is not a map.")));
        };
        let mut images = pairs_with_key(items, key);
        match (images.next(), images.next()) {
            (Some(pair), None) => Ok(pair.as_pair().map(|(_, v)| v.clone()).unwrap_or_default()),
            _ => Ok(Value::Undefined),
        }
    }

    /// `m{key}`: the set of all images of `key`.
    pub fn collect_map(&self, key: &Value) -> ValueResult {
        let Value::Set(items) = self else {
            return Err(incompatible_type(format!("\"{self}\" is not a map.")));
        };
        Ok(Value::set(
            pairs_with_key(items, key).filter_map(|p| p.as_pair().map(|(_, v)| v.clone())),
        ))
    }

    /// Members in iteration order: insertion order for lists and strings,
    /// sorted order for sets. The iterator keeps the storage alive, so the
    /// collection may be reassigned while it runs.
    pub fn members(&self) -> Result<Members, EvalError> {
        let inner = match self {
            Value::List(items) => MembersInner::List {
                items: Rc::clone(items),
                front: 0,
                back: items.len(),
            },
            Value::Set(items) => MembersInner::Set {
                items: Rc::clone(items),
                front: None,
                back: None,
                remaining: items.len(),
            },
            Value::Str(s) => MembersInner::Str {
                text: Rc::clone(s.rc()),
                front: 0,
                back: s.len(),
            },
            _ => return Err(not_a_collection(self)),
        };
        Ok(Members { inner })
    }
}

/// Pairs `[key, _]` of a map, in order. Lists order lexicographically, so
/// they are contiguous and start right after `[key]`.
fn pairs_with_key<'a>(
    items: &'a BTreeSet<Value>,
    key: &'a Value,
) -> impl Iterator<Item = &'a Value> + 'a {
    let start = Value::list(vec![key.clone()]);
    items
        .range((Included(start), Unbounded))
        .take_while(move |e| e.as_list().and_then(<[Value]>::first) == Some(key))
        .filter(|e| e.as_pair().is_some())
}

/// Iterator over the members of a collection.
#[derive(Debug)]
pub struct Members {
    inner: MembersInner,
}

#[derive(Debug)]
enum MembersInner {
    List {
        items: Rc<Vec<Value>>,
        front: usize,
        back: usize,
    },
    Set {
        items: Rc<BTreeSet<Value>>,
        front: Option<Value>,
        back: Option<Value>,
        remaining: usize,
    },
    Str {
        text: Rc<String>,
        front: usize,
        back: usize,
    },
}

impl Iterator for Members {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match &mut self.inner {
            MembersInner::List { items, front, back } => {
                if *front >= *back {
                    return None;
                }
                let v = items[*front].clone();
                *front += 1;
                Some(v)
            }
            MembersInner::Set {
                items,
                front,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return None;
                }
                let next = match front.as_ref() {
                    None => items.first(),
                    Some(last) => items.range((Excluded(last), Unbounded)).next(),
                }
                .cloned()?;
                *remaining -= 1;
                *front = Some(next.clone());
                Some(next)
            }
            MembersInner::Str { text, front, back } => {
                let c = text.get(*front..*back)?.chars().next()?;
                *front += c.len_utf8();
                Some(Value::string(c))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            MembersInner::List { front, back, .. } => {
                let n = back.saturating_sub(*front);
                (n, Some(n))
            }
            MembersInner::Set { remaining, .. } => (*remaining, Some(*remaining)),
            MembersInner::Str { front, back, .. } => {
                let bytes = back.saturating_sub(*front);
                (bytes.div_ceil(4), Some(bytes))
            }
        }
    }
}

impl DoubleEndedIterator for Members {
    fn next_back(&mut self) -> Option<Value> {
        match &mut self.inner {
            MembersInner::List { items, front, back } => {
                if *front >= *back {
                    return None;
                }
                *back -= 1;
                Some(items[*back].clone())
            }
            MembersInner::Set {
                items,
                back,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return None;
                }
                let next = match back.as_ref() {
                    None => items.last(),
                    Some(last) => items.range((Unbounded, Excluded(last))).next_back(),
                }
                .cloned()?;
                *remaining -= 1;
                *back = Some(next.clone());
                Some(next)
            }
            MembersInner::Str { text, front, back } => {
                let c = text.get(*front..*back)?.chars().next_back()?;
                *back -= c.len_utf8();
                Some(Value::string(c))
            }
        }
    }
}
