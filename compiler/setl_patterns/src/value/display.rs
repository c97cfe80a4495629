//! Canonical printed form of values.
//!
//! Strings print quoted and escaped, so the printed form of a collection
//! reads back as the same collection. [`Value::to_unquoted_string`] is the
//! form used by `print` and string concatenation.

use std::fmt::{self, Write};

use setl_ir::escape::{format_float, quote_string};
use setl_ir::printer::{class_to_string, procedure_to_string};

use super::Value;

fn write_separated<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Whether a term with this functional character needs the `@` prefix to
/// be read back as a term rather than a call.
fn needs_term_marker(fc: &str) -> bool {
    !fc.starts_with('^') && !fc.starts_with(|c: char| c.is_uppercase())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("om"),
            Value::Ignore => f.write_str("_"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Rational(r) => write!(f, "{r}"),
            Value::Float(x) => f.write_str(&format_float(x.0)),
            Value::Str(s) => f.write_str(&quote_string(s)),
            Value::List(items) => {
                f.write_char('[')?;
                write_separated(f, items.iter())?;
                f.write_char(']')
            }
            Value::Set(items) => {
                f.write_char('{')?;
                write_separated(f, items.iter())?;
                f.write_char('}')
            }
            Value::Matrix(m) => {
                f.write_str("<<")?;
                for r in 0..m.rows() {
                    f.write_str(" <<")?;
                    for (j, x) in m.row(r).unwrap_or_default().iter().enumerate() {
                        if j > 0 {
                            f.write_char(' ')?;
                        }
                        f.write_str(&format_float(*x))?;
                    }
                    f.write_str(">>")?;
                }
                f.write_str(" >>")
            }
            Value::Term(t) => {
                let fc = t.functional_character().as_str();
                if needs_term_marker(fc) {
                    f.write_char('@')?;
                }
                f.write_str(fc)?;
                f.write_char('(')?;
                write_separated(f, t.args().iter())?;
                f.write_char(')')
            }
            Value::Procedure(p) => f.write_str(&procedure_to_string(&p.def)),
            Value::Builtin(name) => {
                write!(f, "procedure () {{ /* predefined procedure `{name}` */ }}")
            }
            Value::Class(def) => f.write_str(&class_to_string(def)),
            Value::Object(o) => {
                f.write_str("object<{")?;
                for (i, (name, value)) in o.members().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} := {value}")?;
                }
                f.write_str("}>")
            }
            Value::Error(message) => f.write_str(message),
        }
    }
}

impl Value {
    /// Printed form with a top-level string left unquoted.
    pub fn to_unquoted_string(&self) -> String {
        match self {
            Value::Str(s) => s.as_str().to_owned(),
            other => other.to_string(),
        }
    }
}
