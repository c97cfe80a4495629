//! Console and file builtins.

use setl_patterns::{EvalError, EvalResult, Value};

use super::{string_arg, Arity, BuiltinRegistry};
use crate::Interpreter;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("print", Arity::AtLeast(0), print);
    registry.add("nPrint", Arity::AtLeast(0), n_print);
    registry.add("get", Arity::Range(0, 1), get);
    registry.add("readFile", Arity::Exact(1), read_file);
    registry.add("writeFile", Arity::Exact(2), write_file);
    registry.add("appendFile", Arity::Exact(2), append_file);
}

/// Arguments printed back to back, strings without quotes.
fn joined(args: &[Value]) -> String {
    args.iter().map(Value::to_unquoted_string).collect()
}

fn print(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    interp.print_handler.println(&joined(args));
    Ok(Value::Undefined)
}

fn n_print(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    interp.print_handler.print(&joined(args));
    Ok(Value::Undefined)
}

/// `get(prompt)`: next input line, `om` at end of input.
fn get(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let prompt = args.first().map(Value::to_unquoted_string).unwrap_or_default();
    let line = interp.io.read_line(&prompt)?;
    Ok(line.map_or(Value::Undefined, Value::string))
}

fn read_file(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let path = string_arg("readFile", &args[0])?;
    let lines = interp.io.read_file(path)?;
    Ok(Value::list(lines.into_iter().map(Value::string).collect()))
}

fn write_file(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let path = string_arg("writeFile", &args[0])?;
    let content = file_content(&args[1])?;
    interp.io.write_file(path, &content)?;
    Ok(Value::Bool(true))
}

fn append_file(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let path = string_arg("appendFile", &args[0])?;
    let content = file_content(&args[1])?;
    interp.io.append_file(path, &content)?;
    Ok(Value::Bool(true))
}

/// One line per member for lists and sets, one line otherwise.
fn file_content(value: &Value) -> Result<String, EvalError> {
    let mut content = String::new();
    match value {
        Value::List(_) | Value::Set(_) => {
            for member in value.members()? {
                content.push_str(&member.to_unquoted_string());
                content.push('\n');
            }
        }
        other => {
            content.push_str(&other.to_unquoted_string());
            content.push('\n');
        }
    }
    Ok(content)
}
