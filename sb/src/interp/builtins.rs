//! Builtin function registry
//!
//! Builtins receive the call's source line and the already-evaluated
//! arguments, and report failure by returning an Error value. They never
//! touch the environment or the subroutine registry; `append` grows a
//! list by returning a new one.

use super::error::{ErrorKind, RuntimeError};
use super::value::Value;
use std::collections::HashMap;
use std::io::Read;

/// Builtin function type
pub type BuiltinFn = fn(usize, &[Value]) -> Value;

/// The registry populated once at interpreter start
pub fn default_builtins() -> HashMap<String, BuiltinFn> {
    let mut builtins: HashMap<String, BuiltinFn> = HashMap::new();
    builtins.insert("input".to_string(), builtin_input);
    builtins.insert("random".to_string(), builtin_random);
    builtins.insert("sin".to_string(), builtin_sin);
    builtins.insert("cos".to_string(), builtin_cos);
    builtins.insert("tan".to_string(), builtin_tan);
    builtins.insert("sqrt".to_string(), builtin_sqrt);
    builtins.insert("floor".to_string(), builtin_floor);
    builtins.insert("len".to_string(), builtin_len);
    builtins.insert("append".to_string(), builtin_append);
    builtins.insert("read_file".to_string(), builtin_read_file);
    builtins
}

fn arity_error(line: usize, name: &str, expected: usize) -> Value {
    let noun = if expected == 1 { "argument" } else { "arguments" };
    Value::Error(RuntimeError::new(
        line,
        ErrorKind::ArityMismatch,
        format!("Expected {expected} {noun} when calling {name}!"),
    ))
}

fn type_error(line: usize, message: String) -> Value {
    Value::Error(RuntimeError::new(line, ErrorKind::TypeMismatch, message))
}

fn unary_number_builtin(line: usize, name: &str, args: &[Value], f: fn(f64) -> f64) -> Value {
    if args.len() != 1 {
        return arity_error(line, name, 1);
    }
    match args[0].as_number() {
        Some(n) => Value::Number(f(n)),
        None => type_error(line, format!("Expected a number value when calling {name}!")),
    }
}

/// Read one line from standard input
fn builtin_input(line: usize, args: &[Value]) -> Value {
    if !args.is_empty() {
        return arity_error(line, "input", 0);
    }
    let mut buf = String::new();
    match std::io::stdin().read_line(&mut buf) {
        Ok(_) => {
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            Value::Str(buf)
        }
        Err(_) => Value::Error(RuntimeError::new(
            line,
            ErrorKind::Io,
            "Could not read from input!",
        )),
    }
}

/// Square-root-weighted random number between min and max
fn builtin_random(line: usize, args: &[Value]) -> Value {
    if args.len() != 2 {
        return arity_error(line, "random", 2);
    }
    let (Some(min), Some(max)) = (args[0].as_number(), args[1].as_number()) else {
        return type_error(line, "Expected 2 number values for min and max!".to_string());
    };
    let f = rand::random::<f64>().sqrt();
    Value::Number(min + f * (max - min))
}

fn builtin_sin(line: usize, args: &[Value]) -> Value {
    unary_number_builtin(line, "sin", args, f64::sin)
}

fn builtin_cos(line: usize, args: &[Value]) -> Value {
    unary_number_builtin(line, "cos", args, f64::cos)
}

fn builtin_tan(line: usize, args: &[Value]) -> Value {
    unary_number_builtin(line, "tan", args, f64::tan)
}

fn builtin_sqrt(line: usize, args: &[Value]) -> Value {
    unary_number_builtin(line, "sqrt", args, f64::sqrt)
}

fn builtin_floor(line: usize, args: &[Value]) -> Value {
    unary_number_builtin(line, "floor", args, f64::floor)
}

/// Element, entry or character count
fn builtin_len(line: usize, args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error(line, "len", 1);
    }
    match &args[0] {
        Value::Str(s) => Value::Number(s.chars().count() as f64),
        Value::List(items) => Value::Number(items.len() as f64),
        Value::Map(map) => Value::Number(map.len() as f64),
        _ => type_error(
            line,
            "Expected a string, list or map when calling len!".to_string(),
        ),
    }
}

/// The only list-growth path: returns a new list with the value appended
fn builtin_append(line: usize, args: &[Value]) -> Value {
    if args.len() != 2 {
        return arity_error(line, "append", 2);
    }
    match &args[0] {
        Value::List(items) => {
            let mut out = items.clone();
            out.push(args[1].clone());
            Value::List(out)
        }
        _ => type_error(
            line,
            "Expected a list as the first argument to append!".to_string(),
        ),
    }
}

/// Whole file contents as a string
fn builtin_read_file(line: usize, args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error(line, "read_file", 1);
    }
    let Value::Str(path) = &args[0] else {
        return type_error(line, "Expected a string path when calling read_file!".to_string());
    };
    let mut contents = String::new();
    match std::fs::File::open(path).and_then(|mut f| f.read_to_string(&mut contents)) {
        Ok(_) => Value::Str(contents),
        Err(_) => Value::Error(RuntimeError::new(line, ErrorKind::Io, "Could not read file!")),
    }
}
