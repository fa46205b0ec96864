//! The recursive node dispatcher
//!
//! `eval` walks the AST depth-first and returns `Ok(Some(value))` for an
//! expression, `Ok(None)` for a pure statement, or `Err` for a runtime
//! failure. Every sub-evaluation is checked with `?` so the first error
//! unwinds to the program boundary before any further side effects run.

use super::builtins::{default_builtins, BuiltinFn};
use super::env::Environment;
use super::error::RuntimeError;
use super::value::{MapValue, Value};
use crate::ast::{BinOp, Node, NodeKind, UnOp};
use std::collections::HashMap;
use std::io::{self, Write};

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 64 * 1024; // 64KB remaining triggers growth
const STACK_GROW_SIZE: usize = 1024 * 1024; // Grow by 1MB each time

/// Result of evaluating one node: a value, nothing, or a runtime error
pub type EvalResult = Result<Option<Value>, RuntimeError>;

/// Per-statement hook, invoked after each successful top-level or
/// block-level statement. The step debugger hangs off this.
pub trait StepHook {
    fn after_statement(&mut self, line: usize, env: &Environment);
}

/// The interpreter
pub struct Interpreter {
    /// Global environment, shared by subs and the top level
    env: Environment,
    /// Subroutine bodies, registered in execution order
    subs: HashMap<String, Node>,
    /// Builtin functions, populated once at construction
    builtins: HashMap<String, BuiltinFn>,
    /// Print sink
    out: Box<dyn Write>,
    /// Optional per-statement hook
    hook: Option<Box<dyn StepHook>>,
}

impl Interpreter {
    /// Create an interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Create an interpreter printing to the given sink
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Interpreter {
            env: Environment::new(),
            subs: HashMap::new(),
            builtins: default_builtins(),
            out,
            hook: None,
        }
    }

    pub fn set_hook(&mut self, hook: Box<dyn StepHook>) {
        self.hook = Some(hook);
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run a parsed program to completion or to its first runtime error
    pub fn run(&mut self, program: &Node) -> Result<(), RuntimeError> {
        self.eval(program).map(|_| ())
    }

    /// Evaluate a node with automatic stack growth for deep recursion
    fn eval(&mut self, node: &Node) -> EvalResult {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(node))
    }

    fn eval_inner(&mut self, node: &Node) -> EvalResult {
        match &node.kind {
            NodeKind::Program(stmts) | NodeKind::Block(stmts) => self.eval_stmts(stmts),

            NodeKind::Number(n) => Ok(Some(Value::Number(*n))),
            NodeKind::Boolean(b) => Ok(Some(Value::Bool(*b))),
            NodeKind::Str(s) => Ok(Some(Value::Str(s.clone()))),

            NodeKind::Identifier(name) => match self.env.get(name) {
                Some(v) => Ok(Some(v)),
                None => Err(RuntimeError::unrecognised_variable(node.line)),
            },

            NodeKind::Print(expr) => {
                let v = match self.eval(expr)? {
                    Some(v) => v,
                    None => return Err(RuntimeError::no_value(node.line)),
                };
                let _ = writeln!(self.out, "{}", v.stringify());
                Ok(None)
            }

            NodeKind::BinaryOp { op, left, right } => {
                let lval = self.eval_value(left)?;
                let rval = self.eval_value(right)?;
                eval_binary(*op, lval, rval, node.line).map(Some)
            }

            NodeKind::UnaryOp { op, right } => {
                let val = self.eval_value(right)?;
                let Some(n) = val.as_number() else {
                    return Err(RuntimeError::unary_number(node.line));
                };
                match op {
                    UnOp::Neg => Ok(Some(Value::Number(-n))),
                }
            }

            NodeKind::VarAssign { name, value } => {
                let v = self.eval_value(value)?;
                self.env.define(name.clone(), v);
                Ok(None)
            }

            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let c = self.eval(cond)?;
                if truthy(&c) {
                    self.eval(then_branch)?;
                } else if let Some(else_b) = else_branch {
                    self.eval(else_b)?;
                }
                Ok(None)
            }

            NodeKind::While { cond, body } => {
                loop {
                    let c = self.eval(cond)?;
                    if !truthy(&c) {
                        break;
                    }
                    self.eval(body)?;
                }
                Ok(None)
            }

            NodeKind::For {
                var,
                start,
                max,
                step,
                body,
            } => {
                let start_val = self.eval_value(start)?;
                let Some(mut i) = start_val.as_number() else {
                    return Err(RuntimeError::for_initialiser(node.line));
                };
                // Bind before evaluating the maximum so it may refer to
                // the loop variable
                self.env.define(var.clone(), Value::Number(i));
                let max_val = self.eval_value(max)?;
                let Some(max_n) = max_val.as_number() else {
                    return Err(RuntimeError::for_maximum(node.line));
                };
                let step_n = match step {
                    Some(step_expr) => {
                        let v = self.eval_value(step_expr)?;
                        match v.as_number() {
                            Some(n) => n,
                            None => return Err(RuntimeError::for_step(node.line)),
                        }
                    }
                    None => 1.0,
                };
                while i < max_n {
                    self.eval(body)?;
                    i += step_n;
                    // The counter is authoritative: body writes to the
                    // variable are clobbered here
                    self.env.define(var.clone(), Value::Number(i));
                }
                Ok(None)
            }

            NodeKind::Sub { name, body } => {
                // Last registration wins, no duplicate-definition error
                self.subs.insert(name.clone(), (**body).clone());
                Ok(None)
            }

            NodeKind::Call(name) => {
                let body = self
                    .subs
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::unknown_sub(node.line))?;
                self.eval(&body)
            }

            NodeKind::ExprList(elems) => {
                let mut items = Vec::with_capacity(elems.len());
                for elem in elems {
                    match self.eval(elem)? {
                        Some(v) => items.push(v),
                        None => return Err(RuntimeError::no_value(elem.line)),
                    }
                }
                Ok(Some(Value::List(items)))
            }

            NodeKind::MapLiteral(pairs) => {
                let mut map = MapValue::new();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_value(key_expr)?;
                    let value = self.eval_value(value_expr)?;
                    map.insert(key, value);
                }
                Ok(Some(Value::Map(map)))
            }

            NodeKind::Index { name, index } => {
                let base = self
                    .env
                    .get(name)
                    .ok_or_else(|| RuntimeError::unrecognised_variable(node.line))?;
                let idx = self.eval_value(index)?;
                match base {
                    Value::List(items) => {
                        let Some(n) = idx.as_number() else {
                            return Err(RuntimeError::index_not_number(node.line));
                        };
                        let i = n as usize;
                        if n < 0.0 || i >= items.len() {
                            return Err(RuntimeError::index_read_bounds(node.line));
                        }
                        Ok(Some(items[i].clone()))
                    }
                    Value::Map(map) => match map.get(&idx) {
                        Some(v) => Ok(Some(v.clone())),
                        None => Err(RuntimeError::missing_key(node.line)),
                    },
                    _ => Err(RuntimeError::not_indexable(node.line)),
                }
            }

            NodeKind::IndexAssign { name, index, value } => {
                if !self.env.contains(name) {
                    return Err(RuntimeError::unrecognised_variable(node.line));
                }
                let idx = self.eval_value(index)?;
                let val = self.eval_value(value)?;
                match self.env.get_mut(name) {
                    Some(Value::List(items)) => {
                        let Some(n) = idx.as_number() else {
                            return Err(RuntimeError::index_not_number(node.line));
                        };
                        let i = n as usize;
                        if n < 0.0 || i >= items.len() {
                            return Err(RuntimeError::index_assign_bounds(node.line));
                        }
                        items[i] = val;
                        Ok(None)
                    }
                    Some(Value::Map(map)) => {
                        map.insert(idx, val);
                        Ok(None)
                    }
                    Some(_) => Err(RuntimeError::not_indexable(node.line)),
                    None => Err(RuntimeError::unrecognised_variable(node.line)),
                }
            }

            NodeKind::Builtin { name, args } => {
                // Arguments are evaluated before the name is resolved
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match self.eval(arg)? {
                        Some(v) => values.push(v),
                        None => return Err(RuntimeError::statement_argument(node.line)),
                    }
                }
                let f = *self
                    .builtins
                    .get(name)
                    .ok_or_else(|| RuntimeError::unknown_builtin(node.line))?;
                match f(node.line, &values) {
                    Value::Error(err) => Err(err),
                    v => Ok(Some(v)),
                }
            }

            NodeKind::Expr(inner) => {
                self.eval(inner)?;
                Ok(None)
            }
        }
    }

    /// Statements in order, stopping at the first error; the step hook
    /// fires after each successful statement
    fn eval_stmts(&mut self, stmts: &[Node]) -> EvalResult {
        for stmt in stmts {
            self.eval(stmt)?;
            if let Some(hook) = self.hook.as_deref_mut() {
                hook.after_statement(stmt.line, &self.env);
            }
        }
        Ok(None)
    }

    /// Evaluate a node that must produce a value
    fn eval_value(&mut self, node: &Node) -> Result<Value, RuntimeError> {
        match self.eval(node)? {
            Some(v) => Ok(v),
            None => Err(RuntimeError::no_value(node.line)),
        }
    }
}

/// Missing values are falsy; everything else defers to the value
fn truthy(result: &Option<Value>) -> bool {
    result.as_ref().map(Value::is_truthy).unwrap_or(false)
}

/// Binary dispatch keyed on the left operand's runtime type
fn eval_binary(op: BinOp, left: Value, right: Value, line: usize) -> Result<Value, RuntimeError> {
    match &left {
        Value::Str(l) => match op {
            BinOp::Add => match &right {
                Value::Str(r) => Ok(Value::Str(format!("{l}{r}"))),
                _ => Err(RuntimeError::string_right_operand(line)),
            },
            BinOp::Eq => Ok(Value::Bool(left.is_equal(&right))),
            BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            _ => Err(RuntimeError::unsupported_string_op(line)),
        },
        Value::Number(l) => {
            let l = *l;
            match op {
                BinOp::Add => Ok(Value::Number(l + number_rhs(&right, line)?)),
                BinOp::Sub => Ok(Value::Number(l - number_rhs(&right, line)?)),
                BinOp::Mul => Ok(Value::Number(l * number_rhs(&right, line)?)),
                BinOp::Div => Ok(Value::Number(l / number_rhs(&right, line)?)),
                BinOp::Lt => Ok(Value::Bool(l < number_rhs(&right, line)?)),
                BinOp::Gt => Ok(Value::Bool(l > number_rhs(&right, line)?)),
                BinOp::LtEq => Ok(Value::Bool(l <= number_rhs(&right, line)?)),
                BinOp::GtEq => Ok(Value::Bool(l >= number_rhs(&right, line)?)),
                BinOp::Eq => Ok(Value::Bool(left.is_equal(&right))),
                BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
                BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            }
        }
        _ => match op {
            BinOp::Eq => Ok(Value::Bool(left.is_equal(&right))),
            BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            _ => Err(RuntimeError::unrecognised_binary_op(line)),
        },
    }
}

fn number_rhs(right: &Value, line: usize) -> Result<f64, RuntimeError> {
    right
        .as_number()
        .ok_or_else(|| RuntimeError::number_right_operand(line))
}
