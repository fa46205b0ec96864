//! SB Interpreter Library
//!
//! Tree-walking interpreter for the SB scripting language.

pub mod ast;
pub mod debug;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;

pub use ast::{Node, NodeKind, Span};
pub use error::{CompileError, Result};
