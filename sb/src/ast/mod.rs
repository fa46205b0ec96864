//! Abstract syntax tree

mod node;
mod span;

pub use node::{BinOp, Node, NodeKind, UnOp};
pub use span::{LineMap, Span};
