//! AST node definitions
//!
//! The parser produces a single `Node` of kind `Program`; every node
//! carries the 1-based source line of its first token for runtime error
//! reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::Eq => "==",
            BinOp::And => "And",
            BinOp::Or => "Or",
        };
        write!(f, "{s}")
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
}

/// A single AST node with its source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub line: usize,
}

impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// The closed set of node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Program root: top-level statements
    Program(Vec<Node>),
    /// Number literal
    Number(f64),
    /// Boolean literal
    Boolean(bool),
    /// String literal
    Str(String),
    /// Variable reference
    Identifier(String),
    /// Print statement
    Print(Box<Node>),
    /// Binary operation
    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Unary operation
    UnaryOp { op: UnOp, right: Box<Node> },
    /// Variable assignment
    VarAssign { name: String, value: Box<Node> },
    /// Statement block (If/While/For/Sub body)
    Block(Vec<Node>),
    /// If statement with optional else branch
    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    /// While loop
    While { cond: Box<Node>, body: Box<Node> },
    /// For loop with optional step
    For {
        var: String,
        start: Box<Node>,
        max: Box<Node>,
        step: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// Subroutine declaration
    Sub { name: String, body: Box<Node> },
    /// Subroutine call
    Call(String),
    /// List literal
    ExprList(Vec<Node>),
    /// Map literal: key/value expression pairs in source order
    MapLiteral(Vec<(Node, Node)>),
    /// Indexed read from a list or map variable
    Index { name: String, index: Box<Node> },
    /// Indexed write to a list or map variable
    IndexAssign {
        name: String,
        index: Box<Node>,
        value: Box<Node>,
    },
    /// Builtin function call
    Builtin { name: String, args: Vec<Node> },
    /// Bare expression statement: evaluated, result discarded
    Expr(Box<Node>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_new() {
        let node = Node::new(NodeKind::Number(42.0), 3);
        assert_eq!(node.line, 3);
        assert!(matches!(node.kind, NodeKind::Number(n) if n == 42.0));
    }

    #[test]
    fn test_binop_display() {
        assert_eq!(format!("{}", BinOp::Add), "+");
        assert_eq!(format!("{}", BinOp::LtEq), "<=");
        assert_eq!(format!("{}", BinOp::Eq), "==");
        assert_eq!(format!("{}", BinOp::And), "And");
    }

    #[test]
    fn test_node_serialize_roundtrip() {
        let node = Node::new(
            NodeKind::BinaryOp {
                op: BinOp::Add,
                left: Box::new(Node::new(NodeKind::Number(1.0), 1)),
                right: Box::new(Node::new(NodeKind::Identifier("x".to_string()), 1)),
            },
            1,
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_program_holds_statements() {
        let prog = Node::new(
            NodeKind::Program(vec![
                Node::new(NodeKind::Print(Box::new(Node::new(NodeKind::Number(1.0), 1))), 1),
                Node::new(NodeKind::Call("greet".to_string()), 2),
            ]),
            1,
        );
        match prog.kind {
            NodeKind::Program(stmts) => assert_eq!(stmts.len(), 2),
            _ => panic!("expected Program"),
        }
    }
}
