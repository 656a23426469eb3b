//! Arena-allocated abstract syntax tree.
//!
//! Every node of one compilation lives in a single [`AstArena`] and is
//! referred to by a [`NodeId`]. Children are always allocated before
//! their parent, so the tree cannot contain cycles, and the whole tree
//! is released at once when the arena is dropped.

use core::fmt;
use core::ops::Index;

use la_arena::{Arena, Idx};

use crate::span::Span;
use crate::types::Type;

pub type NodeId = Idx<Node>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    /// Operators that have a vector/scalar form in the runtime.
    pub fn allows_scalar_mix(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        statements: Vec<NodeId>,
    },
    VarDecl {
        name: String,
        declared: Type,
        init: NodeId,
    },
    Binary {
        op: BinOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Int(i32),
    Float(f32),
    Vector(Vec<f32>),
    Ident(String),
    Print {
        expr: NodeId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    /// Type fixed at parse time. Only literals have one.
    pub fn literal_type(&self) -> Option<Type> {
        match self.kind {
            NodeKind::Int(_) => Some(Type::Int),
            NodeKind::Float(_) => Some(Type::Float),
            NodeKind::Vector(_) => Some(Type::Vec),
            _ => None,
        }
    }
}

/// Owner of every node produced while parsing one program.
#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Arena<Node>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena {
            nodes: Arena::new(),
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.nodes.alloc(Node { kind, span })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Statements of a `Program` node; empty for any other node.
    pub fn statements(&self, program: NodeId) -> &[NodeId] {
        match &self[program].kind {
            NodeKind::Program { statements } => statements,
            _ => &[],
        }
    }

    /// Render a node as a parenthesised prefix expression.
    ///
    /// `1 - 2 - 3` renders as `(- (- 1 2) 3)`.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        use core::fmt::Write;

        match &self[id].kind {
            NodeKind::Program { statements } => {
                for (index, stmt) in statements.iter().enumerate() {
                    if index > 0 {
                        out.push('\n');
                    }
                    self.render_into(*stmt, out);
                }
            }
            NodeKind::VarDecl {
                name,
                declared,
                init,
            } => {
                let _ = write!(out, "(let {name} {declared} ");
                self.render_into(*init, out);
                out.push(')');
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let _ = write!(out, "({op} ");
                self.render_into(*lhs, out);
                out.push(' ');
                self.render_into(*rhs, out);
                out.push(')');
            }
            NodeKind::Int(value) => {
                let _ = write!(out, "{value}");
            }
            NodeKind::Float(value) => {
                let _ = write!(out, "{value:?}");
            }
            NodeKind::Vector(values) => {
                out.push('[');
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{value:?}");
                }
                out.push(']');
            }
            NodeKind::Ident(name) => out.push_str(name),
            NodeKind::Print { expr } => {
                out.push_str("(print ");
                self.render_into(*expr, out);
                out.push(')');
            }
        }
    }
}

impl Index<NodeId> for AstArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}
