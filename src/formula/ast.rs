use super::{EResult, Value};
use crate::common::*;
use crate::context::Context;

#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn evaluate(&self, ctx: &Context) -> EResult<Value>;
}

/// A parsed formula. Function names are already bound to the whitelist;
/// plain symbols are resolved against a [Context] when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) root: Node,
}

impl Expression {
    pub(crate) fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Every identifier the formula mentions, in source order and without
    /// duplicates. Branches that would be skipped at runtime are included.
    pub fn symbols(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            let name = match node {
                Node::Symbol(s) => Some(s.name.as_str()),
                Node::Call(c) => Some(c.name.as_str()),
                _ => None,
            };
            if let Some(name) = name {
                if !out.contains(&name) {
                    out.push(name);
                }
            }
            stack.extend(node.children().into_iter().rev());
        }
        out
    }
}

#[enum_dispatch::enum_dispatch(Evaluate)]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    Symbol(Symbol),
    Unary(Unary),
    Binary(Binary),
    Compare(Compare),
    Logical(Logical),
    Conditional(Conditional),
    Call(Call),
}

impl Node {
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Self::Literal(_) | Self::Symbol(_) => vec![],
            Self::Unary(x) => vec![&*x.value],
            Self::Binary(x) => vec![&*x.left, &*x.right],
            Self::Compare(x) => std::iter::once(&*x.first)
                .chain(x.rest.iter().map(|(_, n)| n))
                .collect(),
            Self::Logical(x) => vec![&*x.left, &*x.right],
            Self::Conditional(x) => vec![&*x.body, &*x.test, &*x.orelse],
            Self::Call(x) => x.args.iter().collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Literal {
    Int(Int),
    Bool(bool),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Symbol {
    pub name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOperator,
    pub value: Box<Node>,
}

impl Unary {
    pub fn new(op: UnaryOperator, value: Node) -> Self {
        Self {
            op,
            value: Box::new(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Binary {
    pub fn new(left: Node, op: BinaryOperator, right: Node) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A comparison chain: `a < b <= c` holds when every adjacent pair does.
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub first: Box<Node>,
    pub rest: Vec<(CompareOperator, Node)>,
}

impl Compare {
    pub fn new(first: Node, rest: Vec<(CompareOperator, Node)>) -> Self {
        Self {
            first: Box::new(first),
            rest,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub op: LogicalOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Logical {
    pub fn new(left: Node, op: LogicalOperator, right: Node) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// `body if test else orelse`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub body: Box<Node>,
    pub test: Box<Node>,
    pub orelse: Box<Node>,
}

impl Conditional {
    pub fn new(body: Node, test: Node, orelse: Node) -> Self {
        Self {
            body: Box::new(body),
            test: Box::new(test),
            orelse: Box::new(orelse),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    /// `None` when `name` is not on the whitelist.
    pub function: Option<Function>,
    pub args: Vec<Node>,
}

impl Call {
    pub fn new(name: impl Into<String>, args: Vec<Node>) -> Self {
        let name = name.into();
        let function = Function::from_name(&name);
        Self {
            name,
            function,
            args,
        }
    }
}
