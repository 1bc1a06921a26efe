//! Propositional formula syntax trees.
//!
//! An [`Expr`] is the parsed form of a formula written in the canonical
//! connective-call syntax, e.g. `and(a,not(or(b,c)))`. Its [`Display`]
//! implementation produces exactly that canonical text back, and
//! [`Expr::pretty`] renders the familiar symbolic notation (`¬`, `∧`, `∨`,
//! `→`, `↔`).

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Literal(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    If(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

/// Top-level syntactic connective of an expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Literal,
    Not,
    And,
    Or,
    If,
    Iff,
}

impl Kind {
    /// Lowercase connective name as used in canonical text.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Literal => "literal",
            Kind::Not => "not",
            Kind::And => "and",
            Kind::Or => "or",
            Kind::If => "if",
            Kind::Iff => "iff",
        }
    }
}

impl Expr {
    pub fn literal(name: impl Into<String>) -> Self {
        Expr::Literal(name.into())
    }

    pub fn not(value: Self) -> Self {
        Expr::Not(Box::new(value))
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Self, rhs: Self) -> Self {
        Expr::If(Box::new(lhs), Box::new(rhs))
    }

    pub fn iff(lhs: Self, rhs: Self) -> Self {
        Expr::Iff(Box::new(lhs), Box::new(rhs))
    }
}

impl Expr {
    pub fn kind(&self) -> Kind {
        match self {
            Expr::Literal(_) => Kind::Literal,
            Expr::Not(_) => Kind::Not,
            Expr::And(_, _) => Kind::And,
            Expr::Or(_, _) => Kind::Or,
            Expr::If(_, _) => Kind::If,
            Expr::Iff(_, _) => Kind::Iff,
        }
    }

    /// Both operands of a binary connective.
    pub fn operands(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Expr::And(a, b) | Expr::Or(a, b) | Expr::If(a, b) | Expr::Iff(a, b) => Some((a.as_ref(), b.as_ref())),
            Expr::Literal(_) | Expr::Not(_) => None,
        }
    }

    /// Depth of the expression tree (0 for literals).
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal(_) => 0,
            Expr::Not(e) => 1 + e.depth(),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::If(l, r) | Expr::Iff(l, r) => 1 + l.depth().max(r.depth()),
        }
    }

    /// Number of nodes in the expression tree.
    pub fn size(&self) -> usize {
        match self {
            Expr::Literal(_) => 1,
            Expr::Not(e) => 1 + e.size(),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::If(l, r) | Expr::Iff(l, r) => 1 + l.size() + r.size(),
        }
    }

    /// Render with logical symbols instead of connective calls.
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty(self)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(name) => write!(f, "{}", name),
            Expr::Not(e) => write!(f, "not({})", e),
            Expr::And(l, r) => write!(f, "and({},{})", l, r),
            Expr::Or(l, r) => write!(f, "or({},{})", l, r),
            Expr::If(l, r) => write!(f, "if({},{})", l, r),
            Expr::Iff(l, r) => write!(f, "iff({},{})", l, r),
        }
    }
}

/// Symbolic rendering of an [`Expr`], see [`Expr::pretty`].
pub struct Pretty<'a>(&'a Expr);

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (l, r, symbol) = match self.0 {
            Expr::Literal(name) => return write!(f, "{}", name),
            Expr::Not(e) => return write!(f, "¬{}", e.pretty()),
            Expr::And(l, r) => (l, r, "∧"),
            Expr::Or(l, r) => (l, r, "∨"),
            Expr::If(l, r) => (l, r, "→"),
            Expr::Iff(l, r) => (l, r, "↔"),
        };
        write!(f, "({} {} {})", l.pretty(), symbol, r.pretty())
    }
}
