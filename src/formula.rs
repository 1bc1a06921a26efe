//! Formula decomposition and structural equivalence.
//!
//! # Decomposition
//!
//! Every formula decomposes one level at a time into a main connective and up
//! to two sub-formulas, following the tableau rules:
//!
//! | formula        | connective | left              | right             |
//! |----------------|------------|-------------------|-------------------|
//! | `a`, `¬a`      | none       | itself            |                   |
//! | `¬¬a`          | none       | `a`               |                   |
//! | `¬(a ∧ b)`     | or         | `¬a`              | `¬b`              |
//! | `¬(a ∨ b)`     | and        | `¬a`              | `¬b`              |
//! | `¬(a → b)`     | and        | `a`               | `¬b`              |
//! | `¬(a ↔ b)`     | iff        | `¬a ∧ b`          | `a ∧ ¬b`          |
//! | `a ∧ b`        | and        | `a`               | `b`               |
//! | `a ∨ b`        | or         | `a`               | `b`               |
//! | `a → b`        | or         | `¬a`              | `b`               |
//! | `a ↔ b`        | iff        | `a ∧ b`           | `¬a ∧ ¬b`         |
//!
//! # Equivalence
//!
//! [`Expr::equivalent`] is not string equality. Two formulas are equivalent when
//! their decompositions agree up to the order of operands, with `↔` read as a
//! disjunction when compared against a disjunction and as a conjunction of two
//! conditionals when compared against a conjunction. Chains of the same
//! connective (`a ∧ (b ∧ c)` against `(c ∧ a) ∧ b`) are compared by mutual
//! containment of their flattened decompositions, see [`Expr::in_decomposition`].

use log::trace;

use crate::ast::{Expr, Kind};

/// Main connective of a one-level decomposition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Connective {
    And,
    Or,
    Iff,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decomposition {
    /// `None` when the formula is a literal (possibly negated).
    pub connective: Option<Connective>,
    pub left: Expr,
    pub right: Option<Expr>,
}

impl Decomposition {
    fn literal(expr: Expr) -> Self {
        Self {
            connective: None,
            left: expr,
            right: None,
        }
    }

    fn binary(connective: Connective, left: Expr, right: Expr) -> Self {
        Self {
            connective: Some(connective),
            left,
            right: Some(right),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.connective.is_none()
    }

    /// Whether decomposing requires splitting the branch.
    pub fn branches(&self) -> bool {
        matches!(self.connective, Some(Connective::Or | Connective::Iff))
    }
}

fn not(e: &Expr) -> Expr {
    Expr::not(e.clone())
}

fn and(a: Expr, b: Expr) -> Expr {
    Expr::and(a, b)
}

impl Expr {
    pub fn decompose(&self) -> Decomposition {
        match self {
            Expr::Literal(_) => Decomposition::literal(self.clone()),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Literal(_) => Decomposition::literal(self.clone()),
                Expr::Not(a) => Decomposition::literal(a.as_ref().clone()),
                Expr::And(a, b) => Decomposition::binary(Connective::Or, not(a), not(b)),
                Expr::Or(a, b) => Decomposition::binary(Connective::And, not(a), not(b)),
                Expr::If(a, b) => Decomposition::binary(Connective::And, a.as_ref().clone(), not(b)),
                Expr::Iff(a, b) => Decomposition::binary(
                    Connective::Iff,
                    and(not(a), b.as_ref().clone()),
                    and(a.as_ref().clone(), not(b)),
                ),
            },
            Expr::And(a, b) => Decomposition::binary(Connective::And, a.as_ref().clone(), b.as_ref().clone()),
            Expr::Or(a, b) => Decomposition::binary(Connective::Or, a.as_ref().clone(), b.as_ref().clone()),
            Expr::If(a, b) => Decomposition::binary(Connective::Or, not(a), b.as_ref().clone()),
            Expr::Iff(a, b) => Decomposition::binary(
                Connective::Iff,
                and(a.as_ref().clone(), b.as_ref().clone()),
                and(not(a), not(b)),
            ),
        }
    }

    /// The conditional-based pair for a biconditional.
    ///
    /// `iff(a,b)` yields `(or(not(a),b), or(a,not(b)))`, and its negation
    /// `not(iff(a,b))` yields `(or(a,b), or(not(a),not(b)))`. Any other formula
    /// yields `None`.
    pub fn decompose_iff_into_if(&self) -> Option<(Expr, Expr)> {
        match self {
            Expr::Iff(a, b) => Some((
                Expr::or(not(a), b.as_ref().clone()),
                Expr::or(a.as_ref().clone(), not(b)),
            )),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Iff(a, b) => Some((
                    Expr::or(a.as_ref().clone(), b.as_ref().clone()),
                    Expr::or(not(a), not(b)),
                )),
                _ => None,
            },
            _ => None,
        }
    }

    /// Decomposition of a biconditional read as a conjunction of conditionals.
    fn iff_as_conjunction(&self) -> Option<Decomposition> {
        self.decompose_iff_into_if()
            .map(|(l, r)| Decomposition::binary(Connective::And, l, r))
    }

    /// Structural logical equivalence.
    pub fn equivalent(&self, other: &Expr) -> bool {
        if self == other {
            return true;
        }

        let mut lhs = self.decompose();
        let mut rhs = other.decompose();

        match (lhs.connective, rhs.connective) {
            (Some(Connective::Iff), Some(Connective::Or)) => lhs.connective = Some(Connective::Or),
            (Some(Connective::Or), Some(Connective::Iff)) => rhs.connective = Some(Connective::Or),
            (Some(Connective::Iff), Some(Connective::And)) => {
                if let Some(d) = self.iff_as_conjunction() {
                    lhs = d;
                }
            }
            (Some(Connective::And), Some(Connective::Iff)) => {
                if let Some(d) = other.iff_as_conjunction() {
                    rhs = d;
                }
            }
            _ => {}
        }

        if lhs.connective != rhs.connective {
            return false;
        }

        let (l1, l2) = (&lhs.left, &rhs.left);
        let (r1, r2) = match (&lhs.right, &rhs.right) {
            (Some(r1), Some(r2)) => (r1, r2),
            // Both literals.
            _ => return l1 == l2,
        };

        if (l1.equivalent(l2) && r1.equivalent(r2)) || (l1.equivalent(r2) && r1.equivalent(l2)) {
            return true;
        }

        match (self.kind(), other.kind()) {
            (Kind::And, Kind::And) | (Kind::Or, Kind::Or) => {
                trace!("equivalent: comparing chains {} and {}", self, other);
                other.in_decomposition_strict(self) && self.in_decomposition_strict(other)
            }
            _ => false,
        }
    }

    /// Whether `other` is `self` or reachable by repeatedly decomposing `self`
    /// through its own connective.
    pub fn in_decomposition(&self, other: &Expr) -> bool {
        other.equivalent(self) || self.in_decomposition_strict(other)
    }

    fn in_decomposition_strict(&self, other: &Expr) -> bool {
        let d = self.decompose();
        let kind = self.kind();

        if other.equivalent(&d.left) {
            return true;
        }
        let Some(right) = &d.right else {
            return false;
        };
        if other.equivalent(right) {
            return true;
        }

        // Descend into sub-formulas built from the same connective.
        if d.left.kind() == kind && d.left.in_decomposition(other) {
            return true;
        }
        if right.kind() == kind && right.in_decomposition(other) {
            return true;
        }

        // Every part of a same-shaped `other` must be reachable.
        if other.kind() == kind {
            let od = other.decompose();
            return match &od.right {
                Some(or) => self.in_decomposition(&od.left) && self.in_decomposition(or),
                None => false,
            };
        }

        if kind == Kind::Iff {
            if let Some((a1, a2)) = self.decompose_iff_into_if() {
                return a1.in_decomposition(other) || a2.in_decomposition(other);
            }
        }
        if other.kind() == Kind::Iff {
            let od = other.decompose();
            if let Some(or) = &od.right {
                return self.in_decomposition(&od.left) && self.in_decomposition(or);
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::parser::parse;

    fn e(text: &str) -> Expr {
        parse(text).unwrap()
    }

    fn decomposed(text: &str) -> (Option<Connective>, String, Option<String>) {
        let d = e(text).decompose();
        (d.connective, d.left.to_string(), d.right.map(|r| r.to_string()))
    }

    fn eq(a: &str, b: &str) -> bool {
        e(a).equivalent(&e(b))
    }

    fn contains(a: &str, b: &str) -> bool {
        e(a).in_decomposition(&e(b))
    }

    // ─── Decomposition ───

    #[test]
    fn test_decompose_literals() {
        assert_eq!(decomposed("a"), (None, "a".into(), None));
        assert_eq!(decomposed("A"), (None, "A".into(), None));
        assert_eq!(decomposed("not(a)"), (None, "not(a)".into(), None));
        assert_eq!(decomposed("not(not(a))"), (None, "a".into(), None));
    }

    #[test]
    fn test_decompose_binary() {
        use Connective::*;
        assert_eq!(
            decomposed("and(or(a,c),if(b,c))"),
            (Some(And), "or(a,c)".into(), Some("if(b,c)".into()))
        );
        assert_eq!(decomposed("or(a,b)"), (Some(Or), "a".into(), Some("b".into())));
        assert_eq!(decomposed("if(a,b)"), (Some(Or), "not(a)".into(), Some("b".into())));
        assert_eq!(
            decomposed("iff(a,b)"),
            (Some(Iff), "and(a,b)".into(), Some("and(not(a),not(b))".into()))
        );
    }

    #[test]
    fn test_decompose_negations() {
        use Connective::*;
        assert_eq!(decomposed("not(and(a,b))"), (Some(Or), "not(a)".into(), Some("not(b)".into())));
        assert_eq!(decomposed("not(or(a,b))"), (Some(And), "not(a)".into(), Some("not(b)".into())));
        assert_eq!(decomposed("not(if(a,b))"), (Some(And), "a".into(), Some("not(b)".into())));
        assert_eq!(
            decomposed("not(iff(a,b))"),
            (Some(Iff), "and(not(a),b)".into(), Some("and(a,not(b))".into()))
        );
    }

    #[test]
    fn test_decompose_iff_into_if() {
        let (l, r) = e("iff(a,b)").decompose_iff_into_if().unwrap();
        assert_eq!(l.to_string(), "or(not(a),b)");
        assert_eq!(r.to_string(), "or(a,not(b))");
        assert!(e("and(a,b)").decompose_iff_into_if().is_none());
    }

    #[test]
    fn test_branches() {
        assert!(e("or(a,b)").decompose().branches());
        assert!(e("if(a,b)").decompose().branches());
        assert!(e("iff(a,b)").decompose().branches());
        assert!(e("not(and(a,b))").decompose().branches());
        assert!(!e("and(a,b)").decompose().branches());
        assert!(!e("not(or(a,b))").decompose().branches());
        assert!(!e("a").decompose().branches());
    }

    // ─── Equivalence ───

    #[test]
    fn test_eq_reflexive_and_case() {
        assert!(eq("and(a,b)", "and(a,b)"));
        assert!(eq("a", "a"));
        assert!(!eq("a", "A"));
        assert!(!eq("a", "b"));
    }

    #[test]
    fn test_eq_commutative() {
        assert!(eq("and(a,b)", "and(b,a)"));
        assert!(eq("or(a,b)", "or(b,a)"));
        assert!(eq("and(a,and(b,c))", "and(and(c,b),a)"));
    }

    #[test]
    fn test_eq_associative() {
        assert!(eq("and(a,and(b,c))", "and(and(a,b),c)"));
        assert!(eq("and(and(a,b),c)", "and(a,and(b,c))"));
        assert!(eq("and(a,and(b,c))", "and(and(c,a),b)"));
        assert!(eq("and(and(a,b),c)", "and(and(c,a),b)"));
        assert!(eq("or(a,or(b,c))", "or(or(a,b),c)"));
        assert!(!eq("and(a,and(b,c))", "and(and(a,b),d)"));
    }

    #[test]
    fn test_eq_duplicates() {
        assert!(eq("and(and(a,b),and(b,a))", "and(a,b)"));
    }

    #[test]
    fn test_eq_negations() {
        assert!(eq("not(not(a))", "a"));
        assert!(eq("not(and(a,b))", "or(not(a),not(b))"));
        assert!(eq("not(or(a,b))", "and(not(a),not(b))"));
        assert!(eq("not(if(a,b))", "and(a,not(b))"));
        assert!(eq("not(if(a,b))", "and(not(b),a)"));
        assert!(eq("not(if(a,b))", "not(or(not(a),b))"));
    }

    #[test]
    fn test_eq_conditionals() {
        assert!(eq("if(a,b)", "or(not(a),b)"));
        assert!(!eq("if(a,b)", "if(b,a)"));
        assert!(eq("iff(a,b)", "iff(b,a)"));
        assert!(eq("iff(not(a),not(b))", "iff(b,a)"));
    }

    #[test]
    fn test_eq_iff_forms() {
        assert!(eq("iff(a,b)", "or(and(a,b),and(not(a),not(b)))"));
        assert!(eq("or(and(a,b),and(not(a),not(b)))", "iff(a,b)"));
        assert!(eq("iff(a,b)", "and(if(a,b),if(b,a))"));
        assert!(eq("and(if(a,b),if(b,a))", "iff(a,b)"));
    }

    #[test]
    fn test_eq_symmetric() {
        let pairs = [
            ("and(a,and(b,c))", "and(and(c,a),b)"),
            ("not(and(a,b))", "or(not(a),not(b))"),
            ("if(a,b)", "or(not(a),b)"),
            ("iff(a,b)", "and(if(a,b),if(b,a))"),
            ("or(a,b)", "and(a,b)"),
        ];
        for (a, b) in pairs {
            assert_eq!(eq(a, b), eq(b, a), "{} vs {}", a, b);
        }
    }

    // ─── Containment ───

    #[test]
    fn test_in_decomposition_self() {
        for text in ["a", "not(a)", "and(a,b)", "or(a,and(b,c))", "iff(a,b)"] {
            assert!(contains(text, text), "{}", text);
        }
    }

    #[test]
    fn test_in_decomposition_chains() {
        assert!(contains("and(a,b)", "a"));
        assert!(contains("and(a,and(b,c))", "b"));
        assert!(contains("and(a,and(b,c))", "and(b,c)"));
        assert!(contains("or(a,b)", "a"));
        assert!(contains("or(a,or(b,c))", "b"));
        assert!(contains("or(a,or(b,c))", "or(b,c)"));
        assert!(contains("or(a,and(b,and(a,c)))", "and(a,and(b,c))"));
        assert!(contains("and(a,b)", "and(and(a,b),and(b,a))"));
        assert!(contains("and(and(a,b),and(b,a))", "and(a,b)"));
    }

    #[test]
    fn test_not_in_decomposition() {
        assert!(!contains("or(a,and(b,c))", "b"));
        assert!(!contains("and(a,or(b,c))", "b"));
        assert!(!contains("a", "b"));
        assert!(!contains("if(a,b)", "a"));
        assert!(!contains("or(if(b,a),b)", "if(a,b)"));
    }

    #[test]
    fn test_in_decomposition_conditionals() {
        assert!(contains("if(a,b)", "or(not(a),b)"));
        assert!(contains("or(not(a),b)", "if(a,b)"));
        assert!(contains("or(if(a,b),b)", "if(a,b)"));
        assert!(contains("iff(a,b)", "if(a,b)"));
        assert!(contains("iff(a,b)", "if(b,a)"));
        assert!(contains("iff(a,b)", "a"));
        assert!(contains("iff(a,b)", "not(a)"));
        assert!(contains("iff(a,b)", "or(and(not(a),not(b)),and(a,b))"));
    }
}
