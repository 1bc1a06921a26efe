//! Tableau rule checks: checkmark, close, open, and completion.
//!
//! The `check_*` methods only inspect the tree and report a [`RuleViolation`].
//! The mutating wrappers ([`TruthTree::checkmark`], [`TruthTree::close`],
//! [`TruthTree::mark_open`]) run the check first and touch nothing on failure.
//!
//! Conjunctions of several decomposition children are always folded from the
//! left in display order: `c1, c2, c3` becomes `((c1 ∧ c2) ∧ c3)`. Equivalence
//! is insensitive to the nesting of such chains, so the fold order only
//! matters for what ends up in the logs.

use log::debug;

use crate::ast::Expr;
use crate::error::{Result, RuleViolation, TreeError};
use crate::formula::Connective;
use crate::tree::TruthTree;
use crate::types::{FormulaId, NodeId};

fn conjunction<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Option<Expr> {
    exprs.into_iter().fold(None, |acc, e| {
        Some(match acc {
            None => e.clone(),
            Some(acc) => Expr::and(acc, e.clone()),
        })
    })
}

impl TruthTree {
    fn display_of(&self, id: FormulaId) -> usize {
        self.formula(id).display_id()
    }

    /// Whether every undecided branch below `node` accumulates a conjunction
    /// of `f`'s children equivalent to `f`.
    fn and_check(&self, f: FormulaId, node: NodeId, mut acc: Vec<FormulaId>) -> bool {
        let n = self.node(node);
        if n.is_closed() {
            return true;
        }

        let target = self.formula(f).expr();
        acc.extend(
            self.formula(f)
                .children()
                .iter()
                .copied()
                .filter(|&c| self.formula(c).node() == node),
        );

        let mut conj: Option<Expr> = None;
        for &c in &acc {
            let e = self.formula(c).expr().clone();
            let next = match conj {
                None => e,
                Some(prev) => Expr::and(prev, e),
            };
            if next.equivalent(target) {
                return true;
            }
            conj = Some(next);
        }

        if n.is_leaf() {
            return false;
        }
        n.children()
            .iter()
            .all(|&c| self.and_check(f, c, acc.clone()))
    }

    /// Whether every branch point below `node` splits `f`'s children into two
    /// conjunctions whose disjunction is equivalent to `f`.
    fn or_check(&self, f: FormulaId, node: NodeId) -> bool {
        let n = self.node(node);
        if n.is_closed() {
            return true;
        }
        let [left, right] = match n.children()[..] {
            [left, right] => [left, right],
            _ => {
                debug!("or_check: {} not branched at {}", f, node);
                return false;
            }
        };

        let mut in_left = Vec::new();
        let mut in_right = Vec::new();
        for &c in self.formula(f).children() {
            let cn = self.formula(c).node();
            if cn != left && cn != right {
                continue;
            }
            if self.node(cn).parent_formula() != Some(f) {
                debug!("or_check: {} sits in a branch not created by {}", c, f);
                return false;
            }
            let side = if cn == left { &mut in_left } else { &mut in_right };
            side.push(self.formula(c).expr());
        }

        if let (Some(l), Some(r)) = (conjunction(in_left), conjunction(in_right)) {
            if Expr::or(l, r).equivalent(self.formula(f).expr()) {
                return true;
            }
        }

        self.or_check(f, left) && self.or_check(f, right)
    }

    /// Whether `f` may be checkmarked.
    pub fn check_checkmark(&self, f: FormulaId) -> Result<(), RuleViolation> {
        let formula = self.formula(f);
        if formula.is_checkmarked() {
            return Err(RuleViolation::AlreadyCheckmarked(formula.display_id()));
        }

        let node = formula.node();
        let ok = match formula.decompose().connective {
            None => true,
            Some(Connective::And) => self.and_check(f, node, Vec::new()),
            Some(Connective::Or) => self.or_check(f, node),
            Some(Connective::Iff) => self.or_check(f, node) || self.and_check(f, node, Vec::new()),
        };
        if ok {
            Ok(())
        } else {
            Err(RuleViolation::CannotCheckmark(formula.display_id()))
        }
    }

    /// Whether `node` may be closed by the contradiction between `f1` and `f2`.
    pub fn check_close(&self, node: NodeId, f1: FormulaId, f2: FormulaId) -> Result<(), RuleViolation> {
        for f in [f1, f2] {
            if !self.formula(f).is_valid() {
                return Err(RuleViolation::NotValid(self.display_of(f)));
            }
        }
        for f in [f1, f2] {
            if !self.in_ancestry(node, f) {
                return Err(RuleViolation::NotInAncestry {
                    formula: self.display_of(f),
                    node: self.node(node).display_id(),
                });
            }
        }

        let negated = Expr::not(self.formula(f1).expr().clone());
        if negated.equivalent(self.formula(f2).expr()) {
            Ok(())
        } else {
            Err(RuleViolation::NotNegations(self.display_of(f1), self.display_of(f2)))
        }
    }

    /// Whether the path from the root to `node` is a legitimate open witness.
    pub fn check_open(&self, node: NodeId) -> Result<(), RuleViolation> {
        let n = self.node(node);
        if !n.is_leaf() {
            return Err(RuleViolation::HasChildren(n.display_id()));
        }
        if n.is_open() {
            return Err(RuleViolation::AlreadyOpen(n.display_id()));
        }

        let path = self.path_to_root(node);
        for &p in &path {
            for &f in self.node(p).formulas() {
                let formula = self.formula(f);
                if formula.is_checkmarked() {
                    continue;
                }
                if formula.parent().is_none() {
                    return Err(RuleViolation::NoParent(formula.display_id()));
                }
                let Some(connective) = formula.decompose().connective else {
                    continue;
                };
                if formula.children().is_empty() {
                    return Err(RuleViolation::NotDecomposed(formula.display_id()));
                }

                let on_path = formula
                    .children()
                    .iter()
                    .filter(|&&c| path.contains(&self.formula(c).node()))
                    .map(|&c| self.formula(c).expr());
                let Some(conj) = conjunction(on_path) else {
                    return Err(RuleViolation::NotDecomposedIntoBranch(formula.display_id()));
                };

                let target = formula.expr();
                let decomposed = match connective {
                    Connective::And => conj.equivalent(target),
                    Connective::Or => target.in_decomposition(&conj),
                    Connective::Iff => conj.equivalent(target) || target.in_decomposition(&conj),
                };
                if !decomposed {
                    return Err(RuleViolation::IncorrectDecomposition(formula.display_id()));
                }

                if connective != Connective::And
                    && !formula.node_children().iter().any(|c| path.contains(c))
                {
                    return Err(RuleViolation::NotDecomposedIntoBranch(formula.display_id()));
                }
            }
        }
        Ok(())
    }

    /// Checkmark `f` if its decomposition is complete.
    pub fn checkmark(&mut self, f: FormulaId) -> Result<()> {
        self.ensure_formula(f)?;
        if let Err(e) = self.check_checkmark(f) {
            debug!("checkmark: {} rejected: {}", f, e);
            return Err(e.into());
        }
        self.set_checkmarked(f, true);
        debug!("checkmark: {}", f);
        Ok(())
    }

    /// Close `node` on the contradiction between `f1` and `f2`.
    pub fn close(&mut self, node: NodeId, f1: FormulaId, f2: FormulaId) -> Result<()> {
        self.ensure_node(node)?;
        self.ensure_formula(f1)?;
        self.ensure_formula(f2)?;
        if let Err(e) = self.check_close(node, f1, f2) {
            debug!("close: {} rejected: {}", node, e);
            return Err(e.into());
        }
        self.set_closed(node, true);
        debug!("close: {} by {} and {}", node, f1, f2);
        Ok(())
    }

    /// Mark the leaf `node` as an open branch.
    pub fn mark_open(&mut self, node: NodeId) -> Result<()> {
        let n = self.ensure_node(node)?;
        if n.is_closed() {
            return Err(TreeError::NodeClosed(n.display_id()));
        }
        if let Err(e) = self.check_open(node) {
            debug!("mark_open: {} rejected: {}", node, e);
            return Err(e.into());
        }
        self.set_open(node, true);
        debug!("mark_open: {}", node);
        Ok(())
    }

    fn find_unclosed(&self, node: NodeId, require_checkmarked: bool) -> Result<(), RuleViolation> {
        let n = self.node(node);
        if require_checkmarked {
            if let Some(pf) = n.parent_formula() {
                if !self.formula(pf).is_checkmarked() {
                    return Err(RuleViolation::NotCheckmarked(self.display_of(pf)));
                }
            }
        }
        if n.is_leaf() {
            return if n.is_closed() {
                Ok(())
            } else {
                Err(RuleViolation::NotClosed(n.display_id()))
            };
        }
        for &c in n.children() {
            self.find_unclosed(c, require_checkmarked)?;
        }
        Ok(())
    }

    /// Whether every leaf is closed (and, optionally, every branching formula
    /// checkmarked). Reports the first offender, left branches first.
    pub fn check_all_closed(&self, require_checkmarked: bool) -> Result<(), RuleViolation> {
        self.find_unclosed(self.root(), require_checkmarked)
    }

    /// Whether some leaf has been marked open.
    pub fn check_any_open(&self) -> Result<(), RuleViolation> {
        if self.leaves().any(|n| n.is_open()) {
            Ok(())
        } else {
            Err(RuleViolation::NoOpenBranch)
        }
    }
}
