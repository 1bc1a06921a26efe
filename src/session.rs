//! Interactive proof session.
//!
//! A [`Session`] wraps a [`TruthTree`] with a cursor (the *current node*) and
//! an undo/redo [`History`]. Commands address formulas and nodes by display
//! id, as a user reading the printed tree would. Each command validates all of
//! its preconditions before touching the tree, and every successful command is
//! recorded as a reversible [`Edit`].
//!
//! ```
//! use tableau_rs::session::Session;
//!
//! let mut session = Session::new();
//! session.add_premise("or(a,b)").unwrap();
//! let [left, right] = session.branch(1).unwrap();
//! assert_eq!([left, right], [2, 3]);
//!
//! session.go_to(left).unwrap();
//! session.add_formula("a").unwrap();
//! session.justify(2, 1).unwrap();
//! session.go_to(right).unwrap();
//! session.add_formula("b").unwrap();
//! session.justify(3, 1).unwrap();
//!
//! session.checkmark(1).unwrap();
//! assert!(session.tree().formula_at(1).is_some());
//!
//! session.undo().unwrap();
//! assert!(!session.tree().formula(session.tree().formula_at(1).unwrap()).is_checkmarked());
//! ```

use log::{debug, info};

use crate::ast::Expr;
use crate::config::SessionConfig;
use crate::debug::Snapshot;
use crate::error::{Result, RuleViolation, TreeError};
use crate::formula::Connective;
use crate::history::{Edit, Entry, History};
use crate::parser::parse;
use crate::tree::TruthTree;
use crate::types::{FormulaId, NodeId, Parent};

#[derive(Debug, Clone)]
pub struct Session {
    tree: TruthTree,
    history: History,
    current: NodeId,
    config: SessionConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let tree = TruthTree::new();
        Self {
            current: tree.root(),
            history: History::new(config.history_limit),
            tree,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tree(&self) -> &TruthTree {
        &self.tree
    }

    /// Stable id of the current node.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Display id of the current node.
    pub fn current_display(&self) -> usize {
        self.tree.node(self.current).display_id()
    }

    /// Applied edits, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.history.entries()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tree.snapshot()
    }

    /// Discard the tree and the history.
    pub fn reset(&mut self) {
        info!("reset");
        self.tree = TruthTree::new();
        self.history = History::new(self.config.history_limit);
        self.current = self.tree.root();
    }

    fn formula_id(&self, display_id: usize) -> Result<FormulaId> {
        self.tree
            .formula_at(display_id)
            .ok_or(TreeError::UnknownFormula(display_id))
    }

    fn node_id(&self, display_id: usize) -> Result<NodeId> {
        self.tree
            .node_at(display_id)
            .ok_or(TreeError::UnknownNode(display_id))
    }

    fn display_of(&self, id: FormulaId) -> usize {
        self.tree.formula(id).display_id()
    }

    fn ensure_open(&self, node: NodeId) -> Result<()> {
        let n = self.tree.node(node);
        if n.is_closed() {
            return Err(TreeError::NodeClosed(n.display_id()));
        }
        Ok(())
    }

    fn record(&mut self, edit: Edit, description: String) {
        debug!("record: {}", description);
        self.history.record(edit, description);
    }
}

// ─── Formula commands ───

impl Session {
    /// Add a premise to the root. Returns its display id.
    pub fn add_premise(&mut self, text: &str) -> Result<usize> {
        let expr = parse(text)?;
        self.ensure_open(self.tree.root())?;

        let id = self.tree.push_premise(expr);
        let display_id = self.display_of(id);
        let text = self.tree.formula(id).text();
        self.record(Edit::Insert(id), format!("add premise {} as {}", text, display_id));
        Ok(display_id)
    }

    /// Add a formula to the current node. Returns its display id.
    pub fn add_formula(&mut self, text: &str) -> Result<usize> {
        let expr = parse(text)?;
        self.ensure_open(self.current)?;

        let id = self.tree.push_formula(self.current, expr)?;
        let display_id = self.display_of(id);
        let description = format!(
            "add formula {} as {} in node {}",
            self.tree.formula(id).text(),
            display_id,
            self.current_display()
        );
        self.record(Edit::Insert(id), description);
        Ok(display_id)
    }

    pub fn delete_formula(&mut self, display_id: usize) -> Result<()> {
        let id = self.formula_id(display_id)?;
        let text = self.tree.formula(id).text();
        self.tree.delete_formula(id)?;
        self.record(Edit::Remove(id), format!("delete formula {} ({})", display_id, text));
        Ok(())
    }

    /// Mark formula `parent` as the justification of formula `child`.
    pub fn justify(&mut self, child: usize, parent: usize) -> Result<()> {
        let c = self.formula_id(child)?;
        let p = self.formula_id(parent)?;
        self.check_justify(c, p)?;

        let from = self.tree.formula(c).parent().and_then(Parent::formula);
        self.tree.link_formula(p, c)?;
        self.record(
            Edit::Justify { child: c, from, to: Some(p) },
            format!("justify {} by {}", child, parent),
        );
        Ok(())
    }

    fn check_justify(&self, c: FormulaId, p: FormulaId) -> Result<(), RuleViolation> {
        let child = self.tree.formula(c);
        let parent = self.tree.formula(p);
        let (cd, pd) = (child.display_id(), parent.display_id());

        if child.is_premise() {
            return Err(RuleViolation::PremiseNeedsNoParent(cd));
        }
        if cd <= pd {
            return Err(RuleViolation::ChildBeforeParent { child: cd, parent: pd });
        }
        if parent.expr().equivalent(child.expr()) {
            return Ok(());
        }
        if !parent.expr().in_decomposition(child.expr()) {
            return Err(RuleViolation::DoesNotDecompose { child: cd, parent: pd });
        }

        let needs_branch = match parent.decompose().connective {
            Some(Connective::Or) => true,
            // A biconditional may also be decomposed in place into its two
            // conditionals.
            Some(Connective::Iff) => match parent.expr().decompose_iff_into_if() {
                Some((l, r)) => !Expr::and(l, r).in_decomposition(child.expr()),
                None => true,
            },
            _ => false,
        };
        if needs_branch {
            match self.tree.node(child.node()).parent_formula() {
                None => return Err(RuleViolation::DecomposedIntoRoot(pd)),
                Some(from) if from != p => {
                    return Err(RuleViolation::WrongBranch {
                        child: cd,
                        parent: pd,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn checkmark(&mut self, display_id: usize) -> Result<()> {
        let id = self.formula_id(display_id)?;
        self.tree.checkmark(id)?;
        self.record(
            Edit::Checkmark { formula: id, checked: true },
            format!("checkmark {}", display_id),
        );
        Ok(())
    }
}

// ─── Node commands ───

impl Session {
    /// Branch the current node on a formula from its ancestry. Returns the
    /// display ids of the two new nodes.
    pub fn branch(&mut self, display_id: usize) -> Result<[usize; 2]> {
        let f = self.formula_id(display_id)?;
        let node = self.current;
        self.ensure_open(node)?;
        if !self.tree.in_ancestry(node, f) {
            return Err(RuleViolation::NotInAncestry {
                formula: display_id,
                node: self.current_display(),
            }
            .into());
        }

        let children = self.tree.branch(node, f)?;
        let shown = children.map(|c| self.tree.node(c).display_id());
        self.record(
            Edit::Graft { node, children },
            format!(
                "branch node {} on {} into {} and {}",
                self.current_display(),
                display_id,
                shown[0],
                shown[1]
            ),
        );
        Ok(shown)
    }

    /// Delete the branch pair below the current node.
    pub fn delete_branch(&mut self) -> Result<()> {
        let node = self.current;
        let children = self.tree.delete_branch(node)?;
        self.record(
            Edit::Prune { node, children },
            format!("delete branch of node {}", self.current_display()),
        );
        Ok(())
    }

    pub fn go_to(&mut self, display_id: usize) -> Result<()> {
        let to = self.node_id(display_id)?;
        let from = self.current;
        self.current = to;
        self.record(Edit::GoTo { from, to }, format!("go to node {}", display_id));
        Ok(())
    }

    /// Close the current node on the contradiction between two formulas.
    pub fn close(&mut self, f1: usize, f2: usize) -> Result<()> {
        let a = self.formula_id(f1)?;
        let b = self.formula_id(f2)?;
        let node = self.current;
        self.ensure_open(node)?;
        self.tree.close(node, a, b)?;
        self.record(
            Edit::Close { node, closed: true },
            format!("close node {} by {} and {}", self.current_display(), f1, f2),
        );
        Ok(())
    }

    pub fn reopen(&mut self, display_id: usize) -> Result<()> {
        let node = self.node_id(display_id)?;
        if !self.tree.node(node).is_closed() {
            return Err(RuleViolation::NotClosed(display_id).into());
        }
        self.tree.set_closed(node, false);
        self.record(Edit::Close { node, closed: false }, format!("reopen node {}", display_id));
        Ok(())
    }

    /// Mark the current node as an open branch.
    pub fn mark_open(&mut self) -> Result<()> {
        let node = self.current;
        self.tree.mark_open(node)?;
        self.record(
            Edit::Open { node, open: true },
            format!("mark node {} open", self.current_display()),
        );
        Ok(())
    }

    pub fn check_all_closed(&self) -> Result<()> {
        self.tree
            .check_all_closed(self.config.require_checkmarked_branches)?;
        info!("all branches closed");
        Ok(())
    }

    pub fn check_any_open(&self) -> Result<()> {
        self.tree.check_any_open()?;
        info!("open branch found");
        Ok(())
    }
}

// ─── History ───

impl Session {
    /// Revert the most recent edit. Returns its description.
    pub fn undo(&mut self) -> Result<String> {
        let entry = self.history.take_undo().ok_or(TreeError::NothingToUndo)?;
        debug!("undo: {}", entry);
        if let Err(e) = entry.edit.inverse().apply(&mut self.tree, &mut self.current) {
            self.history.push_applied(entry);
            return Err(e);
        }
        let description = entry.description.clone();
        self.history.push_undone(entry);
        Ok(description)
    }

    /// Re-apply the most recently undone edit. Returns its description.
    pub fn redo(&mut self) -> Result<String> {
        let entry = self.history.take_redo().ok_or(TreeError::NothingToRedo)?;
        debug!("redo: {}", entry);
        if let Err(e) = entry.edit.apply(&mut self.tree, &mut self.current) {
            self.history.push_undone(entry);
            return Err(e);
        }
        let description = entry.description.clone();
        self.history.push_applied(entry);
        Ok(description)
    }
}
