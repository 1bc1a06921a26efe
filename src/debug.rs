//! Debug utilities for inspecting truth trees.
//!
//! [`Snapshot`] captures everything externally observable about a tree
//! (display ids, texts, flags, edges) as plain comparable values, which is
//! what the undo/redo identity tests compare. The `Display` impl of
//! [`TruthTree`] prints a node-by-node dump.

use std::fmt;

use crate::tree::{TreeFormula, TreeNode, TruthTree};
use crate::types::Parent;

/// Observable state of a single live formula. All ids are display ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FormulaInfo {
    pub id: usize,
    pub text: String,
    pub node: usize,
    pub premise: bool,
    /// Justifying formula, if any
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub node_children: Vec<usize>,
    pub checkmarked: bool,
    pub parent_checkmark: bool,
    pub valid: bool,
}

impl fmt::Display for FormulaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.id, self.text)?;
        if self.checkmarked {
            write!(f, " ✓")?;
        }
        match (self.premise, self.parent) {
            (true, _) => write!(f, "  [premise]")?,
            (false, Some(p)) => write!(f, "  [from {}]", p)?,
            (false, None) => write!(f, "  [unjustified]")?,
        }
        if !self.valid {
            write!(f, " (not valid)")?;
        }
        Ok(())
    }
}

/// Observable state of a single live node. All ids are display ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NodeInfo {
    pub id: usize,
    pub formulas: Vec<usize>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Formula whose branching created this node
    pub parent_formula: Option<usize>,
    pub closed: bool,
    pub open: bool,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.id)?;
        if let (Some(parent), Some(pf)) = (self.parent, self.parent_formula) {
            write!(f, " (child of {}, branched on {})", parent, pf)?;
        }
        if self.closed {
            write!(f, " closed")?;
        }
        if self.open {
            write!(f, " open")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub formulas: Vec<FormulaInfo>,
    pub nodes: Vec<NodeInfo>,
}

impl TruthTree {
    pub fn formula_info(&self, formula: &TreeFormula) -> FormulaInfo {
        let display = |id| self.formula(id).display_id();
        FormulaInfo {
            id: formula.display_id(),
            text: formula.text(),
            node: self.node(formula.node()).display_id(),
            premise: formula.is_premise(),
            parent: formula.parent().and_then(Parent::formula).map(display),
            children: formula.children().iter().map(|&c| display(c)).collect(),
            node_children: formula
                .node_children()
                .iter()
                .map(|&n| self.node(n).display_id())
                .collect(),
            checkmarked: formula.is_checkmarked(),
            parent_checkmark: formula.parent_checkmark(),
            valid: formula.is_valid(),
        }
    }

    pub fn node_info(&self, node: &TreeNode) -> NodeInfo {
        let display = |id| self.node(id).display_id();
        NodeInfo {
            id: node.display_id(),
            formulas: node
                .formulas()
                .iter()
                .map(|&f| self.formula(f).display_id())
                .collect(),
            parent: node.parent().map(display),
            children: node.children().iter().map(|&c| display(c)).collect(),
            parent_formula: node
                .parent_formula()
                .map(|f| self.formula(f).display_id()),
            closed: node.is_closed(),
            open: node.is_open(),
        }
    }

    /// Capture the observable state of every live formula and node.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            formulas: self.formulas().map(|f| self.formula_info(f)).collect(),
            nodes: self.nodes().map(|n| self.node_info(n)).collect(),
        }
    }
}

impl fmt::Display for TruthTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes() {
            writeln!(f, "{}", self.node_info(node))?;
            for &id in node.formulas() {
                writeln!(f, "  {}", self.formula_info(self.formula(id)))?;
            }
        }
        Ok(())
    }
}
