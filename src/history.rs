//! Reversible edits and the undo/redo stacks.
//!
//! Every successful session command is recorded as an [`Edit`]. An edit knows
//! how to apply itself to a tree and how to build its own inverse, so undo is
//! "apply the inverse" and redo is "apply the edit again". Edits refer to
//! entities by stable id: a formula restored by undo is the same arena entry
//! that was deleted, so later edits in the history still point at it.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::error::Result;
use crate::tree::TruthTree;
use crate::types::{FormulaId, NodeId};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edit {
    /// Bring a formula (back) into the tree.
    Insert(FormulaId),
    /// Soft-delete a formula.
    Remove(FormulaId),
    /// Attach a branch pair below `node`.
    Graft { node: NodeId, children: [NodeId; 2] },
    /// Detach the branch pair below `node`.
    Prune { node: NodeId, children: [NodeId; 2] },
    /// Move the justification of `child` from `from` to `to`.
    Justify {
        child: FormulaId,
        from: Option<FormulaId>,
        to: Option<FormulaId>,
    },
    Checkmark { formula: FormulaId, checked: bool },
    Close { node: NodeId, closed: bool },
    Open { node: NodeId, open: bool },
    GoTo { from: NodeId, to: NodeId },
}

impl Edit {
    pub fn inverse(self) -> Edit {
        match self {
            Edit::Insert(f) => Edit::Remove(f),
            Edit::Remove(f) => Edit::Insert(f),
            Edit::Graft { node, children } => Edit::Prune { node, children },
            Edit::Prune { node, children } => Edit::Graft { node, children },
            Edit::Justify { child, from, to } => Edit::Justify { child, from: to, to: from },
            Edit::Checkmark { formula, checked } => Edit::Checkmark { formula, checked: !checked },
            Edit::Close { node, closed } => Edit::Close { node, closed: !closed },
            Edit::Open { node, open } => Edit::Open { node, open: !open },
            Edit::GoTo { from, to } => Edit::GoTo { from: to, to: from },
        }
    }

    /// Apply to `tree`, moving `current` where the edit says so.
    pub fn apply(self, tree: &mut TruthTree, current: &mut NodeId) -> Result<()> {
        debug!("apply: {:?}", self);
        match self {
            Edit::Insert(f) => tree.undelete_formula(f)?,
            Edit::Remove(f) => tree.delete_formula(f)?,
            Edit::Graft { node, children } => tree.restore_branch(node, children)?,
            Edit::Prune { node, children } => {
                let pruned = tree.delete_branch(node)?;
                debug_assert_eq!(pruned, children);
                if children.contains(current) {
                    *current = node;
                }
            }
            Edit::Justify { child, to, .. } => match to {
                Some(parent) => tree.link_formula(parent, child)?,
                None => tree.unlink_formula(child)?,
            },
            Edit::Checkmark { formula, checked } => tree.set_checkmarked(formula, checked),
            Edit::Close { node, closed } => tree.set_closed(node, closed),
            Edit::Open { node, open } => tree.set_open(node, open),
            Edit::GoTo { to, .. } => *current = to,
        }
        Ok(())
    }
}

/// An applied edit with the description shown when listing history.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entry {
    pub edit: Edit,
    pub description: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Undo and redo stacks.
///
/// Recording a new edit clears the redo stack. With a limit set, the oldest
/// undo entries are dropped once the limit is exceeded.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<Entry>,
    redo: Vec<Entry>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn record(&mut self, edit: Edit, description: impl Into<String>) {
        self.redo.clear();
        self.push_undo(Entry {
            edit,
            description: description.into(),
        });
    }

    fn push_undo(&mut self, entry: Entry) {
        self.undo.push_back(entry);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }

    /// Most recent applied entry, removed from the undo stack.
    pub fn take_undo(&mut self) -> Option<Entry> {
        self.undo.pop_back()
    }

    /// Most recently undone entry, removed from the redo stack.
    pub fn take_redo(&mut self) -> Option<Entry> {
        self.redo.pop()
    }

    /// Park an entry that was just undone.
    pub fn push_undone(&mut self, entry: Entry) {
        self.redo.push(entry);
    }

    /// Return an entry to the undo stack without touching the redo stack.
    pub fn push_applied(&mut self, entry: Entry) {
        self.push_undo(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Applied entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.undo.iter()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_inverse_is_involution() {
        let f = FormulaId::new(0);
        let g = FormulaId::new(1);
        let n = NodeId::ROOT;
        let m = NodeId::new(1);
        let edits = [
            Edit::Insert(f),
            Edit::Graft { node: n, children: [m, NodeId::new(2)] },
            Edit::Justify { child: g, from: None, to: Some(f) },
            Edit::Checkmark { formula: f, checked: true },
            Edit::Close { node: m, closed: true },
            Edit::Open { node: m, open: true },
            Edit::GoTo { from: n, to: m },
        ];
        for e in edits {
            assert_ne!(e.inverse(), e);
            assert_eq!(e.inverse().inverse(), e);
        }
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(Edit::Insert(FormulaId::new(0)), "add 1");
        history.record(Edit::Insert(FormulaId::new(1)), "add 2");

        let entry = history.take_undo().unwrap();
        assert_eq!(entry.description, "add 2");
        history.push_undone(entry);
        assert!(history.can_redo());

        history.record(Edit::Insert(FormulaId::new(2)), "add 3");
        assert!(!history.can_redo());
        assert_eq!(
            history.entries().map(|e| e.to_string()).collect::<Vec<_>>(),
            ["add 1", "add 3"]
        );
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(Some(2));
        for i in 0..4 {
            history.record(Edit::Insert(FormulaId::new(i)), format!("add {}", i + 1));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.take_undo().unwrap().description, "add 4");
        assert_eq!(history.take_undo().unwrap().description, "add 3");
        assert!(history.take_undo().is_none());
    }

    #[test]
    fn test_apply_and_inverse() {
        let mut tree = TruthTree::new();
        let mut current = tree.root();
        let f = tree.add_premise_formula("or(a,b)").unwrap();
        let children = tree.branch(current, f).unwrap();
        let graft = Edit::Graft { node: current, children };

        Edit::GoTo { from: current, to: children[1] }
            .apply(&mut tree, &mut current)
            .unwrap();
        assert_eq!(current, children[1]);

        graft.inverse().apply(&mut tree, &mut current).unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(current, tree.root());

        graft.apply(&mut tree, &mut current).unwrap();
        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.node(tree.root()).children(), children);
    }
}
