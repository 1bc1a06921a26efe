//! Truth tree arenas.
//!
//! A [`TruthTree`] owns two append-only arenas, one of [`TreeFormula`]s and one
//! of [`TreeNode`]s, indexed by stable id. Entities are never deallocated:
//! deletion only removes an entity from the *display view* (the ordered list of
//! live entities that users address by 1-based position) and flags it as dead.
//! Everything needed to put it back is kept in the arena, so a later restore
//! reinserts it at exactly the same display position with the same edges.
//!
//! Two graphs hang off the arenas, both keyed by stable id:
//!
//! - the *justification graph*: formula → formulas derived from it
//!   (`children`), with non-owning back references (`parent`);
//! - the *branch graph*: formula → the node pairs created by branching on it
//!   (`node_children`), with back references from each node
//!   (`parent_formula`).
//!
//! Invariants maintained by every mutation:
//!
//! - `display_id` of a live entity equals its position in the view, plus one.
//! - Child lists (`children`, `node_children`, node `formulas`) contain only
//!   live entities and are ordered by display id.
//! - A formula is valid iff it is a premise or its parent is valid.
//! - `parent_checkmark` of a justified formula mirrors its parent's checkmark.

use std::iter::successors;
use std::mem::take;

use log::debug;

use crate::ast::Expr;
use crate::error::{Result, TreeError};
use crate::formula::Decomposition;
use crate::parser::parse;
use crate::types::{FormulaId, NodeId, Parent};

#[derive(Debug, Clone)]
pub struct TreeFormula {
    pub(crate) expr: Expr,
    pub(crate) id: FormulaId,
    pub(crate) display_id: usize,
    pub(crate) node: NodeId,
    pub(crate) parent: Option<Parent>,
    pub(crate) children: Vec<FormulaId>,
    pub(crate) node_children: Vec<NodeId>,
    pub(crate) checkmarked: bool,
    pub(crate) parent_checkmark: bool,
    pub(crate) valid: bool,
    pub(crate) live: bool,
}

impl TreeFormula {
    fn new(expr: Expr, id: FormulaId, display_id: usize, node: NodeId, parent: Option<Parent>) -> Self {
        Self {
            expr,
            id,
            display_id,
            node,
            valid: parent == Some(Parent::Premise),
            parent,
            children: Vec::new(),
            node_children: Vec::new(),
            checkmarked: false,
            parent_checkmark: false,
            live: true,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
    /// Canonical text.
    pub fn text(&self) -> String {
        self.expr.to_string()
    }
    pub fn id(&self) -> FormulaId {
        self.id
    }
    /// Current display id. For a deleted formula, the position it will be
    /// restored to.
    pub fn display_id(&self) -> usize {
        self.display_id
    }
    pub fn node(&self) -> NodeId {
        self.node
    }
    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }
    pub fn children(&self) -> &[FormulaId] {
        &self.children
    }
    pub fn node_children(&self) -> &[NodeId] {
        &self.node_children
    }
    pub fn is_checkmarked(&self) -> bool {
        self.checkmarked
    }
    pub fn parent_checkmark(&self) -> bool {
        self.parent_checkmark
    }
    pub fn is_valid(&self) -> bool {
        self.valid
    }
    pub fn is_live(&self) -> bool {
        self.live
    }
    pub fn is_premise(&self) -> bool {
        self.parent == Some(Parent::Premise)
    }
    pub fn decompose(&self) -> Decomposition {
        self.expr.decompose()
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) display_id: usize,
    pub(crate) formulas: Vec<FormulaId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) closed: bool,
    pub(crate) open: bool,
    pub(crate) parent_formula: Option<FormulaId>,
    pub(crate) live: bool,
}

impl TreeNode {
    fn new(id: NodeId, display_id: usize, parent: Option<NodeId>, parent_formula: Option<FormulaId>) -> Self {
        Self {
            id,
            display_id,
            formulas: Vec::new(),
            parent,
            children: Vec::new(),
            closed: false,
            open: false,
            parent_formula,
            live: true,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
    pub fn display_id(&self) -> usize {
        self.display_id
    }
    pub fn formulas(&self) -> &[FormulaId] {
        &self.formulas
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    pub fn is_open(&self) -> bool {
        self.open
    }
    /// The formula whose branching created this node (`None` for the root).
    pub fn parent_formula(&self) -> Option<FormulaId> {
        self.parent_formula
    }
    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[derive(Debug, Clone)]
pub struct TruthTree {
    formulas: Vec<TreeFormula>,
    nodes: Vec<TreeNode>,
    formula_view: Vec<FormulaId>,
    node_view: Vec<NodeId>,
}

impl Default for TruthTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TruthTree {
    pub fn new() -> Self {
        let root = TreeNode::new(NodeId::ROOT, 1, None, None);
        Self {
            formulas: Vec::new(),
            nodes: vec![root],
            formula_view: Vec::new(),
            node_view: vec![NodeId::ROOT],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn formula(&self, id: FormulaId) -> &TreeFormula {
        &self.formulas[id.index()]
    }
    fn formula_mut(&mut self, id: FormulaId) -> &mut TreeFormula {
        &mut self.formulas[id.index()]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }
    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.index()]
    }

    /// Look up a formula by stable id, live or not.
    pub fn get_formula(&self, id: FormulaId) -> Option<&TreeFormula> {
        self.formulas.get(id.index())
    }
    /// Look up a node by stable id, live or not.
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// The live formula currently shown at `display_id`.
    pub fn formula_at(&self, display_id: usize) -> Option<FormulaId> {
        display_id
            .checked_sub(1)
            .and_then(|i| self.formula_view.get(i).copied())
    }
    /// The live node currently shown at `display_id`.
    pub fn node_at(&self, display_id: usize) -> Option<NodeId> {
        display_id
            .checked_sub(1)
            .and_then(|i| self.node_view.get(i).copied())
    }

    /// Live formulas in display order.
    pub fn formulas(&self) -> impl Iterator<Item = &TreeFormula> + '_ {
        self.formula_view.iter().map(|&id| self.formula(id))
    }
    /// Live nodes in display order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.node_view.iter().map(|&id| self.node(id))
    }

    pub fn num_formulas(&self) -> usize {
        self.formula_view.len()
    }
    pub fn num_nodes(&self) -> usize {
        self.node_view.len()
    }
    /// Number of formulas ever created, including deleted ones.
    pub fn arena_formulas(&self) -> usize {
        self.formulas.len()
    }
    /// Number of nodes ever created, including deleted ones.
    pub fn arena_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn renumber_formulas(&mut self, from: usize) {
        for i in from..self.formula_view.len() {
            let id = self.formula_view[i];
            self.formulas[id.index()].display_id = i + 1;
        }
    }

    fn renumber_nodes(&mut self, from: usize) {
        for i in from..self.node_view.len() {
            let id = self.node_view[i];
            self.nodes[id.index()].display_id = i + 1;
        }
    }

    /// Position in `list` at which `id` keeps the list sorted by display id.
    fn formula_position(&self, list: &[FormulaId], id: FormulaId) -> usize {
        let key = self.formula(id).display_id;
        list.iter()
            .position(|&f| self.formula(f).display_id >= key)
            .unwrap_or(list.len())
    }

    fn node_position(&self, list: &[NodeId], id: NodeId) -> usize {
        let key = self.node(id).display_id;
        list.iter()
            .position(|&n| self.node(n).display_id >= key)
            .unwrap_or(list.len())
    }

    pub(crate) fn ensure_formula(&self, id: FormulaId) -> Result<&TreeFormula> {
        match self.get_formula(id) {
            Some(f) if f.live => Ok(f),
            Some(_) => Err(TreeError::DeletedFormula(id)),
            None => Err(TreeError::UnknownFormula(id.index())),
        }
    }

    pub(crate) fn ensure_node(&self, id: NodeId) -> Result<&TreeNode> {
        match self.get_node(id) {
            Some(n) if n.live => Ok(n),
            Some(_) => Err(TreeError::DeletedNode(id)),
            None => Err(TreeError::UnknownNode(id.index())),
        }
    }
}

// ─── Formulas ───

impl TruthTree {
    /// Parse `text` and add it as a premise of the root node.
    pub fn add_premise_formula(&mut self, text: &str) -> Result<FormulaId> {
        let expr = parse(text)?;
        Ok(self.push_premise(expr))
    }

    /// Parse `text` and append it to `node`.
    pub fn add_formula(&mut self, node: NodeId, text: &str) -> Result<FormulaId> {
        let expr = parse(text)?;
        self.push_formula(node, expr)
    }

    /// Insert a premise before the first non-premise formula.
    pub fn push_premise(&mut self, expr: Expr) -> FormulaId {
        let index = self
            .formula_view
            .iter()
            .position(|&f| !self.formula(f).is_premise())
            .unwrap_or(self.formula_view.len());

        let id = FormulaId::new(self.formulas.len());
        let root = self.root();
        self.formulas
            .push(TreeFormula::new(expr, id, index + 1, root, Some(Parent::Premise)));
        self.formula_view.insert(index, id);
        self.renumber_formulas(index);

        let pos = self.formula_position(&self.node(root).formulas, id);
        self.node_mut(root).formulas.insert(pos, id);

        debug!("push_premise: {} as {} at {}", self.formula(id).expr, id, index + 1);
        id
    }

    /// Append an unjustified formula to `node`.
    pub fn push_formula(&mut self, node: NodeId, expr: Expr) -> Result<FormulaId> {
        self.ensure_node(node)?;

        let id = FormulaId::new(self.formulas.len());
        let display_id = self.formula_view.len() + 1;
        self.formulas.push(TreeFormula::new(expr, id, display_id, node, None));
        self.formula_view.push(id);
        self.node_mut(node).formulas.push(id);

        debug!("push_formula: {} as {} at {} in {}", self.formula(id).expr, id, display_id, node);
        Ok(id)
    }

    /// Soft-delete a formula that was never branched on.
    ///
    /// The formula is removed from its node, from the display view, and from
    /// the justification graph (its own parent link is remembered), its
    /// justified subtree is invalidated, and a parent checkmark that depended
    /// on it is withdrawn.
    pub fn delete_formula(&mut self, id: FormulaId) -> Result<()> {
        let f = self.ensure_formula(id)?;
        if !f.node_children.is_empty() {
            return Err(TreeError::HasBranches {
                formula: f.display_id,
                nodes: f.node_children.iter().map(|&n| self.node(n).display_id).collect(),
            });
        }
        self.detach_formula(id, true);
        Ok(())
    }

    /// Restore a soft-deleted formula at its remembered position.
    pub fn undelete_formula(&mut self, id: FormulaId) -> Result<()> {
        let f = self
            .get_formula(id)
            .ok_or(TreeError::UnknownFormula(id.index()))?;
        if f.live {
            return Err(TreeError::LiveFormula(id));
        }
        self.ensure_node(f.node)?;
        self.attach_formula(id, true);
        Ok(())
    }

    fn detach_formula(&mut self, id: FormulaId, from_node: bool) {
        let (node, display_id, parent) = {
            let f = self.formula(id);
            (f.node, f.display_id, f.parent)
        };
        debug!("detach_formula: {} at {}", id, display_id);

        if from_node {
            self.node_mut(node).formulas.retain(|&f| f != id);
        }

        if let Some(Parent::Formula(p)) = parent {
            self.formula_mut(p).children.retain(|&c| c != id);
            if self.formula(p).valid {
                self.formula_mut(id).valid = false;
            }
            if self.formula(id).parent_checkmark {
                self.set_checkmarked(p, false);
            }
        }

        for c in self.formula(id).children.clone() {
            let child = self.formula_mut(c);
            child.parent = None;
            child.parent_checkmark = false;
        }
        self.invalidate_descendants(id);

        self.formula_view.remove(display_id - 1);
        self.renumber_formulas(display_id - 1);
        self.formula_mut(id).live = false;
    }

    fn attach_formula(&mut self, id: FormulaId, into_node: bool) {
        let index = (self.formula(id).display_id - 1).min(self.formula_view.len());
        debug!("attach_formula: {} at {}", id, index + 1);

        self.formula_view.insert(index, id);
        self.renumber_formulas(index);
        self.formula_mut(id).live = true;

        let node = self.formula(id).node;
        if into_node {
            let pos = self.formula_position(&self.node(node).formulas, id);
            self.node_mut(node).formulas.insert(pos, id);
        }

        if let Some(Parent::Formula(p)) = self.formula(id).parent {
            if self.formula(p).live {
                let pos = self.formula_position(&self.formula(p).children, id);
                self.formula_mut(p).children.insert(pos, id);
            } else {
                self.formula_mut(id).parent = None;
            }
        }

        // Children re-justified elsewhere in the meantime stay with their new parent.
        let children: Vec<FormulaId> = take(&mut self.formula_mut(id).children)
            .into_iter()
            .filter(|&c| {
                let child = self.formula(c);
                child.live && child.parent.is_none()
            })
            .collect();
        for &c in &children {
            self.formula_mut(c).parent = Some(Parent::Formula(id));
        }
        self.formula_mut(id).children = children;

        let valid = self.verify(id);
        self.formula_mut(id).valid = valid;
        if valid {
            self.validate_descendants(id);
        }

        let checked = self.formula(id).checkmarked;
        self.set_checkmarked(id, checked);
        if self.formula(id).parent_checkmark {
            if let Some(Parent::Formula(p)) = self.formula(id).parent {
                self.set_checkmarked(p, true);
            }
        }
    }

    /// Whether `id` is a premise or descends from one through valid parents.
    pub fn verify(&self, id: FormulaId) -> bool {
        let mut current = id;
        // The justification graph is acyclic; the bound only guards corruption.
        for _ in 0..=self.formulas.len() {
            match self.formula(current).parent {
                Some(Parent::Premise) => return true,
                Some(Parent::Formula(p)) => current = p,
                None => return false,
            }
        }
        false
    }

    fn flood_validity(&mut self, id: FormulaId, valid: bool) {
        let mut stack = self.formula(id).children.clone();
        while let Some(c) = stack.pop() {
            let child = self.formula_mut(c);
            child.valid = valid;
            stack.extend_from_slice(&child.children);
        }
    }

    /// Mark every formula justified (transitively) by `id` as valid.
    pub fn validate_descendants(&mut self, id: FormulaId) {
        self.flood_validity(id, true);
    }

    /// Mark every formula justified (transitively) by `id` as not valid.
    pub fn invalidate_descendants(&mut self, id: FormulaId) {
        self.flood_validity(id, false);
    }

    /// Record that `parent` justifies `child`, replacing any previous parent.
    pub fn link_formula(&mut self, parent: FormulaId, child: FormulaId) -> Result<()> {
        self.ensure_formula(parent)?;
        self.ensure_formula(child)?;
        self.unlink_formula(child)?;

        let pos = self.formula_position(&self.formula(parent).children, child);
        self.formula_mut(parent).children.insert(pos, child);
        let checked = self.formula(parent).checkmarked;
        {
            let f = self.formula_mut(child);
            f.parent = Some(Parent::Formula(parent));
            f.parent_checkmark = checked;
        }

        let valid = self.verify(child);
        self.formula_mut(child).valid = valid;
        if valid {
            self.validate_descendants(child);
        }
        debug!("link_formula: {} justifies {} (valid = {})", parent, child, valid);
        Ok(())
    }

    /// Sever the justification edge of `child`. Premises are left untouched.
    pub fn unlink_formula(&mut self, child: FormulaId) -> Result<()> {
        self.ensure_formula(child)?;
        if let Some(Parent::Formula(p)) = self.formula(child).parent {
            self.formula_mut(p).children.retain(|&c| c != child);
            if self.formula(p).valid {
                self.formula_mut(child).valid = false;
                self.invalidate_descendants(child);
            }
            let f = self.formula_mut(child);
            f.parent = None;
            f.parent_checkmark = false;
            debug!("unlink_formula: {} from {}", child, p);
        }
        Ok(())
    }

    /// Set the checkmark of `id`, mirroring it onto its justified children.
    pub fn set_checkmarked(&mut self, id: FormulaId, value: bool) {
        self.formula_mut(id).checkmarked = value;
        for c in self.formula(id).children.clone() {
            self.formula_mut(c).parent_checkmark = value;
        }
    }
}

// ─── Nodes ───

impl TruthTree {
    fn new_node(&mut self, parent: NodeId, parent_formula: FormulaId) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.node_view.push(id);
        let display_id = self.node_view.len();
        self.nodes
            .push(TreeNode::new(id, display_id, Some(parent), Some(parent_formula)));
        id
    }

    /// Split `node` into two children by decomposing `formula`.
    pub fn branch(&mut self, node: NodeId, formula: FormulaId) -> Result<[NodeId; 2]> {
        let n = self.ensure_node(node)?;
        if !n.children.is_empty() {
            return Err(TreeError::TooManyChildren(n.display_id));
        }
        let f = self.ensure_formula(formula)?;
        if !f.decompose().branches() {
            return Err(TreeError::DoesNotBranch(f.display_id));
        }

        let left = self.new_node(node, formula);
        let right = self.new_node(node, formula);
        self.node_mut(node).children = vec![left, right];
        self.formula_mut(formula).node_children.extend([left, right]);

        debug!(
            "branch: {} on {} into {} and {}",
            node, formula, left, right
        );
        Ok([left, right])
    }

    /// Soft-delete a leaf node together with its formulas.
    pub fn delete_node(&mut self, id: NodeId) -> Result<()> {
        let n = self.ensure_node(id)?;
        let Some(parent) = n.parent else {
            return Err(TreeError::RootNode);
        };
        if !n.children.is_empty() {
            return Err(TreeError::NotLeaves(self.node(parent).display_id));
        }
        debug!("delete_node: {} at {}", id, n.display_id);

        // Later formulas first, so each one remembers its position in the
        // view as it was before the whole node went away.
        let formulas = n.formulas.clone();
        for &f in formulas.iter().rev() {
            self.detach_formula(f, false);
        }

        if let Some(pf) = self.node(id).parent_formula {
            self.formula_mut(pf).node_children.retain(|&c| c != id);
        }
        self.node_mut(parent).children.retain(|&c| c != id);

        let display_id = self.node(id).display_id;
        self.node_view.remove(display_id - 1);
        self.renumber_nodes(display_id - 1);
        self.node_mut(id).live = false;
        Ok(())
    }

    /// Restore a soft-deleted node and the formulas it held.
    pub fn readd_node(&mut self, id: NodeId) -> Result<()> {
        let n = self.get_node(id).ok_or(TreeError::UnknownNode(id.index()))?;
        if n.live {
            return Err(TreeError::LiveNode(id));
        }
        let Some(parent) = n.parent else {
            return Err(TreeError::RootNode);
        };
        let p = self.ensure_node(parent)?;
        if p.children.len() >= 2 {
            return Err(TreeError::TooManyChildren(p.display_id));
        }
        if let Some(pf) = n.parent_formula {
            self.ensure_formula(pf)?;
        }

        let index = (n.display_id - 1).min(self.node_view.len());
        debug!("readd_node: {} at {}", id, index + 1);
        self.node_view.insert(index, id);
        self.renumber_nodes(index);
        self.node_mut(id).live = true;

        let pos = self.node_position(&self.node(parent).children, id);
        self.node_mut(parent).children.insert(pos, id);
        if let Some(pf) = self.node(id).parent_formula {
            let pos = self.node_position(&self.formula(pf).node_children, id);
            self.formula_mut(pf).node_children.insert(pos, id);
        }

        for f in self.node(id).formulas.clone() {
            self.attach_formula(f, false);
        }
        Ok(())
    }

    /// Delete both children of `node`. Both must be leaves.
    pub fn delete_branch(&mut self, node: NodeId) -> Result<[NodeId; 2]> {
        let n = self.ensure_node(node)?;
        let [left, right] = match n.children[..] {
            [left, right] => [left, right],
            _ => return Err(TreeError::NoChildren(n.display_id)),
        };
        if !self.node(left).is_leaf() || !self.node(right).is_leaf() {
            return Err(TreeError::NotLeaves(n.display_id));
        }
        self.delete_node(right)?;
        self.delete_node(left)?;
        Ok([left, right])
    }

    /// Undo [`delete_branch`](Self::delete_branch).
    pub fn restore_branch(&mut self, node: NodeId, children: [NodeId; 2]) -> Result<()> {
        let n = self.ensure_node(node)?;
        if !n.children.is_empty() {
            return Err(TreeError::TooManyChildren(n.display_id));
        }
        let [left, right] = children;
        self.readd_node(left)?;
        self.readd_node(right)?;
        Ok(())
    }

    pub fn set_closed(&mut self, node: NodeId, value: bool) {
        self.node_mut(node).closed = value;
    }

    pub fn set_open(&mut self, node: NodeId, value: bool) {
        self.node_mut(node).open = value;
    }
}

// ─── Queries ───

impl TruthTree {
    /// `node` followed by its ancestors up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        successors(Some(node), move |&n| self.node(n).parent)
    }

    /// Nodes from the root down to `node`.
    pub fn path_to_root(&self, node: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(node).collect();
        path.reverse();
        path
    }

    /// Whether `formula` is live and held by `node` or one of its ancestors.
    pub fn in_ancestry(&self, node: NodeId, formula: FormulaId) -> bool {
        let f = self.formula(formula);
        f.live && self.ancestors(node).any(|n| n == f.node)
    }

    /// Live nodes without children.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes().filter(|n| n.is_leaf())
    }
}
