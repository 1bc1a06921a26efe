//! Type-safe handles for tree entities.
//!
//! Formulas and nodes are addressed two ways: by a *stable id* (a permanent
//! arena index, never reused, see [`FormulaId`] and [`NodeId`]) and by a
//! *display id* (the current 1-based position among live entities, which shifts
//! whenever something before it is inserted or deleted). The handles in this
//! module are stable ids; display ids are plain `usize`.
use std::fmt;

/// Stable identity of a formula.
///
/// # Invariants
///
/// - Assigned once, in creation order, and never reused within a tree
/// - Remains valid after the formula is soft-deleted
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormulaId(u32);

impl FormulaId {
    pub(crate) fn new(index: usize) -> Self {
        FormulaId(index as u32)
    }

    /// Index into the formula arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f#{}", self.0)
    }
}

/// Stable identity of a tree node.
///
/// The root node always has index 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// Index into the node arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n#{}", self.0)
    }
}

/// What justifies a formula.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Parent {
    /// Assumed unconditionally.
    Premise,
    /// Derived by decomposing another formula.
    Formula(FormulaId),
}

impl Parent {
    pub fn formula(self) -> Option<FormulaId> {
        match self {
            Parent::Premise => None,
            Parent::Formula(id) => Some(id),
        }
    }
}
