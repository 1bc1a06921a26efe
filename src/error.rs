//! Error and diagnostic types.
//!
//! Three categories are kept apart:
//!
//! - [`TreeError`]: structural impossibilities and bad references. The
//!   attempted operation is rejected and nothing is mutated.
//! - [`RuleViolation`]: a tableau rule was not satisfied (checkmark, close,
//!   open, justification). Reported as a diagnostic; the tree is unchanged.
//! - [`ParseError`]: malformed formula text, caught before any mutation.
//!
//! Numbers in messages are display ids, as a user would type them.

use thiserror::Error;

pub use crate::parser::ParseError;
use crate::types::{FormulaId, NodeId};

pub type Result<T, E = TreeError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TreeError {
    #[error("cannot add another child to node {0}")]
    TooManyChildren(usize),
    #[error("formula {0} does not branch")]
    DoesNotBranch(usize),
    #[error("cannot delete formula {formula}: branched to nodes {nodes:?}")]
    HasBranches { formula: usize, nodes: Vec<usize> },
    #[error("node {0} has no children")]
    NoChildren(usize),
    #[error("children of node {0} are not leaves")]
    NotLeaves(usize),
    #[error("node {0} is closed")]
    NodeClosed(usize),
    #[error("formula {0} not found")]
    UnknownFormula(usize),
    #[error("node {0} not found")]
    UnknownNode(usize),
    #[error("formula {0} is deleted")]
    DeletedFormula(FormulaId),
    #[error("formula {0} is not deleted")]
    LiveFormula(FormulaId),
    #[error("node {0} is deleted")]
    DeletedNode(NodeId),
    #[error("node {0} is not deleted")]
    LiveNode(NodeId),
    #[error("the root node cannot be deleted")]
    RootNode,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

impl TreeError {
    /// Whether this is a rule diagnostic rather than a structural failure.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, TreeError::Rule(_))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RuleViolation {
    #[error("formula {0} is already checkmarked")]
    AlreadyCheckmarked(usize),
    #[error("node {0} is already marked open")]
    AlreadyOpen(usize),
    #[error("cannot checkmark formula {0}: decomposition is incomplete")]
    CannotCheckmark(usize),
    #[error("formula {0} does not have a valid parent")]
    NotValid(usize),
    #[error("formula {formula} is not in the ancestry of node {node}")]
    NotInAncestry { formula: usize, node: usize },
    #[error("formulas {0} and {1} are not negations of each other")]
    NotNegations(usize, usize),
    #[error("node {0} has children")]
    HasChildren(usize),
    #[error("node {0} is not closed")]
    NotClosed(usize),
    #[error("formula {0} doesn't have a parent")]
    NoParent(usize),
    #[error("formula {0} has not been decomposed")]
    NotDecomposed(usize),
    #[error("incorrect decomposition of formula {0}")]
    IncorrectDecomposition(usize),
    #[error("formula {0} has not been decomposed into this branch yet")]
    NotDecomposedIntoBranch(usize),
    #[error("formula {0} is not checkmarked")]
    NotCheckmarked(usize),
    #[error("no branch is marked open")]
    NoOpenBranch,
    #[error("formula {0} is a premise and does not need a parent")]
    PremiseNeedsNoParent(usize),
    #[error("formula {child} must come after its parent {parent}")]
    ChildBeforeParent { child: usize, parent: usize },
    #[error("formula {child} does not decompose from formula {parent}")]
    DoesNotDecompose { child: usize, parent: usize },
    #[error("cannot decompose formula {0} into the root node")]
    DecomposedIntoRoot(usize),
    #[error("node of formula {child} was not decomposed from formula {parent}")]
    WrongBranch { child: usize, parent: usize },
}
