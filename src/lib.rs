//! # tableau-rs: Propositional Truth Trees in Rust
//!
//! **`tableau-rs`** is a library for building and checking **truth trees** (semantic tableaux) for propositional logic.
//! It does not search for proofs: the user performs each step, and the library checks that the step follows the rules.
//!
//! ## What is a Truth Tree?
//!
//! A truth tree tests a set of formulas for consistency. Starting from the premises in the root, each formula is
//! *decomposed* into simpler formulas: a conjunction adds both parts to the current branch, a disjunction *branches*
//! the tree in two. A branch containing a formula together with its negation is *closed*. If every branch closes,
//! the premises are inconsistent; a fully decomposed branch that stays open describes a model.
//!
//! ## Key Features
//!
//! - **Structural Equivalence**: Decompositions are checked up to commutativity and associativity of repeated
//!   conjunctions and disjunctions, see [`formula`].
//! - **Provenance Tracking**: Every derived formula records the formula it was decomposed from. Validity flows down
//!   from the premises and is withdrawn when a justification is removed.
//! - **Stable Identity**: Formulas and nodes live in append-only arenas. Deleting hides an entity; restoring puts the
//!   very same entity back at its old position.
//! - **Exact Undo/Redo**: Every command is a reversible [`Edit`][crate::history::Edit].
//!
//! ## Basic Usage
//!
//! ```rust
//! use tableau_rs::error::{RuleViolation, TreeError};
//! use tableau_rs::session::Session;
//!
//! let mut session = Session::new();
//!
//! // 1. Premises go to the root node
//! session.add_premise("or(a,b)").unwrap();
//! session.add_premise("not(a)").unwrap();
//!
//! // 2. Branch the root on formula 1: creates nodes 2 and 3
//! assert_eq!(session.branch(1).unwrap(), [2, 3]);
//!
//! // 3. Decompose into each branch and justify by formula 1
//! session.go_to(2).unwrap();
//! let a = session.add_formula("a").unwrap();
//! session.justify(a, 1).unwrap();
//! session.go_to(3).unwrap();
//! let b = session.add_formula("b").unwrap();
//! session.justify(b, 1).unwrap();
//! session.checkmark(1).unwrap();
//!
//! // 4. The left branch contradicts the second premise
//! session.go_to(2).unwrap();
//! session.close(2, a).unwrap();
//!
//! // 5. The right branch does not
//! session.go_to(3).unwrap();
//! assert_eq!(
//!     session.close(2, b),
//!     Err(TreeError::Rule(RuleViolation::NotNegations(2, b)))
//! );
//! session.mark_open().unwrap();
//! assert!(session.check_any_open().is_ok());
//! ```
//!
//! ## Core Components
//!
//! - **[`formula`]**: Decomposition rules and structural equivalence over the [`ast::Expr`] syntax tree.
//! - **[`tree`]**: The [`TruthTree`][crate::tree::TruthTree] arenas with soft delete and exact restoration.
//! - **[`rules`]**: Checkmark, close, and open checks.
//! - **[`session`]**: The interactive [`Session`][crate::session::Session] with a current node and history.

pub mod ast;
pub mod config;
pub mod debug;
pub mod error;
pub mod formula;
pub mod history;
pub mod parser;
pub mod rules;
pub mod session;
pub mod tree;
pub mod types;
