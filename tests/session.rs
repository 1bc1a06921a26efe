//! End-to-end tests for interactive sessions.
//!
//! Tests cover proof construction, rule diagnostics, and undo/redo identity.

use tableau_rs::config::SessionConfig;
use tableau_rs::debug::Snapshot;
use tableau_rs::error::{Result, RuleViolation, TreeError};
use tableau_rs::session::Session;

fn checkmarked(session: &Session, display_id: usize) -> bool {
    let tree = session.tree();
    tree.formula(tree.formula_at(display_id).unwrap()).is_checkmarked()
}

fn valid(session: &Session, display_id: usize) -> bool {
    let tree = session.tree();
    tree.formula(tree.formula_at(display_id).unwrap()).is_valid()
}

fn state(session: &Session) -> (Snapshot, usize) {
    (session.snapshot(), session.current_display())
}

/// or(a,b), not(a); left branch closed, right branch decomposed.
fn disjunctive_syllogism() -> Session {
    let mut s = Session::new();
    s.add_premise("or(a,b)").unwrap();
    s.add_premise("not(a)").unwrap();
    s.branch(1).unwrap();
    s.go_to(2).unwrap();
    s.add_formula("a").unwrap();
    s.justify(3, 1).unwrap();
    s.close(2, 3).unwrap();
    s.go_to(3).unwrap();
    s.add_formula("b").unwrap();
    s.justify(4, 1).unwrap();
    s.checkmark(1).unwrap();
    s
}

// ─── Proof construction ────────────────────────────────────────────────────────

#[test]
fn branch_justify_checkmark() {
    let mut s = Session::new();
    assert_eq!(s.add_premise("or(a,b)"), Ok(1));
    assert_eq!(s.branch(1), Ok([2, 3]));
    s.go_to(2).unwrap();
    assert_eq!(s.add_formula("a"), Ok(2));
    s.go_to(3).unwrap();
    assert_eq!(s.add_formula("b"), Ok(3));
    s.justify(2, 1).unwrap();
    s.justify(3, 1).unwrap();

    s.checkmark(1).unwrap();
    assert!(checkmarked(&s, 1));

    s.go_to(2).unwrap();
    assert_eq!(
        s.close(1, 2),
        Err(TreeError::Rule(RuleViolation::NotNegations(1, 2)))
    );
    assert!(!s.tree().node(s.current()).is_closed());
}

#[test]
fn double_branch_is_structural_error() {
    let mut s = Session::new();
    s.add_premise("or(a,b)").unwrap();
    s.add_premise("if(c,d)").unwrap();
    s.branch(1).unwrap();

    let before = s.snapshot();
    let err = s.branch(2).unwrap_err();
    assert_eq!(err, TreeError::TooManyChildren(1));
    assert!(!err.is_rule_violation());
    assert_eq!(s.snapshot(), before);
}

#[test]
fn biconditional() {
    let mut s = Session::new();
    s.add_formula("iff(a,b)").unwrap();
    s.branch(1).unwrap();
    s.go_to(2).unwrap();
    s.add_formula("a").unwrap();
    s.add_formula("b").unwrap();
    s.go_to(3).unwrap();
    s.add_formula("not(a)").unwrap();
    s.add_formula("not(b)").unwrap();
    for child in 2..=5 {
        s.justify(child, 1).unwrap();
    }
    s.checkmark(1).unwrap();

    // Restate the unjustified biconditional as a premise.
    assert_eq!(s.add_premise("iff(a,b)"), Ok(1));
    s.justify(2, 1).unwrap();
    s.checkmark(1).unwrap();

    assert!(checkmarked(&s, 1) && checkmarked(&s, 2));
    assert!((1..=6).all(|i| valid(&s, i)));

    s.undo().unwrap();
    assert!(!checkmarked(&s, 1));
    s.undo().unwrap();
    assert!((2..=6).all(|i| !valid(&s, i)));

    s.redo().unwrap();
    assert!((2..=6).all(|i| valid(&s, i)));
    s.redo().unwrap();
    assert!(checkmarked(&s, 1));

    s.go_to(2).unwrap();
    s.mark_open().unwrap();
    assert_eq!(s.check_any_open(), Ok(()));
}

// ─── Completion ────────────────────────────────────────────────────────────────

#[test]
fn all_branches_closed() {
    let mut s = Session::new();
    s.add_premise("or(a,b)").unwrap();
    s.add_premise("not(a)").unwrap();
    s.add_premise("not(b)").unwrap();
    s.branch(1).unwrap();
    s.go_to(2).unwrap();
    s.add_formula("a").unwrap();
    s.justify(4, 1).unwrap();
    s.close(2, 4).unwrap();
    s.go_to(3).unwrap();
    s.add_formula("b").unwrap();
    s.justify(5, 1).unwrap();

    assert_eq!(s.check_all_closed(), Err(RuleViolation::NotCheckmarked(1).into()));
    s.checkmark(1).unwrap();
    assert_eq!(s.check_all_closed(), Err(RuleViolation::NotClosed(3).into()));
    s.close(3, 5).unwrap();
    assert_eq!(s.check_all_closed(), Ok(()));
    assert_eq!(s.check_any_open(), Err(RuleViolation::NoOpenBranch.into()));
}

#[test]
fn all_closed_without_checkmarks() {
    let config = SessionConfig::default().with_require_checkmarked_branches(false);
    let mut s = Session::with_config(config);
    s.add_premise("or(a,a)").unwrap();
    s.add_premise("not(a)").unwrap();
    s.branch(1).unwrap();
    for node in [2, 3] {
        s.go_to(node).unwrap();
        let a = s.add_formula("a").unwrap();
        s.justify(a, 1).unwrap();
        s.close(2, a).unwrap();
    }
    assert_eq!(s.check_all_closed(), Ok(()));
}

#[test]
fn open_branch() {
    let mut s = disjunctive_syllogism();
    assert_eq!(s.check_any_open(), Err(RuleViolation::NoOpenBranch.into()));
    s.mark_open().unwrap();
    assert_eq!(s.check_any_open(), Ok(()));

    s.go_to(1).unwrap();
    assert_eq!(s.mark_open(), Err(RuleViolation::HasChildren(1).into()));
}

#[test]
fn open_flag_is_set_once() {
    let mut s = Session::new();
    s.add_premise("a").unwrap();
    s.mark_open().unwrap();
    let before = state(&s);

    assert_eq!(s.mark_open(), Err(RuleViolation::AlreadyOpen(1).into()));
    assert_eq!(state(&s), before);
    s.undo().unwrap();
    assert!(!s.tree().node(s.current()).is_open());
    s.redo().unwrap();
    assert_eq!(state(&s), before);
}

#[test]
fn closed_leaf_is_not_open() {
    let mut s = Session::new();
    s.add_premise("a").unwrap();
    s.add_premise("not(a)").unwrap();
    s.close(1, 2).unwrap();
    let before = state(&s);

    assert_eq!(s.mark_open(), Err(TreeError::NodeClosed(1)));
    assert_eq!(state(&s), before);
    assert_eq!(s.check_any_open(), Err(RuleViolation::NoOpenBranch.into()));
}

// ─── Undo / redo ───────────────────────────────────────────────────────────────

#[test]
fn undo_redo_restores_every_state() {
    type Step = fn(&mut Session) -> Result<()>;
    let steps: &[Step] = &[
        |s| s.add_premise("or(a,b)").map(drop),
        |s| s.add_premise("not(a)").map(drop),
        |s| s.branch(1).map(drop),
        |s| s.go_to(2),
        |s| s.add_formula("a").map(drop),
        |s| s.justify(3, 1),
        |s| s.close(2, 3),
        |s| s.go_to(3),
        |s| s.add_formula("b").map(drop),
        |s| s.justify(4, 1),
        |s| s.checkmark(1),
        |s| s.delete_formula(4),
        |s| s.add_formula("b").map(drop),
        |s| s.justify(4, 1),
        |s| s.checkmark(1),
        |s| s.mark_open(),
        |s| s.go_to(2),
        |s| s.reopen(2),
    ];

    let mut s = Session::new();
    let mut states = vec![state(&s)];
    for step in steps {
        step(&mut s).unwrap();
        states.push(state(&s));
    }

    for i in (0..steps.len()).rev() {
        s.undo().unwrap();
        assert_eq!(state(&s), states[i], "after undoing step {}", i + 1);
    }
    assert_eq!(s.undo(), Err(TreeError::NothingToUndo));

    for (i, expected) in states.iter().enumerate().skip(1) {
        s.redo().unwrap();
        assert_eq!(&state(&s), expected, "after redoing step {}", i);
    }
    assert_eq!(s.redo(), Err(TreeError::NothingToRedo));
}

#[test]
fn delete_then_undo_is_identity() {
    let mut s = disjunctive_syllogism();
    let before = state(&s);
    let count = s.tree().num_formulas();

    for id in 1..=count {
        match s.delete_formula(id) {
            Ok(()) => {
                assert_eq!(s.tree().num_formulas(), count - 1);
                s.undo().unwrap();
                assert_eq!(state(&s), before, "after restoring formula {}", id);
            }
            Err(e) => assert_eq!(
                e,
                TreeError::HasBranches {
                    formula: 1,
                    nodes: vec![2, 3]
                }
            ),
        }
    }
}

#[test]
fn delete_branch_and_undo() {
    let mut s = Session::new();
    s.add_premise("or(a,b)").unwrap();
    s.branch(1).unwrap();
    s.go_to(2).unwrap();
    s.add_formula("a").unwrap();
    s.go_to(3).unwrap();
    s.add_formula("b").unwrap();
    s.justify(3, 1).unwrap();
    s.go_to(1).unwrap();
    let before = state(&s);

    s.delete_branch().unwrap();
    assert_eq!(s.tree().num_nodes(), 1);
    assert_eq!(s.tree().num_formulas(), 1);
    let root = s.tree().node(s.current());
    assert!(root.children().is_empty());

    s.undo().unwrap();
    assert_eq!(state(&s), before);
    s.redo().unwrap();
    assert_eq!(s.tree().num_nodes(), 1);
}

#[test]
fn delete_branch_requires_leaves() {
    let mut s = Session::new();
    s.add_premise("or(a,b)").unwrap();
    assert_eq!(s.delete_branch(), Err(TreeError::NoChildren(1)));
    s.branch(1).unwrap();
    s.go_to(2).unwrap();
    s.branch(1).unwrap();
    s.go_to(1).unwrap();
    assert_eq!(s.delete_branch(), Err(TreeError::NotLeaves(1)));
}

#[test]
fn deleting_child_withdraws_checkmark() {
    let mut s = Session::new();
    s.add_premise("and(a,b)").unwrap();
    s.add_formula("a").unwrap();
    s.justify(2, 1).unwrap();
    s.add_formula("b").unwrap();
    s.justify(3, 1).unwrap();
    s.checkmark(1).unwrap();

    s.undo().unwrap();
    assert!(!checkmarked(&s, 1));
    s.redo().unwrap();
    assert!(checkmarked(&s, 1));

    s.delete_formula(2).unwrap();
    assert!(!checkmarked(&s, 1));
    s.undo().unwrap();
    assert!(checkmarked(&s, 1));
    s.redo().unwrap();
    assert!(!checkmarked(&s, 1));
    s.undo().unwrap();
    assert!(checkmarked(&s, 1));
}

#[test]
fn new_command_clears_redo() {
    let mut s = Session::new();
    s.add_premise("a").unwrap();
    s.add_premise("b").unwrap();
    s.undo().unwrap();
    s.add_premise("c").unwrap();
    assert_eq!(s.redo(), Err(TreeError::NothingToRedo));

    let history: Vec<String> = s.history().map(|e| e.to_string()).collect();
    assert_eq!(history, ["add premise a as 1", "add premise c as 2"]);
}
