//! Property-based tests for the analyzer (§8 invariants 3 and 6):
//! generated interfaces, covering both well-formed and ill-formed variable
//! usage, check that grouping never mixes directions in one step and that
//! the validator is idempotent.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests can panic")]

use proptest::prelude::*;
use ta_analyze::{declaration_directions, group_program, thread_program, validate, Step};
use ta_ir::DirectionSet;

#[derive(Clone, Debug)]
enum Action {
    Input(usize),
    Output(usize),
}

fn action_strategy(var_count: usize) -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..var_count).prop_map(Action::Input),
        (0..var_count).prop_map(Action::Output),
    ]
}

/// Builds source text declaring `var_count` variables up front, then a
/// random sequence of `input`/`output` statements over them, so most
/// generated programs are well-formed (every reference is preceded by a
/// declaration) while still allowing the occasional read-before-write the
/// validator should catch consistently across repeated runs.
fn source_strategy() -> impl Strategy<Value = String> {
    (1usize..5).prop_flat_map(|var_count| {
        prop::collection::vec(action_strategy(var_count), 0..12).prop_map(move |actions| {
            let mut source = String::from("main {\n");
            for i in 0..var_count {
                source.push_str(&format!("  var v{i};\n"));
            }
            for action in actions {
                match action {
                    Action::Input(i) => source.push_str(&format!("  input v{i};\n")),
                    Action::Output(i) => source.push_str(&format!("  output v{i};\n")),
                }
            }
            source.push_str("}\n");
            source
        })
    })
}

proptest! {
    /// Invariant 6: running the validator twice on the same threaded
    /// context table yields the same diagnostics list, regardless of
    /// whether the generated program is well-formed.
    #[test]
    fn validator_is_idempotent(source in source_strategy()) {
        let program = ta_parse::parse(&source).expect("generated source should always parse");
        let contexts = thread_program(&program);
        let first = validate(&program, &contexts);
        let second = validate(&program, &contexts);
        prop_assert_eq!(first, second);
    }

    /// Invariant 3: after grouping, every `Step::Group` combines statements
    /// whose declaration directions never mix (at most one direction).
    #[test]
    fn grouped_steps_never_mix_directions(source in source_strategy()) {
        let program = ta_parse::parse(&source).expect("generated source should always parse");
        let contexts = thread_program(&program);
        if !validate(&program, &contexts).is_empty() {
            // Ill-formed programs are exercised by the idempotence test;
            // grouping is only meaningful once a program is valid.
            return Ok(());
        }
        let groups = group_program(&program);
        for steps in groups.values() {
            for step in steps {
                if let Step::Group(stmts) = step {
                    let combined = stmts
                        .iter()
                        .fold(DirectionSet::EMPTY, |set, &stmt| set.union(declaration_directions(&program, stmt)));
                    prop_assert!(combined.len() <= 1);
                }
            }
        }
    }
}
