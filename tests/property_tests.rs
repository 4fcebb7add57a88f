//! Property-based tests for graph construction and runners.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use proptest::prelude::*;
use statewright::core::{StateHistory, StateId, TransitionRecord};
use statewright::{BuildError, Fsm, RunnerError};

/// 1 while an even number of zeros has been seen, 2 otherwise.
fn parity() -> Fsm<bool, u8> {
    Fsm::<bool, u8>::builder()
        .state(|s| {
            s.id(1)
                .source()
                .on_enter(|s| {
                    *s.context_mut() = true;
                    Ok(())
                })
                .transition(|t| t.to(1).when_input(|i| *i == 1))
                .transition(|t| t.to(2).when_input(|i| *i == 0))
        })
        .state(|s| {
            s.id(2)
                .on_enter(|s| {
                    *s.context_mut() = false;
                    Ok(())
                })
                .transition(|t| t.to(2).when_input(|i| *i == 1))
                .transition(|t| t.to(1).when_input(|i| *i == 0))
        })
        .build()
        .unwrap()
}

/// A single looping state that appends every input to the context.
fn recorder() -> Fsm<Vec<u8>, u8> {
    Fsm::<Vec<u8>, u8>::builder()
        .state(|s| {
            s.id(1).source().transition(|t| {
                t.to(1).action(|_, s| {
                    if let Some(input) = s.input() {
                        s.context_mut().push(*input);
                    }
                    Ok(())
                })
            })
        })
        .build()
        .unwrap()
}

/// States `1..=len` where each state links to the next and the last is a
/// sink.
fn chain(len: u32, dangling: Option<u32>) -> Result<Fsm<(), u8>, BuildError> {
    let mut builder = Fsm::<(), u8>::builder();
    for id in 1..=len {
        builder = builder.state(|s| {
            let s = if id == 1 { s.id(id).source() } else { s.id(id) };
            let s = if id < len { s.transition(|t| t.to(id + 1)) } else { s };
            match dangling {
                Some(target) if id == 1 => s.transition(|t| t.to(target).when_input(|i| *i == 9)),
                _ => s,
            }
        });
    }
    builder.build()
}

prop_compose! {
    fn arbitrary_record()(from in 1..50u32, to in 1..50u32) -> TransitionRecord {
        TransitionRecord {
            from: StateId::new(from),
            to: StateId::new(to),
            label: None,
            timestamp: Utc::now(),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parity_tracks_zero_count(digits in prop::collection::vec(0..=1u8, 0..40)) {
        let runner = parity().start(false).unwrap();
        for digit in &digits {
            runner.feed(*digit).unwrap();
        }

        let even = digits.iter().filter(|d| **d == 0).count() % 2 == 0;
        let expected = if even { 1 } else { 2 };
        prop_assert_eq!(runner.current_state_id(), StateId::new(expected));
        prop_assert_eq!(runner.current_context(), even);
        runner.stop();
    }

    #[test]
    fn inputs_apply_in_submission_order(inputs in prop::collection::vec(any::<u8>(), 0..60)) {
        let runner = recorder().start(Vec::new()).unwrap();
        let handles: Vec<_> = inputs.iter().map(|i| runner.feed_async(*i)).collect();
        for handle in handles {
            prop_assert!(handle.wait().is_ok());
        }

        prop_assert_eq!(runner.current_context(), inputs.clone());
        prop_assert_eq!(runner.history().len(), inputs.len().min(64));
        runner.stop();
    }

    #[test]
    fn stopped_runner_rejects_every_input(inputs in prop::collection::vec(any::<u8>(), 1..10)) {
        let runner = recorder().start(Vec::new()).unwrap();
        runner.stop();

        for input in inputs {
            let rejected = matches!(runner.feed(input), Err(RunnerError::NotRunning));
            prop_assert!(rejected);
        }
        prop_assert!(runner.current_context().is_empty());
    }

    #[test]
    fn well_formed_chain_builds(len in 1..20u32) {
        let fsm = chain(len, None).unwrap();
        prop_assert_eq!(fsm.len(), len as usize);
        prop_assert_eq!(fsm.source().id(), StateId::new(1));
    }

    #[test]
    fn dangling_target_is_rejected(len in 1..20u32, offset in 1..100u32) {
        let target = len + offset;
        let err = chain(len, Some(target)).unwrap_err();

        let names_target = matches!(
            err,
            BuildError::UnknownTarget { from, to } if from == StateId::new(1) && to == StateId::new(target)
        );
        prop_assert!(names_target, "unexpected error: {}", err);
    }

    #[test]
    fn chain_runs_to_its_sink(len in 2..20u32) {
        let runner = chain(len, None).unwrap().start(()).unwrap();
        for _ in 1..len {
            runner.feed(0).unwrap();
        }

        prop_assert!(!runner.is_started());
        prop_assert_eq!(runner.current_state_id(), StateId::new(len));
        prop_assert_eq!(runner.history().path().len(), len as usize);
    }

    #[test]
    fn history_respects_its_limit(
        limit in 0..16usize,
        records in prop::collection::vec(arbitrary_record(), 0..40),
    ) {
        let mut history = StateHistory::with_limit(limit);
        for record in records.iter().cloned() {
            history.record(record);
        }

        prop_assert_eq!(history.len(), records.len().min(limit));
        if limit > 0 && !records.is_empty() {
            prop_assert_eq!(history.last().map(|r| r.to), records.last().map(|r| r.to));
        }
    }

    #[test]
    fn state_id_displays_its_value(id in any::<u32>()) {
        prop_assert_eq!(StateId::new(id).to_string(), id.to_string());
        prop_assert_eq!(StateId::from(id).value(), id);
    }
}
