//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated registries and transition sequences.

use proptest::prelude::*;
use statewise::{StateDescriptor, StateMachine};
use std::collections::HashMap;

const NAMES: [&str; 5] = ["s0", "s1", "s2", "s3", "s4"];

/// Allow lists for `size` states, each a subset of the state indices.
fn arbitrary_allow_lists(size: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..size, 0..=size), size)
}

prop_compose! {
    fn arbitrary_registry()(size in 1..=NAMES.len())
        (allow in arbitrary_allow_lists(size), initial in 0..size, size in Just(size))
        -> (Vec<Vec<usize>>, usize, usize) {
        (allow, initial, size)
    }
}

fn descriptors(allow: &[Vec<usize>], initial: usize) -> Vec<StateDescriptor> {
    allow
        .iter()
        .enumerate()
        .map(|(index, destinations)| {
            let descriptor = StateDescriptor::new(NAMES[index])
                .allow(destinations.iter().map(|&d| NAMES[d]).collect::<Vec<_>>());
            if index == initial {
                descriptor.initial()
            } else {
                descriptor
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn guard_decides_every_transition(
        (allow, initial, size) in arbitrary_registry(),
        requests in prop::collection::vec(0..NAMES.len(), 0..20)
    ) {
        let mut machine = StateMachine::with_states(descriptors(&allow, initial)).unwrap();
        machine.start().unwrap();

        for request in requests.into_iter().filter(|&r| r < size) {
            let target = NAMES[request];
            let before = machine.current_state().unwrap().name().to_string();
            let allowed = machine.current_state().unwrap().allows(target);
            let history_before = machine.history().len();

            let outcome = machine.go_to_state(target, None).unwrap();

            prop_assert_eq!(outcome.is_activated(), allowed);
            if allowed {
                prop_assert!(machine.is_state(target));
                prop_assert_eq!(machine.history().len(), history_before + 1);
            } else {
                prop_assert!(machine.is_state(&before));
                prop_assert_eq!(machine.history().len(), history_before);
            }
        }
    }

    #[test]
    fn visit_counts_match_history(
        (allow, initial, _size) in arbitrary_registry(),
        steps in prop::collection::vec(any::<bool>(), 0..30),
        targets in prop::collection::vec(0..NAMES.len(), 30)
    ) {
        let mut machine = StateMachine::with_states(descriptors(&allow, initial)).unwrap();
        machine.start().unwrap();

        for (use_next, target) in steps.into_iter().zip(targets) {
            if use_next {
                machine.next_state(None).unwrap();
            } else {
                machine.go_to_state(NAMES[target], None).unwrap();
            }
        }

        let mut expected: HashMap<&str, usize> = HashMap::new();
        for name in machine.history().path() {
            *expected.entry(name).or_default() += 1;
        }
        for state in machine.states() {
            prop_assert_eq!(
                state.visited_count(),
                expected.get(state.name()).copied().unwrap_or(0)
            );
        }
    }

    #[test]
    fn wildcard_expands_to_all_names(size in 1..=NAMES.len(), rotation in 0..NAMES.len()) {
        let mut names: Vec<&str> = NAMES[..size].to_vec();
        names.rotate_left(rotation % size);

        let machine = StateMachine::with_states(
            names
                .iter()
                .map(|name| StateDescriptor::new(*name).allow(["*"]))
                .collect(),
        )
        .unwrap();

        for state in machine.states() {
            prop_assert_eq!(state.allowed_destinations(), machine.state_names());
        }
        prop_assert_eq!(machine.state_names(), names.as_slice());
    }

    #[test]
    fn next_state_wraps_from_last_to_first(
        (allow, initial, size) in arbitrary_registry()
    ) {
        let mut machine = StateMachine::with_states(descriptors(&allow, initial)).unwrap();
        machine.start().unwrap();

        for _ in initial..size - 1 {
            machine.next_state(None).unwrap();
        }
        prop_assert!(machine.is_state(NAMES[size - 1]));

        machine.next_state(None).unwrap();
        prop_assert!(machine.is_state(NAMES[0]));
    }

    #[test]
    fn deferred_subscription_matches_live_subscription(
        (allow, initial, size) in arbitrary_registry(),
        advances in 0..10usize
    ) {
        use std::cell::RefCell;
        use std::rc::Rc;

        let deferred_hits = Rc::new(RefCell::new(Vec::new()));
        let live_hits = Rc::new(RefCell::new(Vec::new()));
        let watched = NAMES[size - 1];

        let mut deferred = StateMachine::with_states(descriptors(&allow, initial)).unwrap();
        let sink = Rc::clone(&deferred_hits);
        deferred.subscribe_to_state(watched, move |s| {
            sink.borrow_mut().push(s.visited_count());
            Ok(())
        }).unwrap();
        deferred.start().unwrap();

        let mut live = StateMachine::with_states(descriptors(&allow, initial)).unwrap();
        live.start().unwrap();
        let sink = Rc::clone(&live_hits);
        live.subscribe_to_state(watched, move |s| {
            sink.borrow_mut().push(s.visited_count());
            Ok(())
        }).unwrap();

        for _ in 0..advances {
            deferred.next_state(None).unwrap();
            live.next_state(None).unwrap();
        }

        // The deferred subscriber also saw the initial activation, if any.
        let mut deferred_hits = deferred_hits.borrow().clone();
        if initial == size - 1 {
            prop_assert_eq!(deferred_hits.first().copied(), Some(1));
            deferred_hits.remove(0);
        }
        prop_assert_eq!(deferred_hits, live_hits.borrow().clone());
    }
}
