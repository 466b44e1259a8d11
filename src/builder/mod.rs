//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder for state machines and helpers
//! for common state layouts.

pub mod machine;

pub use machine::StateMachineBuilder;

use crate::core::StateDescriptor;

/// Describe states that each allow only their successor, the last one
/// looping back to the first. The first state is initial.
///
/// # Example
///
/// ```
/// use statewise::builder::{linear_ring, StateMachineBuilder};
///
/// let mut machine = StateMachineBuilder::new()
///     .states(linear_ring(["red", "green", "yellow"]))
///     .build_started()
///     .unwrap();
///
/// assert_eq!(machine.possible_states().unwrap(), ["green"]);
/// machine.go_to_state("green", None).unwrap();
/// assert!(machine.is_state("green"));
/// ```
pub fn linear_ring<I, N>(names: I) -> Vec<StateDescriptor>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let count = names.len();

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let descriptor =
                StateDescriptor::new(name.clone()).allow([names[(index + 1) % count].clone()]);
            if index == 0 {
                descriptor.initial()
            } else {
                descriptor
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_links_each_state_to_its_successor() {
        let ring = linear_ring(["state1", "state2", "state3"]);

        assert_eq!(ring.len(), 3);
        assert!(ring[0].is_initial());
        assert!(!ring[1].is_initial());
        assert_eq!(ring[0].allowed_destinations().unwrap(), ["state2"]);
        assert_eq!(ring[1].allowed_destinations().unwrap(), ["state3"]);
        assert_eq!(ring[2].allowed_destinations().unwrap(), ["state1"]);
    }

    #[test]
    fn single_state_ring_loops_to_itself() {
        let ring = linear_ring(["only"]);

        assert_eq!(ring[0].allowed_destinations().unwrap(), ["only"]);
    }

    #[test]
    fn empty_ring_is_empty() {
        assert!(linear_ring(Vec::<String>::new()).is_empty());
    }
}
