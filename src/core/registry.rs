//! State registry and descriptor normalization.
//!
//! Normalization turns caller-supplied [`StateDescriptor`]s into [`State`]s,
//! expanding wildcard destination lists into the full set of state names.
//! Descriptor validation uses `Validation` so every problem in a state list
//! is reported at once instead of stopping at the first.

use super::behavior::BehaviorTable;
use super::descriptor::StateDescriptor;
use super::state::State;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem found in a list of state descriptors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DescriptorViolation {
    #[error("State at position {position} has an empty name")]
    EmptyName { position: usize },

    #[error("State name '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("More than one initial state: {}", .names.join(", "))]
    MultipleInitial { names: Vec<String> },

    #[error("State '{state}' allows unknown destination '{destination}'")]
    UnknownDestination { state: String, destination: String },
}

/// Errors produced while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid state list: {} violation(s), first: {}", .0.len(), .0[0])]
    Invalid(Vec<DescriptorViolation>),
}

impl RegistryError {
    pub fn violations(&self) -> &[DescriptorViolation] {
        match self {
            Self::Invalid(violations) => violations,
        }
    }
}

/// Ordered collection of states plus the index of their names.
///
/// Registration order is significant: `next_state` advances through it.
#[derive(Debug, Default)]
pub struct Registry {
    states: Vec<State>,
    names: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate descriptors and build the states they describe.
    ///
    /// An empty list is valid and yields an empty registry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewise::core::{BehaviorTable, Registry, StateDescriptor};
    ///
    /// let registry = Registry::normalize(
    ///     vec![
    ///         StateDescriptor::new("a").initial().allow(["b"]),
    ///         StateDescriptor::new("b").allow(["*"]),
    ///     ],
    ///     &BehaviorTable::new(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(registry.names(), ["a", "b"]);
    /// assert_eq!(registry.lookup("b").unwrap().allowed_destinations(), ["a", "b"]);
    /// ```
    pub fn normalize(
        descriptors: Vec<StateDescriptor>,
        behaviors: &BehaviorTable,
    ) -> Result<Self, RegistryError> {
        let names: Vec<String> = descriptors.iter().map(|d| d.name.clone()).collect();

        if let Validation::Failure(errors) = validate(&descriptors, &names) {
            return Err(RegistryError::Invalid(errors.iter().cloned().collect()));
        }

        let states = descriptors
            .into_iter()
            .map(|descriptor| {
                let allowed = if descriptor.allows_any() {
                    names.clone()
                } else {
                    descriptor.allowed_destinations.clone().unwrap_or_default()
                };
                State::from_descriptor(descriptor, allowed, behaviors.clone())
            })
            .collect();

        Ok(Self { states, names })
    }

    /// Find a state by name. A miss is a normal outcome.
    pub fn lookup(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name() == name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.name() == name)
    }

    /// Registration index of a state.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name() == name)
    }

    /// Registration index of the state flagged initial, if any.
    pub fn initial_position(&self) -> Option<usize> {
        self.states.iter().position(State::is_initial)
    }

    /// All state names in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn at(&self, index: usize) -> &State {
        &self.states[index]
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> &mut State {
        &mut self.states[index]
    }
}

/// Check a descriptor list, accumulating every violation.
fn validate(
    descriptors: &[StateDescriptor],
    names: &[String],
) -> Validation<(), NonEmptyVec<DescriptorViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<DescriptorViolation>>> = Vec::new();

    for (position, descriptor) in descriptors.iter().enumerate() {
        if descriptor.name.is_empty() {
            checks.push(Validation::fail(DescriptorViolation::EmptyName { position }));
        }
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
            checks.push(Validation::fail(DescriptorViolation::DuplicateName {
                name: name.clone(),
            }));
        }
    }

    let initial: Vec<String> = descriptors
        .iter()
        .filter(|d| d.initial)
        .map(|d| d.name.clone())
        .collect();
    if initial.len() > 1 {
        checks.push(Validation::fail(DescriptorViolation::MultipleInitial {
            names: initial,
        }));
    }

    for descriptor in descriptors.iter().filter(|d| !d.allows_any()) {
        for destination in descriptor.allowed_destinations.iter().flatten() {
            if !seen.contains(destination.as_str()) {
                checks.push(Validation::fail(DescriptorViolation::UnknownDestination {
                    state: descriptor.name.clone(),
                    destination: destination.clone(),
                }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
