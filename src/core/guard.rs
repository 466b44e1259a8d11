//! Transition guard for `go_to_state`.
//!
//! The guard is a pure decision over the current state and the requested
//! destination. It never mutates anything; the machine acts on the result.

use super::state::State;

/// Outcome of evaluating the guard for a requested destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// No state is current yet, so the first transition is always permitted.
    Bootstrap,
    /// The destination is in the current state's allow list.
    Allowed,
    /// The destination is not reachable from the current state.
    Rejected,
}

impl GuardDecision {
    pub fn permits(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Allow-list guard evaluated against the current state.
///
/// # Example
///
/// ```rust
/// use statewise::core::{Guard, GuardDecision};
///
/// let guard = Guard::new(None);
/// assert_eq!(guard.check("anything"), GuardDecision::Bootstrap);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Guard<'a> {
    current: Option<&'a State>,
}

impl<'a> Guard<'a> {
    pub fn new(current: Option<&'a State>) -> Self {
        Guard { current }
    }

    /// Decide whether a transition to `destination` may run.
    pub fn check(&self, destination: &str) -> GuardDecision {
        match self.current {
            None => GuardDecision::Bootstrap,
            Some(state) if state.allows(destination) => GuardDecision::Allowed,
            Some(_) => GuardDecision::Rejected,
        }
    }
}
