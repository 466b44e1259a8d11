//! State subscriptions.
//!
//! Subscriptions made before the machine starts are queued verbatim and
//! resolved against the registry when `start` runs. Subscriptions made
//! afterwards are resolved immediately.

use crate::core::{Registry, Subscriber, WILDCARD};
use crate::engine::error::MachineError;
use std::fmt;
use std::rc::Rc;

/// Which states a subscriber listens to.
///
/// Converts from a single name, `"*"`, or a list of names. A list whose
/// first entry is `"*"` means every state.
///
/// # Example
///
/// ```rust
/// use statewise::engine::StatePattern;
///
/// assert_eq!(StatePattern::from("*"), StatePattern::Any);
/// assert_eq!(StatePattern::from(vec!["*", "ignored"]), StatePattern::Any);
/// assert_eq!(
///     StatePattern::from(["a", "b"]),
///     StatePattern::Names(vec!["a".to_string(), "b".to_string()])
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatePattern {
    Any,
    Names(Vec<String>),
}

impl StatePattern {
    pub fn names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.first().is_some_and(|n| n == WILDCARD) {
            Self::Any
        } else {
            Self::Names(names)
        }
    }

    /// Expand the pattern against the registered state names.
    pub fn resolve<'a>(&'a self, registered: &'a [String]) -> &'a [String] {
        match self {
            Self::Any => registered,
            Self::Names(names) => names,
        }
    }
}

impl From<&str> for StatePattern {
    fn from(name: &str) -> Self {
        Self::names([name])
    }
}

impl From<String> for StatePattern {
    fn from(name: String) -> Self {
        Self::names([name])
    }
}

impl From<Vec<&str>> for StatePattern {
    fn from(names: Vec<&str>) -> Self {
        Self::names(names)
    }
}

impl From<Vec<String>> for StatePattern {
    fn from(names: Vec<String>) -> Self {
        Self::names(names)
    }
}

impl From<&[&str]> for StatePattern {
    fn from(names: &[&str]) -> Self {
        Self::names(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for StatePattern {
    fn from(names: [&str; N]) -> Self {
        Self::names(names)
    }
}

/// Subscription recorded before the machine started.
pub(crate) struct PendingSubscription {
    pub(crate) pattern: StatePattern,
    pub(crate) subscriber: Subscriber,
}

impl fmt::Debug for PendingSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubscription")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Subscriptions waiting for `start`.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionQueue {
    pending: Vec<PendingSubscription>,
}

impl SubscriptionQueue {
    pub(crate) fn push(&mut self, pattern: StatePattern, subscriber: Subscriber) {
        self.pending.push(PendingSubscription {
            pattern,
            subscriber,
        });
    }

    /// Take every queued subscription, leaving the queue empty.
    pub(crate) fn drain(&mut self) -> Vec<PendingSubscription> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Append `subscriber` to every state matched by `pattern`.
///
/// All names are resolved before anything is attached, so an unknown name
/// leaves the registry untouched. Returns the number of states subscribed.
pub(crate) fn attach(
    registry: &mut Registry,
    pattern: &StatePattern,
    subscriber: &Subscriber,
) -> Result<usize, MachineError> {
    let targets = pattern
        .resolve(registry.names())
        .iter()
        .map(|name| {
            registry
                .position(name)
                .ok_or_else(|| MachineError::UnknownState(name.clone()))
        })
        .collect::<Result<Vec<usize>, MachineError>>()?;

    for &index in &targets {
        registry.at_mut(index).add_subscriber(Rc::clone(subscriber));
    }
    Ok(targets.len())
}
