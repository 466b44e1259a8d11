//! Visit history tracking.
//!
//! The history is an append-only log of activations. Entries keep only the
//! state name and the time it was entered, never a reference to the state
//! itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single activation.
///
/// # Example
///
/// ```rust
/// use statewise::core::Visit;
/// use chrono::Utc;
///
/// let visit = Visit {
///     state_name: "idle".to_string(),
///     entered_at: Utc::now(),
/// };
/// assert_eq!(visit.state_name, "idle");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Name of the state that was activated
    pub state_name: String,
    /// When the state was entered
    pub entered_at: DateTime<Utc>,
}

/// Ordered history of activations.
///
/// # Example
///
/// ```rust
/// use statewise::core::VisitHistory;
///
/// let mut history = VisitHistory::new();
/// history.record("start");
/// history.record("middle");
/// history.record("end");
///
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.previous().map(|v| v.state_name.as_str()), Some("middle"));
/// assert_eq!(history.path(), vec!["start", "middle", "end"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitHistory {
    visits: Vec<Visit>,
}

impl VisitHistory {
    pub fn new() -> Self {
        Self { visits: Vec::new() }
    }

    /// Append an activation of `state_name` entered now.
    pub fn record(&mut self, state_name: impl Into<String>) -> &Visit {
        self.record_at(state_name, Utc::now())
    }

    /// Append an activation with an explicit enter time.
    pub fn record_at(
        &mut self,
        state_name: impl Into<String>,
        entered_at: DateTime<Utc>,
    ) -> &Visit {
        self.visits.push(Visit {
            state_name: state_name.into(),
            entered_at,
        });
        &self.visits[self.visits.len() - 1]
    }

    /// All recorded visits in order.
    pub fn entries(&self) -> &[Visit] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// The most recent visit.
    pub fn last(&self) -> Option<&Visit> {
        self.visits.last()
    }

    /// The visit immediately preceding the most recent one.
    ///
    /// This is positional: after a self-transition it names the same state
    /// as [`last`](Self::last).
    pub fn previous(&self) -> Option<&Visit> {
        self.visits
            .len()
            .checked_sub(2)
            .and_then(|index| self.visits.get(index))
    }

    /// Names of visited states in order.
    pub fn path(&self) -> Vec<&str> {
        self.visits.iter().map(|v| v.state_name.as_str()).collect()
    }

    /// How many times `state_name` appears in the history.
    pub fn visits_to(&self, state_name: &str) -> usize {
        self.visits
            .iter()
            .filter(|v| v.state_name == state_name)
            .count()
    }

    /// Time between the first and the last recorded visit.
    ///
    /// Returns `None` when nothing has been recorded yet.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.visits.first(), self.visits.last()) {
            let duration = last.entered_at.signed_duration_since(first.entered_at);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
