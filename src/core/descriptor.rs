//! Caller-supplied state descriptions.

use super::state::{EnterHook, HookResult, LeaveHook, State};
use serde_json::{Map, Value};
use std::fmt;

/// Destination sentinel meaning "every registered state".
pub const WILDCARD: &str = "*";

/// Description of one state, turned into a [`State`] by the registry.
///
/// # Example
///
/// ```rust
/// use statewise::core::StateDescriptor;
/// use serde_json::json;
///
/// let idle = StateDescriptor::new("idle")
///     .initial()
///     .allow(["running"])
///     .metadata("label", json!("Idle"))
///     .on_enter(|state, _params| {
///         println!("entered {}", state.name());
///         Ok(())
///     });
///
/// assert_eq!(idle.name(), "idle");
/// assert!(idle.is_initial());
/// ```
pub struct StateDescriptor {
    pub(crate) name: String,
    pub(crate) initial: bool,
    pub(crate) allowed_destinations: Option<Vec<String>>,
    pub(crate) on_enter: Option<EnterHook>,
    pub(crate) on_leave: Option<LeaveHook>,
    pub(crate) metadata: Map<String, Value>,
}

impl StateDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: false,
            allowed_destinations: None,
            on_enter: None,
            on_leave: None,
            metadata: Map::new(),
        }
    }

    /// Mark this state as the one activated by `start`.
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    /// Restrict the states reachable with `go_to_state`.
    ///
    /// A list whose first entry is `"*"` allows every registered state,
    /// as does never calling this method.
    pub fn allow<I, N>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.allowed_destinations = Some(destinations.into_iter().map(Into::into).collect());
        self
    }

    /// Allow every registered state, including this one.
    pub fn allow_any(mut self) -> Self {
        self.allowed_destinations = Some(vec![WILDCARD.to_string()]);
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Value>) -> HookResult + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State) -> HookResult + 'static,
    {
        self.on_leave = Some(Box::new(hook));
        self
    }

    /// Attach a caller-defined property that survives normalization.
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn allowed_destinations(&self) -> Option<&[String]> {
        self.allowed_destinations.as_deref()
    }

    /// True when the destinations expand to the full set of state names.
    pub fn allows_any(&self) -> bool {
        match &self.allowed_destinations {
            None => true,
            Some(destinations) => destinations.first().is_some_and(|d| d == WILDCARD),
        }
    }
}

impl fmt::Debug for StateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDescriptor")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("allowed_destinations", &self.allowed_destinations)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}
