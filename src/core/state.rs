//! The state entity tracked by the registry.
//!
//! A [`State`] is created once from a [`StateDescriptor`] when the registry is
//! normalized and is afterwards mutated in place by the machine on every
//! activation and deactivation.

use super::behavior::{BehaviorError, BehaviorTable};
use super::descriptor::StateDescriptor;
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Error returned by a lifecycle hook, subscriber or behavior.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by lifecycle hooks and subscribers.
pub type HookResult = Result<(), HookError>;

/// Called after a state becomes current, with the optional transition payload.
pub type EnterHook = Box<dyn Fn(&State, Option<&Value>) -> HookResult>;

/// Called on the outgoing state before the next one is entered.
pub type LeaveHook = Box<dyn Fn(&State) -> HookResult>;

/// Observer notified on every activation of the states it subscribed to.
///
/// The same subscriber may be attached to several states, hence `Rc`.
pub type Subscriber = Rc<dyn Fn(&State) -> HookResult>;

/// One named node of the machine.
pub struct State {
    name: String,
    initial: bool,
    allowed_destinations: Vec<String>,
    on_enter: Option<EnterHook>,
    on_leave: Option<LeaveHook>,
    active: bool,
    visited_count: usize,
    subscribers: Vec<Subscriber>,
    metadata: Map<String, Value>,
    behaviors: BehaviorTable,
}

impl State {
    /// Build a state from its descriptor with an already-expanded allow list.
    pub(crate) fn from_descriptor(
        descriptor: StateDescriptor,
        allowed_destinations: Vec<String>,
        behaviors: BehaviorTable,
    ) -> Self {
        Self {
            name: descriptor.name,
            initial: descriptor.initial,
            allowed_destinations,
            on_enter: descriptor.on_enter,
            on_leave: descriptor.on_leave,
            active: false,
            visited_count: 0,
            subscribers: Vec::new(),
            metadata: descriptor.metadata,
            behaviors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// True only while this is the machine's current state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of times this state has been activated.
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// Names reachable from this state with `go_to_state`.
    pub fn allowed_destinations(&self) -> &[String] {
        &self.allowed_destinations
    }

    pub fn allows(&self, destination: &str) -> bool {
        self.allowed_destinations.iter().any(|d| d == destination)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn metadata_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.metadata
    }

    /// Run a behavior registered on the machine's behavior table.
    pub fn invoke(&self, method: &str, args: &Value) -> Result<Value, BehaviorError> {
        let behavior = self
            .behaviors
            .get(method)
            .ok_or_else(|| BehaviorError::Unknown(method.to_string()))?;

        behavior(self, args).map_err(|source| BehaviorError::Failed {
            method: method.to_string(),
            state: self.name.clone(),
            source,
        })
    }

    /// Mark active, count the visit, then run the enter hook.
    pub(crate) fn activate(&mut self, params: Option<&Value>) -> HookResult {
        self.active = true;
        self.visited_count += 1;

        let this: &State = self;
        if let Some(hook) = &this.on_enter {
            hook(this, params)?;
        }
        Ok(())
    }

    /// Mark inactive, then run the leave hook.
    pub(crate) fn deactivate(&mut self) -> HookResult {
        self.active = false;

        let this: &State = self;
        if let Some(hook) = &this.on_leave {
            hook(this)?;
        }
        Ok(())
    }

    pub(crate) fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub(crate) fn add_subscriber(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("allowed_destinations", &self.allowed_destinations)
            .field("active", &self.active)
            .field("visited_count", &self.visited_count)
            .field("subscribers", &self.subscribers.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn build(descriptor: StateDescriptor) -> State {
        State::from_descriptor(descriptor, vec!["test".to_string()], BehaviorTable::new())
    }

    #[test]
    fn new_state_is_inactive_and_unvisited() {
        let state = build(StateDescriptor::new("test").initial());

        assert_eq!(state.name(), "test");
        assert!(state.is_initial());
        assert!(!state.is_active());
        assert_eq!(state.visited_count(), 0);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn activate_counts_visits_and_passes_params() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut state = build(StateDescriptor::new("test").on_enter(move |state, params| {
            sink.borrow_mut().push((state.visited_count(), params.cloned()));
            Ok(())
        }));

        state.activate(None).unwrap();
        assert!(state.is_active());
        assert_eq!(state.visited_count(), 1);

        state.activate(Some(&json!({"test": 123}))).unwrap();
        assert_eq!(state.visited_count(), 2);

        let seen = seen.borrow();
        assert_eq!(seen[0], (1, None));
        assert_eq!(seen[1], (2, Some(json!({"test": 123}))));
    }

    #[test]
    fn deactivate_runs_leave_hook_after_clearing_flag() {
        let observed_active = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&observed_active);
        let mut state = build(StateDescriptor::new("test").on_leave(move |state| {
            *sink.borrow_mut() = Some(state.is_active());
            Ok(())
        }));

        state.activate(None).unwrap();
        state.deactivate().unwrap();

        assert!(!state.is_active());
        assert_eq!(*observed_active.borrow(), Some(false));
    }

    #[test]
    fn hook_errors_are_returned() {
        let mut state =
            build(StateDescriptor::new("test").on_enter(|_, _| Err("enter failed".into())));

        let err = state.activate(None).unwrap_err();
        assert_eq!(err.to_string(), "enter failed");
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn metadata_survives_construction() {
        let mut state = build(StateDescriptor::new("test").metadata("blergh", json!("asd")));

        assert_eq!(state.metadata_value("blergh"), Some(&json!("asd")));
        state.metadata_mut().insert("extra".to_string(), json!(true));
        assert_eq!(state.metadata().len(), 2);
    }

    #[test]
    fn invoke_uses_shared_behavior_table() {
        let table = BehaviorTable::new();
        let state = State::from_descriptor(StateDescriptor::new("test"), Vec::new(), table.clone());

        assert!(matches!(
            state.invoke("shout", &Value::Null),
            Err(BehaviorError::Unknown(name)) if name == "shout"
        ));

        table.insert("shout", |state, _| Ok(json!(state.name().to_uppercase())));
        assert_eq!(state.invoke("shout", &Value::Null).unwrap(), json!("TEST"));
    }

    #[test]
    fn allows_checks_destination_list() {
        let state = build(StateDescriptor::new("test"));
        assert!(state.allows("test"));
        assert!(!state.allows("other"));
    }
}
