//! Builder for constructing state machines.

use crate::config::MachineConfig;
use crate::core::{HookError, HookResult, State, StateDescriptor};
use crate::engine::{MachineError, StateMachine, StatePattern};
use serde_json::Value;

type PendingCallback = Box<dyn FnOnce(&mut StateMachine) -> Result<(), MachineError>>;

/// Builder for constructing state machines with a fluent API.
///
/// Subscriptions and behaviors are applied in the order they were added,
/// after the states are registered and before the machine is started.
pub struct StateMachineBuilder {
    states: Vec<StateDescriptor>,
    config: MachineConfig,
    setup: Vec<PendingCallback>,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            config: MachineConfig::default(),
            setup: Vec::new(),
        }
    }

    /// Add a state.
    pub fn state(mut self, descriptor: StateDescriptor) -> Self {
        self.states.push(descriptor);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, descriptors: Vec<StateDescriptor>) -> Self {
        self.states.extend(descriptors);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribe a callback to the states matched by `pattern`.
    pub fn subscribe<P, F>(mut self, pattern: P, callback: F) -> Self
    where
        P: Into<StatePattern>,
        F: Fn(&State) -> HookResult + 'static,
    {
        let pattern = pattern.into();
        self.setup.push(Box::new(move |machine: &mut StateMachine| {
            machine.subscribe_to_state(pattern, callback).map(|_| ())
        }));
        self
    }

    /// Register a behavior shared by every state.
    pub fn behavior<F>(mut self, name: impl Into<String>, behavior: F) -> Self
    where
        F: Fn(&State, &Value) -> Result<Value, HookError> + 'static,
    {
        let name = name.into();
        self.setup.push(Box::new(move |machine: &mut StateMachine| {
            machine.decorate_states(name, behavior);
            Ok(())
        }));
        self
    }

    /// Build an unstarted machine.
    /// Returns an error if the state list is invalid.
    pub fn build(self) -> Result<StateMachine, MachineError> {
        let mut machine = StateMachine::with_config(self.config);
        machine.set_states(self.states)?;
        for apply in self.setup {
            apply(&mut machine)?;
        }
        Ok(machine)
    }

    /// Build the machine and start it.
    pub fn build_started(self) -> Result<StateMachine, MachineError> {
        let mut machine = self.build()?;
        machine.start()?;
        Ok(machine)
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
