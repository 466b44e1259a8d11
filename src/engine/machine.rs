//! The transition engine.

use crate::config::{MachineConfig, MissingTargetPolicy};
use crate::core::{
    BehaviorTable, Guard, GuardDecision, HookError, HookResult, Registry, State,
    StateDescriptor, Subscriber, VisitHistory,
};
use crate::engine::error::MachineError;
use crate::engine::subscription::{attach, StatePattern, SubscriptionQueue};
use crate::engine::transition::{HookStage, TransitionOutcome};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// Synchronous finite-state notifier.
///
/// Tracks the current state out of a registry, restricts `go_to_state` to
/// each state's allow list, runs lifecycle hooks, records a visit history
/// and notifies subscribers.
///
/// Every activation runs in this order: the old state's leave hook, the
/// history append, the new state's enter hook, then the new state's
/// subscribers in subscription order. A failing callback stops the
/// activation and its error is returned; steps already taken stay applied.
///
/// # Example
///
/// ```rust
/// use statewise::core::StateDescriptor;
/// use statewise::engine::StateMachine;
///
/// let mut machine = StateMachine::with_states(vec![
///     StateDescriptor::new("locked").initial().allow(["unlocked"]),
///     StateDescriptor::new("unlocked").allow(["locked"]),
/// ])
/// .unwrap();
///
/// machine.start().unwrap();
/// assert!(machine.is_state("locked"));
///
/// machine.go_to_state("unlocked", None).unwrap();
/// assert!(machine.is_state("unlocked"));
/// assert_eq!(machine.previous_state().unwrap().name(), "locked");
/// ```
#[derive(Debug, Default)]
pub struct StateMachine {
    registry: Registry,
    behaviors: BehaviorTable,
    current: Option<usize>,
    history: VisitHistory,
    queue: SubscriptionQueue,
    started: bool,
    config: MachineConfig,
}

impl StateMachine {
    /// Create an unstarted machine with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create an unstarted machine seeded with `descriptors`.
    pub fn with_states(descriptors: Vec<StateDescriptor>) -> Result<Self, MachineError> {
        let mut machine = Self::new();
        machine.set_states(descriptors)?;
        Ok(machine)
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Replace the registry with freshly normalized states.
    ///
    /// On a validation failure the previous registry is kept. When the
    /// machine is already running, the current state is dropped without
    /// running its leave hook and the new initial state is activated;
    /// history is kept.
    pub fn set_states(
        &mut self,
        descriptors: Vec<StateDescriptor>,
    ) -> Result<&mut Self, MachineError> {
        let registry = Registry::normalize(descriptors, &self.behaviors)?;
        debug!(states = registry.len(), started = self.started, "state registry replaced");

        self.registry = registry;
        self.current = None;
        if self.started {
            self.activate_initial()?;
        }
        Ok(self)
    }

    /// Attach queued subscriptions and activate the initial state.
    ///
    /// Only the first call does anything; later calls are no-ops unless
    /// `strict_start` is configured, in which case they fail.
    pub fn start(&mut self) -> Result<&mut Self, MachineError> {
        if self.started {
            if self.config.strict_start {
                return Err(MachineError::AlreadyStarted);
            }
            trace!("start ignored, machine already started");
            return Ok(self);
        }
        self.started = true;

        for pending in self.queue.drain() {
            attach(&mut self.registry, &pending.pattern, &pending.subscriber)?;
        }

        self.activate_initial()?;
        debug!(
            current = ?self.current_state().map(State::name),
            "state machine started"
        );
        Ok(self)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Move to `name` if the current state allows it.
    ///
    /// The first transition of a machine with no current state is always
    /// allowed. Rejections and unknown names change nothing.
    pub fn go_to_state(
        &mut self,
        name: &str,
        params: Option<&Value>,
    ) -> Result<TransitionOutcome, MachineError> {
        let Some(target) = self.registry.position(name) else {
            return match self.config.missing_target {
                MissingTargetPolicy::Ignore => {
                    trace!(state = name, "transition target not registered");
                    Ok(TransitionOutcome::NotFound {
                        name: name.to_string(),
                    })
                }
                MissingTargetPolicy::Error => Err(MachineError::TargetNotFound(name.to_string())),
            };
        };

        let decision = Guard::new(self.current_state()).check(name);
        match decision {
            GuardDecision::Rejected => {
                let from = self
                    .current_state()
                    .map(|s| s.name().to_string())
                    .unwrap_or_default();
                trace!(from = %from, to = name, "transition rejected by guard");
                Ok(TransitionOutcome::Rejected {
                    from,
                    to: name.to_string(),
                })
            }
            GuardDecision::Allowed | GuardDecision::Bootstrap => self.activate(target, params),
        }
    }

    /// Advance to the next state in registration order, wrapping around.
    ///
    /// This ignores allow lists. With no current state the first registered
    /// state is activated.
    pub fn next_state(
        &mut self,
        params: Option<&Value>,
    ) -> Result<TransitionOutcome, MachineError> {
        if self.registry.is_empty() {
            trace!("next_state called on an empty registry");
            return Ok(TransitionOutcome::NoStates);
        }

        let next = self.current.map_or(0, |index| (index + 1) % self.registry.len());
        self.activate(next, params)
    }

    /// Notify `callback` on every activation of the matched states.
    ///
    /// Before `start` the subscription is queued as given. Afterwards the
    /// pattern is resolved immediately and every name must be registered.
    pub fn subscribe_to_state<P, F>(
        &mut self,
        pattern: P,
        callback: F,
    ) -> Result<&mut Self, MachineError>
    where
        P: Into<StatePattern>,
        F: Fn(&State) -> HookResult + 'static,
    {
        let pattern = pattern.into();
        let subscriber: Subscriber = Rc::new(callback);

        if self.started {
            let count = attach(&mut self.registry, &pattern, &subscriber)?;
            debug!(?pattern, states = count, "subscriber attached");
        } else {
            trace!(?pattern, "subscription queued until start");
            self.queue.push(pattern, subscriber);
        }
        Ok(self)
    }

    /// Register a behavior callable on every state via [`State::invoke`].
    ///
    /// States created later by `set_states` gain it too.
    pub fn decorate_states<F>(&mut self, name: impl Into<String>, behavior: F) -> &mut Self
    where
        F: Fn(&State, &Value) -> Result<Value, HookError> + 'static,
    {
        self.behaviors.insert(name, behavior);
        self
    }

    pub fn behaviors(&self) -> &BehaviorTable {
        &self.behaviors
    }

    pub fn current_state(&self) -> Option<&State> {
        self.current.map(|index| self.registry.at(index))
    }

    pub fn is_state(&self, name: &str) -> bool {
        self.current_state().is_some_and(|s| s.name() == name)
    }

    /// State named by the second-to-last history entry.
    pub fn previous_state(&self) -> Option<&State> {
        self.history
            .previous()
            .and_then(|visit| self.registry.lookup(&visit.state_name))
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.registry.lookup(name)
    }

    pub fn state_mut(&mut self, name: &str) -> Option<&mut State> {
        self.registry.lookup_mut(name)
    }

    /// Destinations allowed from the current state.
    pub fn possible_states(&self) -> Option<&[String]> {
        self.current_state().map(State::allowed_destinations)
    }

    /// Registered names not reachable from the current state, in
    /// registration order.
    pub fn impossible_states(&self) -> Option<Vec<&str>> {
        let current = self.current_state()?;
        Some(
            self.registry
                .names()
                .iter()
                .filter(|name| !current.allows(name))
                .map(String::as_str)
                .collect(),
        )
    }

    pub fn state_names(&self) -> &[String] {
        self.registry.names()
    }

    pub fn states(&self) -> &[State] {
        self.registry.states()
    }

    pub fn history(&self) -> &VisitHistory {
        &self.history
    }

    /// Subscriptions waiting for `start`.
    pub fn pending_subscriptions(&self) -> usize {
        self.queue.len()
    }

    fn activate_initial(&mut self) -> Result<(), MachineError> {
        if let Some(index) = self.registry.initial_position() {
            self.activate(index, None)?;
        }
        Ok(())
    }

    fn activate(
        &mut self,
        target: usize,
        params: Option<&Value>,
    ) -> Result<TransitionOutcome, MachineError> {
        let from = match self.current {
            Some(index) => {
                let current = self.registry.at_mut(index);
                current
                    .deactivate()
                    .map_err(|source| MachineError::hook(current.name(), HookStage::Leave, source))?;
                Some(current.name().to_string())
            }
            None => None,
        };

        let to = self.registry.at(target).name().to_string();
        self.history.record(to.as_str());
        self.current = Some(target);

        let state = self.registry.at_mut(target);
        state
            .activate(params)
            .map_err(|source| MachineError::hook(&to, HookStage::Enter, source))?;
        debug!(
            from = ?from,
            to = %to,
            visits = state.visited_count(),
            "state activated"
        );

        let state = self.registry.at(target);
        for subscriber in state.subscribers() {
            subscriber(state)
                .map_err(|source| MachineError::hook(&to, HookStage::Subscriber, source))?;
        }

        Ok(TransitionOutcome::Activated { from, to })
    }
}
