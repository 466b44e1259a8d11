//! Shared behavior table for states.
//!
//! Behaviors are named functions attached to every state of a machine at
//! once. The table is shared by reference, so states created after a
//! behavior was registered (for example by replacing the state list) can
//! invoke it as well.

use super::state::{HookError, State};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// A named behavior callable on any state.
pub type Behavior = Rc<dyn Fn(&State, &Value) -> Result<Value, HookError>>;

/// Errors raised when invoking a behavior on a state.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("No behavior named '{0}' is registered")]
    Unknown(String),

    #[error("Behavior '{method}' failed on state '{state}': {source}")]
    Failed {
        method: String,
        state: String,
        #[source]
        source: HookError,
    },
}

/// Mapping from behavior name to function, shared by all states of a machine.
///
/// Cloning the table yields another handle to the same mapping.
#[derive(Clone, Default)]
pub struct BehaviorTable {
    methods: Rc<RefCell<HashMap<String, Behavior>>>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior, replacing any existing one with the same name.
    pub fn insert<F>(&self, name: impl Into<String>, behavior: F)
    where
        F: Fn(&State, &Value) -> Result<Value, HookError> + 'static,
    {
        self.methods
            .borrow_mut()
            .insert(name.into(), Rc::new(behavior));
    }

    /// Look up a behavior by name.
    ///
    /// The returned handle is detached from the table borrow, so the
    /// behavior may run while the table is modified.
    pub fn get(&self, name: &str) -> Option<Behavior> {
        self.methods.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.borrow().contains_key(name)
    }

    /// Names of all registered behaviors, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.borrow().is_empty()
    }
}

impl fmt::Debug for BehaviorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTable")
            .field("methods", &self.names())
            .finish()
    }
}
