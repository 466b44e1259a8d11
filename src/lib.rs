//! Statewise: a small synchronous finite-state notifier
//!
//! Statewise tracks a named current state out of a fixed set, restricts
//! transitions to an allow list declared per state, runs enter and leave
//! hooks, keeps a visit history and lets observers subscribe to specific
//! state activations.
//!
//! # Core Concepts
//!
//! - **State**: a named node with enter/leave hooks and allowed destinations
//! - **Guard**: `go_to_state` only moves where the current state allows
//! - **Activation**: leave old, record history, enter new, notify subscribers
//! - **History**: append-only record of every activation
//!
//! # Example
//!
//! ```rust
//! use statewise::{StateDescriptor, StateMachine};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&log);
//!
//! let mut machine = StateMachine::with_states(vec![
//!     StateDescriptor::new("draft").initial().allow(["review"]),
//!     StateDescriptor::new("review").allow(["draft", "published"]),
//!     StateDescriptor::new("published").allow(Vec::<String>::new()),
//! ])
//! .unwrap();
//!
//! machine
//!     .subscribe_to_state("published", move |state| {
//!         sink.borrow_mut().push(state.name().to_string());
//!         Ok(())
//!     })
//!     .unwrap();
//! machine.start().unwrap();
//!
//! // Not allowed from draft: nothing happens.
//! machine.go_to_state("published", None).unwrap();
//! assert!(machine.is_state("draft"));
//!
//! machine.go_to_state("review", None).unwrap();
//! machine.go_to_state("published", None).unwrap();
//! assert_eq!(*log.borrow(), ["published"]);
//! assert_eq!(machine.history().len(), 3);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::builder::StateMachineBuilder;
pub use crate::config::{MachineConfig, MissingTargetPolicy};
pub use crate::core::{HookError, HookResult, State, StateDescriptor, VisitHistory};
pub use crate::engine::{MachineError, StateMachine, StatePattern, TransitionOutcome};
