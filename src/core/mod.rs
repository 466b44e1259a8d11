//! State registry and state entity.
//!
//! This module contains the leaf of the machine:
//! - Descriptors supplied by callers and their normalization into states
//! - The state entity with its lifecycle hooks and visit counter
//! - The allow-list guard and the visit history
//!
//! Nothing here knows about the current state or subscriptions; that
//! belongs to the engine.

mod behavior;
mod descriptor;
mod guard;
mod history;
mod registry;
mod state;

pub use behavior::{Behavior, BehaviorError, BehaviorTable};
pub use descriptor::{StateDescriptor, WILDCARD};
pub use guard::{Guard, GuardDecision};
pub use history::{Visit, VisitHistory};
pub use registry::{DescriptorViolation, Registry, RegistryError};
pub use state::{EnterHook, HookError, HookResult, LeaveHook, State, Subscriber};
