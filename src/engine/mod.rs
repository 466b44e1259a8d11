//! The transition engine.
//!
//! Owns the current-state pointer, the visit history and the subscribers,
//! and drives activations through the registry.
//!
//! # Key Concepts
//!
//! - **Guard**: `go_to_state` only moves to destinations the current state allows
//! - **Linear advance**: `next_state` walks registration order and skips the guard
//! - **Subscriptions**: queued before `start`, resolved immediately after
//!
//! Everything is synchronous. Callbacks run in-line on the caller's thread
//! and their errors are returned from the operation that triggered them.

mod error;
mod machine;
mod subscription;
mod transition;

pub use error::MachineError;
pub use machine::StateMachine;
pub use subscription::StatePattern;
pub use transition::{HookStage, TransitionOutcome};
