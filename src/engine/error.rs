//! Errors raised by the state machine.

use crate::core::{HookError, RegistryError};
use crate::engine::transition::HookStage;
use thiserror::Error;

/// Errors that can occur while driving a state machine.
///
/// Guard rejections and transitions to unknown names are not errors; see
/// [`TransitionOutcome`](crate::engine::TransitionOutcome).
#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Cannot subscribe to unknown state '{0}'")]
    UnknownState(String),

    #[error("No state named '{0}' is registered")]
    TargetNotFound(String),

    #[error("State machine has already been started")]
    AlreadyStarted,

    #[error("The {stage} hook of state '{state}' failed: {source}")]
    Hook {
        state: String,
        stage: HookStage,
        #[source]
        source: HookError,
    },
}

impl MachineError {
    pub(crate) fn hook(state: &str, stage: HookStage, source: HookError) -> Self {
        Self::Hook {
            state: state.to_string(),
            stage,
            source,
        }
    }

    /// Stage of the failing callback, for hook errors.
    pub fn hook_stage(&self) -> Option<HookStage> {
        match self {
            Self::Hook { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn hook_error_keeps_source() {
        let err = MachineError::hook("state2", HookStage::Enter, "boom".into());

        assert_eq!(
            err.to_string(),
            "The enter hook of state 'state2' failed: boom"
        );
        assert_eq!(err.hook_stage(), Some(HookStage::Enter));
        assert_eq!(err.source().map(|e| e.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn other_errors_have_no_stage() {
        assert_eq!(MachineError::AlreadyStarted.hook_stage(), None);
        assert_eq!(
            MachineError::UnknownState("ghost".to_string()).to_string(),
            "Cannot subscribe to unknown state 'ghost'"
        );
    }
}
