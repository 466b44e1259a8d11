//! Transition outcomes and hook stages.

use std::fmt;

/// What a call to `go_to_state` or `next_state` did.
///
/// Guard rejections and unknown targets are ordinary outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The target became the current state
    Activated { from: Option<String>, to: String },

    /// The target is not in the current state's allow list; nothing changed
    Rejected { from: String, to: String },

    /// No state with this name is registered; nothing changed
    NotFound { name: String },

    /// The registry is empty, so there is nothing to advance to
    NoStates,
}

impl TransitionOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Name of the newly active state, if the transition ran.
    pub fn activated_state(&self) -> Option<&str> {
        match self {
            Self::Activated { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Point of an activation at which a callback ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookStage {
    Leave,
    Enter,
    Subscriber,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Leave => "leave",
            Self::Enter => "enter",
            Self::Subscriber => "subscriber",
        };
        f.write_str(stage)
    }
}
