//! Machine configuration.
//!
//! Configuration is always passed in explicitly; the crate never reads the
//! environment.

use serde::{Deserialize, Serialize};

/// What `go_to_state` does when the requested state is not registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTargetPolicy {
    /// Treat the miss as a no-op and report `TransitionOutcome::NotFound`.
    #[default]
    Ignore,
    /// Return `MachineError::TargetNotFound`.
    Error,
}

/// Tunable behavior of a [`StateMachine`](crate::engine::StateMachine).
///
/// # Example
///
/// ```rust
/// use statewise::config::{MachineConfig, MissingTargetPolicy};
///
/// let config = MachineConfig::from_json(r#"{ "missing_target": "error" }"#).unwrap();
/// assert_eq!(config.missing_target, MissingTargetPolicy::Error);
/// assert!(!config.strict_start);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Handling of transitions to unregistered state names
    pub missing_target: MissingTargetPolicy,

    /// When true, calling `start` a second time is an error instead of a no-op
    pub strict_start: bool,
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn missing_target(mut self, policy: MissingTargetPolicy) -> Self {
        self.missing_target = policy;
        self
    }

    pub fn strict_start(mut self, strict: bool) -> Self {
        self.strict_start = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient() {
        let config = MachineConfig::default();

        assert_eq!(config.missing_target, MissingTargetPolicy::Ignore);
        assert!(!config.strict_start);
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(MachineConfig::from_json(r#"{ "missing_target": "panic" }"#).is_err());
    }

    #[test]
    fn config_serializes_correctly() {
        let config = MachineConfig::default()
            .missing_target(MissingTargetPolicy::Error)
            .strict_start(true);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"missing_target":"error","strict_start":true}"#);
        assert_eq!(MachineConfig::from_json(&json).unwrap(), config);
    }
}
