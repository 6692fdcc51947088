//! Runtime configuration for the machine and its reporter.
//!
//! Both structs have defaults matching the classic simulator behaviour, so callers
//! only touch the fields they care about. Values are checked with `validate` before
//! a machine is built from them.

use serde::{Deserialize, Serialize};

use crate::types::{
    TuringMachineError, INITIAL_TAPE_LENGTH, STEP_LOG_INTERVAL, STEP_LOG_THRESHOLD,
    TAPE_GROWTH_CHUNK,
};

/// How the validator counts transitions that target the halt state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltRule {
    /// Each halting transition toggles a flag that must end up set,
    /// so any odd number of halting transitions is accepted.
    #[default]
    Toggle,
    /// At least one transition must target the halt state.
    AtLeastOne,
}

impl HaltRule {
    /// Whether a table with `count` halting transitions passes this rule.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            HaltRule::Toggle => count % 2 == 1,
            HaltRule::AtLeastOne => count >= 1,
        }
    }
}

/// Settings for table validation and the tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Length of the tape the machine starts with.
    pub initial_tape_length: usize,
    /// Number of zero cells added when the head walks off either end.
    pub growth_chunk: usize,
    pub halt_rule: HaltRule,
    /// Stop after this many steps even if the machine has not halted.
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            initial_tape_length: INITIAL_TAPE_LENGTH,
            growth_chunk: TAPE_GROWTH_CHUNK,
            halt_rule: HaltRule::default(),
            step_limit: None,
        }
    }
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), TuringMachineError> {
        if self.initial_tape_length == 0 {
            return Err(TuringMachineError::InvalidConfig(
                "initial tape length must be at least 1".to_string(),
            ));
        }

        if self.growth_chunk == 0 {
            return Err(TuringMachineError::InvalidConfig(
                "tape growth chunk must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Display options handed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Print the whole tape on every step instead of step log lines.
    pub show_tape: bool,
    /// Skip the tape dump that precedes the halt statistics.
    pub suppress_halt_tape: bool,
    /// Every step below this count is logged.
    pub log_threshold: u64,
    /// Past the threshold, only multiples of this interval are logged.
    pub log_interval: u64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_tape: false,
            suppress_halt_tape: false,
            log_threshold: STEP_LOG_THRESHOLD,
            log_interval: STEP_LOG_INTERVAL,
        }
    }
}

impl DisplayOptions {
    pub fn validate(&self) -> Result<(), TuringMachineError> {
        if self.log_interval == 0 {
            return Err(TuringMachineError::InvalidConfig(
                "step log interval must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the step log line for `step` is printed. A zero interval logs
    /// nothing past the threshold.
    pub fn logs_step(&self, step: u64) -> bool {
        !self.show_tape
            && (step < self.log_threshold || step.checked_rem(self.log_interval) == Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halt_rule_toggle_accepts_odd_counts() {
        assert!(!HaltRule::Toggle.accepts(0));
        assert!(HaltRule::Toggle.accepts(1));
        assert!(!HaltRule::Toggle.accepts(2));
        assert!(HaltRule::Toggle.accepts(3));
    }

    #[test]
    fn test_halt_rule_at_least_one() {
        assert!(!HaltRule::AtLeastOne.accepts(0));
        assert!(HaltRule::AtLeastOne.accepts(1));
        assert!(HaltRule::AtLeastOne.accepts(2));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::default();
        assert_eq!(config.initial_tape_length, 20);
        assert_eq!(config.growth_chunk, 1000);
        assert!(config.validate().is_ok());
        assert!(DisplayOptions::default().validate().is_ok());
    }

    #[test]
    fn test_zero_growth_chunk_is_rejected() {
        let config = MachineConfig {
            growth_chunk: 0,
            ..MachineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TuringMachineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_step_log_cadence() {
        let options = DisplayOptions::default();

        assert!(options.logs_step(0));
        assert!(options.logs_step(9_999));
        assert!(!options.logs_step(10_000));
        assert!(!options.logs_step(10_001));
        assert!(options.logs_step(50_000));
        assert!(!options.logs_step(50_001));
        assert!(options.logs_step(100_000));
    }

    #[test]
    fn test_zero_log_interval() {
        let options = DisplayOptions {
            log_threshold: 3,
            log_interval: 0,
            ..DisplayOptions::default()
        };

        assert!(options.validate().is_err());
        assert!(options.logs_step(2));
        assert!(!options.logs_step(3));
        assert!(!options.logs_step(100));
    }

    #[test]
    fn test_tape_display_suppresses_step_log() {
        let options = DisplayOptions {
            show_tape: true,
            ..DisplayOptions::default()
        };

        assert!(!options.logs_step(0));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: MachineConfig =
            serde_json::from_str(r#"{"growth_chunk": 8, "halt_rule": "AtLeastOne"}"#).unwrap();

        assert_eq!(config.growth_chunk, 8);
        assert_eq!(config.initial_tape_length, 20);
        assert_eq!(config.halt_rule, HaltRule::AtLeastOne);
    }
}
