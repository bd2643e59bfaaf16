//! Error types for configuration, learners, and the training driver.

use thiserror::Error;

/// Rejected configuration, detected before the driver loop starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Robot quantity must be positive")]
    NoRobots,

    #[error("View divisions must be positive (observation length)")]
    NoViewDivisions,

    #[error("Episode threshold must be positive")]
    ZeroThreshold,

    #[error("Training repeats must be positive")]
    ZeroTrainingRepeats,

    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Score rings must not be empty")]
    NoScoreRings,
}

/// Failure raised by a learner's batched update.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LearnerError {
    #[error("Cannot learn from an empty transition buffer")]
    EmptyBuffer,

    #[error("Observation has length {actual}, learner expects {expected}")]
    ObservationWidth { expected: usize, actual: usize },

    #[error("Policy update produced a non-finite loss")]
    NonFiniteLoss,
}

/// A collaborator broke its contract with the decision loop.
///
/// The tick in which it happened is aborted as a whole; no transition is
/// forwarded and the episode counter is untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("Environment reported {actual} observations for {expected} robots")]
    ObservationCount { expected: usize, actual: usize },

    #[error("Environment reported {actual} neighbour flags for {expected} robots")]
    NeighborFlagCount { expected: usize, actual: usize },

    #[error("Environment reported {actual} active flags for {expected} robots")]
    ActiveFlagCount { expected: usize, actual: usize },

    #[error("Environment returned {actual} rewards for {expected} actions")]
    RewardCount { expected: usize, actual: usize },

    #[error("Observation for robot {index} has length {actual}, expected {expected}")]
    ObservationWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced by the training driver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DriverError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Collaborator contract violated: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("Learner failed: {0}")]
    LearnerFailure(#[from] LearnerError),
}

impl DriverError {
    /// Returns true if the driver loop may keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DriverError::LearnerFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_display() {
        let e = ConfigError::NonPositive {
            name: "sensor_range",
            value: -1.0,
        };
        assert_eq!(
            e.to_string(),
            "sensor_range must be a positive finite number, got -1"
        );
    }

    #[test]
    fn contract_violation_wraps_into_driver_error() {
        let e: DriverError = ContractViolation::RewardCount {
            expected: 3,
            actual: 2,
        }
        .into();
        assert!(e.to_string().contains("3 actions"));
        assert!(!e.is_recoverable());
    }

    #[test]
    fn learner_failure_is_recoverable() {
        let e: DriverError = LearnerError::EmptyBuffer.into();
        assert!(e.is_recoverable());
    }
}
