//! Policy-gradient training of robot aggregation.
//!
//! The [`Driver`] runs the per-tick protocol: robots with a neighbour act
//! under the learner's policy, the environment advances one step, and the
//! resulting transitions are filtered by [`credit::admit`] before reaching
//! the learner. Once enough transitions are admitted the [`EpisodeTrigger`]
//! runs one batched update.
//!
//! The neural learner requires the `rl-nn` feature flag.

pub mod config;
pub mod credit;
pub mod decision;
pub mod driver;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod snapshot;
pub mod training;
pub mod types;

#[cfg(feature = "rl-nn")]
pub mod network;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{SimulationConfig, TrainingConfig};
pub use credit::{admit, Verdict};
pub use decision::{AgentTurn, DecisionLoop, TickOutcome};
pub use driver::{Driver, DriverState};
pub use environment::{AggregationEnv, Controls, EnvObservation, Environment};
pub use error::{ConfigError, ContractViolation, DriverError, LearnerError};
pub use metrics::TrainingStats;
pub use policy::{LearnSummary, PolicyGradient, PolicyLearner, RandomPolicy};
pub use snapshot::{AgentSnapshot, Snapshot};
pub use training::{EpisodeTrigger, Transition, TransitionBuffer};
pub use types::{Action, AgentIndex, Heading, Position};

#[cfg(feature = "rl-nn")]
pub use network::NeuralPolicyGradient;
