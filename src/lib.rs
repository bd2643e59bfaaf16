//! aggrl - Aggregation Robots Learning
//!
//! Trains a swarm of robots to hold their spacing to neighbours with a
//! policy-gradient learner, admitting only the transitions the policy could
//! have caused.

pub mod rl;

pub use rl::{
    Action, AggregationEnv, Driver, DriverError, DriverState, Environment, PolicyGradient,
    PolicyLearner, SimulationConfig, TrainingConfig,
};
