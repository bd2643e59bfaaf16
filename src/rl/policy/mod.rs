//! Policy learner trait and implementations.

pub mod gradient;
pub mod random;
pub mod trait_;

pub use gradient::PolicyGradient;
pub use random::RandomPolicy;
pub use trait_::{LearnSummary, PolicyLearner};
