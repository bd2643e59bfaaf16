//! Policy learner trait for the aggregation trainer.

use crate::rl::error::LearnerError;
use crate::rl::training::buffer::Transition;
use crate::rl::types::Action;

/// Outcome of one batched update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnSummary {
    /// Transitions consumed by the update.
    pub batch_size: usize,
    /// Mean policy loss over the final pass.
    pub loss: f64,
}

/// A policy that chooses actions and learns from admitted transitions.
///
/// Actions are drawn from the fixed [`Action`] domain. The learner owns its
/// transition storage; [`PolicyLearner::learn`] consumes and clears it.
pub trait PolicyLearner {
    /// Chooses an action for one robot from its observation.
    fn choose_action(&mut self, observation: &[f64]) -> Action;

    /// Appends a transition to the learner's buffer.
    fn store_transition(&mut self, transition: Transition);

    /// Performs a batched parameter update over the stored transitions and
    /// clears the buffer, whether or not the update succeeds.
    fn learn(&mut self) -> Result<LearnSummary, LearnerError>;

    /// Number of transitions waiting for the next update.
    fn pending(&self) -> usize;

    /// Returns a human-readable name for this learner.
    fn name(&self) -> &str;
}

impl<L: PolicyLearner + ?Sized> PolicyLearner for Box<L> {
    fn choose_action(&mut self, observation: &[f64]) -> Action {
        (**self).choose_action(observation)
    }

    fn store_transition(&mut self, transition: Transition) {
        (**self).store_transition(transition)
    }

    fn learn(&mut self) -> Result<LearnSummary, LearnerError> {
        (**self).learn()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
