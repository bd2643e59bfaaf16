//! Random policy for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::{LearnSummary, PolicyLearner};
use crate::rl::error::LearnerError;
use crate::rl::training::buffer::{Transition, TransitionBuffer};
use crate::rl::types::Action;

/// Uniformly random action selection.
///
/// Each robot independently gets a random action from the [`Action`]
/// domain. Learning only empties the buffer. Used for sanity checks and as
/// a lower-bound baseline.
pub struct RandomPolicy {
    rng: StdRng,
    buffer: TransitionBuffer,
}

impl RandomPolicy {
    /// Creates a new random policy.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            buffer: TransitionBuffer::new(),
        }
    }
}

impl PolicyLearner for RandomPolicy {
    fn choose_action(&mut self, _observation: &[f64]) -> Action {
        let index = self.rng.gen_range(0..Action::COUNT);
        Action::from_index(index).unwrap_or_default()
    }

    fn store_transition(&mut self, transition: Transition) {
        self.buffer.add(transition);
    }

    fn learn(&mut self) -> Result<LearnSummary, LearnerError> {
        let batch = self.buffer.drain();
        Ok(LearnSummary {
            batch_size: batch.len(),
            loss: 0.0,
        })
    }

    fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_policy_covers_action_domain() {
        let mut policy = RandomPolicy::new(7);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[policy.choose_action(&[0.0; 4]).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn learn_empties_buffer() {
        let mut policy = RandomPolicy::new(7);
        policy.store_transition(Transition::new(vec![0.1], Action::TurnLeft, 1.0));
        assert_eq!(policy.pending(), 1);
        let summary = policy.learn().unwrap();
        assert_eq!(summary.batch_size, 1);
        assert_eq!(policy.pending(), 0);
    }
}
