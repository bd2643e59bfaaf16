//! Linear softmax policy trained with REINFORCE.
//!
//! Every admitted transition is a one-step episode, so the return of an
//! action is its immediate reward. The update maximizes
//! `mean(A · log π(a | x))` where `A` is the (optionally normalized) reward.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::{LearnSummary, PolicyLearner};
use crate::rl::config::TrainingConfig;
use crate::rl::error::LearnerError;
use crate::rl::training::buffer::{normalized_rewards, Transition, TransitionBuffer};
use crate::rl::types::Action;

/// Softmax policy over [`Action`] with one linear layer.
///
/// Weights start at zero, so the untrained policy is uniform.
pub struct PolicyGradient {
    /// `weights[k]` holds the bias followed by one weight per input for action `k`.
    weights: Vec<Vec<f64>>,
    observation_dim: usize,
    config: TrainingConfig,
    buffer: TransitionBuffer,
    rng: StdRng,
    greedy: bool,
}

impl PolicyGradient {
    /// Creates a new learner.
    ///
    /// # Arguments
    ///
    /// * `observation_dim` - Observation length (the number of view divisions)
    /// * `config` - Learning rate, repeats, and reward normalization
    /// * `seed` - Seed for action sampling
    pub fn new(observation_dim: usize, config: TrainingConfig, seed: u64) -> Self {
        Self {
            weights: vec![vec![0.0; observation_dim + 1]; Action::COUNT],
            observation_dim,
            config,
            buffer: TransitionBuffer::new(),
            rng: StdRng::seed_from_u64(seed),
            greedy: false,
        }
    }

    /// Sets greedy mode (argmax vs sampling).
    pub fn set_greedy(&mut self, greedy: bool) {
        self.greedy = greedy;
    }

    /// Action probabilities for an observation, in [`Action::index`] order.
    pub fn action_probabilities(&self, observation: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .map(|w| w[0] + w[1..].iter().zip(observation).map(|(a, b)| a * b).sum::<f64>())
            .collect();
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.iter().map(|e| e / total).collect()
    }

    fn sample(&mut self, probs: &[f64]) -> usize {
        let u: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for (k, p) in probs.iter().enumerate() {
            cumulative += p;
            if u < cumulative {
                return k;
            }
        }
        probs.len() - 1
    }

    /// One gradient-ascent pass over the batch. Returns the loss measured
    /// before the step.
    fn update(&mut self, batch: &[Transition], advantages: &[f64]) -> f64 {
        let n = batch.len() as f64;
        let mut grads = vec![vec![0.0; self.observation_dim + 1]; Action::COUNT];
        let mut loss = 0.0;

        for (t, adv) in batch.iter().zip(advantages) {
            let probs = self.action_probabilities(&t.observation);
            let chosen = t.action.index();
            loss -= adv * probs[chosen].max(f64::MIN_POSITIVE).ln();

            for (k, grad) in grads.iter_mut().enumerate() {
                let indicator = if k == chosen { 1.0 } else { 0.0 };
                let g = adv * (indicator - probs[k]);
                grad[0] += g;
                for (gj, xj) in grad[1..].iter_mut().zip(&t.observation) {
                    *gj += g * xj;
                }
            }
        }

        let step = self.config.learning_rate / n;
        for (w, g) in self.weights.iter_mut().zip(&grads) {
            for (wj, gj) in w.iter_mut().zip(g) {
                *wj += step * gj;
            }
        }
        loss / n
    }
}

impl PolicyLearner for PolicyGradient {
    fn choose_action(&mut self, observation: &[f64]) -> Action {
        let probs = self.action_probabilities(observation);
        let index = if self.greedy {
            probs
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(k, _)| k)
                .unwrap_or(0)
        } else {
            self.sample(&probs)
        };
        Action::from_index(index).unwrap_or_default()
    }

    fn store_transition(&mut self, transition: Transition) {
        self.buffer.add(transition);
    }

    fn learn(&mut self) -> Result<LearnSummary, LearnerError> {
        let batch = self.buffer.drain();
        if batch.is_empty() {
            return Err(LearnerError::EmptyBuffer);
        }
        if let Some(bad) = batch
            .iter()
            .find(|t| t.observation.len() != self.observation_dim)
        {
            return Err(LearnerError::ObservationWidth {
                expected: self.observation_dim,
                actual: bad.observation.len(),
            });
        }

        let advantages = if self.config.normalize_rewards {
            normalized_rewards(&batch)
        } else {
            batch.iter().map(|t| t.reward).collect()
        };

        // A diverged update must not poison later episodes.
        let committed = self.weights.clone();
        let mut loss = 0.0;
        for pass in 0..self.config.training_repeats {
            loss = self.update(&batch, &advantages);
            debug!("policy gradient pass {} loss={:.6}", pass, loss);
            if !loss.is_finite() || self.weights.iter().flatten().any(|w| !w.is_finite()) {
                self.weights = committed;
                return Err(LearnerError::NonFiniteLoss);
            }
        }

        Ok(LearnSummary {
            batch_size: batch.len(),
            loss,
        })
    }

    fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn name(&self) -> &str {
        "policy_gradient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learner(lr: f64) -> PolicyGradient {
        let config = TrainingConfig {
            learning_rate: lr,
            normalize_rewards: false,
            ..TrainingConfig::default()
        };
        PolicyGradient::new(2, config, 3)
    }

    #[test]
    fn untrained_policy_is_uniform() {
        let policy = learner(0.1);
        let probs = policy.action_probabilities(&[0.7, 0.2]);
        for p in probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn positive_reward_reinforces_action() {
        let mut policy = learner(0.5);
        let obs = vec![1.0, 0.0];
        policy.store_transition(Transition::new(obs.clone(), Action::TurnLeft, 1.0));
        let summary = policy.learn().unwrap();
        assert_eq!(summary.batch_size, 1);
        let probs = policy.action_probabilities(&obs);
        assert!(probs[Action::TurnLeft.index()] > 1.0 / 3.0);
        assert_eq!(policy.pending(), 0);
    }

    #[test]
    fn negative_reward_discourages_action() {
        let mut policy = learner(0.5);
        let obs = vec![0.0, 1.0];
        policy.store_transition(Transition::new(obs.clone(), Action::TurnRight, -2.0));
        policy.learn().unwrap();
        let probs = policy.action_probabilities(&obs);
        assert!(probs[Action::TurnRight.index()] < 1.0 / 3.0);
    }

    #[test]
    fn greedy_mode_picks_most_likely_action() {
        let mut policy = learner(1.0);
        let obs = vec![1.0, 1.0];
        for _ in 0..5 {
            policy.store_transition(Transition::new(obs.clone(), Action::TurnRight, 1.0));
        }
        policy.learn().unwrap();
        policy.set_greedy(true);
        assert_eq!(policy.choose_action(&obs), Action::TurnRight);
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let mut policy = learner(0.1);
        assert_eq!(policy.learn(), Err(LearnerError::EmptyBuffer));
    }

    #[test]
    fn non_finite_update_keeps_previous_weights() {
        let mut policy = learner(0.5);
        let obs = vec![1.0, 0.5];
        policy.store_transition(Transition::new(obs.clone(), Action::TurnLeft, f64::INFINITY));
        assert_eq!(policy.learn(), Err(LearnerError::NonFiniteLoss));
        assert_eq!(policy.pending(), 0);
        for p in policy.action_probabilities(&obs) {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }

        policy.store_transition(Transition::new(obs.clone(), Action::TurnLeft, 1.0));
        let summary = policy.learn().unwrap();
        assert!(summary.loss.is_finite());
        let probs = policy.action_probabilities(&obs);
        assert!(probs[Action::TurnLeft.index()] > 1.0 / 3.0);
    }

    #[test]
    fn wrong_width_fails_and_clears_buffer() {
        let mut policy = learner(0.1);
        policy.store_transition(Transition::new(vec![1.0; 3], Action::NoTurn, 1.0));
        assert_eq!(
            policy.learn(),
            Err(LearnerError::ObservationWidth {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(policy.pending(), 0);
    }
}
