//! Transition buffer shared by the policy learners.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rl::types::Action;

/// One admitted unit of training data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    /// Observation the action was chosen from.
    pub observation: Vec<f64>,
    /// Action taken.
    pub action: Action,
    /// Reward earned by the step.
    pub reward: f64,
}

impl Transition {
    /// Creates a new transition.
    pub fn new(observation: Vec<f64>, action: Action, reward: f64) -> Self {
        Self {
            observation,
            action,
            reward,
        }
    }
}

/// Transitions stored between two batched updates.
#[derive(Debug, Default)]
pub struct TransitionBuffer {
    /// Stored transitions, oldest first.
    transitions: Vec<Transition>,
}

impl TransitionBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Adds a transition to the buffer.
    pub fn add(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// Removes and returns every stored transition.
    pub fn drain(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    /// Returns the number of stored transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Scales rewards to zero mean and unit variance.
///
/// A batch with a single transition, or with identical rewards, has no
/// spread to normalize; the raw rewards are returned for it.
pub fn normalized_rewards(batch: &[Transition]) -> Vec<f64> {
    let rewards: Vec<f64> = batch.iter().map(|t| t.reward).collect();
    if rewards.len() < 2 {
        return rewards;
    }
    let n = rewards.len() as f64;
    let mean = rewards.iter().sum::<f64>() / n;
    let var = rewards.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    if var < 1e-12 {
        return rewards;
    }
    let std = (var + 1e-8).sqrt();
    rewards.iter().map(|r| (r - mean) / std).collect()
}
