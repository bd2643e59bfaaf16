//! Episode trigger: batched learning once enough data has been admitted.
//!
//! An episode is measured in admitted transitions, not ticks. The trigger
//! only counts; the transitions themselves already live in the learner.

use log::info;

use crate::rl::error::{ConfigError, LearnerError};
use crate::rl::policy::{LearnSummary, PolicyLearner};

/// Counts admitted transitions and fires the learner's update at a threshold.
#[derive(Debug, Clone)]
pub struct EpisodeTrigger {
    threshold: usize,
    count: usize,
    episodes: u64,
}

impl EpisodeTrigger {
    /// Creates a trigger firing once `threshold` transitions are admitted.
    pub fn new(threshold: usize) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(Self {
            threshold,
            count: 0,
            episodes: 0,
        })
    }

    /// Adds this tick's admitted transitions and, on reaching the threshold,
    /// runs one batched update.
    ///
    /// The counter is reset before the update runs, so a failing learner
    /// never causes the same stale batch to be retried.
    ///
    /// Returns `Ok(None)` when the threshold has not been reached.
    pub fn record<L: PolicyLearner + ?Sized>(
        &mut self,
        admitted: usize,
        learner: &mut L,
    ) -> Result<Option<LearnSummary>, LearnerError> {
        self.count += admitted;
        if self.count < self.threshold {
            return Ok(None);
        }

        self.count = 0;
        self.episodes += 1;
        info!(
            "episode {} complete, training {} on {} transitions",
            self.episodes,
            learner.name(),
            learner.pending()
        );
        learner.learn().map(Some)
    }

    /// Admitted transitions since the last update.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of times the update has been triggered.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }
}
