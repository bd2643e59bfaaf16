//! Scripted collaborators for driver tests.

use std::collections::VecDeque;

use super::environment::{EnvObservation, Environment};
use super::error::LearnerError;
use super::policy::{LearnSummary, PolicyLearner};
use super::training::Transition;
use super::types::Action;

/// Observation of robot `index` with `dim` entries, distinct per robot.
pub fn observation(index: usize, dim: usize) -> Vec<f64> {
    (0..dim).map(|k| index as f64 + k as f64 / 10.0).collect()
}

/// A scripted step: the rewards it returns and the observation it leaves.
#[derive(Debug, Clone)]
struct ScriptedStep {
    rewards: Vec<f64>,
    after: EnvObservation,
}

/// Environment replaying a fixed script of steps.
///
/// Once the script runs out, steps return zero rewards and leave the
/// observation unchanged.
#[derive(Debug, Clone)]
pub struct ScriptedEnvironment {
    robot_count: usize,
    observation_dim: usize,
    current: EnvObservation,
    script: VecDeque<ScriptedStep>,
    /// Actions received by every step, in order.
    pub received_actions: Vec<Vec<Action>>,
    pub closed: bool,
    pub paused: bool,
    pub refreshes: usize,
    pub pumps: usize,
    /// Unpause after this many event pumps.
    pub resume_after_pumps: Option<usize>,
    /// Close the display after this many refreshes.
    pub close_after_refreshes: Option<usize>,
    /// Close the display during this many-th step.
    pub close_after_steps: Option<usize>,
}

impl ScriptedEnvironment {
    pub fn new(robot_count: usize, observation_dim: usize) -> Self {
        let current = Self::report(
            robot_count,
            observation_dim,
            &vec![false; robot_count],
            &vec![true; robot_count],
        );
        Self {
            robot_count,
            observation_dim,
            current,
            script: VecDeque::new(),
            received_actions: Vec::new(),
            closed: false,
            paused: false,
            refreshes: 0,
            pumps: 0,
            resume_after_pumps: None,
            close_after_refreshes: None,
            close_after_steps: None,
        }
    }

    fn report(n: usize, dim: usize, neighbors: &[bool], active: &[bool]) -> EnvObservation {
        EnvObservation {
            observations: (0..n).map(|i| observation(i, dim)).collect(),
            neighbor_flags: neighbors.to_vec(),
            active_flags: active.to_vec(),
        }
    }

    /// Sets the flags reported before the first step.
    pub fn starting_with(mut self, neighbors: &[bool], active: &[bool]) -> Self {
        self.current = Self::report(self.robot_count, self.observation_dim, neighbors, active);
        self
    }

    /// Appends a step returning `rewards` and leaving the given flags.
    pub fn then(mut self, rewards: &[f64], neighbors: &[bool], active: &[bool]) -> Self {
        let after = Self::report(self.robot_count, self.observation_dim, neighbors, active);
        self.script.push_back(ScriptedStep {
            rewards: rewards.to_vec(),
            after,
        });
        self
    }

    /// Appends a step leaving a raw, possibly malformed, observation report.
    pub fn then_raw(mut self, rewards: &[f64], after: EnvObservation) -> Self {
        self.script.push_back(ScriptedStep {
            rewards: rewards.to_vec(),
            after,
        });
        self
    }
}

impl Environment for ScriptedEnvironment {
    fn robot_count(&self) -> usize {
        self.robot_count
    }

    fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    fn get_observations(&self) -> EnvObservation {
        self.current.clone()
    }

    fn step_update(&mut self, actions: &[Action]) -> Vec<f64> {
        self.received_actions.push(actions.to_vec());
        if self
            .close_after_steps
            .is_some_and(|n| self.received_actions.len() >= n)
        {
            self.closed = true;
        }
        match self.script.pop_front() {
            Some(step) => {
                self.current = step.after;
                step.rewards
            }
            None => vec![0.0; self.robot_count],
        }
    }

    fn is_display_closed(&self) -> bool {
        self.closed
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn refresh_display(&mut self) {
        self.refreshes += 1;
        if self.close_after_refreshes.is_some_and(|n| self.refreshes >= n) {
            self.closed = true;
        }
    }

    fn pump_events(&mut self) {
        self.pumps += 1;
        if self.resume_after_pumps.is_some_and(|n| self.pumps >= n) {
            self.paused = false;
        }
    }
}

/// Learner that always turns left and records every interaction.
#[derive(Debug, Default)]
pub struct RecordingLearner {
    /// Observations the learner was asked to act on.
    pub consulted: Vec<Vec<f64>>,
    /// Transitions currently stored.
    pub stored: Vec<Transition>,
    /// Every batch consumed by `learn()`.
    pub learned_batches: Vec<Vec<Transition>>,
    pub learn_calls: usize,
    pub fail_learn: bool,
}

impl PolicyLearner for RecordingLearner {
    fn choose_action(&mut self, observation: &[f64]) -> Action {
        self.consulted.push(observation.to_vec());
        Action::TurnLeft
    }

    fn store_transition(&mut self, transition: Transition) {
        self.stored.push(transition);
    }

    fn learn(&mut self) -> Result<LearnSummary, LearnerError> {
        self.learn_calls += 1;
        let batch = std::mem::take(&mut self.stored);
        let batch_size = batch.len();
        self.learned_batches.push(batch);
        if self.fail_learn {
            return Err(LearnerError::NonFiniteLoss);
        }
        Ok(LearnSummary {
            batch_size,
            loss: 0.0,
        })
    }

    fn pending(&self) -> usize {
        self.stored.len()
    }

    fn name(&self) -> &str {
        "recording"
    }
}
