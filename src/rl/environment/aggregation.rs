//! Headless aggregation environment.
//!
//! N robots wander a square world at constant speed. Each step every robot
//! steers, moves, and is scored by how well it holds its spacing to the
//! neighbours inside its sensor range.

use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::robot::RobotState;
use super::sensing::Sensor;
use super::{Controls, EnvObservation, Environment};
use crate::rl::config::SimulationConfig;
use crate::rl::error::ConfigError;
use crate::rl::types::{Action, Heading, Position};

/// Time slept per event pump while paused.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// The multi-robot aggregation environment.
///
/// # Lifecycle
///
/// 1. Call [`AggregationEnv::new`], which validates the configuration.
/// 2. Hand it to the training driver, keeping a clone of
///    [`AggregationEnv::controls`] to pause or close it from outside.
/// 3. The driver calls [`Environment::step_update`] and
///    [`Environment::get_observations`] once per tick.
#[derive(Debug)]
pub struct AggregationEnv {
    /// Environment configuration.
    pub config: SimulationConfig,
    /// Robot states, indexed by robot.
    pub robots: Vec<RobotState>,
    controls: Controls,
    rng: StdRng,
    frames: u64,
    frame_limit: Option<u64>,
    log_every: u64,
    last_rewards: Vec<f64>,
}

impl AggregationEnv {
    /// Creates a new environment with robots scattered uniformly at random.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut env = Self {
            controls: Controls::new(config.need_pause),
            rng: StdRng::seed_from_u64(config.seed),
            robots: Vec::with_capacity(config.robot_quantity),
            frames: 0,
            frame_limit: None,
            log_every: 0,
            last_rewards: Vec::new(),
            config,
        };
        env.reset();
        Ok(env)
    }

    /// Closes the display after `limit` refreshes.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Logs a population summary every `frames` refreshes (0 disables).
    pub fn with_log_every(mut self, frames: u64) -> Self {
        self.log_every = frames;
        self
    }

    /// Re-scatters all robots and restarts the frame count.
    pub fn reset(&mut self) {
        let size = self.config.world_size_physical;
        self.robots.clear();
        for _ in 0..self.config.robot_quantity {
            let position = Position::new(
                self.rng.gen_range(0.0..size),
                self.rng.gen_range(0.0..size),
            );
            let heading = Heading::new(self.rng.gen_range(0.0..std::f64::consts::TAU));
            let mut robot = RobotState::new(position, heading);
            robot.active = !position.touches_bounds(size);
            self.robots.push(robot);
        }
        self.frames = 0;
        self.last_rewards = vec![0.0; self.robots.len()];
    }

    /// Handle onto the pause and close switches.
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    /// Number of display refreshes so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Robot positions in display pixels.
    pub fn display_positions(&self) -> Vec<(u32, u32)> {
        let scale = self.config.display_scale();
        self.robots
            .iter()
            .map(|r| {
                (
                    (r.position.x * scale).round() as u32,
                    (r.position.y * scale).round() as u32,
                )
            })
            .collect()
    }
}

impl Environment for AggregationEnv {
    fn robot_count(&self) -> usize {
        self.robots.len()
    }

    fn observation_dim(&self) -> usize {
        self.config.observation_dim()
    }

    fn get_observations(&self) -> EnvObservation {
        let mut out = EnvObservation {
            observations: Vec::with_capacity(self.robots.len()),
            neighbor_flags: Vec::with_capacity(self.robots.len()),
            active_flags: Vec::with_capacity(self.robots.len()),
        };
        for (i, robot) in self.robots.iter().enumerate() {
            let (obs, has_neighbor) = Sensor::observe(i, &self.robots, &self.config);
            out.observations.push(obs);
            out.neighbor_flags.push(has_neighbor);
            out.active_flags.push(robot.active);
        }
        out
    }

    fn step_update(&mut self, actions: &[Action]) -> Vec<f64> {
        for (i, robot) in self.robots.iter_mut().enumerate() {
            let action = actions.get(i).copied().unwrap_or_default();
            robot.step(action, &self.config);
        }
        self.last_rewards = (0..self.robots.len())
            .map(|i| Sensor::reward(i, &self.robots, &self.config))
            .collect();
        self.last_rewards.clone()
    }

    fn is_display_closed(&self) -> bool {
        self.controls.is_closed()
    }

    fn is_paused(&self) -> bool {
        self.controls.is_paused()
    }

    fn refresh_display(&mut self) {
        self.frames += 1;

        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let n = self.robots.len().max(1) as f64;
            let grouped = (0..self.robots.len())
                .filter(|&i| Sensor::observe(i, &self.robots, &self.config).1)
                .count();
            let mean_reward = self.last_rewards.iter().sum::<f64>() / n;
            info!(
                "frame {}: {}/{} robots with neighbours, mean reward {:.3}",
                self.frames,
                grouped,
                self.robots.len(),
                mean_reward
            );
        }

        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            debug!("frame limit reached, closing display");
            self.controls.close();
        }
    }

    fn pump_events(&mut self) {
        std::thread::sleep(PAUSE_POLL);
    }
}
