//! Configuration for the aggregation environment and training.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration for the aggregation environment.
///
/// Controls world geometry, robot dynamics, sensing, and reward shaping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    // --- Population ---
    /// Number of robots N.
    pub robot_quantity: usize,

    // --- World geometry ---
    /// Side length of the square physical world.
    pub world_size_physical: f64,
    /// Side length of the display window, in pixels.
    pub world_size_display: u32,

    // --- Sensing and motion ---
    /// Radius of the sensing circle.
    pub sensor_range: f64,
    /// Distance travelled per step.
    pub frame_speed: f64,
    /// Heading change applied by a turn action, in radians.
    pub turn_angle: f64,
    /// Number of angular slices of the 360° view; the observation length.
    pub view_div: usize,

    // --- Reward shaping ---
    /// Scores for nested rings inside the sensor range, closest first.
    pub score_rings: Vec<f64>,

    // --- Controls ---
    /// Initial state of the pause switch.
    pub need_pause: bool,
    /// Seed for robot placement and headings.
    pub seed: u64,
}

impl SimulationConfig {
    /// Observation length per robot.
    pub fn observation_dim(&self) -> usize {
        self.view_div
    }

    /// Width of one scoring ring.
    pub fn ring_width(&self) -> f64 {
        self.sensor_range / self.score_rings.len().max(1) as f64
    }

    /// Pixels per unit of physical distance.
    pub fn display_scale(&self) -> f64 {
        self.world_size_display as f64 / self.world_size_physical
    }

    /// Checks every option, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.robot_quantity == 0 {
            return Err(ConfigError::NoRobots);
        }
        if self.view_div == 0 {
            return Err(ConfigError::NoViewDivisions);
        }
        positive("world_size_physical", self.world_size_physical)?;
        positive("world_size_display", self.world_size_display as f64)?;
        positive("sensor_range", self.sensor_range)?;
        positive("frame_speed", self.frame_speed)?;
        positive("turn_angle", self.turn_angle)?;
        if self.score_rings.is_empty() {
            return Err(ConfigError::NoScoreRings);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            robot_quantity: 30,
            world_size_physical: 100.0,
            world_size_display: 600,
            sensor_range: 10.0,
            frame_speed: 0.5,
            turn_angle: std::f64::consts::PI / 12.0,
            view_div: 15,
            score_rings: vec![2.0, 4.0, 6.0, 4.0, 2.0],
            need_pause: false,
            seed: 0,
        }
    }
}

/// Hyperparameters for the policy learner and the episode trigger.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainingConfig {
    /// Gradient step size.
    pub learning_rate: f64,
    /// Passes over the stored transitions per `learn()` call.
    pub training_repeats: u32,
    /// Admitted transitions that trigger one batched update.
    pub episode_threshold: usize,
    /// Normalize rewards across a batch before the update.
    pub normalize_rewards: bool,
}

impl TrainingConfig {
    /// Checks every option, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("learning_rate", self.learning_rate)?;
        if self.training_repeats == 0 {
            return Err(ConfigError::ZeroTrainingRepeats);
        }
        if self.episode_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.0001,
            training_repeats: 1,
            episode_threshold: 50,
            normalize_rewards: true,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimulationConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(TrainingConfig::default().validate().is_ok());
        assert_eq!(cfg.observation_dim(), 15);
    }

    #[test]
    fn ring_width_splits_sensor_range() {
        let cfg = SimulationConfig::default();
        assert!((cfg.ring_width() - 2.0).abs() < 1e-12);
        assert!((cfg.display_scale() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_robots() {
        let cfg = SimulationConfig {
            robot_quantity: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRobots));
    }

    #[test]
    fn rejects_zero_view_divisions() {
        let cfg = SimulationConfig {
            view_div: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoViewDivisions));
    }

    #[test]
    fn rejects_non_finite_sensor_range() {
        let cfg = SimulationConfig {
            sensor_range: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                name: "sensor_range",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_threshold() {
        let cfg = TrainingConfig {
            episode_threshold: 0,
            ..TrainingConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroThreshold));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimulationConfig = serde_json::from_str(r#"{"robot_quantity": 5}"#).unwrap();
        assert_eq!(cfg.robot_quantity, 5);
        assert_eq!(cfg.view_div, 15);
    }
}
