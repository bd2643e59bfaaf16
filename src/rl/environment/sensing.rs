//! Neighbour sensing and ring-scored rewards.
//!
//! Builds per-robot observation vectors from the neighbours inside the
//! sensor range, and scores how well each robot holds its spacing.

use std::f64::consts::TAU;

use super::robot::RobotState;
use crate::rl::config::SimulationConfig;

/// Builds observation vectors for robots.
pub struct Sensor;

impl Sensor {
    /// Distances to every other robot within sensor range, with the index of
    /// the neighbour.
    fn neighbors<'a>(
        robot_idx: usize,
        robots: &'a [RobotState],
        config: &'a SimulationConfig,
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        let me = robots[robot_idx].position;
        robots
            .iter()
            .enumerate()
            .filter(move |(j, _)| *j != robot_idx)
            .map(move |(j, other)| (j, me.distance_to(&other.position)))
            .filter(move |(_, d)| *d < config.sensor_range)
    }

    /// Builds the observation for a specific robot.
    ///
    /// The 360° view around the robot's heading is split into `view_div`
    /// equal slices, counter-clockwise from straight ahead. Each neighbour
    /// adds its proximity `1 - d / sensor_range` to the slice it falls in.
    ///
    /// Returns the observation and whether any neighbour was sensed.
    pub fn observe(
        robot_idx: usize,
        robots: &[RobotState],
        config: &SimulationConfig,
    ) -> (Vec<f64>, bool) {
        let me = &robots[robot_idx];
        let slice = TAU / config.view_div as f64;
        let mut obs = vec![0.0; config.view_div];
        let mut has_neighbor = false;

        for (j, d) in Self::neighbors(robot_idx, robots, config) {
            has_neighbor = true;
            let relative =
                (me.position.bearing_to(&robots[j].position) - me.heading.radians()).rem_euclid(TAU);
            let k = ((relative / slice) as usize).min(config.view_div - 1);
            obs[k] += 1.0 - d / config.sensor_range;
        }

        (obs, has_neighbor)
    }

    /// Scores the spacing of a robot to its neighbours.
    ///
    /// The sensor range is divided into nested rings of equal width, scored
    /// by `score_rings` from closest to farthest. The reward is the mean ring
    /// score over all neighbours, and zero without neighbours.
    pub fn reward(robot_idx: usize, robots: &[RobotState], config: &SimulationConfig) -> f64 {
        let width = config.ring_width();
        let last = config.score_rings.len().saturating_sub(1);
        let (total, count) = Self::neighbors(robot_idx, robots, config).fold(
            (0.0, 0usize),
            |(total, count), (_, d)| {
                let ring = ((d / width) as usize).min(last);
                (total + config.score_rings[ring], count + 1)
            },
        );
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}
