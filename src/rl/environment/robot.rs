//! Robot state and motion for the aggregation environment.

use crate::rl::config::SimulationConfig;
use crate::rl::types::{Action, Heading, Position};

/// State of a single robot.
///
/// A robot moves at constant speed along its heading; actions only steer.
#[derive(Debug, Clone)]
pub struct RobotState {
    /// Current position in the square world.
    pub position: Position,
    /// Direction of travel.
    pub heading: Heading,
    /// False while the robot is pinned against a wall.
    pub active: bool,
}

impl RobotState {
    /// Creates a new active robot.
    pub fn new(position: Position, heading: Heading) -> Self {
        Self {
            position,
            heading,
            active: true,
        }
    }

    /// Applies an action: turns, then advances `frame_speed` along the new
    /// heading.
    ///
    /// A robot that would leave the world is stopped at the wall with its
    /// heading reflected, and is inactive until it moves off the wall.
    pub fn step(&mut self, action: Action, config: &SimulationConfig) {
        self.heading = self.heading.rotated(action.heading_delta(config.turn_angle));

        let size = config.world_size_physical;
        let (ux, uy) = self.heading.unit();
        let mut x = self.position.x + ux * config.frame_speed;
        let mut y = self.position.y + uy * config.frame_speed;

        if x <= 0.0 || x >= size {
            x = x.clamp(0.0, size);
            self.heading = self.heading.reflect_x();
        }
        if y <= 0.0 || y >= size {
            y = y.clamp(0.0, size);
            self.heading = self.heading.reflect_y();
        }

        self.position = Position::new(x, y);
        self.active = !self.position.touches_bounds(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn no_turn_moves_straight() {
        let config = SimulationConfig::default();
        let mut robot = RobotState::new(Position::new(50.0, 50.0), Heading::new(0.0));
        robot.step(Action::NoTurn, &config);
        assert!((robot.position.x - 50.5).abs() < 1e-10);
        assert!((robot.position.y - 50.0).abs() < 1e-10);
        assert!(robot.active);
    }

    #[test]
    fn left_turn_rotates_counter_clockwise() {
        let config = SimulationConfig {
            turn_angle: PI / 2.0,
            ..SimulationConfig::default()
        };
        let mut robot = RobotState::new(Position::new(50.0, 50.0), Heading::new(0.0));
        robot.step(Action::TurnLeft, &config);
        assert!((robot.heading.radians() - PI / 2.0).abs() < 1e-10);
        assert!((robot.position.y - 50.5).abs() < 1e-10);
    }

    #[test]
    fn wall_contact_deactivates_and_reflects() {
        let config = SimulationConfig::default();
        let mut robot = RobotState::new(Position::new(99.8, 50.0), Heading::new(0.0));
        robot.step(Action::NoTurn, &config);
        assert_eq!(robot.position.x, 100.0);
        assert!(!robot.active);
        assert!((robot.heading.radians() - PI).abs() < 1e-10);

        robot.step(Action::NoTurn, &config);
        assert!(robot.position.x < 100.0);
        assert!(robot.active);
    }
}
