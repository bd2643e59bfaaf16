//! Core types for the aggregation simulation.
//!
//! Defines the action domain, planar positions, and headings shared by the
//! environment, the learners, and the decision loop.

use std::f64::consts::{PI, TAU};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a robot, stable for the lifetime of a simulation.
pub type AgentIndex = usize;

/// Steering choice applied by a robot for one step.
///
/// [`Action::NoTurn`] is the distinguished default: robots without a
/// neighbour are never steered by the policy and keep their heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    #[default]
    NoTurn,
    TurnLeft,
    TurnRight,
}

impl Action {
    /// Size of the action domain.
    pub const COUNT: usize = 3;

    /// Returns all actions in index order.
    pub fn all() -> [Action; Self::COUNT] {
        [Action::NoTurn, Action::TurnLeft, Action::TurnRight]
    }

    /// Returns the index of this action (0=NoTurn, 1=TurnLeft, 2=TurnRight).
    pub fn index(&self) -> usize {
        match self {
            Action::NoTurn => 0,
            Action::TurnLeft => 1,
            Action::TurnRight => 2,
        }
    }

    /// Maps a learner output index back into the action domain.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::all().get(index).copied()
    }

    /// Signed heading change for this action, given the configured turn angle.
    ///
    /// Left turns are counter-clockwise (positive).
    pub fn heading_delta(&self, turn_angle: f64) -> f64 {
        match self {
            Action::NoTurn => 0.0,
            Action::TurnLeft => turn_angle,
            Action::TurnRight => -turn_angle,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoTurn => write!(f, "no_turn"),
            Action::TurnLeft => write!(f, "turn_left"),
            Action::TurnRight => write!(f, "turn_right"),
        }
    }
}

/// A 2D position in the square world [0, S] × [0, S].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Absolute bearing from `self` toward `target`, in radians within [0, 2π).
    pub fn bearing_to(&self, target: &Position) -> f64 {
        Heading::new((target.y - self.y).atan2(target.x - self.x)).radians()
    }

    /// Returns true if the position lies on or beyond the boundary of a
    /// square world of side `size`.
    pub fn touches_bounds(&self, size: f64) -> bool {
        self.x <= 0.0 || self.y <= 0.0 || self.x >= size || self.y >= size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Direction of travel, kept normalized to [0, 2π).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Heading(f64);

impl Heading {
    /// Creates a heading from any angle in radians.
    pub fn new(radians: f64) -> Self {
        Self(radians.rem_euclid(TAU))
    }

    /// Angle in radians within [0, 2π).
    pub fn radians(&self) -> f64 {
        self.0
    }

    /// Returns this heading rotated by `delta` radians.
    pub fn rotated(&self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    /// Unit direction vector.
    pub fn unit(&self) -> (f64, f64) {
        (self.0.cos(), self.0.sin())
    }

    /// Mirrors the heading across a vertical wall.
    pub fn reflect_x(&self) -> Self {
        Self::new(PI - self.0)
    }

    /// Mirrors the heading across a horizontal wall.
    pub fn reflect_y(&self) -> Self {
        Self::new(-self.0)
    }
}
