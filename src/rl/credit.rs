//! Credit assignment for training data.
//!
//! A transition is only worth learning from when the policy could have
//! caused its outcome. Two cases are excluded:
//!
//! - The robot had no neighbour before acting. It sensed nothing, the policy
//!   was not consulted, and any reward it then earns is luck.
//! - The robot had a neighbour, but the reward is exactly zero (no gradient
//!   signal) or the robot is inactive afterwards (terminal or invalid state).
//!
//! A robot that loses every neighbour through its own action still counts:
//! the policy caused that outcome.

/// Decides whether one robot's transition is admitted as training data.
pub fn admit(had_neighbor_before: bool, reward: f64, is_active_after: bool) -> bool {
    had_neighbor_before && reward != 0.0 && is_active_after
}

/// Why a transition was kept out of the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admitted,
    NoNeighborBefore,
    ZeroReward,
    InactiveAfter,
}

impl Verdict {
    /// Same rule as [`admit`], reporting the first failed condition.
    pub fn judge(had_neighbor_before: bool, reward: f64, is_active_after: bool) -> Self {
        if !had_neighbor_before {
            Verdict::NoNeighborBefore
        } else if reward == 0.0 {
            Verdict::ZeroReward
        } else if !is_active_after {
            Verdict::InactiveAfter
        } else {
            Verdict::Admitted
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}
