//! Per-robot observation snapshots.
//!
//! A [`Snapshot`] holds one [`AgentSnapshot`] per robot, in robot index
//! order, so observation, neighbour flag, and active flag can never drift
//! out of alignment.

use super::error::ContractViolation;

/// What the environment reports about one robot at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    /// Sensed neighbour density per angular slice.
    pub observation: Vec<f64>,
    /// At least one neighbour within sensor range.
    pub has_neighbor: bool,
    /// The robot is a valid participant.
    pub active: bool,
}

/// Observations of the whole population, indexed by robot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    agents: Vec<AgentSnapshot>,
}

impl Snapshot {
    /// Zips the environment's parallel sequences into per-robot records,
    /// checking every length against the expected robot count and
    /// observation width.
    pub fn from_parts(
        observations: Vec<Vec<f64>>,
        neighbor_flags: Vec<bool>,
        active_flags: Vec<bool>,
        robot_count: usize,
        observation_dim: usize,
    ) -> Result<Self, ContractViolation> {
        if observations.len() != robot_count {
            return Err(ContractViolation::ObservationCount {
                expected: robot_count,
                actual: observations.len(),
            });
        }
        if neighbor_flags.len() != robot_count {
            return Err(ContractViolation::NeighborFlagCount {
                expected: robot_count,
                actual: neighbor_flags.len(),
            });
        }
        if active_flags.len() != robot_count {
            return Err(ContractViolation::ActiveFlagCount {
                expected: robot_count,
                actual: active_flags.len(),
            });
        }
        if let Some((index, obs)) = observations
            .iter()
            .enumerate()
            .find(|(_, o)| o.len() != observation_dim)
        {
            return Err(ContractViolation::ObservationWidth {
                index,
                expected: observation_dim,
                actual: obs.len(),
            });
        }

        let agents = observations
            .into_iter()
            .zip(neighbor_flags)
            .zip(active_flags)
            .map(|((observation, has_neighbor), active)| AgentSnapshot {
                observation,
                has_neighbor,
                active,
            })
            .collect();
        Ok(Self { agents })
    }

    /// Number of robots covered.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns true if no robot is covered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Record for robot `index`.
    pub fn get(&self, index: usize) -> Option<&AgentSnapshot> {
        self.agents.get(index)
    }

    /// Records in robot index order.
    pub fn iter(&self) -> std::slice::Iter<'_, AgentSnapshot> {
        self.agents.iter()
    }

    /// Number of robots currently reporting a neighbour.
    pub fn with_neighbors(&self) -> usize {
        self.agents.iter().filter(|a| a.has_neighbor).count()
    }
}

impl IntoIterator for Snapshot {
    type Item = AgentSnapshot;
    type IntoIter = std::vec::IntoIter<AgentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a AgentSnapshot;
    type IntoIter = std::slice::Iter<'a, AgentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
