//! Training statistics for the aggregation trainer.
//!
//! Tracks admission verdicts, learning invocations, and failures over a
//! driver run.

use std::fmt;

use super::credit::Verdict;
use super::decision::TickOutcome;
use super::policy::LearnSummary;

/// Running totals over one driver run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingStats {
    /// Ticks that advanced the simulation.
    pub ticks: u64,
    /// Ticks spent paused.
    pub paused_ticks: u64,
    pub transitions_admitted: u64,
    pub rejected_no_neighbor: u64,
    pub rejected_zero_reward: u64,
    pub rejected_inactive: u64,
    /// Batched updates that completed.
    pub learn_invocations: u64,
    pub learner_failures: u64,
    /// Loss reported by the most recent successful update.
    pub last_loss: Option<f64>,
    admitted_reward_sum: f64,
}

impl TrainingStats {
    /// Folds one tick's verdicts into the totals.
    pub fn record_tick(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        for turn in &outcome.turns {
            match turn.verdict {
                Verdict::Admitted => {
                    self.transitions_admitted += 1;
                    self.admitted_reward_sum += turn.reward;
                }
                Verdict::NoNeighborBefore => self.rejected_no_neighbor += 1,
                Verdict::ZeroReward => self.rejected_zero_reward += 1,
                Verdict::InactiveAfter => self.rejected_inactive += 1,
            }
        }
    }

    pub fn record_learn(&mut self, summary: &LearnSummary) {
        self.learn_invocations += 1;
        self.last_loss = Some(summary.loss);
    }

    pub fn record_learner_failure(&mut self) {
        self.learner_failures += 1;
    }

    /// Total transitions judged and rejected.
    pub fn transitions_rejected(&self) -> u64 {
        self.rejected_no_neighbor + self.rejected_zero_reward + self.rejected_inactive
    }

    /// Mean reward of the admitted transitions.
    pub fn mean_admitted_reward(&self) -> f64 {
        if self.transitions_admitted == 0 {
            0.0
        } else {
            self.admitted_reward_sum / self.transitions_admitted as f64
        }
    }
}

impl fmt::Display for TrainingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Training Statistics ({} ticks) ===", self.ticks)?;
        writeln!(f, "  Paused ticks:            {}", self.paused_ticks)?;
        writeln!(
            f,
            "  Transitions admitted:    {}",
            self.transitions_admitted
        )?;
        writeln!(
            f,
            "  Rejected (no neighbour): {}",
            self.rejected_no_neighbor
        )?;
        writeln!(
            f,
            "  Rejected (zero reward):  {}",
            self.rejected_zero_reward
        )?;
        writeln!(f, "  Rejected (inactive):     {}", self.rejected_inactive)?;
        writeln!(f, "  Learning invocations:    {}", self.learn_invocations)?;
        writeln!(f, "  Learner failures:        {}", self.learner_failures)?;
        writeln!(
            f,
            "  Mean admitted reward:    {:.3}",
            self.mean_admitted_reward()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::decision::AgentTurn;
    use crate::rl::snapshot::AgentSnapshot;
    use crate::rl::types::Action;

    fn turn(verdict: Verdict, reward: f64) -> AgentTurn {
        AgentTurn {
            index: 0,
            before: AgentSnapshot {
                observation: vec![],
                has_neighbor: true,
                active: true,
            },
            action: Action::NoTurn,
            reward,
            active_after: true,
            verdict,
        }
    }

    #[test]
    fn tallies_verdicts() {
        let mut stats = TrainingStats::default();
        stats.record_tick(&TickOutcome {
            turns: vec![
                turn(Verdict::Admitted, 4.0),
                turn(Verdict::Admitted, 2.0),
                turn(Verdict::ZeroReward, 0.0),
                turn(Verdict::NoNeighborBefore, 6.0),
            ],
            admitted: 2,
        });
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.transitions_admitted, 2);
        assert_eq!(stats.transitions_rejected(), 2);
        assert!((stats.mean_admitted_reward() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn display_mentions_ticks() {
        let stats = TrainingStats {
            ticks: 12,
            ..TrainingStats::default()
        };
        assert!(stats.to_string().contains("12 ticks"));
    }
}
