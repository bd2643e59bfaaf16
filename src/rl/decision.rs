//! One simulation step: choose, act, observe, and admit training data.
//!
//! All actions of a tick are chosen from the snapshot captured before any
//! robot moves, so robots act simultaneously on one coherent world state.

use log::trace;

use super::credit::Verdict;
use super::environment::Environment;
use super::error::ContractViolation;
use super::policy::PolicyLearner;
use super::snapshot::{AgentSnapshot, Snapshot};
use super::training::Transition;
use super::types::{Action, AgentIndex};

/// Everything that happened to one robot during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTurn {
    pub index: AgentIndex,
    /// The robot as seen before acting.
    pub before: AgentSnapshot,
    pub action: Action,
    pub reward: f64,
    pub active_after: bool,
    pub verdict: Verdict,
}

impl AgentTurn {
    /// The training record for this turn.
    pub fn transition(&self) -> Transition {
        Transition::new(self.before.observation.clone(), self.action, self.reward)
    }
}

/// Result of one decision-loop tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// One entry per robot, in index order.
    pub turns: Vec<AgentTurn>,
    /// Transitions forwarded to the learner this tick.
    pub admitted: usize,
}

/// Captures the environment's current observations as a validated snapshot.
pub fn capture<E: Environment + ?Sized>(env: &E) -> Result<Snapshot, ContractViolation> {
    let raw = env.get_observations();
    Snapshot::from_parts(
        raw.observations,
        raw.neighbor_flags,
        raw.active_flags,
        env.robot_count(),
        env.observation_dim(),
    )
}

/// Holds the "before" snapshot across ticks and runs the per-tick protocol.
#[derive(Debug, Clone)]
pub struct DecisionLoop {
    before: Snapshot,
}

impl DecisionLoop {
    /// Starts from an initial snapshot of the environment.
    pub fn new(initial: Snapshot) -> Self {
        Self { before: initial }
    }

    /// The snapshot the next tick will act on.
    pub fn before(&self) -> &Snapshot {
        &self.before
    }

    /// Chooses one action per robot from the current snapshot.
    ///
    /// Robots without a neighbour get [`Action::NoTurn`]; the learner is
    /// consulted only for robots that sensed something.
    pub fn choose_actions<L: PolicyLearner + ?Sized>(&self, learner: &mut L) -> Vec<Action> {
        self.before
            .iter()
            .map(|agent| {
                if agent.has_neighbor {
                    learner.choose_action(&agent.observation)
                } else {
                    Action::default()
                }
            })
            .collect()
    }

    /// Runs one tick.
    ///
    /// 1. Choose actions from the before snapshot.
    /// 2. Advance the environment by one step, collecting rewards.
    /// 3. Capture the after snapshot.
    /// 4. Judge every robot's transition and forward the admitted ones.
    /// 5. Replace the before snapshot with the after snapshot.
    ///
    /// A malformed reward or observation report aborts the tick before any
    /// transition is forwarded and leaves the before snapshot in place.
    pub fn tick<E, L>(
        &mut self,
        env: &mut E,
        learner: &mut L,
    ) -> Result<TickOutcome, ContractViolation>
    where
        E: Environment + ?Sized,
        L: PolicyLearner + ?Sized,
    {
        let n = self.before.len();
        let actions = self.choose_actions(learner);

        let rewards = env.step_update(&actions);
        if rewards.len() != n {
            return Err(ContractViolation::RewardCount {
                expected: n,
                actual: rewards.len(),
            });
        }
        let after = capture(env)?;
        if after.len() != n {
            return Err(ContractViolation::ObservationCount {
                expected: n,
                actual: after.len(),
            });
        }

        let before = std::mem::replace(&mut self.before, after);
        let mut outcome = TickOutcome {
            turns: Vec::with_capacity(n),
            admitted: 0,
        };

        for (index, ((agent, action), reward)) in before
            .into_iter()
            .zip(actions)
            .zip(rewards)
            .enumerate()
        {
            let active_after = self.before.get(index).is_some_and(|a| a.active);
            let verdict = Verdict::judge(agent.has_neighbor, reward, active_after);
            trace!(
                "robot {}: action={} reward={} verdict={:?}",
                index,
                action,
                reward,
                verdict
            );
            let turn = AgentTurn {
                index,
                before: agent,
                action,
                reward,
                active_after,
                verdict,
            };
            if verdict.is_admitted() {
                learner.store_transition(turn.transition());
                outcome.admitted += 1;
            }
            outcome.turns.push(turn);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::test_support::{observation, RecordingLearner, ScriptedEnvironment};

    #[test]
    fn robots_without_neighbor_get_default_action() {
        let env = ScriptedEnvironment::new(3, 2).starting_with(&[false, true, false], &[true; 3]);
        let decision = DecisionLoop::new(capture(&env).unwrap());
        let mut learner = RecordingLearner::default();
        let actions = decision.choose_actions(&mut learner);
        assert_eq!(
            actions,
            vec![Action::NoTurn, Action::TurnLeft, Action::NoTurn]
        );
        assert_eq!(learner.consulted, vec![observation(1, 2)]);
    }

    #[test]
    fn admitted_transition_carries_before_observation() {
        let mut env = ScriptedEnvironment::new(2, 3)
            .starting_with(&[true, true], &[true, true])
            .then(&[1.5, 0.0], &[false, false], &[true, true]);
        let mut decision = DecisionLoop::new(capture(&env).unwrap());
        let mut learner = RecordingLearner::default();

        let outcome = decision.tick(&mut env, &mut learner).unwrap();
        assert_eq!(outcome.admitted, 1);
        assert_eq!(
            learner.stored,
            vec![Transition::new(observation(0, 3), Action::TurnLeft, 1.5)]
        );
        assert_eq!(outcome.turns[1].verdict, Verdict::ZeroReward);
    }

    #[test]
    fn after_snapshot_replaces_before() {
        let mut env = ScriptedEnvironment::new(2, 1)
            .starting_with(&[true, true], &[true, true])
            .then(&[1.0, 1.0], &[false, true], &[true, false]);
        let mut decision = DecisionLoop::new(capture(&env).unwrap());
        let mut learner = RecordingLearner::default();
        decision.tick(&mut env, &mut learner).unwrap();

        let flags: Vec<_> = decision.before().iter().map(|a| a.has_neighbor).collect();
        assert_eq!(flags, vec![false, true]);
        assert!(!decision.before().get(1).unwrap().active);
    }

    #[test]
    fn short_reward_report_aborts_tick() {
        let mut env = ScriptedEnvironment::new(3, 1)
            .starting_with(&[true; 3], &[true; 3])
            .then(&[1.0, 1.0], &[true; 3], &[true; 3]);
        let mut decision = DecisionLoop::new(capture(&env).unwrap());
        let before = decision.before().clone();
        let mut learner = RecordingLearner::default();

        let err = decision.tick(&mut env, &mut learner).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::RewardCount {
                expected: 3,
                actual: 2
            }
        );
        assert!(learner.stored.is_empty());
        assert_eq!(decision.before(), &before);
    }
}
