//! Training driver: the control loop around the decision loop.
//!
//! The driver is an explicit state machine advanced by [`Driver::tick`].
//! Each call polls the display controls, then either steps the simulation,
//! services the display while paused, or stops for good. A display closed
//! during the step ends the run before the refresh and the episode trigger.

use log::{debug, info, warn};

use super::config::TrainingConfig;
use super::decision::{capture, DecisionLoop, TickOutcome};
use super::environment::Environment;
use super::error::{ConfigError, DriverError};
use super::metrics::TrainingStats;
use super::policy::PolicyLearner;
use super::training::EpisodeTrigger;


/// Lifecycle state of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Paused,
    Terminated,
}

impl DriverState {
    /// State for the next tick given the display controls.
    ///
    /// A closed display wins over the pause switch, and `Terminated` is
    /// absorbing.
    pub fn next(self, display_closed: bool, paused: bool) -> DriverState {
        match self {
            DriverState::Terminated => DriverState::Terminated,
            _ if display_closed => DriverState::Terminated,
            _ if paused => DriverState::Paused,
            _ => DriverState::Running,
        }
    }
}

/// Drives an environment and a learner tick by tick.
///
/// Owns every piece of mutable training state: the before snapshot (inside
/// the [`DecisionLoop`]), the [`EpisodeTrigger`] counter, and the run
/// statistics.
pub struct Driver<E, L> {
    env: E,
    learner: L,
    decision: DecisionLoop,
    trigger: EpisodeTrigger,
    state: DriverState,
    stats: TrainingStats,
}

impl<E: Environment, L: PolicyLearner> Driver<E, L> {
    /// Creates a driver and captures the first observation snapshot.
    ///
    /// Fails fast on an invalid configuration or a malformed first report.
    pub fn new(env: E, learner: L, training: &TrainingConfig) -> Result<Self, DriverError> {
        training.validate()?;
        if env.robot_count() == 0 {
            return Err(ConfigError::NoRobots.into());
        }
        if env.observation_dim() == 0 {
            return Err(ConfigError::NoViewDivisions.into());
        }
        let trigger = EpisodeTrigger::new(training.episode_threshold)?;
        let initial = capture(&env)?;

        info!(
            "driver ready: {} robots, observation length {}, learner {}, threshold {}",
            env.robot_count(),
            env.observation_dim(),
            learner.name(),
            trigger.threshold()
        );

        Ok(Self {
            env,
            learner,
            decision: DecisionLoop::new(initial),
            trigger,
            state: DriverState::Running,
            stats: TrainingStats::default(),
        })
    }

    /// Advances the state machine by one tick and returns the new state.
    ///
    /// A learner failure is returned as an error but leaves the driver
    /// running; a contract violation aborts the tick and should end the run.
    pub fn tick(&mut self) -> Result<DriverState, DriverError> {
        let next = self
            .state
            .next(self.env.is_display_closed(), self.env.is_paused());
        let previous = std::mem::replace(&mut self.state, next);

        match next {
            DriverState::Terminated => {
                if previous != DriverState::Terminated {
                    info!("display closed after {} ticks", self.stats.ticks);
                }
            }
            DriverState::Paused => {
                if previous != DriverState::Paused {
                    info!("paused at tick {}", self.stats.ticks);
                }
                self.stats.paused_ticks += 1;
                self.env.pump_events();
            }
            DriverState::Running => {
                if previous == DriverState::Paused {
                    info!("resumed at tick {}", self.stats.ticks);
                }
                self.step()?;
            }
        }

        Ok(self.state)
    }

    /// One decision-loop tick, one display refresh, then the episode trigger.
    ///
    /// If the display closed while stepping, the driver terminates without
    /// refreshing or learning.
    fn step(&mut self) -> Result<TickOutcome, DriverError> {
        let outcome = match self.decision.tick(&mut self.env, &mut self.learner) {
            Ok(outcome) => outcome,
            Err(violation) => {
                warn!("tick {} aborted: {}", self.stats.ticks + 1, violation);
                return Err(violation.into());
            }
        };
        self.stats.record_tick(&outcome);
        debug!(
            "tick {}: admitted {}, episode count {}",
            self.stats.ticks,
            outcome.admitted,
            self.trigger.count() + outcome.admitted
        );

        if self.env.is_display_closed() {
            self.state = DriverState::Terminated;
            info!("display closed during tick {}", self.stats.ticks);
            return Ok(outcome);
        }

        self.env.refresh_display();

        match self.trigger.record(outcome.admitted, &mut self.learner) {
            Ok(Some(summary)) => {
                self.stats.record_learn(&summary);
                info!(
                    "update {} done: batch {} loss {:.6}",
                    self.trigger.episodes(),
                    summary.batch_size,
                    summary.loss
                );
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.record_learner_failure();
                warn!("update {} failed: {}", self.trigger.episodes(), e);
                return Err(e.into());
            }
        }

        Ok(outcome)
    }

    /// Ticks until the display is closed.
    ///
    /// Learner failures are logged and the loop continues; any other error
    /// ends the run.
    pub fn run(&mut self) -> Result<&TrainingStats, DriverError> {
        loop {
            match self.tick() {
                Ok(DriverState::Terminated) => break,
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(&self.stats)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn trigger(&self) -> &EpisodeTrigger {
        &self.trigger
    }

    pub fn decision(&self) -> &DecisionLoop {
        &self.decision
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn learner(&self) -> &L {
        &self.learner
    }
}
