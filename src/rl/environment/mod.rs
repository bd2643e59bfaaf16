//! Environment seam for the training driver.
//!
//! The driver never looks inside the simulation: it advances it through
//! [`Environment::step_update`], reads it through
//! [`Environment::get_observations`], and polls the display controls.

pub mod aggregation;
pub mod robot;
pub mod sensing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::Action;

pub use aggregation::AggregationEnv;

/// Per-robot observations as reported by an environment, one entry per
/// robot index in every sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvObservation {
    pub observations: Vec<Vec<f64>>,
    pub neighbor_flags: Vec<bool>,
    pub active_flags: Vec<bool>,
}

/// A simulation the driver can advance, observe, and display.
///
/// Calls are strictly sequential: one completes before the next is issued.
pub trait Environment {
    /// Number of robots N.
    fn robot_count(&self) -> usize;

    /// Length of every observation vector.
    fn observation_dim(&self) -> usize;

    /// Current observations, neighbour flags, and active flags.
    fn get_observations(&self) -> EnvObservation;

    /// Advances simulated time by one unit. Returns one reward per robot.
    fn step_update(&mut self, actions: &[Action]) -> Vec<f64>;

    /// Whether the display surface has been closed. Non-blocking.
    fn is_display_closed(&self) -> bool;

    /// Whether the external pause switch is on. Non-blocking.
    fn is_paused(&self) -> bool;

    /// Renders the current state. Must not block indefinitely.
    fn refresh_display(&mut self);

    /// Services display events while the simulation is paused, so an
    /// unpause or a close can be received.
    fn pump_events(&mut self) {}
}

/// Shared pause and close switches.
///
/// Cloning yields another handle onto the same switches, so a UI thread or
/// a signal handler can drive a running simulation.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    paused: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl Controls {
    /// Creates a new set of switches, optionally starting paused.
    pub fn new(paused: bool) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(paused)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Flips the pause switch and returns its new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    /// Closes the display. There is no way to reopen it.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
