//! Training-data plumbing: the transition buffer and the episode trigger.

pub mod buffer;
pub mod trigger;

pub use buffer::{Transition, TransitionBuffer};
pub use trigger::EpisodeTrigger;
