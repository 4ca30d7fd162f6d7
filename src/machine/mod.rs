//! The runtime state machine.
//!
//! A [`StateMachine`] owns a registry of [`State`](crate::core::State)s by
//! name and a pointer to the current one. Actions select a target through
//! the current state's table; the transition then runs a fixed protocol:
//!
//! 1. publish the current state's exit event, stop if a listener cancelled
//! 2. publish the target's enter event, stop if a listener cancelled
//! 3. commit, publish the target's changed event, then
//!    [`CHANGED`](crate::events::CHANGED)
//!
//! A veto in step 2 leaves the machine in its old state although its exit
//! event has already been published.

mod state_machine;
mod transition;

pub use state_machine::StateMachine;
pub use transition::{Cancellation, TransitionOutcome};
