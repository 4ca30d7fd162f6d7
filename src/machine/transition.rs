//! Transition outcomes and the cancellation handle listeners veto with.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a call to [`StateMachine::transition_to`](super::StateMachine::transition_to)
/// or [`StateMachine::handle_action`](super::StateMachine::handle_action) did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The machine moved to `to` and published its change notifications.
    Committed { from: Option<String>, to: String },

    /// A listener cancelled while the current state's exit event was being
    /// published. No further events were sent.
    VetoedOnExit { from: String, to: String },

    /// A listener cancelled while the next state's enter event was being
    /// published. The exit event of `from` had already gone out, yet the
    /// machine stays in `from`.
    VetoedOnEnter { from: Option<String>, to: String },

    /// Nothing happened: no current state, unmapped action or unknown target.
    Ignored,
}

impl TransitionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    pub fn is_vetoed(&self) -> bool {
        matches!(self, Self::VetoedOnExit { .. } | Self::VetoedOnEnter { .. })
    }
}

/// Shared cancel flag of one machine.
///
/// Clones refer to the same flag. Listeners capture a clone and call
/// [`Cancellation::cancel`] while handling an exit or enter event; the
/// machine checks and clears the flag right after each of those events.
/// Cancelling at any other time has no effect, because the flag is cleared
/// when the next transition starts.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Veto the transition in flight.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Read and clear the flag.
    pub(crate) fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
