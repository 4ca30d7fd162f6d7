//! Named state nodes and their action tables.
//!
//! A `State` carries its name, up to three lifecycle event names and a
//! table mapping action names to target state names. Targets are plain
//! names: they are resolved against a machine's registry only when an
//! action is handled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named node of a state machine.
///
/// The name is fixed for the life of the value. The transition table can
/// be extended with [`State::define_trans`] and shrunk with
/// [`State::remove_trans`] at any time, including after the state has been
/// registered with a machine.
///
/// # Example
///
/// ```rust
/// use statemint::core::State;
///
/// let mut idle = State::with_events("Idle", Some("e:idle".into()), None, None);
/// idle.define_trans("start", "Running");
///
/// assert_eq!(idle.name(), "Idle");
/// assert_eq!(idle.entering(), Some("e:idle"));
/// assert_eq!(idle.get_target("start"), Some("Running"));
/// assert_eq!(idle.get_target("stop"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exiting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    changed: Option<String>,
    #[serde(default)]
    transitions: HashMap<String, String>,
}

impl State {
    /// Create a state with no lifecycle events and an empty transition table.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_events(name, None, None, None)
    }

    /// Create a state with the given lifecycle event names.
    ///
    /// An absent event name means that protocol point is skipped for this
    /// state.
    pub fn with_events(
        name: impl Into<String>,
        entering: Option<String>,
        exiting: Option<String>,
        changed: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entering,
            exiting,
            changed,
            transitions: HashMap::new(),
        }
    }

    /// The state's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event published when the machine enters this state.
    pub fn entering(&self) -> Option<&str> {
        self.entering.as_deref()
    }

    /// Event published when the machine leaves this state.
    pub fn exiting(&self) -> Option<&str> {
        self.exiting.as_deref()
    }

    /// Event published once this state has become current.
    pub fn changed(&self) -> Option<&str> {
        self.changed.as_deref()
    }

    /// Bind `action` to `target` unless the action is already bound.
    ///
    /// The first binding wins; redefining an action is a no-op. The target
    /// is not checked against any registry. Returns `true` when the binding
    /// was added.
    pub fn define_trans(&mut self, action: impl Into<String>, target: impl Into<String>) -> bool {
        let action = action.into();
        if self.get_target(&action).is_some() {
            tracing::trace!(state = %self.name, %action, "action already bound, keeping first target");
            return false;
        }
        self.transitions.insert(action, target.into());
        true
    }

    /// Remove the binding for `action`, returning the target it pointed to.
    pub fn remove_trans(&mut self, action: &str) -> Option<String> {
        self.transitions.remove(action)
    }

    /// The target state name bound to `action`, if any.
    pub fn get_target(&self, action: &str) -> Option<&str> {
        self.transitions.get(action).map(String::as_str)
    }

    /// Iterate over `(action, target)` bindings in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.transitions
            .iter()
            .map(|(action, target)| (action.as_str(), target.as_str()))
    }

    /// Number of bound actions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}
