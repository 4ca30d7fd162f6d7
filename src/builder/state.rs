//! Builder for constructing states.

use crate::core::State;

/// Builder for constructing a [`State`] with a fluent API.
#[derive(Debug, Clone)]
pub struct StateBuilder {
    name: String,
    entering: Option<String>,
    exiting: Option<String>,
    changed: Option<String>,
    transitions: Vec<(String, String)>,
}

impl StateBuilder {
    /// Start building a state called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entering: None,
            exiting: None,
            changed: None,
            transitions: Vec::new(),
        }
    }

    /// Event published when the machine enters the state.
    pub fn entering(mut self, event: impl Into<String>) -> Self {
        self.entering = Some(event.into());
        self
    }

    /// Event published when the machine leaves the state.
    pub fn exiting(mut self, event: impl Into<String>) -> Self {
        self.exiting = Some(event.into());
        self
    }

    /// Event published once the state has become current.
    pub fn changed(mut self, event: impl Into<String>) -> Self {
        self.changed = Some(event.into());
        self
    }

    /// Bind `action` to `target`. Later bindings of the same action are ignored.
    pub fn on(mut self, action: impl Into<String>, target: impl Into<String>) -> Self {
        self.transitions.push((action.into(), target.into()));
        self
    }

    pub fn build(self) -> State {
        let mut state = State::with_events(self.name, self.entering, self.exiting, self.changed);
        for (action, target) in self.transitions {
            state.define_trans(action, target);
        }
        state
    }
}
