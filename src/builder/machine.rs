//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::State;
use crate::events::EventBus;
use crate::machine::StateMachine;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for constructing a populated [`StateMachine`] with a fluent API.
///
/// Unlike registering states one by one, building is strict: duplicate
/// names and an initial state that was never added are errors.
pub struct StateMachineBuilder {
    bus: Arc<dyn EventBus>,
    initial: Option<String>,
    states: Vec<State>,
}

impl StateMachineBuilder {
    /// Create a builder for a machine publishing through `bus`.
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            bus,
            initial: None,
            states: Vec::new(),
        }
    }

    /// Set the name of the initial state (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a pre-built state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add a state from a builder.
    pub fn with(self, builder: StateBuilder) -> Self {
        self.state(builder.build())
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: Vec<State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Build the state machine, started at its initial state.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let mut seen = HashSet::new();
        for state in &self.states {
            if !seen.insert(state.name()) {
                return Err(BuildError::DuplicateState(state.name().to_string()));
            }
        }
        if !seen.contains(initial.as_str()) {
            return Err(BuildError::UnknownInitialState(initial));
        }

        let mut machine = StateMachine::new(self.bus);
        for state in self.states {
            let is_initial = state.name() == initial;
            machine.register_state(state, is_initial);
        }

        Ok(machine)
    }
}
