//! Declarative loading of state machines.
//!
//! An [`FsmDescription`] names an initial state and lists state definitions,
//! each with optional lifecycle events and `action -> target` transitions.
//! [`FsmLoader`] turns the definitions into [`State`]s once and registers
//! them with a machine.
//!
//! # Example
//!
//! ```rust
//! use statemint::events::LocalBus;
//! use statemint::loader::FsmLoader;
//! use std::sync::Arc;
//!
//! let mut loader = FsmLoader::from_json(r#"{
//!     "initial": "Idle",
//!     "states": [
//!         { "name": "Idle", "transitions": [{ "action": "start", "target": "Running" }] },
//!         { "name": "Running" }
//!     ]
//! }"#).unwrap();
//!
//! let machine = loader.inject(Arc::new(LocalBus::new())).unwrap();
//! assert_eq!(machine.current_state().map(|s| s.name()), Some("Idle"));
//! ```

mod description;
pub mod error;
mod validation;

pub use description::{FsmDescription, StateDef, TransitionDef};
pub use error::LoadError;
pub use validation::{DescriptionViolation, ViolationStrategy};

use crate::core::State;
use crate::events::EventBus;
use crate::machine::StateMachine;
use std::sync::Arc;

/// Builds states from a description and populates machines with them.
pub struct FsmLoader {
    description: FsmDescription,
    on_violation: ViolationStrategy,
    states: Option<Vec<State>>,
}

impl FsmLoader {
    pub fn new(description: FsmDescription) -> Self {
        Self {
            description,
            on_violation: ViolationStrategy::default(),
            states: None,
        }
    }

    /// Parse a JSON description and wrap it in a loader.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        FsmDescription::from_json(json).map(Self::new)
    }

    /// Set how violations found in the description are handled.
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    pub fn description(&self) -> &FsmDescription {
        &self.description
    }

    /// The states built from the description, in declaration order.
    ///
    /// States are built on the first successful call; later calls return
    /// the same list. With [`ViolationStrategy::Reject`] a description with
    /// violations fails to load and nothing is built.
    pub fn load(&mut self) -> Result<&[State], LoadError> {
        if self.states.is_none() {
            self.check()?;
            let states = self
                .description
                .states
                .iter()
                .map(Self::build_state)
                .collect();
            self.states = Some(states);
        }
        Ok(self.states.as_deref().unwrap_or_default())
    }

    /// Build one state, defining its transitions in declaration order.
    pub fn build_state(definition: &StateDef) -> State {
        let mut state = State::with_events(
            definition.name.clone(),
            definition.entering.clone(),
            definition.exiting.clone(),
            definition.changed.clone(),
        );
        for transition in definition.transitions.iter().flatten() {
            state.define_trans(transition.action.clone(), transition.target.clone());
        }
        state
    }

    /// Whether `name` is the description's initial state.
    pub fn is_initial(&self, name: &str) -> bool {
        self.description.initial == name
    }

    /// Register every loaded state with `machine`, flagging the initial one.
    ///
    /// Registration keeps the first state of a given name, so later
    /// duplicates in the description are dropped along with their
    /// transitions.
    pub fn populate(&mut self, machine: &mut StateMachine) -> Result<(), LoadError> {
        self.load()?;
        for state in self.states.iter().flatten() {
            machine.register_state(state.clone(), self.is_initial(state.name()));
        }
        if !machine.is_started() {
            tracing::warn!(
                initial = %self.description.initial,
                "machine has no current state after loading"
            );
        }
        Ok(())
    }

    /// Create a machine publishing through `bus` and populate it.
    pub fn inject(&mut self, bus: Arc<dyn EventBus>) -> Result<StateMachine, LoadError> {
        let mut machine = StateMachine::new(bus);
        self.populate(&mut machine)?;
        Ok(machine)
    }

    fn check(&self) -> Result<(), LoadError> {
        let violations = self.description.violations();
        if violations.is_empty() {
            return Ok(());
        }
        match self.on_violation {
            ViolationStrategy::Reject => Err(LoadError::Rejected(violations)),
            ViolationStrategy::IgnoreAndLog => {
                for violation in &violations {
                    tracing::warn!(%violation, "loading description despite violation");
                }
                Ok(())
            }
        }
    }
}
