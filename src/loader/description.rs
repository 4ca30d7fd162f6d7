//! Declarative machine descriptions.

use crate::loader::error::LoadError;
use serde::{Deserialize, Serialize};

/// A whole machine: the name of its initial state and its state definitions.
///
/// # Example
///
/// ```rust
/// use statemint::loader::FsmDescription;
///
/// let description = FsmDescription::from_json(r#"{
///     "initial": "Idle",
///     "states": [
///         { "name": "Idle", "transitions": [{ "action": "start", "target": "Running" }] },
///         { "name": "Running", "entering": "e:run" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(description.initial, "Idle");
/// assert_eq!(description.states.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmDescription {
    pub initial: String,
    pub states: Vec<StateDef>,
}

/// Definition of one state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exiting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<TransitionDef>>,
}

/// A single `action -> target` binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub action: String,
    pub target: String,
}

impl FsmDescription {
    pub fn new(initial: impl Into<String>, states: Vec<StateDef>) -> Self {
        Self {
            initial: initial.into(),
            states,
        }
    }

    /// Parse a description from JSON using the canonical field names.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether any definition is named `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.states.iter().any(|state| state.name == name)
    }
}

impl StateDef {
    /// A definition with no events and no transitions list.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entering: None,
            exiting: None,
            changed: None,
            transitions: None,
        }
    }

    pub fn entering(mut self, event: impl Into<String>) -> Self {
        self.entering = Some(event.into());
        self
    }

    pub fn exiting(mut self, event: impl Into<String>) -> Self {
        self.exiting = Some(event.into());
        self
    }

    pub fn changed(mut self, event: impl Into<String>) -> Self {
        self.changed = Some(event.into());
        self
    }

    /// Append a transition definition, creating the list if needed.
    pub fn transition(mut self, action: impl Into<String>, target: impl Into<String>) -> Self {
        self.transitions
            .get_or_insert_with(Vec::new)
            .push(TransitionDef {
                action: action.into(),
                target: target.into(),
            });
        self
    }
}
