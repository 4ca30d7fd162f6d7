//! State machine that drives a single current state through vetoable transitions.

use crate::core::State;
use crate::events::{EventBus, Mailbox, Notification, ACTION, CANCEL, CHANGED};
use crate::machine::transition::{Cancellation, TransitionOutcome};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named states plus the one the machine currently occupies.
///
/// Lifecycle events are published through the bus handed to
/// [`StateMachine::new`]. Listeners veto a transition by cancelling through
/// a [`Cancellation`] handle obtained from [`StateMachine::cancellation`].
pub struct StateMachine {
    bus: Arc<dyn EventBus>,
    states: HashMap<String, State>,
    initial: Option<String>,
    current: Option<String>,
    // Set when the current state is removed from the registry; the machine
    // keeps running on it until the next commit.
    detached: Option<State>,
    cancellation: Cancellation,
}

impl StateMachine {
    /// Create an empty, unstarted machine publishing through `bus`.
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            bus,
            states: HashMap::new(),
            initial: None,
            current: None,
            detached: None,
            cancellation: Cancellation::new(),
        }
    }

    /// Notification names the machine reacts to in [`StateMachine::handle_notification`].
    pub fn interests() -> [&'static str; 2] {
        [ACTION, CANCEL]
    }

    /// Register `state` under its name unless that name is already taken.
    ///
    /// When `initial` is set and no initial state exists yet, the state
    /// becomes both the initial and the current state without any event
    /// being published. Returns `true` if the state was added.
    pub fn register_state(&mut self, state: State, initial: bool) -> bool {
        let name = state.name().to_string();
        if self.states.contains_key(&name) {
            tracing::debug!(state = %name, "state already registered, keeping the first one");
            return false;
        }
        self.states.insert(name.clone(), state);

        if initial {
            match &self.initial {
                Some(existing) => tracing::warn!(
                    state = %name,
                    initial = %existing,
                    "initial state already set, ignoring initial flag"
                ),
                None => {
                    tracing::debug!(state = %name, "starting at initial state");
                    self.initial = Some(name.clone());
                    self.current = Some(name);
                    self.detached = None;
                }
            }
        }
        true
    }

    /// Remove the state registered under `name`.
    ///
    /// Removing the current state does not move the machine: it stays on
    /// the removed state until the next committed transition. While it
    /// does, [`StateMachine::state_mut`] no longer finds it; edit it through
    /// [`StateMachine::current_state_mut`].
    pub fn remove_state(&mut self, name: &str) -> Option<State> {
        let removed = self.states.remove(name)?;
        if self.detached.is_none() && self.current.as_deref() == Some(name) {
            self.detached = Some(removed.clone());
        }
        Some(removed)
    }

    /// Explicitly start a machine that has no current state yet.
    ///
    /// This is a cold start: no lifecycle event is published. Returns
    /// `false` if the machine is already started or `name` is not registered.
    pub fn start_at(&mut self, name: &str) -> bool {
        if let Some(current) = &self.current {
            tracing::warn!(current = %current, requested = %name, "machine already started");
            return false;
        }
        if !self.states.contains_key(name) {
            tracing::warn!(state = %name, "cannot start at an unregistered state");
            return false;
        }
        self.current = Some(name.to_string());
        true
    }

    /// The state the machine currently occupies.
    pub fn current_state(&self) -> Option<&State> {
        match &self.detached {
            Some(state) => Some(state),
            None => self.current.as_deref().and_then(|name| self.states.get(name)),
        }
    }

    /// Mutable access to the current state, registered or removed.
    pub fn current_state_mut(&mut self) -> Option<&mut State> {
        match &mut self.detached {
            Some(state) => Some(state),
            None => match self.current.as_deref() {
                Some(name) => self.states.get_mut(name),
                None => None,
            },
        }
    }

    /// Whether the machine has a current state.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// The state registered with the initial flag, if it is still registered.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial.as_deref().and_then(|name| self.states.get(name))
    }

    /// The registered state named `name`.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Mutable access to a registered state, e.g. to edit its transitions.
    ///
    /// Only the registry is searched, so a current state that has been
    /// removed is not returned here.
    pub fn state_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.get_mut(name)
    }

    /// Registered states in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    /// Whether a state named `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// A handle listeners can use to veto the transition in flight.
    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// Veto the transition in flight.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Follow the current state's binding for `action`.
    ///
    /// Unmapped actions are ignored. A binding whose target is not
    /// registered is treated as unmapped.
    pub fn handle_action(&mut self, action: &str, payload: Value) -> TransitionOutcome {
        let Some(current) = self.current_state() else {
            tracing::trace!(%action, "machine not started, ignoring action");
            return TransitionOutcome::Ignored;
        };
        let Some(target) = current.get_target(action) else {
            tracing::trace!(state = %current.name(), %action, "action not mapped");
            return TransitionOutcome::Ignored;
        };
        if !self.states.contains_key(target) {
            tracing::warn!(
                state = %current.name(),
                %action,
                %target,
                "transition target is not registered, ignoring action"
            );
            return TransitionOutcome::Ignored;
        }

        let target = target.to_string();
        self.transition_to(&target, payload)
    }

    /// Move to the registered state named `target`.
    ///
    /// Publishes, in order: the current state's exit event (with the target
    /// name as kind), the target's enter event, the target's changed event
    /// and finally [`CHANGED`]. A cancel raised while the exit or enter event
    /// is being published aborts the transition. An enter veto still leaves
    /// the machine in its old state even though the exit event already went
    /// out.
    pub fn transition_to(&mut self, target: &str, payload: Value) -> TransitionOutcome {
        let Some(next) = self.states.get(target) else {
            tracing::trace!(%target, "no such state, nothing to do");
            return TransitionOutcome::Ignored;
        };
        let to = next.name().to_string();
        let entering = next.entering().map(str::to_string);
        let changed = next.changed().map(str::to_string);

        self.cancellation.reset();

        let from = self.current_state().map(|state| state.name().to_string());
        let exiting = self
            .current_state()
            .and_then(State::exiting)
            .map(str::to_string);

        if let Some(exiting) = exiting {
            self.bus
                .publish(Notification::new(exiting, payload.clone()).with_kind(to.clone()));
        }
        if self.cancellation.take() {
            tracing::debug!(?from, %to, "transition vetoed on exit");
            return TransitionOutcome::VetoedOnExit {
                from: from.unwrap_or_default(),
                to,
            };
        }

        if let Some(entering) = entering {
            self.bus.publish(Notification::new(entering, payload.clone()));
        }
        if self.cancellation.take() {
            tracing::debug!(?from, %to, "transition vetoed on enter");
            return TransitionOutcome::VetoedOnEnter { from, to };
        }

        self.current = Some(to.clone());
        self.detached = None;
        tracing::debug!(?from, %to, "transition committed");

        if let Some(changed) = changed {
            self.bus.publish(Notification::new(changed, payload));
        }

        let body = self.current_state().map_or(Value::Null, |state| {
            serde_json::to_value(state).unwrap_or_else(|err| {
                tracing::warn!(state = %to, error = %err, "could not serialize state");
                Value::Null
            })
        });
        self.bus
            .publish(Notification::new(CHANGED, body).with_kind(to.clone()));

        self.cancellation.reset();
        TransitionOutcome::Committed { from, to }
    }

    /// Route a notification received from the bus.
    ///
    /// [`ACTION`] notifications carry the action in their kind and the
    /// payload in their body; [`CANCEL`] vetoes the transition in flight.
    /// Anything else is ignored.
    pub fn handle_notification(&mut self, notification: &Notification) -> TransitionOutcome {
        match notification.name.as_str() {
            ACTION => match notification.kind() {
                Some(action) => self.handle_action(action, notification.body.clone()),
                None => {
                    tracing::warn!("action notification without an action name");
                    TransitionOutcome::Ignored
                }
            },
            CANCEL => {
                self.cancel();
                TransitionOutcome::Ignored
            }
            _ => TransitionOutcome::Ignored,
        }
    }

    /// Handle every action queued in `mailbox`, oldest first.
    ///
    /// Actions queued by listeners while an action is being handled are
    /// processed after it, in the same call.
    pub fn drain(&mut self, mailbox: &Mailbox) -> Vec<TransitionOutcome> {
        let mut outcomes = Vec::new();
        while let Some(queued) = mailbox.pop() {
            outcomes.push(self.handle_action(&queued.action, queued.payload));
        }
        outcomes
    }
}
