//! Statemint: a declaratively-configured finite state machine runtime
//!
//! A machine holds named states and drives a single current state through
//! transitions. Each transition broadcasts lifecycle events on an injected
//! event bus, and any listener can veto it while it is in flight.
//!
//! # Core Concepts
//!
//! - **State**: a name, optional enter/exit/changed events and an action table
//! - **StateMachine**: the registry, the current state and the transition protocol
//! - **FsmLoader**: builds states from a declarative description and registers them
//! - **EventBus**: the synchronous publish/subscribe seam the machine talks through
//!
//! # Example
//!
//! ```rust
//! use statemint::events::{EventBus, LocalBus, Notification};
//! use statemint::loader::FsmLoader;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(LocalBus::new());
//! let mut loader = FsmLoader::from_json(r#"{
//!     "initial": "Idle",
//!     "states": [
//!         { "name": "Idle", "transitions": [{ "action": "start", "target": "Running" }] },
//!         { "name": "Running", "entering": "e:run" }
//!     ]
//! }"#).unwrap();
//! let mut machine = loader.inject(bus.clone()).unwrap();
//!
//! // Veto every attempt to enter Running.
//! let cancellation = machine.cancellation();
//! bus.subscribe("e:run", Arc::new(move |_: &Notification| cancellation.cancel()));
//!
//! let outcome = machine.handle_action("start", json!({"x": 1}));
//! assert!(outcome.is_vetoed());
//! assert_eq!(machine.current_state().map(|s| s.name()), Some("Idle"));
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod loader;
pub mod machine;

// Re-export commonly used types
pub use crate::core::State;
pub use events::{EventBus, LocalBus, Notification};
pub use loader::{FsmDescription, FsmLoader};
pub use machine::{Cancellation, StateMachine, TransitionOutcome};
