//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for states and machines, an
//! in-code alternative to loading a declarative description.
//!
//! # Example
//!
//! ```
//! use statemint::builder::{StateBuilder, StateMachineBuilder};
//! use statemint::events::LocalBus;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut machine = StateMachineBuilder::new(Arc::new(LocalBus::new()))
//!     .initial("Idle")
//!     .with(StateBuilder::new("Idle").on("start", "Running"))
//!     .with(StateBuilder::new("Running").entering("e:run").on("stop", "Idle"))
//!     .build()
//!     .unwrap();
//!
//! assert!(machine.handle_action("start", json!(null)).is_committed());
//! assert_eq!(machine.current_state().map(|s| s.name()), Some("Running"));
//! ```

pub mod error;
pub mod machine;
pub mod state;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;
