//! Core state type.
//!
//! A state is a plain value: a name, optional lifecycle event names and an
//! action table. It knows nothing about machines or event buses, so it can
//! be built, cloned and inspected in isolation.

mod state;

pub use state::State;
