//! Runtime orchestration for the maze simulation.
//!
//! This crate wraps a [`maze_core::Simulation`] in a single-writer async
//! worker. Consumers embed [`Runtime`] to drive ticks, feed input and
//! subscribe to events through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    IdleInput, InputFrame, InputProvider, Result, RuntimeError, RuntimeHandle, ScriptedInput,
};
pub use events::{Event, EventBus, Topic, WorkerEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
