//! Topic-based event bus for runtime events.
//!
//! Simulation notifications and worker lifecycle events are published to
//! topics, and consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::WorkerEvent;
