//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the only owner of the simulation state and
//! executes gameplay commands one at a time.

mod simulation;

pub use simulation::{Command, SimulationWorker};
