//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for the RON/TOML data files that tune the
//! simulation:
//! - Simulation configuration (TOML)
//! - Ability tuning (RON)
//! - Enemy archetype tables (RON)
//! - Maze layouts with player start and enemy spawns (RON)
//!
//! Content is handed to the simulation at construction and never appears in
//! ability save records.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeLoader, ConfigLoader, ContentBundle, ContentFactory, LoadResult, MazeLayout,
    MazeLoader, SpawnSpec, TuningLoader,
};
