//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into the maze-core type it describes.
//! [`ContentFactory`] ties them to a data directory.

pub mod archetypes;
pub mod config;
pub mod factory;
pub mod maze;
pub mod tuning;

pub use archetypes::ArchetypeLoader;
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use maze::{MazeLayout, MazeLoader, SpawnSpec};
pub use tuning::TuningLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
