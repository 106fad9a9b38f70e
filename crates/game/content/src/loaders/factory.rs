//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use maze_core::{AbilityTuning, ArchetypeTable, SimConfig, Simulation};
use tracing::warn;

use crate::loaders::{
    ArchetypeLoader, ConfigLoader, LoadResult, MazeLayout, MazeLoader, TuningLoader,
};

/// Everything needed to start one encounter.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: SimConfig,
    pub tuning: AbilityTuning,
    pub archetypes: ArchetypeTable,
    pub layout: MazeLayout,
}

impl ContentBundle {
    /// Builds a simulation at the layout's player start with every listed
    /// enemy spawned.
    pub fn build_simulation(&self) -> Simulation {
        let mut sim = Simulation::new(
            self.config.clone(),
            &self.tuning,
            self.archetypes.clone(),
            self.layout.player_start,
        );
        for spawn in &self.layout.spawns {
            if sim.spawn_enemy(spawn.tier, spawn.position).is_none() {
                warn!(tier = %spawn.tier, position = %spawn.position, "spawn skipped");
            }
        }
        sim
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── archetypes.ron
/// └── mazes/
///     ├── arena.ron
///     └── gauntlet.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load ability tuning from `abilities.ron`.
    pub fn load_tuning(&self) -> LoadResult<AbilityTuning> {
        TuningLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load the archetype table from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<ArchetypeTable> {
        ArchetypeLoader::load(&self.data_dir.join("archetypes.ron"))
    }

    /// Load a maze from `mazes/{maze_name}.ron`.
    pub fn load_maze(&self, maze_name: &str) -> LoadResult<MazeLayout> {
        let path = self.data_dir.join("mazes").join(format!("{maze_name}.ron"));
        MazeLoader::load(&path)
    }

    /// Loads config, tuning, archetypes and the named maze.
    pub fn load_bundle(&self, maze_name: &str) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            config: self.load_config()?,
            tuning: self.load_tuning()?,
            archetypes: self.load_archetypes()?,
            layout: self.load_maze(maze_name)?,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
