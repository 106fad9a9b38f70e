//! Maze layout loader.
//!
//! Mazes are fixtures: a block of `#`/`.` rows plus the player start and the
//! enemy spawn list. Nothing here generates layouts.

use std::path::Path;

use anyhow::{Context, ensure};
use maze_core::{EnemyTier, GridMaze, MazeOracle, Position};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Maze data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MazeDataRon {
    rows: Vec<String>,
    player_start: (i32, i32),
    #[serde(default)]
    spawns: Vec<(EnemyTier, i32, i32)>, // (tier, x, y)
}

/// One enemy placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSpec {
    pub tier: EnemyTier,
    pub position: Position,
}

/// A loaded, validated maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    pub name: String,
    pub maze: GridMaze,
    pub player_start: Position,
    pub spawns: Vec<SpawnSpec>,
}

/// Loader for maze layouts from RON files.
pub struct MazeLoader;

impl MazeLoader {
    /// Load a maze from a RON file; the layout is named after the file stem.
    pub fn load(path: &Path) -> LoadResult<MazeLayout> {
        let content = read_file(path)?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("maze");
        Self::parse(name, &content).with_context(|| format!("Failed to load maze {}", path.display()))
    }

    /// Parses a maze document and checks every placement lands on floor.
    pub fn parse(name: &str, content: &str) -> LoadResult<MazeLayout> {
        let data: MazeDataRon = ron::from_str(content)?;
        let maze = GridMaze::from_rows(data.rows.as_slice()).context("Invalid maze rows")?;

        let player_start = Position::new(data.player_start.0, data.player_start.1);
        ensure!(
            maze.is_passable(player_start),
            "player start {player_start} is not on open floor"
        );

        let mut spawns = Vec::with_capacity(data.spawns.len());
        for (tier, x, y) in data.spawns {
            let position = Position::new(x, y);
            ensure!(
                maze.is_passable(position),
                "{tier} spawn {position} is not on open floor"
            );
            spawns.push(SpawnSpec { tier, position });
        }

        tracing::debug!(maze = name, spawns = spawns.len(), "maze loaded");
        Ok(MazeLayout {
            name: name.to_string(),
            maze,
            player_start,
            spawns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = r######"(
        rows: [
            "#####",
            "#...#",
            "#####",
        ],
        player_start: (1, 1),
        spawns: [(E02, 3, 1)],
    )"######;

    #[test]
    fn corridor_parses_with_spawns() {
        let layout = MazeLoader::parse("corridor", CORRIDOR).unwrap();
        assert_eq!(layout.name, "corridor");
        assert_eq!(layout.player_start, Position::new(1, 1));
        assert_eq!(
            layout.spawns,
            vec![SpawnSpec {
                tier: EnemyTier::E02,
                position: Position::new(3, 1),
            }]
        );
        assert!(!layout.maze.is_passable(Position::new(0, 1)));
        assert_eq!(layout.maze.dimensions().width, 5);
    }

    #[test]
    fn spawn_inside_a_wall_is_rejected() {
        let doc = CORRIDOR.replace("(E02, 3, 1)", "(E02, 4, 1)");
        let err = MazeLoader::parse("corridor", &doc).unwrap_err();
        assert!(err.to_string().contains("not on open floor"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let doc = CORRIDOR.replace("\"#...#\"", "\"#..#\"");
        assert!(MazeLoader::parse("corridor", &doc).is_err());
    }
}
