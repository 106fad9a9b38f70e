//! Injected collaborators.
//!
//! The simulation reaches the outside world only through the references
//! bundled in [`SimEnv`]: maze geometry, pointer aim, player facing, the
//! random source and the outbound event sink. Every slot is optional. A
//! missing collaborator is skipped and the tick falls back to a neutral
//! answer, so the core runs headless in tests with nothing injected.
mod error;
mod input;
mod maze;
mod rng;

pub use error::OracleError;
pub use input::{MovementOracle, PointerOracle, StaticInput};
pub use maze::{GridMaze, MazeDimensions, MazeOracle, line_of_sight};
pub use rng::{PcgRng, RngOracle, compute_seed};

use crate::events::EventSink;
use crate::state::{Facing, Position};

/// Collaborators for one tick.
#[derive(Clone, Copy, Default)]
pub struct SimEnv<'a> {
    maze: Option<&'a dyn MazeOracle>,
    pointer: Option<&'a dyn PointerOracle>,
    movement: Option<&'a dyn MovementOracle>,
    rng: Option<&'a dyn RngOracle>,
    events: Option<&'a dyn EventSink>,
}

impl<'a> SimEnv<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_maze(mut self, maze: &'a dyn MazeOracle) -> Self {
        self.maze = Some(maze);
        self
    }

    #[must_use]
    pub fn with_pointer(mut self, pointer: &'a dyn PointerOracle) -> Self {
        self.pointer = Some(pointer);
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: &'a dyn MovementOracle) -> Self {
        self.movement = Some(movement);
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: &'a dyn EventSink) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the maze oracle, or an error if none was injected.
    pub fn maze(&self) -> Result<&'a dyn MazeOracle, OracleError> {
        self.maze.ok_or(OracleError::MazeNotAvailable)
    }

    pub fn pointer(&self) -> Result<&'a dyn PointerOracle, OracleError> {
        self.pointer.ok_or(OracleError::PointerNotAvailable)
    }

    pub fn movement(&self) -> Result<&'a dyn MovementOracle, OracleError> {
        self.movement.ok_or(OracleError::MovementNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    pub fn events(&self) -> Option<&'a dyn EventSink> {
        self.events
    }

    pub(crate) fn maze_opt(&self) -> Option<&'a dyn MazeOracle> {
        self.maze
    }

    /// Passability with the open-floor fallback.
    pub fn is_passable(&self, position: Position) -> bool {
        self.maze.is_none_or(|maze| maze.is_passable(position))
    }

    /// Sight blocking with the open-floor fallback.
    pub fn blocks_sight(&self, position: Position) -> bool {
        self.maze.is_some_and(|maze| maze.blocks_sight(position))
    }

    pub fn aim_tile(&self) -> Option<Position> {
        self.pointer.and_then(|pointer| pointer.aim_tile())
    }

    pub fn facing(&self) -> Option<Facing> {
        self.movement.and_then(|movement| movement.facing())
    }
}

impl std::fmt::Debug for SimEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEnv")
            .field("maze", &self.maze.is_some())
            .field("pointer", &self.pointer.is_some())
            .field("movement", &self.movement.is_some())
            .field("rng", &self.rng.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collaborators_fall_back() {
        let env = SimEnv::empty();
        assert!(env.is_passable(Position::new(-40, 3)));
        assert!(!env.blocks_sight(Position::ORIGIN));
        assert_eq!(env.aim_tile(), None);
        assert_eq!(env.maze().err(), Some(OracleError::MazeNotAvailable));
        assert_eq!(env.rng().err(), Some(OracleError::RngNotAvailable));
    }

    #[test]
    fn injected_collaborators_answer() {
        let maze = GridMaze::from_rows(&["#.#"]).unwrap();
        let input = StaticInput::new(Some(Position::new(1, 0)), Some(Facing::Left));
        let env = SimEnv::empty()
            .with_maze(&maze)
            .with_pointer(&input)
            .with_movement(&input);
        assert!(!env.is_passable(Position::ORIGIN));
        assert!(env.is_passable(Position::new(1, 0)));
        assert_eq!(env.aim_tile(), Some(Position::new(1, 0)));
        assert_eq!(env.facing(), Some(Facing::Left));
    }
}
