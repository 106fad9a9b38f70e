//! Collaborator access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when reaching an injected collaborator or building maze
/// data for one.
///
/// A missing collaborator is never fatal to a tick: the simulation logs it
/// and falls back (open floor, no aim, no events). Layout errors only occur
/// while loading a maze.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("maze oracle not available")]
    MazeNotAvailable,

    #[error("pointer oracle not available")]
    PointerNotAvailable,

    #[error("movement oracle not available")]
    MovementNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,

    #[error("maze layout has no rows")]
    EmptyLayout,

    #[error("maze row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown maze cell {glyph:?} at ({x}, {y})")]
    UnknownCell { glyph: char, x: usize, y: usize },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            MazeNotAvailable | PointerNotAvailable | MovementNotAvailable | RngNotAvailable => {
                ErrorSeverity::Recoverable
            }
            EmptyLayout | RaggedRow { .. } | UnknownCell { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            MazeNotAvailable => "ORACLE_MAZE_NOT_AVAILABLE",
            PointerNotAvailable => "ORACLE_POINTER_NOT_AVAILABLE",
            MovementNotAvailable => "ORACLE_MOVEMENT_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            EmptyLayout => "ORACLE_EMPTY_LAYOUT",
            RaggedRow { .. } => "ORACLE_RAGGED_ROW",
            UnknownCell { .. } => "ORACLE_UNKNOWN_CELL",
        }
    }
}
