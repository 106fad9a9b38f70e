use crate::state::{Facing, Position};

/// Input/camera collaborator: the tile under the pointer, if any.
pub trait PointerOracle: Send + Sync {
    fn aim_tile(&self) -> Option<Position>;
}

/// Movement collaborator: where the player is looking.
pub trait MovementOracle: Send + Sync {
    fn facing(&self) -> Option<Facing>;
}

/// Fixed answers for both input collaborators.
///
/// Hosts without a live input device (scripted runs, tests) fill this in
/// between ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticInput {
    pub aim: Option<Position>,
    pub facing: Option<Facing>,
}

impl StaticInput {
    pub fn new(aim: Option<Position>, facing: Option<Facing>) -> Self {
        Self { aim, facing }
    }
}

impl PointerOracle for StaticInput {
    fn aim_tile(&self) -> Option<Position> {
        self.aim
    }
}

impl MovementOracle for StaticInput {
    fn facing(&self) -> Option<Facing> {
        self.facing
    }
}
