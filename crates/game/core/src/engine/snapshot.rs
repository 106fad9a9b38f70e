//! Read-only views for hosts and tests.

use crate::ability::AbilityId;
use crate::enemy::{BehaviorState, EnemyTier};
use crate::state::{EntityId, Facing, Position, Tick};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityView {
    pub slot: usize,
    pub id: AbilityId,
    pub level: u8,
    pub ready: bool,
    pub active: bool,
    pub cooldown_progress: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub position: Position,
    pub facing: Facing,
    pub health: i32,
    pub max_health: i32,
    pub mana: u32,
    pub max_mana: u32,
    pub alive: bool,
    pub invulnerable: bool,
    pub abilities: Vec<AbilityView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyView {
    pub id: EntityId,
    pub tier: EnemyTier,
    pub position: Position,
    pub health: i32,
    pub state: BehaviorState,
}

/// Everything a renderer or a test needs to see after a tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimSnapshot {
    pub tick: Tick,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: usize,
}
