//! Combat resolution.
//!
//! Abilities and enemies never touch health directly. They emit
//! [`CombatRequest`]s and enemy attacks; the simulation resolves them here in
//! one step per tick: hit-set computation, per-activation de-duplication, the
//! level-scaled formulas, and finally the pool mutation.

pub mod damage;
pub mod formula;
pub mod hit;

pub use damage::{
    Combatant, DamageEvent, DamageSource, Intake, apply_damage, apply_heal, shelled_intake,
};
pub use formula::{area_damage, heal_amount, heal_fraction, melee_damage, shell_intake};
pub use hit::{AttackResolution, MeleeTiles, in_radius, in_square, melee_tiles};

use crate::state::Position;

/// Work an ability hands to combat resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatRequest {
    /// Melee swing landing on a precomputed tile set.
    Strike { tiles: MeleeTiles, damage: i32 },
    /// Circular area hit around `center`.
    Area {
        center: Position,
        radius: u32,
        damage: i32,
    },
    /// Deferred heal of the caster, as a fraction of its max health.
    Heal { fraction: f32 },
}
