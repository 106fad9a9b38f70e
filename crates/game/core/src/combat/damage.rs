//! Damage events and their application to combat pools.

use crate::state::{ActorCombatPools, DamageOutcome, EntityId, Position};

use super::formula::shell_intake;

// ============================================================================
// Damage Source
// ============================================================================

/// What dealt a damage event. Carried through to notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageSource {
    /// Player melee swing.
    Melee,
    /// Player area cast.
    AreaCast,
    /// Player dash collision.
    DashCollision,
    /// Enemy bolt.
    Projectile,
    /// Enemy touching or striking the player at melee range.
    Contact,
    /// Enemy slam around itself.
    Slam,
}

/// One damage application.
///
/// `breaking` marks interactions that shatter armored targets outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageEvent {
    pub amount: i32,
    pub source: DamageSource,
    pub breaking: bool,
}

impl DamageEvent {
    pub const fn new(amount: i32, source: DamageSource) -> Self {
        Self {
            amount,
            source,
            breaking: false,
        }
    }

    /// A dash collision: always flagged as breaking.
    pub const fn dash_collision(amount: i32) -> Self {
        Self {
            amount,
            source: DamageSource::DashCollision,
            breaking: true,
        }
    }
}

/// How a target turns an incoming event into a pool change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intake {
    /// Subtract this much health.
    Damage(i32),
    /// Die immediately regardless of remaining health.
    Shatter,
}

/// Anything combat resolution can strike.
pub trait Combatant {
    fn id(&self) -> EntityId;

    fn pools(&self) -> &ActorCombatPools;

    fn pools_mut(&mut self) -> &mut ActorCombatPools;

    /// Cells occupied by this combatant (anchor cell first).
    fn cells(&self) -> Vec<Position>;

    fn occupies(&self, tile: Position) -> bool {
        self.cells().contains(&tile)
    }

    /// Damage intake policy. Plain targets take the full amount.
    fn intake(&self, event: &DamageEvent) -> Intake {
        Intake::Damage(event.amount)
    }
}

/// Intake policy for shelled targets.
///
/// Breaking events shatter the shell whatever the remaining health; normal
/// hits are reduced by [`shell_intake`].
pub fn shelled_intake(event: &DamageEvent) -> Intake {
    if event.breaking {
        Intake::Shatter
    } else {
        Intake::Damage(shell_intake(event.amount))
    }
}

/// Applies `event` to `target`.
///
/// Dead targets ignore it. Health may drop below zero; the caller fires the
/// death notification when the outcome is a kill.
pub fn apply_damage<T: Combatant + ?Sized>(target: &mut T, event: DamageEvent) -> DamageOutcome {
    if !target.pools().is_alive() {
        return DamageOutcome::Ignored;
    }

    match target.intake(&event) {
        Intake::Damage(amount) => target.pools_mut().take_damage(amount),
        Intake::Shatter => {
            let pools = target.pools_mut();
            if pools.kill() {
                DamageOutcome::Killed {
                    remaining: pools.health(),
                }
            } else {
                DamageOutcome::Ignored
            }
        }
    }
}

/// Heals `target` by `amount`, clamped to max health. No-op on dead targets.
pub fn apply_heal<T: Combatant + ?Sized>(target: &mut T, amount: i32) -> i32 {
    target.pools_mut().heal(amount)
}
