//! Hostile actors.
//!
//! Each enemy carries its archetype profile, its combat pools and an
//! independent behavior machine (`Patrol -> Chase -> Prepare -> Attack ->
//! Cooldown`). AI runs in [`Enemy::think`] and never touches the player
//! directly: attacks come back as [`EnemyAttack`]s for combat resolution.

mod ai;
mod behavior;
mod profile;
mod projectile;

pub use ai::{AiContext, AiOutcome, CHASE_HYSTERESIS, EnemyAttack};
pub(crate) use ai::area_reaches;
pub use behavior::{BehaviorMachine, BehaviorState};
pub use profile::{ArchetypeProfile, ArchetypeTable, AttackStyle, EnemyTier};
pub use projectile::{Projectile, ProjectileStep};

use std::time::Duration;

use crate::combat::{Combatant, DamageEvent, Intake, shelled_intake};
use crate::state::{ActorCombatPools, EntityId, Facing, Position};
use crate::timer::Timer;

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EntityId,
    tier: EnemyTier,
    profile: ArchetypeProfile,
    position: Position,
    pools: ActorCombatPools,
    behavior: BehaviorMachine,
    move_timer: Timer,
    turn_timer: Timer,
    heading: Facing,
}

impl Enemy {
    pub fn new(id: EntityId, tier: EnemyTier, profile: ArchetypeProfile, position: Position) -> Self {
        let pools = ActorCombatPools::health_only(profile.max_health);
        let move_timer = Timer::new(profile.move_interval.unwrap_or(Duration::ZERO));
        let turn_timer = Timer::new(profile.patrol_turn);
        Self {
            id,
            tier,
            profile,
            position,
            pools,
            behavior: BehaviorMachine::new(),
            move_timer,
            turn_timer,
            heading: Facing::default(),
        }
    }

    pub fn tier(&self) -> EnemyTier {
        self.tier
    }

    pub fn profile(&self) -> &ArchetypeProfile {
        &self.profile
    }

    /// Anchor cell; the footprint extends toward +x and +y from here.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Facing {
        self.heading
    }

    pub fn state(&self) -> BehaviorState {
        self.behavior.state()
    }

    pub fn behavior(&self) -> &BehaviorMachine {
        &self.behavior
    }

    pub fn is_alive(&self) -> bool {
        self.pools.is_alive()
    }

    /// Cells covered when anchored at `anchor`.
    fn footprint_at(&self, anchor: Position) -> Vec<Position> {
        let side = i32::from(self.profile.footprint.max(1));
        (0..side)
            .flat_map(|dy| (0..side).map(move |dx| anchor.offset(dx, dy)))
            .collect()
    }

    /// Squared distance from the closest occupied cell to `target`.
    pub fn distance_squared_to(&self, target: Position) -> i64 {
        self.cells()
            .into_iter()
            .map(|cell| cell.distance_squared(target))
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Range check on squared distances.
    pub fn within(&self, target: Position, range: f32) -> bool {
        let range = f64::from(range.max(0.0));
        self.distance_squared_to(target) as f64 <= range * range
    }

    /// Manhattan adjacency (or overlap) with any occupied cell.
    pub fn touches(&self, target: Position) -> bool {
        self.cells()
            .into_iter()
            .any(|cell| cell.manhattan(target) <= 1)
    }

    /// Restores full health and returns to patrol.
    pub fn reset(&mut self) {
        self.pools.reset();
        self.behavior.reset();
        self.move_timer.reset();
        self.turn_timer.reset();
    }
}

impl Combatant for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn pools(&self) -> &ActorCombatPools {
        &self.pools
    }

    fn pools_mut(&mut self) -> &mut ActorCombatPools {
        &mut self.pools
    }

    fn cells(&self) -> Vec<Position> {
        self.footprint_at(self.position)
    }

    fn intake(&self, event: &DamageEvent) -> Intake {
        if self.profile.shelled {
            shelled_intake(event)
        } else {
            Intake::Damage(event.amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::combat::{DamageSource, apply_damage};
    use crate::state::DamageOutcome;

    use super::*;

    fn shell() -> Enemy {
        Enemy::new(
            EntityId(4),
            EnemyTier::E04,
            ArchetypeProfile::shell(),
            Position::new(2, 2),
        )
    }

    #[test]
    fn shell_covers_two_by_two() {
        let enemy = shell();
        let cells = enemy.cells();
        assert_eq!(cells.len(), 4);
        assert!(enemy.occupies(Position::new(3, 3)));
        assert!(!enemy.occupies(Position::new(4, 2)));
        assert!(enemy.touches(Position::new(4, 3)));
        assert_eq!(enemy.distance_squared_to(Position::new(6, 3)), 9);
    }

    #[test]
    fn shell_reduces_normal_hits_and_shatters_on_breaking_hits() {
        let mut enemy = shell();
        enemy.pools.take_damage(14);
        assert_eq!(enemy.pools.health(), 36);

        let outcome = apply_damage(&mut enemy, DamageEvent::new(50, DamageSource::Melee));
        assert_eq!(outcome, DamageOutcome::Applied { remaining: 26 });

        let outcome = apply_damage(&mut enemy, DamageEvent::dash_collision(1));
        assert!(outcome.is_kill());
        assert!(!enemy.is_alive());
    }

    #[test]
    fn plain_enemies_take_full_damage() {
        let mut enemy = Enemy::new(
            EntityId(1),
            EnemyTier::E01,
            ArchetypeProfile::pearl(),
            Position::ORIGIN,
        );
        let outcome = apply_damage(&mut enemy, DamageEvent::dash_collision(2));
        assert_eq!(outcome, DamageOutcome::Applied { remaining: 3 });
    }
}
