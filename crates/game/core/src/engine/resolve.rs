//! Applying hits to enemies and reporting them.

use tracing::debug;

use crate::combat::{
    AttackResolution, Combatant, DamageEvent, DamageSource, Intake, apply_damage,
};
use crate::enemy::Enemy;
use crate::events::SimEvent;
use crate::state::{DamageOutcome, EntityId, Position};

/// Applies `event` to one enemy and records the notifications.
pub(crate) fn strike_enemy(enemy: &mut Enemy, event: DamageEvent, events: &mut Vec<SimEvent>) -> DamageOutcome {
    let shatter = enemy.intake(&event) == Intake::Shatter;
    let before = enemy.pools().health();
    let outcome = apply_damage(enemy, event);

    let remaining = match outcome {
        DamageOutcome::Ignored => return outcome,
        DamageOutcome::Applied { remaining } | DamageOutcome::Killed { remaining } => remaining,
    };
    let damage = if shatter { before } else { before - remaining };
    events.push(SimEvent::AttackHit {
        target: enemy.id(),
        damage,
        source: event.source,
    });

    if outcome.is_kill() {
        debug!(enemy = %enemy.id(), tier = %enemy.tier(), shatter, "enemy killed");
        events.push(SimEvent::EnemyDeath {
            enemy: enemy.id(),
            tier: enemy.tier(),
            special_kill: shatter,
        });
    }
    outcome
}

/// Applies `damage` to every enemy in `struck`, in order.
pub(crate) fn strike_all(
    enemies: &mut [Enemy],
    struck: &[EntityId],
    damage: i32,
    source: DamageSource,
    events: &mut Vec<SimEvent>,
) {
    for id in struck {
        if let Some(enemy) = enemies.iter_mut().find(|enemy| enemy.id() == *id) {
            strike_enemy(enemy, DamageEvent::new(damage, source), events);
        }
    }
}

/// Melee swing: one resolution per swing, tile order.
pub(crate) fn resolve_strike(
    enemies: &mut [Enemy],
    tiles: &[Position],
    damage: i32,
    events: &mut Vec<SimEvent>,
) -> usize {
    let mut resolution = AttackResolution::new();
    let struck = resolution.strike_tiles(tiles, enemies);
    strike_all(enemies, &struck, damage, DamageSource::Melee, events);
    struck.len()
}

/// Area cast: every living enemy with a cell inside the circle, once each.
pub(crate) fn resolve_area(
    enemies: &mut [Enemy],
    center: Position,
    radius: u32,
    damage: i32,
    events: &mut Vec<SimEvent>,
) -> u32 {
    let mut resolution = AttackResolution::new();
    let struck = resolution.strike_radius(center, radius, enemies);
    strike_all(enemies, &struck, damage, DamageSource::AreaCast, events);
    events.push(SimEvent::AoeResolved {
        center,
        radius,
        targets_hit: struck.len() as u32,
    });
    struck.len() as u32
}

/// Dash contact: breaking hits on enemies under the dasher, at most once per
/// enemy for the whole dash.
pub(crate) fn resolve_dash_contact(
    enemies: &mut [Enemy],
    position: Position,
    damage: i32,
    dash_hits: &mut AttackResolution,
    events: &mut Vec<SimEvent>,
) {
    for enemy in enemies.iter_mut() {
        if enemy.is_alive() && enemy.occupies(position) && dash_hits.try_hit(enemy.id()) {
            strike_enemy(enemy, DamageEvent::dash_collision(damage), events);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::enemy::{ArchetypeProfile, EnemyTier};

    use super::*;

    fn enemy(id: u32, tier: EnemyTier, profile: ArchetypeProfile, at: Position) -> Enemy {
        Enemy::new(EntityId(id), tier, profile, at)
    }

    #[test]
    fn shell_spanning_struck_tiles_is_hit_once() {
        let mut enemies = vec![enemy(
            1,
            EnemyTier::E04,
            ArchetypeProfile::shell(),
            Position::new(0, 1),
        )];
        let mut events = Vec::new();
        let tiles = [Position::new(0, 1), Position::new(1, 1), Position::new(0, 2)];
        assert_eq!(resolve_strike(&mut enemies, &tiles, 10, &mut events), 1);
        assert_eq!(enemies[0].pools().health(), 48);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn dash_shatters_shell_once_per_dash() {
        let mut enemies = vec![enemy(
            1,
            EnemyTier::E04,
            ArchetypeProfile::shell(),
            Position::ORIGIN,
        )];
        let mut events = Vec::new();
        let mut dash_hits = AttackResolution::new();
        resolve_dash_contact(&mut enemies, Position::ORIGIN, 2, &mut dash_hits, &mut events);
        resolve_dash_contact(&mut enemies, Position::new(1, 1), 2, &mut dash_hits, &mut events);

        assert!(!enemies[0].is_alive());
        assert_eq!(
            events,
            vec![
                SimEvent::AttackHit {
                    target: EntityId(1),
                    damage: 50,
                    source: DamageSource::DashCollision,
                },
                SimEvent::EnemyDeath {
                    enemy: EntityId(1),
                    tier: EnemyTier::E04,
                    special_kill: true,
                },
            ]
        );
    }

    #[test]
    fn area_reports_hit_count() {
        let mut enemies = vec![
            enemy(1, EnemyTier::E01, ArchetypeProfile::pearl(), Position::new(2, 0)),
            enemy(2, EnemyTier::E01, ArchetypeProfile::pearl(), Position::new(2, 2)),
            enemy(3, EnemyTier::E01, ArchetypeProfile::pearl(), Position::new(0, 3)),
        ];
        let mut events = Vec::new();
        // r = 2: (2,0) inside, (2,2) at 8 > 4 outside, (0,3) outside.
        let hits = resolve_area(&mut enemies, Position::ORIGIN, 2, 4, &mut events);
        assert_eq!(hits, 1);
        assert_eq!(enemies[0].pools().health(), 1);
        assert!(matches!(
            events.last(),
            Some(SimEvent::AoeResolved { targets_hit: 1, .. })
        ));
    }
}
