//! Frame-delayed melee swing.
//!
//! Activation only computes the struck tiles and starts the active window.
//! Damage resolves once the hit frame elapses, exactly once per swing.

use std::time::Duration;

use tracing::trace;

use crate::combat::{CombatRequest, MeleeTiles, melee_damage, melee_tiles};
use crate::state::Position;

use super::state::{AbilityState, StateAdvance};
use super::tuning::MeleeTuning;
use super::{Activation, ActivationContext, AbilitySignal};

const COOLDOWN_CUT: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
pub struct MeleeAbility {
    tuning: MeleeTuning,
    base_damage: i32,
    extended_reach: bool,
    tiles: MeleeTiles,
    damage_done: bool,
}

impl MeleeAbility {
    pub(super) fn new(tuning: MeleeTuning) -> (AbilityState, Self) {
        let state = AbilityState::new(
            tuning.cooldown,
            tuning.duration,
            tuning.mana_cost,
            tuning.max_level,
        );
        let melee = Self {
            tuning,
            base_damage: tuning.base_damage,
            extended_reach: false,
            tiles: MeleeTiles::new(),
            damage_done: false,
        };
        (state, melee)
    }

    pub fn tuning(&self) -> MeleeTuning {
        self.tuning
    }

    pub fn hit_frame(&self) -> Duration {
        self.tuning.hit_frame
    }

    pub fn has_extended_reach(&self) -> bool {
        self.extended_reach
    }

    /// Damage per target at `level`.
    pub fn damage(&self, level: u8) -> i32 {
        melee_damage(self.base_damage, self.tuning.damage_per_level, level)
    }

    /// Tiles of the swing in flight; empty between swings.
    pub fn tiles(&self) -> &[Position] {
        &self.tiles
    }

    pub(super) fn on_activate(&mut self, ctx: &ActivationContext) -> Activation {
        self.tiles = melee_tiles(ctx.origin, ctx.facing, self.extended_reach);
        self.damage_done = false;
        Activation::Swing {
            tiles: self.tiles.clone(),
        }
    }

    pub(super) fn on_advance(&mut self, report: StateAdvance, level: u8) -> Option<AbilitySignal> {
        let mut signal = None;

        let reached = report
            .active_elapsed
            .is_some_and(|elapsed| elapsed >= self.tuning.hit_frame);
        if reached && !self.damage_done {
            self.damage_done = true;
            trace!(tiles = self.tiles.len(), "melee hit frame reached");
            signal = Some(AbilitySignal::Request(CombatRequest::Strike {
                tiles: self.tiles.clone(),
                damage: self.damage(level),
            }));
        }

        if report.deactivated {
            self.clear_swing();
        }

        signal
    }

    pub(super) fn on_upgrade(&mut self, state: &mut AbilityState, level: u8) {
        match level {
            2 | 5 => state.reduce_cooldown(COOLDOWN_CUT),
            3 => self.extended_reach = true,
            4 => self.base_damage += 1,
            _ => {}
        }
    }

    pub(super) fn clear_swing(&mut self) {
        self.tiles.clear();
        self.damage_done = false;
    }

    /// Resumes a swing from persisted timers. The struck tiles are not part
    /// of the record, so a resumed swing lands on nothing.
    pub(super) fn restore(&mut self, state: &AbilityState) {
        self.tiles.clear();
        self.damage_done = state.active() && state.active_elapsed() >= self.tuning.hit_frame;
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Ability, AbilityKind, ActivationContext};
    use crate::combat::CombatRequest;
    use crate::state::{ActorCombatPools, EntityId, Facing, Position};

    use super::*;

    fn ctx() -> ActivationContext {
        ActivationContext::new(EntityId::PLAYER, Position::new(3, 3), Facing::Right)
    }

    fn strikes(signal: Option<AbilitySignal>) -> bool {
        matches!(
            signal,
            Some(AbilitySignal::Request(CombatRequest::Strike { .. }))
        )
    }

    #[test]
    fn damage_waits_for_hit_frame_and_lands_once() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 100);
        assert!(melee.activate(&mut pools, &ctx()).is_ok());
        assert_eq!(pools.mana(), 90);
        assert!(!melee.is_ready());

        assert!(!strikes(melee.advance(Duration::from_millis(60), None)));
        assert!(!strikes(melee.advance(Duration::from_millis(39), None)));
        assert!(strikes(melee.advance(Duration::from_millis(1), None)));

        for _ in 0..50 {
            assert!(!strikes(melee.advance(Duration::from_millis(16), None)));
        }
    }

    #[test]
    fn single_large_step_still_strikes_before_clearing() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 100);
        melee.activate(&mut pools, &ctx()).unwrap();

        match melee.advance(Duration::from_secs(1), None) {
            Some(AbilitySignal::Request(CombatRequest::Strike { tiles, damage })) => {
                assert_eq!(tiles.len(), 4);
                assert_eq!(damage, 5);
            }
            other => panic!("expected strike, got {other:?}"),
        }
        assert!(!melee.is_active());
    }

    #[test]
    fn upgrades_are_cumulative() {
        let mut melee = Ability::melee(MeleeTuning::default());
        for _ in 0..4 {
            assert!(melee.upgrade());
        }
        assert!(!melee.upgrade());
        assert_eq!(melee.level(), 5);
        assert_eq!(melee.state().cooldown_duration(), Duration::from_millis(600));

        let AbilityKind::Melee(inner) = melee.kind() else {
            panic!("melee ability expected");
        };
        assert!(inner.has_extended_reach());
        // base 5 + 1 (L4), plus 4 levels at +1
        assert_eq!(inner.damage(5), 10);
    }
}
