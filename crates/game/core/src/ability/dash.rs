//! Charge-pool dash.
//!
//! The dash never uses the classic cooldown. It is ready while a charge is
//! left and no dash is in flight; each charge regenerates on its own timer.
//! Movement itself belongs to the movement collaborator; this only gates and
//! counts.

use std::time::Duration;

use bitflags::bitflags;
use tracing::trace;

use crate::timer::Timer;

use super::Activation;
use super::state::AbilityState;
use super::tuning::DashTuning;

const RECHARGE_CUT: Duration = Duration::from_millis(500);
const DURATION_BONUS: Duration = Duration::from_millis(200);

bitflags! {
    /// Bonus effects carried by a dash, unlocked by upgrades.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DashPerks: u8 {
        /// The dasher ignores damage while the dash lasts.
        const INVULNERABLE = 1 << 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashAbility {
    tuning: DashTuning,
    current: u32,
    max: u32,
    recharge: Timer,
    perks: DashPerks,
}

impl DashAbility {
    pub(super) fn new(tuning: DashTuning) -> (AbilityState, Self) {
        // No classic cooldown and no mana: the pool is the only gate.
        let state = AbilityState::new(Duration::ZERO, tuning.duration, 0, tuning.max_level);
        let dash = Self {
            tuning,
            current: tuning.max_charges,
            max: tuning.max_charges,
            recharge: Timer::new(tuning.recharge),
            perks: DashPerks::empty(),
        };
        (state, dash)
    }

    pub fn tuning(&self) -> DashTuning {
        self.tuning
    }

    pub fn charges(&self) -> u32 {
        self.current
    }

    pub fn max_charges(&self) -> u32 {
        self.max
    }

    pub fn recharge_interval(&self) -> Duration {
        self.recharge.threshold()
    }

    pub fn recharge_elapsed(&self) -> Duration {
        self.recharge.elapsed()
    }

    pub fn perks(&self) -> DashPerks {
        self.perks
    }

    /// Charge left and no dash in flight.
    pub(super) fn is_ready(&self, state: &AbilityState) -> bool {
        self.current > 0 && !state.active()
    }

    pub(super) fn on_activate(&mut self, state: &AbilityState) -> Activation {
        self.current -= 1;
        trace!(charges = self.current, "dash charge spent");
        Activation::Dash {
            duration: state.active_duration(),
            perks: self.perks,
            charges_left: self.current,
        }
    }

    pub(super) fn on_advance(&mut self, delta: Duration) {
        if self.current >= self.max {
            self.recharge.reset();
            return;
        }

        self.recharge.advance(delta);
        if self.recharge.is_finished() {
            self.current += 1;
            self.recharge.reset();
            trace!(charges = self.current, "dash charge regained");
        }
    }

    pub(super) fn on_upgrade(&mut self, state: &mut AbilityState, level: u8) {
        match level {
            2 => {
                let interval = self.recharge.threshold().saturating_sub(RECHARGE_CUT);
                self.recharge.set_threshold(interval);
            }
            3 => {
                // The existing deficit carries over to the larger pool.
                self.max += 1;
                self.current += 1;
            }
            4 => state.extend_duration(DURATION_BONUS),
            5 => self.perks |= DashPerks::INVULNERABLE,
            _ => {}
        }
    }

    pub(super) fn force_reset(&mut self) {
        self.current = self.max;
        self.recharge.reset();
    }

    pub(super) fn restore(&mut self, current: u32, recharge_elapsed: Duration) {
        self.current = current.min(self.max);
        if self.current < self.max {
            self.recharge.restore(recharge_elapsed);
        } else {
            self.recharge.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Ability, AbilityKind, ActivationContext, ActivationError};
    use crate::state::{ActorCombatPools, EntityId, Facing, Position};

    use super::*;

    fn ctx() -> ActivationContext {
        ActivationContext::new(EntityId::PLAYER, Position::ORIGIN, Facing::Up)
    }

    fn charges(ability: &Ability) -> u32 {
        match ability.kind() {
            AbilityKind::Dash(dash) => dash.charges(),
            _ => panic!("dash ability expected"),
        }
    }

    #[test]
    fn pool_drains_and_regains_one_charge_per_interval() {
        let mut dash = Ability::dash(DashTuning::default());
        let mut pools = ActorCombatPools::new(100, 0);

        assert!(dash.activate(&mut pools, &ctx()).is_ok());
        // Still dashing: not ready even with a charge left.
        assert!(!dash.can_activate(&pools));
        dash.advance(Duration::from_millis(800), None);

        assert!(dash.activate(&mut pools, &ctx()).is_ok());
        assert_eq!(charges(&dash), 0);
        dash.advance(Duration::from_millis(800), None);

        assert!(!dash.can_activate(&pools));
        assert!(matches!(
            dash.activate(&mut pools, &ctx()),
            Err(ActivationError::NotReady { .. })
        ));

        // First recharge started with the first dash, 1.6 s ago.
        dash.advance(Duration::from_millis(400), None);
        assert_eq!(charges(&dash), 1);
        assert!(dash.can_activate(&pools));

        dash.advance(Duration::from_millis(1000), None);
        assert_eq!(charges(&dash), 1);
    }

    #[test]
    fn dash_never_needs_mana() {
        let dash = Ability::dash(DashTuning::default());
        let pools = ActorCombatPools::new(100, 0);
        assert!(dash.can_activate(&pools));
        assert_eq!(pools.mana(), 0);
    }

    #[test]
    fn upgrades_extend_pool_and_grant_perks() {
        let mut dash = Ability::dash(DashTuning::default());
        let mut pools = ActorCombatPools::new(100, 0);
        dash.activate(&mut pools, &ctx()).unwrap();
        assert_eq!(charges(&dash), 1);

        dash.upgrade();
        dash.upgrade();
        let AbilityKind::Dash(inner) = dash.kind() else {
            panic!("dash ability expected");
        };
        assert_eq!(inner.max_charges(), 3);
        assert_eq!(inner.charges(), 2);
        assert_eq!(inner.recharge_interval(), Duration::from_millis(1500));

        dash.upgrade();
        dash.upgrade();
        assert_eq!(dash.state().active_duration(), Duration::from_millis(1000));
        let AbilityKind::Dash(inner) = dash.kind() else {
            panic!("dash ability expected");
        };
        assert!(inner.perks().contains(DashPerks::INVULNERABLE));
    }
}
