//! Actor-owned abilities.
//!
//! Every ability is a small state machine over the shared [`AbilityState`]
//! lifecycle (ready, active window, cooldown). The variant payload carries
//! what differs: the melee swing's tile set and hit-frame guard, the dash
//! charge pool, and the area cast's phase machine. The set of variants is
//! closed so save/restore and upgrade replay stay exhaustive.
//!
//! Activation follows one sequence for all variants:
//!
//! 1. readiness and mana gate (no side effects on failure)
//! 2. variant pre-checks (aim target, minimum aim time)
//! 3. mana deduction when the variant says it is due
//! 4. the variant's effect hook
//! 5. cooldown and active-window policies, each decided per variant

mod dash;
mod error;
mod magic;
mod manager;
mod melee;
mod save;
mod state;
mod tuning;

pub use dash::{DashAbility, DashPerks};
pub use error::{ActivationError, RestoreError};
pub use magic::{MagicAbility, MagicPhase};
pub use manager::{AbilityManager, SlotSignal};
pub use melee::MeleeAbility;
pub use save::{AbilitySave, SaveExtra};
pub use state::{AbilityState, StateAdvance};
pub use tuning::{AbilityTuning, DashTuning, MagicTuning, MeleeTuning};

use std::time::Duration;

use tracing::debug;

use crate::combat::{CombatRequest, MeleeTiles};
use crate::state::{ActorCombatPools, EntityId, Facing, Position};

/// Stable identifier of an ability, also its persisted name.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityId {
    Melee,
    Dash,
    Magic,
}

/// Inputs sampled from collaborators at activation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationContext {
    pub actor: EntityId,
    pub origin: Position,
    pub facing: Facing,
    /// Pointer-projected tile, when the input collaborator has one.
    pub aim: Option<Position>,
}

impl ActivationContext {
    pub fn new(actor: EntityId, origin: Position, facing: Facing) -> Self {
        Self {
            actor,
            origin,
            facing,
            aim: None,
        }
    }

    #[must_use]
    pub fn with_aim(mut self, aim: Option<Position>) -> Self {
        self.aim = aim;
        self
    }
}

/// What a successful activation started.
#[derive(Clone, Debug, PartialEq)]
pub enum Activation {
    /// Melee windup started; the strike resolves at the hit frame.
    Swing { tiles: MeleeTiles },
    /// Dash movement should start now.
    Dash {
        duration: Duration,
        perks: DashPerks,
        charges_left: u32,
    },
    /// Area cast entered aiming.
    Aiming { target: Position },
    /// Area cast committed; the hit resolves this tick.
    Cast { request: CombatRequest },
}

/// Output of one [`Ability::advance`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum AbilitySignal {
    /// Work for combat resolution.
    Request(CombatRequest),
    /// The area cast timed out while aiming.
    AimCancelled,
    /// The dash window closed.
    DashEnded,
}

/// Variant payload of an ability.
#[derive(Clone, Debug, PartialEq)]
pub enum AbilityKind {
    Melee(MeleeAbility),
    Dash(DashAbility),
    Magic(MagicAbility),
}

/// One actor-owned ability.
#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    state: AbilityState,
    kind: AbilityKind,
}

impl Ability {
    pub fn melee(tuning: MeleeTuning) -> Self {
        let (state, melee) = MeleeAbility::new(tuning);
        Self {
            state,
            kind: AbilityKind::Melee(melee),
        }
    }

    pub fn dash(tuning: DashTuning) -> Self {
        let (state, dash) = DashAbility::new(tuning);
        Self {
            state,
            kind: AbilityKind::Dash(dash),
        }
    }

    pub fn magic(tuning: MagicTuning) -> Self {
        let (state, magic) = MagicAbility::new(tuning);
        Self {
            state,
            kind: AbilityKind::Magic(magic),
        }
    }

    /// A fresh level-1 copy built from the same tuning.
    fn rebuilt(&self) -> Self {
        match &self.kind {
            AbilityKind::Melee(melee) => Self::melee(melee.tuning()),
            AbilityKind::Dash(dash) => Self::dash(dash.tuning()),
            AbilityKind::Magic(magic) => Self::magic(magic.tuning()),
        }
    }

    pub fn id(&self) -> AbilityId {
        match self.kind {
            AbilityKind::Melee(_) => AbilityId::Melee,
            AbilityKind::Dash(_) => AbilityId::Dash,
            AbilityKind::Magic(_) => AbilityId::Magic,
        }
    }

    pub fn kind(&self) -> &AbilityKind {
        &self.kind
    }

    pub fn state(&self) -> &AbilityState {
        &self.state
    }

    pub fn level(&self) -> u8 {
        self.state.level()
    }

    pub fn is_active(&self) -> bool {
        self.state.active()
    }

    /// Readiness as the activation gate sees it.
    ///
    /// The dash derives it from its pool; every other variant uses the
    /// shared `ready` flag.
    pub fn is_ready(&self) -> bool {
        match &self.kind {
            AbilityKind::Dash(dash) => dash.is_ready(&self.state),
            _ => self.state.ready(),
        }
    }

    fn uses_mana(&self) -> bool {
        !matches!(self.kind, AbilityKind::Dash(_))
    }

    /// Whether the generic path deducts mana. The area cast pays inside its
    /// own hook, on the committing activation only.
    fn mana_due(&self) -> bool {
        matches!(self.kind, AbilityKind::Melee(_))
    }

    fn starts_cooldown_on_activate(&self) -> bool {
        matches!(self.kind, AbilityKind::Melee(_))
    }

    fn enters_active_on_activate(&self) -> bool {
        matches!(self.kind, AbilityKind::Melee(_) | AbilityKind::Dash(_))
    }

    /// True iff ready and the actor can pay the mana cost. No side effects.
    pub fn can_activate(&self, pools: &ActorCombatPools) -> bool {
        self.gate(pools).is_ok()
    }

    fn gate(&self, pools: &ActorCombatPools) -> Result<(), ActivationError> {
        if !self.is_ready() {
            return Err(ActivationError::NotReady { ability: self.id() });
        }
        let cost = self.state.mana_cost();
        if self.uses_mana() && !pools.has_mana(cost) {
            return Err(ActivationError::InsufficientMana {
                ability: self.id(),
                required: cost,
                available: pools.mana(),
            });
        }
        Ok(())
    }

    /// Activates the ability.
    ///
    /// On failure nothing changes. On success mana is deducted when due, the
    /// effect hook runs, and the cooldown/active policies apply.
    pub fn activate(
        &mut self,
        pools: &mut ActorCombatPools,
        ctx: &ActivationContext,
    ) -> Result<Activation, ActivationError> {
        self.gate(pools)?;
        if let AbilityKind::Magic(magic) = &self.kind {
            magic.check(ctx)?;
        }

        if self.mana_due() {
            pools.spend_mana(self.state.mana_cost());
        }

        let activation = match &mut self.kind {
            AbilityKind::Melee(melee) => melee.on_activate(ctx),
            AbilityKind::Dash(dash) => dash.on_activate(&self.state),
            AbilityKind::Magic(magic) => magic.on_activate(&mut self.state, pools, ctx),
        };

        if self.starts_cooldown_on_activate() {
            self.state.start_cooldown();
        }
        if self.enters_active_on_activate() {
            self.state.enter_active();
        }

        debug!(ability = %self.id(), actor = %ctx.actor, level = self.level(), "ability activated");
        Ok(activation)
    }

    /// Advances timers by `delta`.
    ///
    /// `aim` is the latest pointer sample; only an aiming area cast reads it.
    pub fn advance(&mut self, delta: Duration, aim: Option<Position>) -> Option<AbilitySignal> {
        let report = self.state.advance(delta);
        match &mut self.kind {
            AbilityKind::Melee(melee) => melee.on_advance(report, self.state.level()),
            AbilityKind::Dash(dash) => {
                dash.on_advance(delta);
                report.deactivated.then_some(AbilitySignal::DashEnded)
            }
            AbilityKind::Magic(magic) => magic.on_advance(&mut self.state, report, delta, aim),
        }
    }

    /// Feeds the number of targets an area cast struck back into the cast,
    /// for its deferred heal. Ignored by other variants.
    pub fn record_area_hits(&mut self, hits: u32) {
        if let AbilityKind::Magic(magic) = &mut self.kind {
            magic.record_hits(hits);
        }
    }

    /// Raises the level by one and applies that level's upgrade delta.
    ///
    /// Deltas are additive on top of the previous levels. Returns false at
    /// max level.
    pub fn upgrade(&mut self) -> bool {
        if !self.state.level_up() {
            return false;
        }
        let level = self.state.level();
        match &mut self.kind {
            AbilityKind::Melee(melee) => melee.on_upgrade(&mut self.state, level),
            AbilityKind::Dash(dash) => dash.on_upgrade(&mut self.state, level),
            AbilityKind::Magic(magic) => magic.on_upgrade(level),
        }
        debug!(ability = %self.id(), level, "ability upgraded");
        true
    }

    /// Clears every timer and in-flight effect; level and upgrades are kept.
    pub fn force_reset(&mut self) {
        self.state.force_reset();
        match &mut self.kind {
            AbilityKind::Melee(melee) => melee.clear_swing(),
            AbilityKind::Dash(dash) => dash.force_reset(),
            AbilityKind::Magic(magic) => magic.force_reset(),
        }
    }

    pub fn cooldown_progress(&self) -> f32 {
        match &self.kind {
            AbilityKind::Dash(dash) if dash.charges() < dash.max_charges() => {
                let interval = dash.recharge_interval();
                if interval.is_zero() {
                    1.0
                } else {
                    (dash.recharge_elapsed().as_secs_f32() / interval.as_secs_f32()).min(1.0)
                }
            }
            _ => self.state.cooldown_progress(),
        }
    }

    pub fn duration_progress(&self) -> f32 {
        self.state.duration_progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ActivationContext {
        ActivationContext::new(EntityId::PLAYER, Position::ORIGIN, Facing::Down)
    }

    #[test]
    fn failed_activation_changes_nothing() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 5);
        let before = melee.clone();

        let err = melee.activate(&mut pools, &ctx()).unwrap_err();
        assert!(matches!(err, ActivationError::InsufficientMana { required: 10, available: 5, .. }));
        assert_eq!(melee, before);
        assert_eq!(pools.mana(), 5);
    }

    #[test]
    fn ready_returns_exactly_at_cooldown_threshold() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 100);
        melee.activate(&mut pools, &ctx()).unwrap();
        assert!(!melee.is_ready());

        for _ in 0..7 {
            melee.advance(Duration::from_millis(100), None);
            assert!(!melee.is_ready());
        }
        melee.advance(Duration::from_millis(100), None);
        assert!(melee.is_ready());
        assert_eq!(melee.cooldown_progress(), 1.0);
    }

    #[test]
    fn reactivation_while_active_is_rejected() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 100);
        melee.activate(&mut pools, &ctx()).unwrap();
        assert!(melee.is_active());
        assert!(matches!(
            melee.activate(&mut pools, &ctx()),
            Err(ActivationError::NotReady { ability: AbilityId::Melee })
        ));
    }

    #[test]
    fn force_reset_clears_timers_but_keeps_level() {
        let mut melee = Ability::melee(MeleeTuning::default());
        let mut pools = ActorCombatPools::new(100, 100);
        melee.upgrade();
        melee.activate(&mut pools, &ctx()).unwrap();
        melee.force_reset();
        assert!(melee.is_ready());
        assert!(!melee.is_active());
        assert_eq!(melee.level(), 2);
        assert_eq!(melee.state().cooldown_duration(), Duration::from_millis(700));
    }

    #[test]
    fn ids_round_trip_through_names() {
        for id in [AbilityId::Melee, AbilityId::Dash, AbilityId::Magic] {
            assert_eq!(id.as_ref().parse::<AbilityId>().ok(), Some(id));
        }
        assert_eq!(AbilityId::Magic.to_string(), "magic");
    }
}
