//! Aim-then-cast area ability.
//!
//! ```text
//! Idle --activate--> Aiming --activate (after min aim)--> Executed
//!   ^                  |                                     |
//!   |               timeout                              wait window
//!   |                  v                                     v
//!   +---------------- Idle <------ cooldown done ------- Cooldown
//! ```
//!
//! Mana is paid on the second activation only. Waiting out the aim timeout
//! cancels the cast with nothing spent.

use std::time::Duration;

use tracing::{debug, trace};

use crate::combat::{CombatRequest, area_damage, heal_fraction};
use crate::state::{ActorCombatPools, Position};

use super::state::{AbilityState, StateAdvance};
use super::tuning::MagicTuning;
use super::{AbilityId, AbilitySignal, Activation, ActivationContext, ActivationError};

const RADIUS_BONUS: u32 = 1;
const HEAL_FRACTION_BONUS: f32 = 0.05;
const HEAL_PER_TARGET_BONUS: f32 = 0.01;

/// Phases of the area cast.
///
/// Persisted by name; names parse case-insensitively.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MagicPhase {
    #[default]
    Idle,
    Aiming,
    Executed,
    Cooldown,
}

impl MagicPhase {
    /// Parses a persisted phase name, falling back to `Idle` on anything
    /// unrecognized.
    pub fn parse_or_idle(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(phase = name, "unknown persisted magic phase, using idle");
            MagicPhase::Idle
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MagicAbility {
    tuning: MagicTuning,
    phase: MagicPhase,
    phase_elapsed: Duration,
    target: Option<Position>,
    radius: u32,
    heal_fraction: f32,
    heal_per_target: f32,
    targets_hit: u32,
}

impl MagicAbility {
    pub(super) fn new(tuning: MagicTuning) -> (AbilityState, Self) {
        // The phase carries the timing; there is no separate active window.
        let state = AbilityState::new(
            tuning.cooldown,
            Duration::ZERO,
            tuning.mana_cost,
            tuning.max_level,
        );
        let magic = Self {
            tuning,
            phase: MagicPhase::Idle,
            phase_elapsed: Duration::ZERO,
            target: None,
            radius: tuning.radius,
            heal_fraction: tuning.heal_fraction,
            heal_per_target: tuning.heal_per_target,
            targets_hit: 0,
        };
        (state, magic)
    }

    pub fn tuning(&self) -> MagicTuning {
        self.tuning
    }

    pub fn phase(&self) -> MagicPhase {
        self.phase
    }

    pub fn phase_elapsed(&self) -> Duration {
        self.phase_elapsed
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn targets_hit(&self) -> u32 {
        self.targets_hit
    }

    pub fn damage(&self, level: u8) -> i32 {
        area_damage(self.tuning.base_damage, self.tuning.damage_per_level, level)
    }

    /// Heal fraction the current cast will grant when its wait window closes.
    pub fn pending_heal_fraction(&self) -> f32 {
        heal_fraction(self.heal_fraction, self.heal_per_target, self.targets_hit)
    }

    fn enter(&mut self, phase: MagicPhase) {
        trace!(from = %self.phase, to = %phase, "magic phase change");
        self.phase = phase;
        self.phase_elapsed = Duration::ZERO;
    }

    /// Gate that runs before mana is taken.
    pub(super) fn check(&self, ctx: &ActivationContext) -> Result<(), ActivationError> {
        match self.phase {
            MagicPhase::Idle if ctx.aim.is_none() => Err(ActivationError::MissingAimTarget {
                ability: AbilityId::Magic,
            }),
            MagicPhase::Aiming if self.phase_elapsed < self.tuning.min_aim => {
                Err(ActivationError::AimTooEarly {
                    ability: AbilityId::Magic,
                    held: self.phase_elapsed,
                    required: self.tuning.min_aim,
                })
            }
            _ => Ok(()),
        }
    }

    pub(super) fn on_activate(
        &mut self,
        state: &mut AbilityState,
        pools: &mut ActorCombatPools,
        ctx: &ActivationContext,
    ) -> Activation {
        if self.phase == MagicPhase::Aiming {
            if let Some(aim) = ctx.aim {
                self.target = Some(aim);
            }
            let center = self.target.unwrap_or(ctx.origin);
            pools.spend_mana(state.mana_cost());
            state.commit();
            self.targets_hit = 0;
            self.enter(MagicPhase::Executed);
            debug!(%center, radius = self.radius, "area cast committed");
            return Activation::Cast {
                request: CombatRequest::Area {
                    center,
                    radius: self.radius,
                    damage: self.damage(state.level()),
                },
            };
        }

        let target = ctx.aim.unwrap_or(ctx.origin);
        self.target = Some(target);
        self.enter(MagicPhase::Aiming);
        Activation::Aiming { target }
    }

    /// Feedback from combat resolution: how many targets the area hit struck.
    pub(super) fn record_hits(&mut self, hits: u32) {
        self.targets_hit = hits;
    }

    pub(super) fn on_advance(
        &mut self,
        state: &mut AbilityState,
        report: StateAdvance,
        delta: Duration,
        aim: Option<Position>,
    ) -> Option<AbilitySignal> {
        match self.phase {
            MagicPhase::Idle => None,
            MagicPhase::Aiming => {
                self.phase_elapsed += delta;
                if let Some(aim) = aim {
                    self.target = Some(aim);
                }
                if self.phase_elapsed >= self.tuning.aim_timeout {
                    self.target = None;
                    self.enter(MagicPhase::Idle);
                    debug!("area cast cancelled by aim timeout");
                    return Some(AbilitySignal::AimCancelled);
                }
                None
            }
            MagicPhase::Executed => {
                self.phase_elapsed += delta;
                if self.phase_elapsed < self.tuning.executed_wait {
                    return None;
                }
                let fraction = self.pending_heal_fraction();
                self.enter(MagicPhase::Cooldown);
                state.start_cooldown();
                Some(AbilitySignal::Request(CombatRequest::Heal { fraction }))
            }
            MagicPhase::Cooldown => {
                self.phase_elapsed += delta;
                if report.became_ready || state.ready() {
                    self.target = None;
                    self.targets_hit = 0;
                    self.enter(MagicPhase::Idle);
                }
                None
            }
        }
    }

    pub(super) fn on_upgrade(&mut self, level: u8) {
        match level {
            2 | 5 => self.radius += RADIUS_BONUS,
            3 => self.heal_fraction += HEAL_FRACTION_BONUS,
            4 => self.heal_per_target += HEAL_PER_TARGET_BONUS,
            _ => {}
        }
    }

    pub(super) fn force_reset(&mut self) {
        self.phase = MagicPhase::Idle;
        self.phase_elapsed = Duration::ZERO;
        self.target = None;
        self.targets_hit = 0;
    }

    /// Re-applies a persisted phase and keeps the ready flag consistent with
    /// it. The phase time is clamped to that phase's limit. An aiming record
    /// without a target falls back to idle.
    pub(super) fn restore(
        &mut self,
        state: &mut AbilityState,
        phase: MagicPhase,
        phase_elapsed: Duration,
        target: Option<Position>,
        targets_hit: u32,
        cooldown_elapsed: Duration,
    ) {
        let phase = if phase == MagicPhase::Aiming && target.is_none() {
            MagicPhase::Idle
        } else {
            phase
        };

        self.phase = phase;
        self.phase_elapsed = match phase {
            MagicPhase::Aiming => phase_elapsed.min(self.tuning.aim_timeout),
            MagicPhase::Executed => phase_elapsed.min(self.tuning.executed_wait),
            MagicPhase::Idle | MagicPhase::Cooldown => Duration::ZERO,
        };
        self.target = target;
        self.targets_hit = targets_hit;

        match phase {
            MagicPhase::Idle => {
                self.force_reset();
                state.restore(true, false, Duration::ZERO, false, Duration::ZERO);
            }
            MagicPhase::Aiming => state.restore(true, false, Duration::ZERO, false, Duration::ZERO),
            MagicPhase::Executed => state.restore(false, false, Duration::ZERO, false, Duration::ZERO),
            MagicPhase::Cooldown => {
                state.restore(false, true, cooldown_elapsed, false, Duration::ZERO)
            },
        }
    }
}
