//! Per-ability save and restore hooks.
//!
//! The record holds exactly what an external save collaborator persists:
//! identity, level, the ready flag, both elapsed timers, and the variant's
//! extra fields. Upgrade deltas are not stored. Restore rebuilds the ability
//! at level 1 and replays every upgrade hook in ascending level order, so
//! derived stats always come out the same as when they were earned.

use std::time::Duration;

use tracing::warn;

use crate::state::Position;

use super::error::RestoreError;
use super::magic::MagicPhase;
use super::{Ability, AbilityId, AbilityKind};

/// Variant-specific persisted fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaveExtra {
    #[default]
    None,
    /// Area cast phase, stored by name.
    Phase {
        phase: String,
        phase_elapsed: Duration,
        target: Option<Position>,
        targets_hit: u32,
    },
    /// Dash charge pool.
    Charges {
        current: u32,
        recharge_elapsed: Duration,
    },
}

/// Persisted state of one ability instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySave {
    pub id: AbilityId,
    pub level: u8,
    pub ready: bool,
    pub cooldown_elapsed: Duration,
    /// Whether the active window was open. Records written before this field
    /// existed read as inactive.
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: bool,
    pub active_elapsed: Duration,
    pub extra: SaveExtra,
}

impl Ability {
    /// Captures the persisted fields of this ability.
    pub fn save(&self) -> AbilitySave {
        let extra = match &self.kind {
            AbilityKind::Melee(_) => SaveExtra::None,
            AbilityKind::Dash(dash) => SaveExtra::Charges {
                current: dash.charges(),
                recharge_elapsed: dash.recharge_elapsed(),
            },
            AbilityKind::Magic(magic) => SaveExtra::Phase {
                phase: magic.phase().as_ref().to_owned(),
                phase_elapsed: magic.phase_elapsed(),
                target: magic.target(),
                targets_hit: magic.targets_hit(),
            },
        };

        AbilitySave {
            id: self.id(),
            level: self.level(),
            ready: self.is_ready(),
            cooldown_elapsed: self.state.cooldown_elapsed(),
            active: self.state.active(),
            active_elapsed: self.state.active_elapsed(),
            extra,
        }
    }

    /// Applies a persisted record to this ability.
    ///
    /// Elapsed values are clamped to their thresholds. An unrecognized phase
    /// name restores as `Idle`. A record for a different ability is rejected
    /// and leaves this one untouched.
    pub fn restore(&mut self, record: &AbilitySave) -> Result<(), RestoreError> {
        if record.id != self.id() {
            return Err(RestoreError::NotInLoadout { id: record.id });
        }

        let mut fresh = self.rebuilt();
        let target_level = record.level.clamp(1, fresh.state.max_level());
        while fresh.level() < target_level {
            fresh.upgrade();
        }

        match &mut fresh.kind {
            AbilityKind::Melee(melee) => {
                fresh.state.restore(
                    record.ready,
                    !record.ready,
                    record.cooldown_elapsed,
                    record.active,
                    record.active_elapsed,
                );
                melee.restore(&fresh.state);
            }
            AbilityKind::Dash(dash) => {
                fresh.state.restore(
                    true,
                    false,
                    Duration::ZERO,
                    record.active,
                    record.active_elapsed,
                );
                match &record.extra {
                    SaveExtra::Charges {
                        current,
                        recharge_elapsed,
                    } => dash.restore(*current, *recharge_elapsed),
                    other => warn!(?other, "dash record without charge fields, using a full pool"),
                }
            }
            AbilityKind::Magic(magic) => {
                let (phase, phase_elapsed, target, targets_hit) = match &record.extra {
                    SaveExtra::Phase {
                        phase,
                        phase_elapsed,
                        target,
                        targets_hit,
                    } => (
                        MagicPhase::parse_or_idle(phase),
                        *phase_elapsed,
                        *target,
                        *targets_hit,
                    ),
                    other => {
                        warn!(?other, "magic record without phase fields, using idle");
                        (MagicPhase::Idle, Duration::ZERO, None, 0)
                    }
                };
                magic.restore(
                    &mut fresh.state,
                    phase,
                    phase_elapsed,
                    target,
                    targets_hit,
                    record.cooldown_elapsed,
                );
            }
        }

        *self = fresh;
        Ok(())
    }
}
