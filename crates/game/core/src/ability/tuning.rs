//! Base parameters for each ability variant.
//!
//! Durations are serialized as whole milliseconds. Per-level upgrade deltas
//! are part of each variant's upgrade hook, not of the tuning.

use std::time::Duration;

/// Melee swing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeleeTuning {
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub cooldown: Duration,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub duration: Duration,
    /// Windup before damage resolves. Must not exceed `duration`.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub hit_frame: Duration,
    pub mana_cost: u32,
    pub base_damage: i32,
    pub damage_per_level: i32,
    pub max_level: u8,
}

impl Default for MeleeTuning {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(800),
            duration: Duration::from_millis(250),
            hit_frame: Duration::from_millis(100),
            mana_cost: 10,
            base_damage: 5,
            damage_per_level: 1,
            max_level: 5,
        }
    }
}

/// Dash charge-pool parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DashTuning {
    pub max_charges: u32,
    /// Time to regain one charge.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub recharge: Duration,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub duration: Duration,
    pub max_level: u8,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            max_charges: 2,
            recharge: Duration::from_secs(2),
            duration: Duration::from_millis(800),
            max_level: 5,
        }
    }
}

/// Aim-then-cast area ability parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MagicTuning {
    pub mana_cost: u32,
    /// Second activation is ignored until the aim has been held this long.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub min_aim: Duration,
    /// Aiming without a second activation for this long cancels the cast.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub aim_timeout: Duration,
    /// Wait between the area hit and the deferred heal.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub executed_wait: Duration,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub cooldown: Duration,
    pub radius: u32,
    pub base_damage: i32,
    pub damage_per_level: i32,
    pub heal_fraction: f32,
    pub heal_per_target: f32,
    pub max_level: u8,
}

impl Default for MagicTuning {
    fn default() -> Self {
        Self {
            mana_cost: 20,
            min_aim: Duration::from_millis(150),
            aim_timeout: Duration::from_secs(3),
            executed_wait: Duration::from_secs(1),
            cooldown: Duration::from_secs(5),
            radius: 2,
            base_damage: 2,
            damage_per_level: 1,
            heal_fraction: 0.10,
            heal_per_target: 0.01,
            max_level: 5,
        }
    }
}

/// Tuning for the full ability loadout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityTuning {
    pub melee: MeleeTuning,
    pub dash: DashTuning,
    pub magic: MagicTuning,
}
