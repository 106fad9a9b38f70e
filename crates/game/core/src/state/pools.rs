//! Actor-side health, mana and timed modifiers.
//!
//! Pools are mutated only by ability activation (mana) and combat resolution
//! (health, modifiers). Health is allowed to drop below zero before the death
//! check; the negative value is informational.

use std::time::Duration;

use super::status::{StatusKind, StatusSet};

/// Result of routing one damage amount into a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead or is inside an invulnerability window.
    Ignored,
    /// Damage landed and the target survived.
    Applied { remaining: i32 },
    /// Damage landed and brought health to zero or below.
    Killed { remaining: i32 },
}

impl DamageOutcome {
    pub fn landed(self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }

    pub fn is_kill(self) -> bool {
        matches!(self, DamageOutcome::Killed { .. })
    }
}

/// Health, mana and timed modifiers owned by one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorCombatPools {
    health: i32,
    max_health: i32,
    mana: u32,
    max_mana: u32,
    mana_regen_per_second: f32,
    /// Fractional mana accumulated between whole points.
    mana_carry: f32,
    alive: bool,
    status: StatusSet,
}

impl ActorCombatPools {
    pub fn new(max_health: i32, max_mana: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            mana_regen_per_second: 0.0,
            mana_carry: 0.0,
            alive: max_health > 0,
            status: StatusSet::empty(),
        }
    }

    /// Pools for an actor with no mana (enemies).
    pub fn health_only(max_health: i32) -> Self {
        Self::new(max_health, 0)
    }

    #[must_use]
    pub fn with_mana_regen(mut self, per_second: f32) -> Self {
        self.mana_regen_per_second = per_second.max(0.0);
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health.min(self.max_health);
        self.alive = self.health > 0;
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn status(&self) -> &StatusSet {
        &self.status
    }

    pub fn is_invulnerable(&self) -> bool {
        self.status.has(StatusKind::Invulnerable)
    }

    pub fn is_slowed(&self) -> bool {
        self.status.has(StatusKind::Slowed)
    }

    // ========================================================================
    // Mana
    // ========================================================================

    pub fn has_mana(&self, cost: u32) -> bool {
        self.mana >= cost
    }

    /// Deducts `cost` mana. Returns false and leaves the pool untouched when
    /// there is not enough.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if !self.has_mana(cost) {
            return false;
        }
        self.mana -= cost;
        true
    }

    pub fn restore_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
    }

    fn regenerate(&mut self, delta: Duration) {
        if self.mana >= self.max_mana {
            self.mana_carry = 0.0;
            return;
        }

        self.mana_carry += self.mana_regen_per_second * delta.as_secs_f32();
        let whole = self.mana_carry.floor();
        if whole >= 1.0 {
            self.mana_carry -= whole;
            self.restore_mana(whole as u32);
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Subtracts `amount` from health.
    ///
    /// Dead targets and targets inside an invulnerability window ignore the
    /// hit. The amount is not clamped; callers pass sane values.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount;
        if self.health <= 0 {
            self.alive = false;
            DamageOutcome::Killed {
                remaining: self.health,
            }
        } else {
            DamageOutcome::Applied {
                remaining: self.health,
            }
        }
    }

    /// Marks the actor dead regardless of remaining health.
    ///
    /// Returns false when it was already dead.
    pub fn kill(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }

    /// Restores health up to the maximum. Returns the amount actually gained;
    /// dead targets gain nothing.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.alive || amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    // ========================================================================
    // Timed modifiers
    // ========================================================================

    pub fn grant_invulnerability(&mut self, duration: Duration) {
        self.status.apply(StatusKind::Invulnerable, duration);
    }

    /// Slows the actor for `duration`; refreshes to the longer window, never stacks.
    pub fn apply_slow(&mut self, duration: Duration) {
        self.status.apply(StatusKind::Slowed, duration);
    }

    /// Counts timed modifiers down and regenerates mana.
    pub fn advance(&mut self, delta: Duration) {
        self.status.advance(delta);
        if self.alive {
            self.regenerate(delta);
        }
    }

    /// Restores full health and mana and clears every modifier.
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
        self.mana_carry = 0.0;
        self.alive = self.max_health > 0;
        self.status.clear();
    }
}
