//! Outbound notifications.
//!
//! The simulation records every state change its collaborators may care
//! about (audio cues, effects, score) as a [`SimEvent`]. Events are returned
//! in the tick report and, when a sink is injected, published to it. The
//! core never waits on a sink and never reads anything back.

use crate::ability::AbilityId;
use crate::combat::DamageSource;
use crate::enemy::{BehaviorState, EnemyTier};
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    AbilityActivated {
        actor: EntityId,
        slot: usize,
        ability: AbilityId,
    },
    /// Damage actually taken by an enemy after its intake policy.
    AttackHit {
        target: EntityId,
        damage: i32,
        source: DamageSource,
    },
    EnemyDeath {
        enemy: EntityId,
        tier: EnemyTier,
        /// Killed by a breaking interaction rather than by damage.
        special_kill: bool,
    },
    AoeResolved {
        center: Position,
        radius: u32,
        targets_hit: u32,
    },
    EnemyStateChanged {
        enemy: EntityId,
        from: BehaviorState,
        to: BehaviorState,
    },
    ProjectileSpawned {
        owner: EntityId,
        origin: Position,
        target: Position,
    },
    PlayerDamaged {
        amount: i32,
        health: i32,
        source: DamageSource,
    },
    PlayerHealed {
        amount: i32,
        health: i32,
    },
    PlayerDied,
    DashStarted {
        charges_left: u32,
    },
    AimCancelled,
}

impl SimEvent {
    /// Short stable name, used as a log field and a bus topic.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AbilityActivated { .. } => "ability_activated",
            Self::AttackHit { .. } => "attack_hit",
            Self::EnemyDeath { .. } => "enemy_death",
            Self::AoeResolved { .. } => "aoe_resolved",
            Self::EnemyStateChanged { .. } => "enemy_state_changed",
            Self::ProjectileSpawned { .. } => "projectile_spawned",
            Self::PlayerDamaged { .. } => "player_damaged",
            Self::PlayerHealed { .. } => "player_healed",
            Self::PlayerDied => "player_died",
            Self::DashStarted { .. } => "dash_started",
            Self::AimCancelled => "aim_cancelled",
        }
    }
}

/// Fire-and-forget receiver for notifications.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &SimEvent);
}
