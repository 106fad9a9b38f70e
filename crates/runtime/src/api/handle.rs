//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the simulation or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use maze_core::{
    AbilityId, AbilitySave, EnemyTier, EntityId, Facing, Position, SimSnapshot, TickReport,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends one command and waits for the worker's answer.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue an ability slot activation for the next tick.
    ///
    /// Rejections (cooldown, mana, bad slot) show up in that tick's report.
    pub async fn activate_slot(&self, slot: usize) -> Result<()> {
        self.request(|reply| Command::ActivateSlot { slot, reply })
            .await
    }

    /// Update the pointer tile used for aiming.
    pub async fn set_aim(&self, aim: Option<Position>) -> Result<()> {
        self.request(|reply| Command::SetAim { aim, reply }).await
    }

    /// Report the player's pose from the movement layer.
    pub async fn set_pose(&self, position: Position, facing: Facing) -> Result<()> {
        self.request(|reply| Command::SetPose {
            position,
            facing,
            reply,
        })
        .await
    }

    /// Spawn an enemy; `None` when the roster is full.
    pub async fn spawn_enemy(&self, tier: EnemyTier, position: Position) -> Result<Option<EntityId>> {
        self.request(|reply| Command::SpawnEnemy {
            tier,
            position,
            reply,
        })
        .await
    }

    pub async fn upgrade_ability(&self, ability: AbilityId) -> Result<bool> {
        self.request(|reply| Command::UpgradeAbility { ability, reply })
            .await
    }

    /// Run `ticks` fixed-delta ticks and return their reports.
    pub async fn step(&self, ticks: u32) -> Result<Vec<TickReport>> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    /// Query the current state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<SimSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn save_abilities(&self) -> Result<Vec<AbilitySave>> {
        self.request(|reply| Command::SaveAbilities { reply }).await
    }

    /// Restore ability records; returns how many were applied.
    pub async fn restore_abilities(&self, records: Vec<AbilitySave>) -> Result<usize> {
        self.request(|reply| Command::RestoreAbilities { records, reply })
            .await
    }

    pub async fn respawn_player(&self) -> Result<()> {
        self.request(|reply| Command::RespawnPlayer { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use maze_runtime::Topic;
    ///
    /// let mut combat = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat.recv().await {
    ///     // Handle hits and deaths
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
