//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use maze_core::{EventSink, SimEvent};

use super::types::WorkerEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Hits, deaths, area casts and bolts
    Combat,
    /// Player pools and ability use
    Player,
    /// Enemy behavior transitions
    Enemy,
    /// Worker lifecycle and stepping
    Worker,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::Player, Topic::Enemy, Topic::Worker];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Simulation(SimEvent),
    Worker(WorkerEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Simulation(event) => match event {
                SimEvent::AttackHit { .. }
                | SimEvent::EnemyDeath { .. }
                | SimEvent::AoeResolved { .. }
                | SimEvent::ProjectileSpawned { .. } => Topic::Combat,
                SimEvent::EnemyStateChanged { .. } => Topic::Enemy,
                SimEvent::AbilityActivated { .. }
                | SimEvent::PlayerDamaged { .. }
                | SimEvent::PlayerHealed { .. }
                | SimEvent::PlayerDied
                | SimEvent::DashStarted { .. }
                | SimEvent::AimCancelled => Topic::Player,
            },
            Event::Worker(_) => Topic::Worker,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events nobody listens
/// to are dropped.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<Event>,
    player: broadcast::Sender<Event>,
    enemy: broadcast::Sender<Event>,
    worker: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            player: broadcast::channel(capacity).0,
            enemy: broadcast::channel(capacity).0,
            worker: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Player => &self.player,
            Topic::Enemy => &self.enemy,
            Topic::Worker => &self.worker,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: &SimEvent) {
        EventBus::publish(self, Event::Simulation(event.clone()));
    }
}
