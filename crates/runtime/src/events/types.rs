use serde::{Deserialize, Serialize};

use maze_core::{EntityId, Tick};

/// Worker lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerEvent {
    Started { enemies: usize, player: EntityId },
    /// A `step` command finished; `tick` is the last tick simulated.
    Stepped { ticks: u32, tick: Tick, rejected: usize },
    AbilitiesRestored { applied: usize, offered: usize },
    Stopped { tick: Tick },
}
