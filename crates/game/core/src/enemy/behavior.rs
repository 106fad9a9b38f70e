//! Enemy behavior states and their allowed edges.

use std::time::Duration;

use tracing::warn;

/// Behavior state of one enemy.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Patrol,
    Chase,
    Prepare,
    Attack,
    Cooldown,
}

impl BehaviorState {
    /// Whether `self -> to` is a defined edge.
    ///
    /// `Attack` is reachable only from `Prepare`, and `Prepare` only from
    /// `Chase`.
    pub fn can_enter(self, to: BehaviorState) -> bool {
        use BehaviorState::*;
        matches!(
            (self, to),
            (Patrol, Chase)
                | (Chase, Patrol)
                | (Chase, Prepare)
                | (Prepare, Attack)
                | (Attack, Cooldown)
                | (Cooldown, Chase)
                | (Cooldown, Patrol)
        )
    }
}

/// Current state plus the time spent in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BehaviorMachine {
    state: BehaviorState,
    elapsed: Duration,
}

impl BehaviorMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Time since the current state was entered.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
    }

    /// Follows the edge to `to`, resetting the state timer.
    ///
    /// Undefined edges are refused and logged; the machine stays put.
    pub fn transition(&mut self, to: BehaviorState) -> Option<(BehaviorState, BehaviorState)> {
        let from = self.state;
        if !from.can_enter(to) {
            warn!(%from, %to, "refusing undefined behavior edge");
            return None;
        }
        self.state = to;
        self.elapsed = Duration::ZERO;
        Some((from, to))
    }

    /// Back to `Patrol` with a fresh timer, whatever the current state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
