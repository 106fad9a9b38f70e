//! Timed status modifiers carried by an actor.
//!
//! Every modifier stores the simulated time it has left. Advancing the set
//! counts each one down and drops the ones that reach zero, so a modifier is
//! active exactly while its remaining time is non-zero.

use std::time::Duration;

use arrayvec::ArrayVec;

use crate::config::SimConfig;

/// Kinds of timed modifiers the combat core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Incoming damage is ignored.
    Invulnerable,
    /// Movement collaborator applies the slow multiplier.
    Slowed,
}

/// A single modifier with the time it has left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedStatus {
    pub kind: StatusKind,
    pub remaining: Duration,
}

/// Active timed modifiers on an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSet {
    effects: ArrayVec<TimedStatus, { SimConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusSet {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.remaining(kind).is_some()
    }

    /// Time left on a modifier, or `None` when it is not active.
    pub fn remaining(&self, kind: StatusKind) -> Option<Duration> {
        self.effects
            .iter()
            .find(|e| e.kind == kind && !e.remaining.is_zero())
            .map(|e| e.remaining)
    }

    /// Applies a modifier for `duration`.
    ///
    /// Re-applying refreshes to the longer of the two windows; modifiers of
    /// the same kind never stack.
    pub fn apply(&mut self, kind: StatusKind, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            return;
        }

        if !self.effects.is_full() {
            self.effects.push(TimedStatus {
                kind,
                remaining: duration,
            });
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Counts every modifier down by `delta` and drops expired ones.
    pub fn advance(&mut self, delta: Duration) {
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(delta);
        }
        self.effects.retain(|e| !e.remaining.is_zero());
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedStatus> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reapplying_refreshes_to_longer_window() {
        let mut set = StatusSet::empty();
        set.apply(StatusKind::Slowed, Duration::from_millis(500));
        set.apply(StatusKind::Slowed, Duration::from_millis(200));
        assert_eq!(set.remaining(StatusKind::Slowed), Some(Duration::from_millis(500)));

        set.apply(StatusKind::Slowed, Duration::from_millis(900));
        assert_eq!(set.remaining(StatusKind::Slowed), Some(Duration::from_millis(900)));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn advance_expires_modifiers() {
        let mut set = StatusSet::empty();
        set.apply(StatusKind::Invulnerable, Duration::from_millis(300));
        set.advance(Duration::from_millis(200));
        assert!(set.has(StatusKind::Invulnerable));
        set.advance(Duration::from_millis(100));
        assert!(!set.has(StatusKind::Invulnerable));
        assert!(set.is_empty());
    }
}
