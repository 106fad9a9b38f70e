//! Asynchronous abstraction for sourcing player input.
//!
//! Runtime users plug in [`InputProvider`] implementations so the simulation
//! can run with live input, scripted fixtures, or replayed sessions. The
//! provider is consulted once per tick by [`crate::Runtime::run_ticks`].
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use maze_core::{Facing, Position, SimSnapshot};

use super::errors::{Result, RuntimeError};

/// Input sampled for one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Pointer tile; `None` leaves the previous aim in place.
    pub aim: Option<Position>,
    /// Pose reported by the movement layer; `None` keeps the current pose.
    pub pose: Option<(Position, Facing)>,
    /// Ability slots pressed this tick, in order.
    pub activations: Vec<usize>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press(slot: usize) -> Self {
        Self {
            activations: vec![slot],
            ..Self::default()
        }
    }

    pub fn with_aim(mut self, aim: Position) -> Self {
        self.aim = Some(aim);
        self
    }

    pub fn with_pose(mut self, position: Position, facing: Facing) -> Self {
        self.pose = Some((position, facing));
        self
    }
}

/// Trait for providing per-tick input based on the latest snapshot.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed sessions
/// - Testing fixtures
#[async_trait]
pub trait InputProvider: Send + Sync {
    async fn next_frame(&self, snapshot: &SimSnapshot) -> Result<InputFrame>;
}

/// Never presses anything. Useful as a fallback.
pub struct IdleInput;

#[async_trait]
impl InputProvider for IdleInput {
    async fn next_frame(&self, _snapshot: &SimSnapshot) -> Result<InputFrame> {
        Ok(InputFrame::idle())
    }
}

/// Plays back a fixed list of frames, then idles.
pub struct ScriptedInput {
    frames: Mutex<VecDeque<InputFrame>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
        }
    }

    /// Frames not yet played.
    pub fn remaining(&self) -> usize {
        self.frames.lock().map(|frames| frames.len()).unwrap_or(0)
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn next_frame(&self, _snapshot: &SimSnapshot) -> Result<InputFrame> {
        let mut frames = self.frames.lock().map_err(|_| RuntimeError::Input {
            provider: "scripted",
            reason: "script lock poisoned".to_string(),
        })?;
        Ok(frames.pop_front().unwrap_or_default())
    }
}
