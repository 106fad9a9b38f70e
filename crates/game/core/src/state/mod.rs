//! Plain data shared by every simulation component.
mod common;
mod pools;
mod status;

pub use common::{EntityId, Facing, Position, Tick};
pub use pools::{ActorCombatPools, DamageOutcome};
pub use status::{StatusKind, StatusSet, TimedStatus};
