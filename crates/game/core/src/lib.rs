//! Deterministic gameplay simulation for the action maze.
//!
//! `maze-core` holds the rules: ability state machines, enemy behavior,
//! combat resolution and the actor pools they mutate. Everything advances
//! through [`engine::Simulation::tick`] in a fixed order, and the outside
//! world is reached only through the collaborators bundled in
//! [`env::SimEnv`]. The crate performs no I/O.
pub mod ability;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;
pub mod timer;

pub use ability::{
    Ability, AbilityId, AbilityKind, AbilityManager, AbilitySave, AbilitySignal, AbilityState,
    AbilityTuning, Activation, ActivationContext, ActivationError, DashPerks, DashTuning,
    MagicPhase, MagicTuning, MeleeTuning, RestoreError, SaveExtra, SlotSignal,
};
pub use combat::{
    AttackResolution, CombatRequest, Combatant, DamageEvent, DamageSource, apply_damage,
    apply_heal,
};
pub use config::SimConfig;
pub use enemy::{
    ArchetypeProfile, ArchetypeTable, AttackStyle, BehaviorState, Enemy, EnemyTier, Projectile,
};
pub use engine::{PlayerActor, SimSnapshot, Simulation, TickReport};
pub use env::{
    GridMaze, MazeDimensions, MazeOracle, MovementOracle, OracleError, PcgRng, PointerOracle,
    RngOracle, SimEnv, StaticInput, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventSink, SimEvent};
pub use state::{ActorCombatPools, DamageOutcome, EntityId, Facing, Position, Tick};
pub use timer::Timer;

/// Serde helpers storing a `Duration` as whole milliseconds, which keeps
/// tuning files readable.
#[cfg(feature = "serde")]
pub mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    /// Same, for optional durations.
    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
        }
    }
}
