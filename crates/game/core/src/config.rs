use std::time::Duration;

/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fixed update rate of the simulation loop.
    pub tick_rate_hz: u32,
    /// Base seed for every deterministic roll (patrol walks, direction picks).
    pub game_seed: u64,
    pub player_max_health: i32,
    pub player_max_mana: u32,
    /// Mana regained per second of simulated time.
    pub mana_regen_per_second: f32,
    /// Window after a landed hit during which the player ignores further damage.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_millis"))]
    pub invulnerability_window: Duration,
    /// Movement delay multiplier reported while the player is slowed.
    pub slow_multiplier: f32,
    /// Damage carried by a dash collision (always flagged as breaking).
    pub dash_contact_damage: i32,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_ABILITY_SLOTS: usize = 4;
    pub const MAX_ENEMIES: usize = 128;
    pub const MAX_PROJECTILES: usize = 256;
    pub const MAX_STATUS_EFFECTS: usize = 4;
    /// Own tile, three-tile front row and the extended reach tile.
    pub const MAX_MELEE_TILES: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_RATE_HZ: u32 = 60;
    pub const DEFAULT_GAME_SEED: u64 = 0x5eed_cafe;
    pub const DEFAULT_PLAYER_MAX_HEALTH: i32 = 100;
    pub const DEFAULT_PLAYER_MAX_MANA: u32 = 100;
    pub const DEFAULT_MANA_REGEN_PER_SECOND: f32 = 5.0;
    pub const DEFAULT_INVULNERABILITY_WINDOW: Duration = Duration::from_secs(1);
    pub const DEFAULT_SLOW_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_DASH_CONTACT_DAMAGE: i32 = 2;

    pub fn new() -> Self {
        Self {
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            game_seed: Self::DEFAULT_GAME_SEED,
            player_max_health: Self::DEFAULT_PLAYER_MAX_HEALTH,
            player_max_mana: Self::DEFAULT_PLAYER_MAX_MANA,
            mana_regen_per_second: Self::DEFAULT_MANA_REGEN_PER_SECOND,
            invulnerability_window: Self::DEFAULT_INVULNERABILITY_WINDOW,
            slow_multiplier: Self::DEFAULT_SLOW_MULTIPLIER,
            dash_contact_damage: Self::DEFAULT_DASH_CONTACT_DAMAGE,
        }
    }

    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::new()
        }
    }

    /// Length of one simulation tick.
    ///
    /// A zero tick rate is treated as 1 Hz rather than dividing by zero.
    pub fn fixed_delta(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
