//! Simulation configuration loader.

use std::path::Path;

use anyhow::Context;
use maze_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to the `SimConfig` defaults.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Failed to parse config TOML {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("game_seed = 42\ninvulnerability_window = 500\n").unwrap();
        assert_eq!(config.game_seed, 42);
        assert_eq!(config.invulnerability_window, Duration::from_millis(500));
        assert_eq!(config.player_max_health, SimConfig::DEFAULT_PLAYER_MAX_HEALTH);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(ConfigLoader::parse("tick_rate_hz = \"fast\"").is_err());
    }
}
