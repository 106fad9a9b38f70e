//! Ability tuning loader.

use std::path::Path;

use anyhow::{Context, ensure};
use maze_core::AbilityTuning;

use crate::loaders::{LoadResult, read_file};

/// Loader for the melee/dash/magic parameter blocks from RON files.
pub struct TuningLoader;

impl TuningLoader {
    pub fn load(path: &Path) -> LoadResult<AbilityTuning> {
        let content = read_file(path)?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load ability tuning {}", path.display()))
    }

    /// Parses and validates a tuning document.
    ///
    /// Blocks or fields left out keep their in-code defaults.
    pub fn parse(content: &str) -> LoadResult<AbilityTuning> {
        let tuning: AbilityTuning = ron::from_str(content)?;

        ensure!(
            tuning.melee.hit_frame <= tuning.melee.duration,
            "melee hit frame {:?} exceeds the swing duration {:?}",
            tuning.melee.hit_frame,
            tuning.melee.duration
        );
        ensure!(tuning.dash.max_charges > 0, "dash needs at least one charge");
        ensure!(
            tuning.magic.min_aim <= tuning.magic.aim_timeout,
            "magic minimum aim {:?} exceeds the aim timeout {:?}",
            tuning.magic.min_aim,
            tuning.magic.aim_timeout
        );
        for (name, max_level) in [
            ("melee", tuning.melee.max_level),
            ("dash", tuning.dash.max_level),
            ("magic", tuning.magic.max_level),
        ] {
            ensure!(max_level >= 1, "{name} max level must be at least 1");
        }

        Ok(tuning)
    }
}
