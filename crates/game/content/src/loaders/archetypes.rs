//! Enemy archetype table loader.

use std::path::Path;

use anyhow::{Context, ensure};
use maze_core::{ArchetypeTable, EnemyTier};

use crate::loaders::{LoadResult, read_file};

/// Loader for per-tier enemy profiles from RON files.
///
/// File format: one full profile per tier; omitted tiers keep their defaults.
///
/// ```ron
/// (
///     e01: (max_health: 5, detect_range: 6.0, ..),
///     e04: (max_health: 50, footprint: 2, shelled: true, ..),
/// )
/// ```
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(path: &Path) -> LoadResult<ArchetypeTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load archetype table {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<ArchetypeTable> {
        let table: ArchetypeTable = ron::from_str(content)?;

        for tier in EnemyTier::all() {
            let profile = table.get(tier);
            ensure!(profile.max_health > 0, "{tier} needs positive health");
            ensure!(profile.footprint >= 1, "{tier} footprint must cover a tile");
            ensure!(
                profile.detect_range >= 0.0 && profile.attack_range >= 0.0,
                "{tier} ranges must not be negative"
            );
        }

        Ok(table)
    }
}
