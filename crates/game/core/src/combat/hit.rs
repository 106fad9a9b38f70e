//! Tile-set hit computation and per-activation target de-duplication.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use super::Combatant;
use crate::config::SimConfig;
use crate::state::{EntityId, Facing, Position};

/// Tiles struck by one melee swing.
pub type MeleeTiles = ArrayVec<Position, { SimConfig::MAX_MELEE_TILES }>;

/// Tiles covered by a melee swing from `origin` facing `facing`.
///
/// The actor's own tile is always included so a target hugging the actor
/// cannot slip under the arc. The front row follows: centre first, then the
/// two flanks. With `extended_reach` the tile two steps straight ahead is
/// appended.
pub fn melee_tiles(origin: Position, facing: Facing, extended_reach: bool) -> MeleeTiles {
    let (dx, dy) = facing.offset();
    let front = origin.offset(dx, dy);

    let mut tiles = MeleeTiles::new();
    tiles.push(origin);
    tiles.push(front);
    for (fx, fy) in facing.flanks() {
        tiles.push(front.offset(fx, fy));
    }
    if extended_reach {
        tiles.push(origin.offset(dx * 2, dy * 2));
    }
    tiles
}

/// Circular area test on tile offsets: `dx² + dy² <= r²`.
pub fn in_radius(center: Position, tile: Position, radius: u32) -> bool {
    let r = radius as i64;
    center.distance_squared(tile) <= r * r
}

/// Square area test (Chebyshev distance).
pub fn in_square(center: Position, tile: Position, radius: u32) -> bool {
    center.chebyshev(tile) <= radius
}

/// Targets already struck by one activation.
///
/// Created when an attack resolves, dropped when its damage window closes.
/// A target standing on several struck tiles, or matched by overlapping
/// shapes, is reported only once.
#[derive(Clone, Debug, Default)]
pub struct AttackResolution {
    already_hit: BTreeSet<EntityId>,
}

impl AttackResolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `target` as hit. Returns false when it was already hit.
    pub fn try_hit(&mut self, target: EntityId) -> bool {
        self.already_hit.insert(target)
    }

    pub fn was_hit(&self, target: EntityId) -> bool {
        self.already_hit.contains(&target)
    }

    pub fn hit_count(&self) -> usize {
        self.already_hit.len()
    }

    /// Living targets found on `tiles`, in tile order, each at most once.
    pub fn strike_tiles<T: Combatant>(&mut self, tiles: &[Position], targets: &[T]) -> Vec<EntityId> {
        let mut struck = Vec::new();
        for tile in tiles {
            for target in targets {
                if target.pools().is_alive() && target.occupies(*tile) && self.try_hit(target.id()) {
                    struck.push(target.id());
                }
            }
        }
        struck
    }

    /// Living targets with any occupied cell inside the circle.
    pub fn strike_radius<T: Combatant>(
        &mut self,
        center: Position,
        radius: u32,
        targets: &[T],
    ) -> Vec<EntityId> {
        let mut struck = Vec::new();
        for target in targets {
            let inside = target.cells().iter().any(|cell| in_radius(center, *cell, radius));
            if target.pools().is_alive() && inside && self.try_hit(target.id()) {
                struck.push(target.id());
            }
        }
        struck
    }
}
