//! Enemy bolts.

use std::time::Duration;

use crate::env::SimEnv;
use crate::state::{EntityId, Position};

/// Longest distance moved between two tile checks, so a long tick cannot
/// carry a bolt through a wall.
const MAX_SUBSTEP: f32 = 0.5;

/// What happened to a bolt during one advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStep {
    Flying,
    /// Entered a cell that blocks sight.
    Blocked,
    /// Reached its maximum range.
    Spent,
    /// Entered the player's tile.
    HitPlayer { damage: i32 },
}

/// A bolt travelling in a straight line at constant speed.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    owner: EntityId,
    x: f32,
    y: f32,
    dir_x: f32,
    dir_y: f32,
    travelled: f32,
    damage: i32,
    alive: bool,
}

impl Projectile {
    pub const SPEED_TILES_PER_SECOND: f32 = 6.0;
    pub const MAX_RANGE_TILES: f32 = 8.0;

    /// Aims from `origin` at `target`. A bolt aimed at its own tile has no
    /// direction and strikes whoever stands there.
    pub fn new(owner: EntityId, origin: Position, target: Position, damage: i32) -> Self {
        let dx = (target.x - origin.x) as f32;
        let dy = (target.y - origin.y) as f32;
        let length = (dx * dx + dy * dy).sqrt();
        let (dir_x, dir_y) = if length > 0.0 {
            (dx / length, dy / length)
        } else {
            (0.0, 0.0)
        };
        Self {
            owner,
            x: origin.x as f32,
            y: origin.y as f32,
            dir_x,
            dir_y,
            travelled: 0.0,
            damage,
            alive: true,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Tile currently under the bolt.
    pub fn tile(&self) -> Position {
        Position::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Moves the bolt and reports how it ended, if it did.
    ///
    /// A spent bolt is inert; later calls report `Spent` again without
    /// moving.
    pub fn advance(&mut self, delta: Duration, player: Position, env: &SimEnv<'_>) -> ProjectileStep {
        if !self.alive {
            return ProjectileStep::Spent;
        }

        let mut remaining = (Self::SPEED_TILES_PER_SECOND * delta.as_secs_f32())
            .min(Self::MAX_RANGE_TILES - self.travelled);
        loop {
            let step = remaining.min(MAX_SUBSTEP);
            self.x += self.dir_x * step;
            self.y += self.dir_y * step;
            self.travelled += step;
            remaining -= step;

            let tile = self.tile();
            if tile == player {
                self.alive = false;
                return ProjectileStep::HitPlayer {
                    damage: self.damage,
                };
            }
            if env.blocks_sight(tile) {
                self.alive = false;
                return ProjectileStep::Blocked;
            }
            if self.travelled >= Self::MAX_RANGE_TILES {
                self.alive = false;
                return ProjectileStep::Spent;
            }
            if remaining <= 0.0 {
                return ProjectileStep::Flying;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::env::GridMaze;

    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn bolt_hits_player_on_its_path() {
        let env = SimEnv::empty();
        let player = Position::new(3, 0);
        let mut bolt = Projectile::new(EntityId(1), Position::ORIGIN, player, 10);

        let mut result = ProjectileStep::Flying;
        for _ in 0..10 {
            result = bolt.advance(FRAME, player, &env);
            if result != ProjectileStep::Flying {
                break;
            }
        }
        assert_eq!(result, ProjectileStep::HitPlayer { damage: 10 });
        assert!(!bolt.is_alive());
    }

    #[test]
    fn bolt_stops_at_walls() {
        let maze = GridMaze::from_rows(&["...#...."]).unwrap();
        let env = SimEnv::empty().with_maze(&maze);
        let mut bolt = Projectile::new(EntityId(1), Position::ORIGIN, Position::new(7, 0), 10);
        assert_eq!(
            bolt.advance(Duration::from_secs(1), Position::new(7, 0), &env),
            ProjectileStep::Blocked
        );
        assert_eq!(bolt.tile(), Position::new(3, 0));
    }

    #[test]
    fn bolt_is_spent_at_max_range() {
        let env = SimEnv::empty();
        let mut bolt = Projectile::new(EntityId(1), Position::ORIGIN, Position::new(0, 20), 10);
        let player = Position::new(30, 30);
        assert_eq!(
            bolt.advance(Duration::from_secs(1), player, &env),
            ProjectileStep::Flying
        );
        assert_eq!(
            bolt.advance(Duration::from_secs(1), player, &env),
            ProjectileStep::Spent
        );
        assert!((bolt.travelled() - Projectile::MAX_RANGE_TILES).abs() < 1e-4);
    }
}
