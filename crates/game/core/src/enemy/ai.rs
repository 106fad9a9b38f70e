//! Per-tick enemy decision making.

use std::time::Duration;

use tracing::{debug, trace};

use crate::combat::in_square;
use crate::env::{SimEnv, compute_seed, line_of_sight};
use crate::state::{Facing, Position, Tick};

use super::behavior::BehaviorState;
use super::profile::AttackStyle;
use super::Enemy;

/// Leaving `Chase` needs the player beyond this multiple of the detect
/// range.
pub const CHASE_HYSTERESIS: f32 = 1.5;

/// Blocked patrol steps retry with this many rolled headings.
const PATROL_RETRIES: u32 = 3;

/// What an enemy knows about the world this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiContext {
    pub player: Position,
    pub player_alive: bool,
    pub tick: Tick,
    pub game_seed: u64,
}

/// An attack for combat resolution to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAttack {
    /// Spawn a bolt from `origin` toward `target`.
    Projectile {
        origin: Position,
        target: Position,
        damage: i32,
    },
    /// The player was adjacent when the attack executed.
    Contact { damage: i32 },
    /// Square area around the attacker.
    Area {
        center: Position,
        radius: u32,
        damage: i32,
    },
}

/// Result of one [`Enemy::think`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiOutcome {
    pub transitions: Vec<(BehaviorState, BehaviorState)>,
    pub attack: Option<EnemyAttack>,
    pub moved: bool,
}

impl Enemy {
    /// Advances the behavior machine by one tick.
    ///
    /// `Prepare` always runs to completion; the target leaving range or
    /// dying does not interrupt it. `Attack` executes once and hands over to
    /// `Cooldown` in the same call; against a dead player it produces no
    /// attack.
    pub fn think(&mut self, delta: Duration, ctx: &AiContext, env: &SimEnv<'_>) -> AiOutcome {
        let mut outcome = AiOutcome::default();
        if !self.is_alive() {
            return outcome;
        }

        self.behavior.advance(delta);
        let detect = self.profile.detect_range;

        match self.behavior.state() {
            BehaviorState::Patrol => {
                if self.profile.is_hostile() && ctx.player_alive && self.within(ctx.player, detect) {
                    self.enter(BehaviorState::Chase, &mut outcome);
                } else {
                    outcome.moved = self.patrol(delta, ctx, env);
                }
            }
            BehaviorState::Chase => {
                if !ctx.player_alive || !self.within(ctx.player, detect * CHASE_HYSTERESIS) {
                    self.enter(BehaviorState::Patrol, &mut outcome);
                } else if self.within(ctx.player, self.profile.attack_range)
                    && self.has_sight(ctx.player, env)
                {
                    self.enter(BehaviorState::Prepare, &mut outcome);
                } else {
                    outcome.moved = self.chase(delta, ctx.player, env);
                }
            }
            BehaviorState::Prepare => {
                if self.behavior.elapsed() >= self.profile.prepare {
                    self.enter(BehaviorState::Attack, &mut outcome);
                }
            }
            BehaviorState::Attack => {
                outcome.attack = self.execute_attack(ctx);
                self.enter(BehaviorState::Cooldown, &mut outcome);
            }
            BehaviorState::Cooldown => {
                if self.behavior.elapsed() >= self.profile.cooldown {
                    let next = if ctx.player_alive && self.within(ctx.player, detect) {
                        BehaviorState::Chase
                    } else {
                        BehaviorState::Patrol
                    };
                    self.enter(next, &mut outcome);
                }
            }
        }

        outcome
    }

    fn enter(&mut self, to: BehaviorState, outcome: &mut AiOutcome) {
        if let Some(edge) = self.behavior.transition(to) {
            debug!(enemy = %self.id, tier = %self.tier, from = %edge.0, to = %edge.1, "enemy state change");
            self.move_timer.reset();
            outcome.transitions.push(edge);
        }
    }

    fn has_sight(&self, target: Position, env: &SimEnv<'_>) -> bool {
        !self.profile.needs_line_of_sight || line_of_sight(env.maze_opt(), self.position, target)
    }

    fn execute_attack(&self, ctx: &AiContext) -> Option<EnemyAttack> {
        if !ctx.player_alive {
            trace!(enemy = %self.id, "attack swung at a dead player");
            return None;
        }
        let attack = match self.profile.attack {
            AttackStyle::None => None,
            AttackStyle::Projectile { damage } => Some(EnemyAttack::Projectile {
                origin: self.position,
                target: ctx.player,
                damage,
            }),
            AttackStyle::Contact { damage } => {
                // Adjacency is re-checked at execution; a player who stepped
                // away during the telegraph is missed.
                self.touches(ctx.player)
                    .then_some(EnemyAttack::Contact { damage })
            }
            AttackStyle::Area { radius, damage } => Some(EnemyAttack::Area {
                center: self.position,
                radius,
                damage,
            }),
        };
        trace!(enemy = %self.id, ?attack, "enemy attack executed");
        attack
    }

    /// Moves the whole footprint by one tile if every target cell is open.
    fn try_step(&mut self, facing: Facing, env: &SimEnv<'_>) -> bool {
        let (dx, dy) = facing.offset();
        let anchor = self.position.offset(dx, dy);
        if self
            .footprint_at(anchor)
            .into_iter()
            .all(|cell| env.is_passable(cell))
        {
            self.position = anchor;
            true
        } else {
            false
        }
    }

    /// Ticks the movement timer; true when a step is due.
    fn step_due(&mut self, delta: Duration) -> bool {
        if self.profile.is_stationary() {
            return false;
        }
        self.move_timer.advance(delta);
        if self.move_timer.is_finished() {
            self.move_timer.reset();
            true
        } else {
            false
        }
    }

    fn roll_heading(&self, ctx: &AiContext, env: &SimEnv<'_>, context: u32) -> Facing {
        match env.rng() {
            Ok(rng) => rng.facing(compute_seed(ctx.game_seed, ctx.tick.0, self.id.0, context)),
            // Without a random source the walk turns clockwise.
            Err(_) => self.heading.clockwise(),
        }
    }

    fn patrol(&mut self, delta: Duration, ctx: &AiContext, env: &SimEnv<'_>) -> bool {
        self.turn_timer.advance(delta);
        if self.turn_timer.is_finished() {
            self.turn_timer.reset();
            self.heading = self.roll_heading(ctx, env, 0);
        }

        if !self.step_due(delta) {
            return false;
        }
        if self.try_step(self.heading, env) {
            return true;
        }
        for retry in 1..=PATROL_RETRIES {
            let heading = self.roll_heading(ctx, env, retry);
            if self.try_step(heading, env) {
                self.heading = heading;
                return true;
            }
        }
        false
    }

    /// One orthogonal step toward `target`.
    ///
    /// Works on the signs of the offset: any vertical component wins, so a
    /// diagonal offset resolves to a vertical step.
    fn chase(&mut self, delta: Duration, target: Position, env: &SimEnv<'_>) -> bool {
        if !self.step_due(delta) {
            return false;
        }
        let sx = (target.x - self.position.x).signum();
        let sy = (target.y - self.position.y).signum();
        let facing = if sx.abs() > sy.abs() {
            if sx > 0 { Facing::Right } else { Facing::Left }
        } else if sy > 0 {
            Facing::Up
        } else if sy < 0 {
            Facing::Down
        } else {
            return false;
        };

        self.heading = facing;
        self.try_step(facing, env)
    }
}

/// Whether an area attack centred on `center` reaches `target`.
pub(crate) fn area_reaches(center: Position, radius: u32, target: Position) -> bool {
    in_square(center, target, radius)
}
