//! Fixed-timestep orchestrator.
//!
//! [`Simulation`] owns every piece of mutable combat state and advances it
//! once per tick in a fixed order:
//!
//! 1. queued player activations, then player pools and abilities
//! 2. enemy behavior machines
//! 3. projectiles
//! 4. combat resolution (player requests, dash contact, hits on the player)
//! 5. cleanup: dead enemies and finished bolts are compacted out
//!
//! Enemies that die mid-tick are only marked; the roster is compacted in
//! step 5, so no collection is mutated while it is being walked.

mod player;
mod resolve;
mod snapshot;

pub use player::PlayerActor;
pub use snapshot::{AbilityView, EnemyView, PlayerView, SimSnapshot};

use std::mem;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::ability::{
    AbilityId, AbilitySave, AbilitySignal, AbilityTuning, Activation, ActivationError, DashPerks,
};
use crate::combat::{AttackResolution, CombatRequest, Combatant, DamageSource, heal_amount};
use crate::config::SimConfig;
use crate::enemy::{
    AiContext, ArchetypeProfile, ArchetypeTable, Enemy, EnemyAttack, EnemyTier, Projectile,
    ProjectileStep, area_reaches,
};
use crate::env::SimEnv;
use crate::error::GameError;
use crate::events::SimEvent;
use crate::state::{DamageOutcome, EntityId, Facing, Position, Tick};

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick that was just simulated.
    pub tick: Tick,
    pub events: Vec<SimEvent>,
    /// Activation requests that did nothing, in queue order.
    pub rejected: Vec<ActivationError>,
}

impl TickReport {
    fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|event| event.name() == name).count()
    }
}

/// Damage headed for the player, gathered during steps 2 and 3.
#[derive(Clone, Copy, Debug)]
struct PlayerHit {
    damage: i32,
    source: DamageSource,
}

pub struct Simulation {
    config: SimConfig,
    archetypes: ArchetypeTable,
    player: PlayerActor,
    spawn: Position,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    queued: Vec<usize>,
    requests: Vec<(usize, CombatRequest)>,
    dash_hits: AttackResolution,
    tick: Tick,
    next_enemy: u32,
}

impl Simulation {
    pub fn new(
        config: SimConfig,
        tuning: &AbilityTuning,
        archetypes: ArchetypeTable,
        spawn: Position,
    ) -> Self {
        let player = PlayerActor::new(&config, tuning, spawn);
        Self {
            config,
            archetypes,
            player,
            spawn,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            queued: Vec::new(),
            requests: Vec::new(),
            dash_hits: AttackResolution::new(),
            tick: Tick::ZERO,
            next_enemy: 1,
        }
    }

    /// Default config, tuning and archetypes.
    pub fn with_defaults(spawn: Position) -> Self {
        Self::new(
            SimConfig::default(),
            &AbilityTuning::default(),
            ArchetypeTable::default(),
            spawn,
        )
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of ticks simulated so far.
    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn player(&self) -> &PlayerActor {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    // ========================================================================
    // Host commands
    // ========================================================================

    /// Spawns an enemy of `tier` with its table profile.
    ///
    /// Returns `None` when the roster is full.
    pub fn spawn_enemy(&mut self, tier: EnemyTier, position: Position) -> Option<EntityId> {
        let profile = self.archetypes.get(tier).clone();
        self.spawn_enemy_with(tier, profile, position)
    }

    /// Spawns an enemy with a custom profile.
    pub fn spawn_enemy_with(
        &mut self,
        tier: EnemyTier,
        profile: ArchetypeProfile,
        position: Position,
    ) -> Option<EntityId> {
        if self.enemies.len() >= SimConfig::MAX_ENEMIES {
            warn!(%tier, %position, "enemy roster full, spawn skipped");
            return None;
        }
        let id = EntityId(self.next_enemy);
        self.next_enemy += 1;
        self.enemies.push(Enemy::new(id, tier, profile, position));
        debug!(enemy = %id, %tier, %position, "enemy spawned");
        Some(id)
    }

    /// Pose reported by the movement collaborator.
    pub fn set_player_pose(&mut self, position: Position, facing: Facing) {
        self.player.set_pose(position, facing);
    }

    /// Queues a slot activation for the start of the next tick.
    pub fn queue_activation(&mut self, slot: usize) {
        self.queued.push(slot);
    }

    pub fn upgrade_ability(&mut self, id: AbilityId) -> bool {
        self.player.abilities_mut().upgrade(id)
    }

    /// Applies a slow to the player (traps and other hazards).
    pub fn slow_player(&mut self, duration: Duration) {
        self.player.pools_mut().apply_slow(duration);
    }

    pub fn save_abilities(&self) -> Vec<AbilitySave> {
        self.player.abilities().save()
    }

    /// Restores ability records. Pending activations, combat requests and
    /// the current dash's contact set are dropped with the old state.
    pub fn restore_abilities(&mut self, records: &[AbilitySave]) -> usize {
        self.queued.clear();
        self.requests.clear();
        self.dash_hits = AttackResolution::new();
        self.player.abilities_mut().restore(records)
    }

    /// Puts the player back at the spawn point with full pools and reset
    /// ability timers. Levels and upgrades are kept.
    pub fn respawn_player(&mut self) {
        self.player.respawn(self.spawn);
        self.queued.clear();
        self.requests.clear();
        self.dash_hits = AttackResolution::new();
        debug!(position = %self.spawn, "player respawned");
    }

    pub fn snapshot(&self) -> SimSnapshot {
        let pools = self.player.pools();
        let abilities = self
            .player
            .abilities()
            .iter()
            .enumerate()
            .map(|(slot, ability)| AbilityView {
                slot,
                id: ability.id(),
                level: ability.level(),
                ready: ability.is_ready(),
                active: ability.is_active(),
                cooldown_progress: ability.cooldown_progress(),
            })
            .collect();

        SimSnapshot {
            tick: self.tick,
            player: PlayerView {
                position: self.player.position(),
                facing: self.player.facing(),
                health: pools.health(),
                max_health: pools.max_health(),
                mana: pools.mana(),
                max_mana: pools.max_mana(),
                alive: pools.is_alive(),
                invulnerable: pools.is_invulnerable(),
                abilities,
            },
            enemies: self
                .enemies
                .iter()
                .map(|enemy| EnemyView {
                    id: enemy.id(),
                    tier: enemy.tier(),
                    position: enemy.position(),
                    health: enemy.pools().health(),
                    state: enemy.state(),
                })
                .collect(),
            projectiles: self.projectiles.len(),
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances everything by `delta` and returns what happened.
    ///
    /// Events are also published to the injected sink, if there is one.
    pub fn tick(&mut self, delta: Duration, env: &SimEnv<'_>) -> TickReport {
        let mut report = TickReport::new(self.tick);
        let mut player_hits = Vec::new();

        self.advance_player(delta, env, &mut report);
        self.advance_enemies(delta, env, &mut report, &mut player_hits);
        self.advance_projectiles(delta, env, &mut player_hits);
        self.resolve_combat(&mut report, player_hits);
        self.cleanup();

        match env.events() {
            Some(sink) => {
                for event in &report.events {
                    sink.publish(event);
                }
            }
            None => trace!(events = report.events.len(), "no event sink, notifications dropped"),
        }

        self.tick = self.tick.next();
        report
    }

    /// Fixed-delta tick at the configured rate.
    pub fn step(&mut self, env: &SimEnv<'_>) -> TickReport {
        self.tick(self.config.fixed_delta(), env)
    }

    fn advance_player(&mut self, delta: Duration, env: &SimEnv<'_>, report: &mut TickReport) {
        let aim = env.aim_tile();
        if let Some(facing) = env.facing() {
            self.player.set_facing(facing);
        }

        for slot in mem::take(&mut self.queued) {
            self.apply_activation(slot, aim, report);
        }

        for signal in self.player.advance(delta, aim) {
            match signal.signal {
                AbilitySignal::Request(request) => self.requests.push((signal.slot, request)),
                AbilitySignal::AimCancelled => report.events.push(SimEvent::AimCancelled),
                AbilitySignal::DashEnded => self.dash_hits = AttackResolution::new(),
            }
        }
    }

    fn apply_activation(&mut self, slot: usize, aim: Option<Position>, report: &mut TickReport) {
        let activation = match self.player.activate(slot, aim) {
            Ok(activation) => activation,
            Err(err) => {
                debug!(slot, code = err.error_code(), %err, "activation rejected");
                report.rejected.push(err);
                return;
            }
        };

        if let Some(ability) = self.player.abilities().slot(slot) {
            report.events.push(SimEvent::AbilityActivated {
                actor: EntityId::PLAYER,
                slot,
                ability: ability.id(),
            });
        }

        match activation {
            Activation::Dash {
                duration,
                perks,
                charges_left,
            } => {
                self.dash_hits = AttackResolution::new();
                if perks.contains(DashPerks::INVULNERABLE) {
                    self.player.pools_mut().grant_invulnerability(duration);
                }
                report.events.push(SimEvent::DashStarted { charges_left });
            }
            Activation::Cast { request } => self.requests.push((slot, request)),
            Activation::Swing { .. } | Activation::Aiming { .. } => {}
        }
    }

    fn advance_enemies(
        &mut self,
        delta: Duration,
        env: &SimEnv<'_>,
        report: &mut TickReport,
        player_hits: &mut Vec<PlayerHit>,
    ) {
        let ctx = AiContext {
            player: self.player.position(),
            player_alive: self.player.is_alive(),
            tick: self.tick,
            game_seed: self.config.game_seed,
        };

        let mut attacks = Vec::new();
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            let outcome = enemy.think(delta, &ctx, env);
            for (from, to) in outcome.transitions {
                report.events.push(SimEvent::EnemyStateChanged {
                    enemy: enemy.id(),
                    from,
                    to,
                });
            }
            if let Some(attack) = outcome.attack {
                attacks.push((enemy.id(), attack));
            }
        }

        for (owner, attack) in attacks {
            match attack {
                EnemyAttack::Projectile {
                    origin,
                    target,
                    damage,
                } => {
                    if self.projectiles.len() >= SimConfig::MAX_PROJECTILES {
                        warn!(enemy = %owner, "projectile cap reached, bolt dropped");
                        continue;
                    }
                    self.projectiles
                        .push(Projectile::new(owner, origin, target, damage));
                    report.events.push(SimEvent::ProjectileSpawned {
                        owner,
                        origin,
                        target,
                    });
                }
                EnemyAttack::Contact { damage } => player_hits.push(PlayerHit {
                    damage,
                    source: DamageSource::Contact,
                }),
                EnemyAttack::Area {
                    center,
                    radius,
                    damage,
                } => {
                    if area_reaches(center, radius, ctx.player) {
                        player_hits.push(PlayerHit {
                            damage,
                            source: DamageSource::Slam,
                        });
                    }
                }
            }
        }
    }

    fn advance_projectiles(&mut self, delta: Duration, env: &SimEnv<'_>, player_hits: &mut Vec<PlayerHit>) {
        let player = self.player.position();
        for projectile in self.projectiles.iter_mut().filter(|bolt| bolt.is_alive()) {
            if let ProjectileStep::HitPlayer { damage } = projectile.advance(delta, player, env) {
                player_hits.push(PlayerHit {
                    damage,
                    source: DamageSource::Projectile,
                });
            }
        }
    }

    fn resolve_combat(&mut self, report: &mut TickReport, mut player_hits: Vec<PlayerHit>) {
        for (slot, request) in mem::take(&mut self.requests) {
            if !self.player.is_alive() {
                trace!(slot, "caster dead, request dropped");
                continue;
            }
            self.resolve_request(slot, request, report);
        }

        let position = self.player.position();
        if self.player.is_alive() && self.player.is_dashing() {
            resolve::resolve_dash_contact(
                &mut self.enemies,
                position,
                self.config.dash_contact_damage,
                &mut self.dash_hits,
                &mut report.events,
            );
        } else {
            for enemy in self.enemies.iter().filter(|enemy| enemy.is_alive()) {
                if enemy.occupies(position) {
                    player_hits.push(PlayerHit {
                        damage: enemy.profile().contact_damage,
                        source: DamageSource::Contact,
                    });
                }
            }
        }

        for hit in player_hits {
            self.damage_player(hit, report);
        }
    }

    fn resolve_request(&mut self, slot: usize, request: CombatRequest, report: &mut TickReport) {
        match request {
            CombatRequest::Strike { tiles, damage } => {
                let struck = resolve::resolve_strike(&mut self.enemies, &tiles, damage, &mut report.events);
                trace!(slot, struck, "melee strike resolved");
            }
            CombatRequest::Area {
                center,
                radius,
                damage,
            } => {
                let hits = resolve::resolve_area(
                    &mut self.enemies,
                    center,
                    radius,
                    damage,
                    &mut report.events,
                );
                self.player.abilities_mut().record_area_hits(slot, hits);
            }
            CombatRequest::Heal { fraction } => {
                let max_health = self.player.pools().max_health();
                let gained = self.player.pools_mut().heal(heal_amount(fraction, max_health));
                report.events.push(SimEvent::PlayerHealed {
                    amount: gained,
                    health: self.player.pools().health(),
                });
            }
        }
    }

    fn damage_player(&mut self, hit: PlayerHit, report: &mut TickReport) {
        match self.player.pools_mut().take_damage(hit.damage) {
            DamageOutcome::Ignored => trace!(source = %hit.source, "player hit ignored"),
            DamageOutcome::Applied { remaining } => {
                let window = self.config.invulnerability_window;
                self.player.pools_mut().grant_invulnerability(window);
                report.events.push(SimEvent::PlayerDamaged {
                    amount: hit.damage,
                    health: remaining,
                    source: hit.source,
                });
            }
            DamageOutcome::Killed { remaining } => {
                report.events.push(SimEvent::PlayerDamaged {
                    amount: hit.damage,
                    health: remaining,
                    source: hit.source,
                });
                report.events.push(SimEvent::PlayerDied);
                self.queued.clear();
                debug!(source = %hit.source, "player died");
            }
        }
    }

    fn cleanup(&mut self) {
        let before = self.enemies.len();
        self.enemies.retain(Enemy::is_alive);
        self.projectiles.retain(Projectile::is_alive);
        let removed = before - self.enemies.len();
        if removed > 0 {
            trace!(removed, remaining = self.enemies.len(), "roster compacted");
        }
    }
}
