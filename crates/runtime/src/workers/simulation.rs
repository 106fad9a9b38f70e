//! Simulation worker that owns the authoritative [`maze_core::Simulation`].
//!
//! Receives commands from [`crate::RuntimeHandle`] strictly in order, ticks
//! the simulation with the collaborators it owns, and publishes notifications
//! to the EventBus. Nothing else ever holds the simulation, so every
//! mutation goes through this single writer.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use maze_core::{
    AbilityId, AbilitySave, EnemyTier, EntityId, Facing, GameError, GridMaze, PcgRng, Position,
    SimEnv, SimSnapshot, Simulation, StaticInput, TickReport,
};

use crate::events::{Event, EventBus, WorkerEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Queue a slot activation for the next tick.
    ActivateSlot {
        slot: usize,
        reply: oneshot::Sender<()>,
    },
    /// Replace the pointer sample. `None` clears the aim.
    SetAim {
        aim: Option<Position>,
        reply: oneshot::Sender<()>,
    },
    /// Pose reported by the movement layer.
    SetPose {
        position: Position,
        facing: Facing,
        reply: oneshot::Sender<()>,
    },
    SpawnEnemy {
        tier: EnemyTier,
        position: Position,
        reply: oneshot::Sender<Option<EntityId>>,
    },
    UpgradeAbility {
        ability: AbilityId,
        reply: oneshot::Sender<bool>,
    },
    /// Run `ticks` fixed-delta ticks.
    Step {
        ticks: u32,
        reply: oneshot::Sender<Vec<TickReport>>,
    },
    Snapshot {
        reply: oneshot::Sender<SimSnapshot>,
    },
    SaveAbilities {
        reply: oneshot::Sender<Vec<AbilitySave>>,
    },
    RestoreAbilities {
        records: Vec<AbilitySave>,
        reply: oneshot::Sender<usize>,
    },
    RespawnPlayer {
        reply: oneshot::Sender<()>,
    },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    sim: Simulation,
    maze: Option<GridMaze>,
    input: StaticInput,
    rng: PcgRng,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        sim: Simulation,
        maze: Option<GridMaze>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            enemies = sim.enemies().len(),
            maze = maze.is_some(),
            "SimulationWorker initialized"
        );
        event_bus.publish(Event::Worker(WorkerEvent::Started {
            enemies: sim.enemies().len(),
            player: EntityId::PLAYER,
        }));

        Self {
            sim,
            maze,
            input: StaticInput::default(),
            rng: PcgRng,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        info!(tick = %self.sim.tick_count(), "SimulationWorker stopped");
        self.event_bus.publish(Event::Worker(WorkerEvent::Stopped {
            tick: self.sim.tick_count(),
        }));
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ActivateSlot { slot, reply } => {
                self.sim.queue_activation(slot);
                Self::answer(reply, (), "ActivateSlot");
            }
            Command::SetAim { aim, reply } => {
                self.input.aim = aim;
                Self::answer(reply, (), "SetAim");
            }
            Command::SetPose {
                position,
                facing,
                reply,
            } => {
                self.sim.set_player_pose(position, facing);
                self.input.facing = Some(facing);
                Self::answer(reply, (), "SetPose");
            }
            Command::SpawnEnemy {
                tier,
                position,
                reply,
            } => {
                let spawned = self.sim.spawn_enemy(tier, position);
                Self::answer(reply, spawned, "SpawnEnemy");
            }
            Command::UpgradeAbility { ability, reply } => {
                let upgraded = self.sim.upgrade_ability(ability);
                Self::answer(reply, upgraded, "UpgradeAbility");
            }
            Command::Step { ticks, reply } => {
                let reports = self.step(ticks);
                Self::answer(reply, reports, "Step");
            }
            Command::Snapshot { reply } => {
                Self::answer(reply, self.sim.snapshot(), "Snapshot");
            }
            Command::SaveAbilities { reply } => {
                Self::answer(reply, self.sim.save_abilities(), "SaveAbilities");
            }
            Command::RestoreAbilities { records, reply } => {
                let applied = self.sim.restore_abilities(&records);
                self.event_bus
                    .publish(Event::Worker(WorkerEvent::AbilitiesRestored {
                        applied,
                        offered: records.len(),
                    }));
                Self::answer(reply, applied, "RestoreAbilities");
            }
            Command::RespawnPlayer { reply } => {
                self.sim.respawn_player();
                Self::answer(reply, (), "RespawnPlayer");
            }
        }
    }

    fn answer<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
        if reply.send(value).is_err() {
            debug!("{command} reply channel closed (caller dropped)");
        }
    }

    /// Runs `ticks` ticks with the worker's collaborators.
    fn step(&mut self, ticks: u32) -> Vec<TickReport> {
        let mut env = SimEnv::empty()
            .with_pointer(&self.input)
            .with_movement(&self.input)
            .with_rng(&self.rng)
            .with_events(&self.event_bus);
        if let Some(maze) = &self.maze {
            env = env.with_maze(maze);
        }

        let mut reports = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            let report = self.sim.step(&env);
            for err in &report.rejected {
                debug!(tick = %report.tick, code = err.error_code(), %err, "activation rejected");
            }
            reports.push(report);
        }

        let rejected = reports.iter().map(|report| report.rejected.len()).sum();
        self.event_bus.publish(Event::Worker(WorkerEvent::Stepped {
            ticks,
            tick: self.sim.tick_count(),
            rejected,
        }));
        reports
    }
}
