//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::path::Path;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use maze_content::{ContentBundle, ContentFactory};
use maze_core::{
    AbilityTuning, ArchetypeTable, EnemyTier, GridMaze, Position, SimConfig, Simulation,
    TickReport,
};

use crate::api::{InputProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub sim_config: SimConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sim_config: SimConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates the simulation
///
/// Design: Runtime owns the worker and the input provider.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    input: Option<Box<dyn InputProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn set_input_provider(&mut self, provider: impl InputProvider + 'static) {
        self.input = Some(Box::new(provider));
    }

    /// Runs `ticks` ticks, consulting the input provider before each one.
    ///
    /// Without a provider the ticks run with the last input left in place.
    pub async fn run_ticks(&mut self, ticks: u32) -> Result<Vec<TickReport>> {
        let mut reports = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            if let Some(provider) = &self.input {
                let snapshot = self.handle.snapshot().await?;
                let frame = provider.next_frame(&snapshot).await?;
                if let Some(aim) = frame.aim {
                    self.handle.set_aim(Some(aim)).await?;
                }
                if let Some((position, facing)) = frame.pose {
                    self.handle.set_pose(position, facing).await?;
                }
                for slot in frame.activations {
                    self.handle.activate_slot(slot).await?;
                }
            }
            reports.extend(self.handle.step(1).await?);
        }
        Ok(reports)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every clone of the handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        info!("runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    tuning: AbilityTuning,
    archetypes: ArchetypeTable,
    maze: Option<GridMaze>,
    player_start: Position,
    spawns: Vec<(EnemyTier, Position)>,
    input: Option<Box<dyn InputProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tuning: AbilityTuning::default(),
            archetypes: ArchetypeTable::default(),
            maze: None,
            player_start: Position::ORIGIN,
            spawns: Vec::new(),
            input: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the game seed, keeping the rest of the simulation config.
    pub fn seed(mut self, game_seed: u64) -> Self {
        self.config.sim_config.game_seed = game_seed;
        self
    }

    pub fn tuning(mut self, tuning: AbilityTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn archetypes(mut self, archetypes: ArchetypeTable) -> Self {
        self.archetypes = archetypes;
        self
    }

    /// Maze used for movement, sight and bolt blocking. Without one the
    /// simulation treats every tile as open floor.
    pub fn maze(mut self, maze: GridMaze) -> Self {
        self.maze = Some(maze);
        self
    }

    pub fn player_start(mut self, position: Position) -> Self {
        self.player_start = position;
        self
    }

    pub fn spawn(mut self, tier: EnemyTier, position: Position) -> Self {
        self.spawns.push((tier, position));
        self
    }

    pub fn input_provider(mut self, provider: impl InputProvider + 'static) -> Self {
        self.input = Some(Box::new(provider));
        self
    }

    /// Takes config, tuning, archetypes, maze and spawns from a loaded bundle.
    pub fn content(mut self, bundle: ContentBundle) -> Self {
        self.config.sim_config = bundle.config;
        self.tuning = bundle.tuning;
        self.archetypes = bundle.archetypes;
        self.player_start = bundle.layout.player_start;
        self.spawns = bundle
            .layout
            .spawns
            .iter()
            .map(|spawn| (spawn.tier, spawn.position))
            .collect();
        self.maze = Some(bundle.layout.maze);
        self
    }

    /// Loads the bundle for `maze` from a data directory.
    pub fn load_content(self, data_dir: &Path, maze: &str) -> Result<Self> {
        let bundle = ContentFactory::new(data_dir)
            .load_bundle(maze)
            .map_err(|err| RuntimeError::Content {
                maze: maze.to_string(),
                source: err.into(),
            })?;
        Ok(self.content(bundle))
    }

    /// Build the runtime and spawn the simulation worker
    pub async fn build(self) -> Result<Runtime> {
        let mut sim = Simulation::new(
            self.config.sim_config.clone(),
            &self.tuning,
            self.archetypes,
            self.player_start,
        );
        for (tier, position) in self.spawns {
            match sim.spawn_enemy(tier, position) {
                Some(id) => debug!(enemy = %id, %tier, %position, "initial spawn"),
                None => warn!(%tier, %position, "initial spawn skipped"),
            }
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(sim, self.maze, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        info!(
            tick_rate_hz = self.config.sim_config.tick_rate_hz,
            "runtime started"
        );
        Ok(Runtime {
            handle,
            input: self.input,
            sim_worker_handle,
        })
    }
}
