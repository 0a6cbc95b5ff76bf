#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrates chunk generation in bounded and streaming modes.
//!
//! The [`LevelDirector`] owns the cursor, the [`ChunkRegistry`] and the
//! injected RNG. Each step picks a chunk kind, asks the synthesizer for its
//! geometry, writes the tiles and spawns through the collaborators in one
//! batch, records the resulting [`Chunk`](ledgerun_world::Chunk) and only
//! then moves the cursor.

mod bounded;
mod commit;
mod select;
mod streaming;

use ledgerun_core::{
    ChunkKind, Cursor, EntityHandle, EntitySpawner, GeneratorConfig, TerrainWriter,
};
use ledgerun_system_synthesis::ChunkSynthesizer;
use ledgerun_world::{ChunkRegistry, RegistryError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced while generating.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum DirectorError {
    /// The registry refused a synthesized chunk.
    #[error("chunk rejected by the registry: {0}")]
    Registry(#[from] RegistryError),
    /// The active profile weighs every danger kind at zero.
    #[error("difficulty profile leaves no danger kind to select")]
    DegenerateWeights,
}

/// Whether the director is currently producing chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    /// Waiting for the next request.
    #[default]
    Idle,
    /// Inside `generate` or `advance`.
    Generating,
}

/// Life of the player driving streaming generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LifeState {
    /// Streaming keeps producing chunks.
    #[default]
    Alive,
    /// Streaming is frozen until the next restart.
    Dead,
}

/// Outcome of a bounded [`LevelDirector::generate`] call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelSummary {
    /// Kinds of the committed chunks in spatial order.
    pub kinds: Vec<ChunkKind>,
    /// Start of the initial platform.
    pub start_x: f32,
    /// End of the end platform.
    pub end_x: f32,
    /// Lowest ground height of the level.
    pub lowest_y: f32,
    /// Entities spawned by the chunks, excluding the kill floor.
    pub entities: usize,
    /// Crossings kept at the floor width while still infeasible.
    pub infeasible_crossings: usize,
}

/// Outcome of a streaming [`LevelDirector::advance`] call.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct AdvanceReport {
    /// Kinds committed ahead of the player, in order.
    pub generated: Vec<ChunkKind>,
    /// Chunks evicted behind the player.
    pub evicted: usize,
    /// Entities despawned together with the evicted chunks.
    pub despawned: usize,
    /// Frontier after the call, if any chunk is live.
    pub frontier_x: Option<f32>,
    /// Crossings kept at the floor width while still infeasible.
    pub infeasible_crossings: usize,
}

impl AdvanceReport {
    /// Reports whether the call touched the world at all.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.generated.is_empty() || self.evicted > 0
    }
}

/// Stateful orchestrator for both generation modes.
#[derive(Debug)]
pub struct LevelDirector<R = ChaCha8Rng> {
    config: GeneratorConfig,
    synthesizer: ChunkSynthesizer,
    rng: R,
    seed: u64,
    registry: ChunkRegistry,
    cursor: Cursor,
    hazard_floor: Option<EntityHandle>,
    phase: GenerationPhase,
    life: LifeState,
}

impl<R: Rng + SeedableRng> LevelDirector<R> {
    /// Creates a director whose RNG is seeded with `seed`.
    #[must_use]
    pub fn new(config: &GeneratorConfig, seed: u64) -> Self {
        Self {
            config: config.clone(),
            synthesizer: ChunkSynthesizer::new(config),
            rng: R::seed_from_u64(seed),
            seed,
            registry: ChunkRegistry::new(),
            cursor: origin(config),
            hazard_floor: None,
            phase: GenerationPhase::Idle,
            life: LifeState::Alive,
        }
    }

    /// Restarts the RNG stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Seed the RNG stream was last started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Position where the next chunk begins.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Ledger of the live chunks.
    #[must_use]
    pub const fn registry(&self) -> &ChunkRegistry {
        &self.registry
    }

    /// Handle of the live kill floor.
    #[must_use]
    pub const fn hazard_floor(&self) -> Option<EntityHandle> {
        self.hazard_floor
    }

    /// Current generation phase.
    #[must_use]
    pub const fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Current life state of the streaming player.
    #[must_use]
    pub const fn life(&self) -> LifeState {
        self.life
    }

    /// Destroys every chunk and the kill floor, then resets the cursor.
    pub fn clear(&mut self, terrain: &mut impl TerrainWriter, spawner: &mut impl EntitySpawner) {
        for chunk in self.registry.clear() {
            for handle in chunk.entities() {
                spawner.despawn(*handle);
            }
        }
        if let Some(floor) = self.hazard_floor.take() {
            spawner.despawn(floor);
        }
        terrain.clear_all();
        self.cursor = origin(&self.config);
    }
}

fn origin(config: &GeneratorConfig) -> Cursor {
    Cursor::new(config.bounds.origin_x, config.bounds.origin_y)
        .clamped(config.bounds.min_y, config.bounds.max_y)
}
