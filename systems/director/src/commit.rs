//! Applies synthesized chunks to the collaborators and the registry.

use ledgerun_core::{
    ChunkKind, DifficultyProfile, EntitySpawner, Extent, SpawnRequest, TerrainWriter, WorldPoint,
};
use ledgerun_world::Chunk;
use rand::{Rng, SeedableRng};

use crate::{DirectorError, LevelDirector};

/// Bookkeeping of one committed chunk.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Committed {
    pub(crate) kind: ChunkKind,
    pub(crate) entities: usize,
    pub(crate) infeasible: usize,
}

impl<R: Rng + SeedableRng> LevelDirector<R> {
    /// Synthesizes a `kind` chunk at the cursor and commits it as one batch.
    ///
    /// The span is checked against the registry before any side effect, so a
    /// refused chunk leaves the world untouched.
    pub(crate) fn commit_kind(
        &mut self,
        kind: ChunkKind,
        profile: &DifficultyProfile,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) -> Result<Committed, DirectorError> {
        let descriptor = self
            .synthesizer
            .synthesize(self.cursor, kind, profile, &mut self.rng);
        self.registry
            .check_span(descriptor.start_x, descriptor.end_x)?;

        for tile in &descriptor.tiles {
            terrain.set_ground_tile(tile.pos, tile.kind);
        }
        for hazard in &descriptor.hazards {
            terrain.set_hazard_tile(*hazard);
        }

        let mut entities = Vec::with_capacity(descriptor.spawns.len());
        for request in &descriptor.spawns {
            match request {
                SpawnRequest::Enemy { kind, position } => {
                    if let Some(handle) = spawner.spawn_enemy(kind, *position) {
                        entities.push(handle);
                    }
                }
                SpawnRequest::Wall { position, height } => {
                    entities.push(spawner.spawn_wall(*position, *height));
                }
                SpawnRequest::Goal { position } => {
                    entities.push(spawner.spawn_goal(*position));
                }
            }
        }

        let committed = Committed {
            kind,
            entities: entities.len(),
            infeasible: descriptor.gaps.iter().filter(|gap| !gap.feasible).count(),
        };
        self.registry
            .append(Chunk::from_descriptor(&descriptor, entities))?;
        self.cursor = descriptor
            .exit
            .clamped(self.config.bounds.min_y, self.config.bounds.max_y);
        Ok(committed)
    }

    /// Replaces the kill floor so it spans every live chunk.
    pub(crate) fn respawn_hazard_floor(&mut self, spawner: &mut impl EntitySpawner) {
        if let Some(previous) = self.hazard_floor.take() {
            spawner.despawn(previous);
        }

        let (Some(start_x), Some(end_x), Some(lowest_y)) = (
            self.registry.first_start_x(),
            self.registry.frontier_x(),
            self.registry.lowest_floor_y(),
        ) else {
            return;
        };

        let settings = self.config.hazard_floor;
        let center = WorldPoint::new((start_x + end_x) / 2.0, lowest_y - settings.margin);
        let size = Extent::new(end_x - start_x, settings.thickness);
        self.hazard_floor = Some(spawner.spawn_hazard_floor(center, size));
    }
}

/// Erases the cells of `chunk` and despawns its entities.
///
/// Returns the number of despawned entities.
pub(crate) fn dispose(
    chunk: &Chunk,
    terrain: &mut impl TerrainWriter,
    spawner: &mut impl EntitySpawner,
) -> usize {
    for cell in chunk.cells() {
        terrain.erase_tile(cell);
    }
    for handle in chunk.entities() {
        spawner.despawn(*handle);
    }
    chunk.entities().len()
}
