#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative ledger of the terrain chunks committed to a level.
//!
//! Chunks enter the [`ChunkRegistry`] in spatial order once their tiles and
//! entities exist in the outside world, and leave it either from the trailing
//! side when the player has moved far enough ahead, or all at once when the
//! level resets. Whoever removes a chunk receives it by value so the tiles can
//! be erased and the entity handles despawned.

mod registry;

use ledgerun_core::{ChunkDescriptor, ChunkKind, EntityHandle, GridPos};

pub use registry::{ChunkRegistry, RegistryError};

/// Chunk whose geometry and entities have been committed to the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    kind: ChunkKind,
    start_x: f32,
    end_x: f32,
    tiles: Vec<GridPos>,
    hazards: Vec<GridPos>,
    entities: Vec<EntityHandle>,
    floor_y: f32,
}

impl Chunk {
    /// Records a committed descriptor together with the handles its spawns produced.
    #[must_use]
    pub fn from_descriptor(descriptor: &ChunkDescriptor, entities: Vec<EntityHandle>) -> Self {
        Self {
            kind: descriptor.kind,
            start_x: descriptor.start_x,
            end_x: descriptor.end_x,
            tiles: descriptor.tiles.iter().map(|tile| tile.pos).collect(),
            hazards: descriptor.hazards.clone(),
            entities,
            floor_y: descriptor.floor_y,
        }
    }

    /// Archetype that produced the chunk.
    #[must_use]
    pub const fn kind(&self) -> ChunkKind {
        self.kind
    }

    /// Horizontal start of the chunk.
    #[must_use]
    pub const fn start_x(&self) -> f32 {
        self.start_x
    }

    /// Horizontal end of the chunk.
    #[must_use]
    pub const fn end_x(&self) -> f32 {
        self.end_x
    }

    /// Ground cells painted for the chunk.
    #[must_use]
    pub fn tiles(&self) -> &[GridPos] {
        &self.tiles
    }

    /// Hazard cells painted for the chunk.
    #[must_use]
    pub fn hazards(&self) -> &[GridPos] {
        &self.hazards
    }

    /// Handles of the entities owned by the chunk.
    #[must_use]
    pub fn entities(&self) -> &[EntityHandle] {
        &self.entities
    }

    /// Lowest ground height inside the chunk.
    #[must_use]
    pub const fn floor_y(&self) -> f32 {
        self.floor_y
    }

    /// Every cell written for the chunk, ground first.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.tiles.iter().chain(self.hazards.iter()).copied()
    }
}
