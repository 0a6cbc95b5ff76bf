//! Accumulates the geometry and spawn requests of a single chunk.

use ledgerun_core::{
    ChunkDescriptor, ChunkKind, Cursor, EnemyKind, GapMeasure, GridPos, SpawnRequest, TileKind,
    TilePlacement, WorldPoint,
};
use rand::{seq::SliceRandom, Rng};

/// Cells occupied by one laid platform.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlatformSpan {
    first: GridPos,
    length: u32,
}

impl PlatformSpan {
    /// World x just past the last tile.
    pub(crate) fn end_x(&self) -> f32 {
        (self.first.x() + self.length as i32) as f32
    }

    /// Point standing on the middle of the platform.
    pub(crate) fn top_center(&self) -> WorldPoint {
        WorldPoint::new(
            self.first.x() as f32 + self.length as f32 / 2.0,
            (self.first.y() + 1) as f32,
        )
    }

    fn cell(&self, index: u32) -> GridPos {
        GridPos::new(self.first.x() + index as i32, self.first.y())
    }
}

/// Mutable scratch state used while a chunk is being synthesized.
#[derive(Debug)]
pub(crate) struct ChunkBuilder {
    kind: ChunkKind,
    start_x: f32,
    end_x: f32,
    exit_y: f32,
    floor_y: Option<f32>,
    tiles: Vec<TilePlacement>,
    hazards: Vec<GridPos>,
    spawns: Vec<SpawnRequest>,
    gaps: Vec<GapMeasure>,
}

impl ChunkBuilder {
    pub(crate) fn new(kind: ChunkKind, cursor: Cursor) -> Self {
        Self {
            kind,
            start_x: cursor.x(),
            end_x: cursor.x(),
            exit_y: cursor.y(),
            floor_y: None,
            tiles: Vec::new(),
            hazards: Vec::new(),
            spawns: Vec::new(),
            gaps: Vec::new(),
        }
    }

    /// Lays a platform whose first tile covers world position `(x, y)`.
    ///
    /// Tiles follow the left-cap, centre, right-cap pattern; two tiles use
    /// both caps and a single tile uses the centre slot.
    pub(crate) fn lay_platform(&mut self, x: f32, y: f32, length: u32) -> PlatformSpan {
        let span = PlatformSpan {
            first: GridPos::from_world(x, y),
            length: length.max(1),
        };

        for index in 0..span.length {
            let kind = match (span.length, index) {
                (1, _) => TileKind::Center,
                (_, 0) => TileKind::LeftCap,
                (length, index) if index + 1 == length => TileKind::RightCap,
                _ => TileKind::Center,
            };
            self.tiles.push(TilePlacement {
                pos: span.cell(index),
                kind,
            });
        }

        self.end_x = self.end_x.max(span.end_x());
        self.exit_y = y;
        self.floor_y = Some(self.floor_y.map_or(y, |floor| floor.min(y)));
        span
    }

    pub(crate) fn record_gap(&mut self, measure: GapMeasure) {
        if !measure.feasible {
            log::warn!(
                "{:?} crossing of width {:.2} and rise {:.2} stays infeasible for {:?}; keeping it",
                self.kind,
                measure.width,
                measure.dy,
                measure.archetype
            );
        }
        self.gaps.push(measure);
    }

    pub(crate) fn spawn(&mut self, request: SpawnRequest) {
        self.spawns.push(request);
    }

    /// Rolls hazards onto the trailing tiles of `span`.
    ///
    /// Short platforms are never eligible and the first tile always stays
    /// clear so the landing spot is safe.
    pub(crate) fn roll_tail_hazards<R: Rng + ?Sized>(
        &mut self,
        span: PlatformSpan,
        chance: f32,
        min_length: u32,
        tail: u32,
        rng: &mut R,
    ) {
        if !roll(chance, rng) || span.length < min_length.max(2) {
            return;
        }

        let tail = tail.min(span.length - 1);
        for index in (span.length - tail)..span.length {
            self.hazards.push(span.cell(index).above());
        }
    }

    /// Rolls an enemy onto the middle of `span`.
    ///
    /// An empty pool silently skips the spawn.
    pub(crate) fn roll_enemy<R: Rng + ?Sized>(
        &mut self,
        span: PlatformSpan,
        chance: f32,
        pool: &[EnemyKind],
        rng: &mut R,
    ) {
        if !roll(chance, rng) {
            return;
        }

        if let Some(kind) = pool.choose(rng) {
            self.spawns.push(SpawnRequest::Enemy {
                kind: kind.clone(),
                position: span.top_center(),
            });
        }
    }

    pub(crate) fn finish(self) -> ChunkDescriptor {
        ChunkDescriptor {
            kind: self.kind,
            start_x: self.start_x,
            end_x: self.end_x,
            tiles: self.tiles,
            hazards: self.hazards,
            spawns: self.spawns,
            gaps: self.gaps,
            exit: Cursor::new(self.end_x, self.exit_y),
            floor_y: self.floor_y.unwrap_or(self.exit_y),
        }
    }
}

fn roll<R: Rng + ?Sized>(chance: f32, rng: &mut R) -> bool {
    rng.gen_bool(f64::from(chance.clamp(0.0, 1.0)))
}
