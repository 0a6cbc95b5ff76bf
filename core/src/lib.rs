#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ledgerun level generator.
//!
//! This crate defines the vocabulary that connects the pure generation
//! systems with the outside world. Systems consume a [`DifficultyProfile`]
//! and a [`Cursor`], synthesize [`ChunkDescriptor`] values without touching
//! any backend, and the director commits those descriptors through the
//! [`TerrainWriter`] and [`EntitySpawner`] collaborators. Configuration lives
//! in [`GeneratorConfig`] and is loaded once at startup.

mod config;

use serde::{Deserialize, Serialize};

pub use config::{
    BoundsConfig, ConfigError, FeasibilityConfig, GapConfig, GeneratorConfig, HazardFloorConfig,
    PlatformConfig, ProgressionConfig, StreamingConfig, TierConfig, TierTable, WallConfig,
};

/// Position where the next chunk begins.
///
/// The vertical component is kept inside the configured bounds by the
/// director; the cursor itself never rolls back.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Cursor {
    x: f32,
    y: f32,
}

impl Cursor {
    /// Creates a cursor at the provided world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world position of the cursor.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world position of the cursor.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns a copy with the vertical component clamped to `[min_y, max_y]`.
    #[must_use]
    pub fn clamped(self, min_y: f32, max_y: f32) -> Self {
        Self {
            x: self.x,
            y: self.y.clamp(min_y, max_y),
        }
    }
}

/// Location of a single terrain cell on the tile grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps a world position onto the cell that contains it.
    #[must_use]
    pub fn from_world(x: f32, y: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell. Rows grow upwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell directly above this one.
    #[must_use]
    pub const fn above(self) -> Self {
        Self {
            x: self.x,
            y: self.y + 1,
        }
    }
}

/// Continuous position used to place entities.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Width and height of an axis-aligned entity footprint.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    width: f32,
    height: f32,
}

impl Extent {
    /// Creates a new extent.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal size.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical size.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Slot of the three-part platform pattern painted for a ground tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Leftmost tile of a platform.
    LeftCap,
    /// Interior tile of a platform.
    Center,
    /// Rightmost tile of a platform.
    RightCap,
}

/// Closed set of terrain chunk archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// First platform of a level or stream, where the player starts.
    InitialPlatform,
    /// Flat resting platform laid directly at the cursor.
    SafePlatform,
    /// Horizontal gap followed by a platform at the same height.
    Gap,
    /// Gap combined with a quantized rise or drop.
    Jump,
    /// Two or three short hops with alternating vertical steps.
    ShortJumpSeries,
    /// Entry platform, two walls and an exit platform raised by the wall height.
    WallJumpSection,
    /// Jump with a forced large drop used to stay below the ceiling.
    DownJumpSection,
    /// Wall section whose exit platform lies well below the entry.
    WallDownJumpSection,
    /// Last platform of a bounded level, carrying the goal.
    EndPlatform,
}

impl ChunkKind {
    /// Reports whether the kind contributes challenge rather than rest.
    #[must_use]
    pub const fn is_danger(self) -> bool {
        !matches!(
            self,
            Self::InitialPlatform | Self::SafePlatform | Self::EndPlatform
        )
    }

    /// Reports whether the kind is one of the boundary-correcting descents.
    #[must_use]
    pub const fn is_descent(self) -> bool {
        matches!(self, Self::DownJumpSection | Self::WallDownJumpSection)
    }
}

/// Named difficulty level selecting weights and spawn baselines.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Introductory tier without wall sections.
    #[default]
    Easy,
    /// Intermediate tier using every danger kind.
    Medium,
    /// Final tier without plain gaps and with tighter platforms.
    Hard,
}

impl Tier {
    /// Returns the tier that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Easy => Some(Self::Medium),
            Self::Medium => Some(Self::Hard),
            Self::Hard => None,
        }
    }
}

/// Jump archetypes with a fitted feasibility curve each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpArchetype {
    /// Standing jump without a run-up.
    NoMomentum,
    /// Running jump at full horizontal speed.
    Momentum,
    /// Jump kicked off a wall.
    WallJump,
}

impl JumpArchetype {
    /// Reports whether the archetype takes off from a wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::WallJump)
    }
}

/// Empirical quadratic fit `a·dx² + b·dx` of the height reachable over `dx`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityCurve {
    /// Quadratic coefficient, negative for a falling arc.
    pub a: f32,
    /// Linear coefficient.
    pub b: f32,
}

impl FeasibilityCurve {
    /// Creates a curve from its fitted constants.
    #[must_use]
    pub const fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    /// Highest vertical delta the archetype can cross over `dx`.
    #[must_use]
    pub fn reachable_height(&self, dx: f32) -> f32 {
        self.a * dx * dx + self.b * dx
    }
}

/// Relative weights of the randomly selected danger kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChunkWeights {
    /// Weight of [`ChunkKind::Gap`].
    pub gap: u32,
    /// Weight of [`ChunkKind::Jump`].
    pub jump: u32,
    /// Weight of [`ChunkKind::ShortJumpSeries`].
    pub short_jump_series: u32,
    /// Weight of [`ChunkKind::WallJumpSection`].
    pub wall_jump_section: u32,
}

impl ChunkWeights {
    /// Weighted kinds in a stable order.
    #[must_use]
    pub const fn entries(&self) -> [(ChunkKind, u32); 4] {
        [
            (ChunkKind::Gap, self.gap),
            (ChunkKind::Jump, self.jump),
            (ChunkKind::ShortJumpSeries, self.short_jump_series),
            (ChunkKind::WallJumpSection, self.wall_jump_section),
        ]
    }

    /// Sum of every weight.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries()
            .iter()
            .map(|(_, weight)| u64::from(*weight))
            .sum()
    }

    /// Weight assigned to the provided kind. Unweighted kinds report zero.
    #[must_use]
    pub fn weight(&self, kind: ChunkKind) -> u32 {
        self.entries()
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map_or(0, |(_, weight)| *weight)
    }
}

/// Difficulty policy active for the next chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Tier the profile was derived from.
    pub tier: Tier,
    /// Shortest platform, in tiles, laid by synthesis.
    pub min_platform_length: u32,
    /// Quantum applied to every vertical delta.
    pub vertical_spacing_unit: f32,
    /// Probability of spawning an enemy on an eligible platform.
    pub enemy_spawn_chance: f32,
    /// Probability of placing hazards on an eligible platform tail.
    pub spike_spawn_chance: f32,
    /// Weighted table of danger kinds for the tier.
    pub chunk_kind_weights: ChunkWeights,
}

/// Name of an enemy prefab understood by the spawner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyKind(String);

impl EnemyKind {
    /// Creates an enemy kind from its prefab name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Prefab name of the enemy.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Opaque handle issued by the spawner for a live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Ground tile to paint, with its slot in the platform pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Cell receiving the tile.
    pub pos: GridPos,
    /// Slot of the platform pattern.
    pub kind: TileKind,
}

/// Entity the director should spawn when committing a chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnRequest {
    /// Enemy drawn from the configured pool.
    Enemy {
        /// Prefab to instantiate.
        kind: EnemyKind,
        /// Position of the enemy's feet.
        position: WorldPoint,
    },
    /// Wall obstacle used by wall-jump sections.
    Wall {
        /// Bottom-centre of the wall.
        position: WorldPoint,
        /// Height of the wall in world units.
        height: f32,
    },
    /// Level goal placed on the end platform.
    Goal {
        /// Position of the goal.
        position: WorldPoint,
    },
}

/// Outcome of validating one designed crossing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapMeasure {
    /// Archetype the crossing was validated against.
    pub archetype: JumpArchetype,
    /// Width sampled before shrinking.
    pub initial: f32,
    /// Width committed to the geometry.
    pub width: f32,
    /// Vertical delta of the crossing; positive climbs.
    pub dy: f32,
    /// Whether the committed width passed the feasibility check.
    pub feasible: bool,
}

/// Pure description of a synthesized chunk, not yet committed to the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    /// Archetype that produced the chunk.
    pub kind: ChunkKind,
    /// Horizontal start of the chunk, equal to the cursor it was built from.
    pub start_x: f32,
    /// Horizontal end of the chunk; the next chunk starts here.
    pub end_x: f32,
    /// Ground tiles ordered left to right.
    pub tiles: Vec<TilePlacement>,
    /// Hazard cells.
    pub hazards: Vec<GridPos>,
    /// Entities to spawn.
    pub spawns: Vec<SpawnRequest>,
    /// Every crossing validated while building the chunk.
    pub gaps: Vec<GapMeasure>,
    /// Cursor handed to the next chunk.
    pub exit: Cursor,
    /// Lowest ground height inside the chunk.
    pub floor_y: f32,
}

/// Terrain backend receiving tile writes.
///
/// Writes are idempotent: setting a cell twice overwrites it.
pub trait TerrainWriter {
    /// Paints a ground tile.
    fn set_ground_tile(&mut self, pos: GridPos, kind: TileKind);

    /// Paints a hazard tile.
    fn set_hazard_tile(&mut self, pos: GridPos);

    /// Removes whatever occupies the cell.
    fn erase_tile(&mut self, pos: GridPos);

    /// Removes every tile.
    fn clear_all(&mut self);
}

/// Entity backend instantiating and destroying level entities.
pub trait EntitySpawner {
    /// Spawns an enemy. Returns `None` when no prefab exists for the kind.
    fn spawn_enemy(&mut self, kind: &EnemyKind, position: WorldPoint) -> Option<EntityHandle>;

    /// Spawns a wall obstacle.
    fn spawn_wall(&mut self, position: WorldPoint, height: f32) -> EntityHandle;

    /// Spawns the level goal.
    fn spawn_goal(&mut self, position: WorldPoint) -> EntityHandle;

    /// Spawns the kill floor centred on `position`.
    fn spawn_hazard_floor(&mut self, position: WorldPoint, size: Extent) -> EntityHandle;

    /// Destroys a previously spawned entity.
    fn despawn(&mut self, handle: EntityHandle);
}

/// Read-only progress feeding the difficulty controllers.
pub trait ProgressSource {
    /// Total number of completed bounded levels.
    fn completions(&self) -> u32;

    /// Horizontal distance travelled in the current streaming run.
    fn distance(&self) -> f32;
}

/// Progress persisted between sessions by an external save collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SavedProgress {
    /// Tier reached in bounded mode.
    pub tier: Tier,
    /// Completions accumulated inside the current tier.
    pub completions: u32,
    /// Chunks per level at the time of saving.
    pub chunk_count: u32,
    /// Best distance reached in streaming mode.
    pub best_distance: f32,
}

/// Save collaborator storing [`SavedProgress`].
pub trait ProgressStore {
    /// Error reported by the backing storage.
    type Error;

    /// Loads the last saved progress, if any was stored.
    fn load(&mut self) -> Result<Option<SavedProgress>, Self::Error>;

    /// Persists the provided progress.
    fn save(&mut self, progress: &SavedProgress) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_pos_floors_negative_world_coordinates() {
        assert_eq!(GridPos::from_world(-0.5, 2.9), GridPos::new(-1, 2));
        assert_eq!(GridPos::from_world(3.0, -3.0), GridPos::new(3, -3));
    }

    #[test]
    fn cursor_serializes_with_the_descriptor() {
        fn assert_serde<T: Serialize + serde::de::DeserializeOwned>() {}
        assert_serde::<Cursor>();
        assert_serde::<ChunkDescriptor>();

        let encoded = toml::to_string(&Cursor::new(4.0, -2.5)).expect("cursor encodes");
        let decoded: Cursor = toml::from_str(&encoded).expect("cursor decodes");
        assert_eq!(decoded, Cursor::new(4.0, -2.5));
    }

    #[test]
    fn cursor_clamp_only_touches_vertical_component() {
        let cursor = Cursor::new(12.5, 40.0).clamped(-4.0, 10.0);
        assert_eq!(cursor, Cursor::new(12.5, 10.0));
    }

    #[test]
    fn feasibility_curve_matches_quadratic() {
        let curve = FeasibilityCurve::new(-0.5, 3.0);
        assert!((curve.reachable_height(2.0) - 4.0).abs() < f32::EPSILON);
        assert!(curve.reachable_height(0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tiers_upgrade_in_order_and_saturate() {
        assert_eq!(Tier::Easy.next(), Some(Tier::Medium));
        assert_eq!(Tier::Medium.next(), Some(Tier::Hard));
        assert_eq!(Tier::Hard.next(), None);
    }

    #[test]
    fn danger_and_descent_classification() {
        assert!(!ChunkKind::SafePlatform.is_danger());
        assert!(!ChunkKind::EndPlatform.is_danger());
        assert!(ChunkKind::Gap.is_danger());
        assert!(ChunkKind::WallDownJumpSection.is_descent());
        assert!(!ChunkKind::Jump.is_descent());
    }

    #[test]
    fn chunk_weights_report_unlisted_kinds_as_zero() {
        let weights = ChunkWeights {
            gap: 2,
            jump: 3,
            short_jump_series: 0,
            wall_jump_section: 1,
        };
        assert_eq!(weights.total(), 6);
        assert_eq!(weights.weight(ChunkKind::Jump), 3);
        assert_eq!(weights.weight(ChunkKind::DownJumpSection), 0);
    }
}
