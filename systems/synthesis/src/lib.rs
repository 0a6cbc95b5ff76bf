#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless chunk synthesis.
//!
//! [`ChunkSynthesizer::synthesize`] turns a cursor, a chunk kind, the active
//! difficulty profile and an injected RNG into a [`ChunkDescriptor`]. Every
//! crossing is checked against the [`ReachabilityValidator`] before geometry
//! is committed to the descriptor. Nothing here talks to a terrain or entity
//! backend; committing is the director's job.

mod builder;
mod jumps;
mod platforms;
mod walls;

use builder::{ChunkBuilder, PlatformSpan};
use ledgerun_core::{
    BoundsConfig, ChunkDescriptor, ChunkKind, Cursor, DifficultyProfile, EnemyKind, GapConfig,
    GeneratorConfig, PlatformConfig, WallConfig,
};
use ledgerun_system_reachability::ReachabilityValidator;
use rand::Rng;

/// Pure system that builds one chunk at a time.
#[derive(Clone, Debug)]
pub struct ChunkSynthesizer {
    bounds: BoundsConfig,
    platforms: PlatformConfig,
    gaps: GapConfig,
    walls: WallConfig,
    enemies: Vec<EnemyKind>,
    validator: ReachabilityValidator,
}

impl ChunkSynthesizer {
    /// Creates a synthesizer using the geometry rules of `config`.
    #[must_use]
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            bounds: config.bounds,
            platforms: config.platforms,
            gaps: config.gaps,
            walls: config.walls,
            enemies: config.enemies.clone(),
            validator: ReachabilityValidator::new(config.feasibility),
        }
    }

    /// Validator used to check every crossing.
    #[must_use]
    pub const fn validator(&self) -> &ReachabilityValidator {
        &self.validator
    }

    /// Builds the descriptor of a `kind` chunk starting at `cursor`.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        kind: ChunkKind,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let cursor = cursor.clamped(self.bounds.min_y, self.bounds.max_y);
        let descriptor = match kind {
            ChunkKind::InitialPlatform | ChunkKind::SafePlatform | ChunkKind::EndPlatform => {
                self.platform(cursor, kind, profile, rng)
            }
            ChunkKind::Gap => self.gap(cursor, profile, rng),
            ChunkKind::Jump => self.jump(cursor, profile, rng),
            ChunkKind::ShortJumpSeries => self.short_jump_series(cursor, profile, rng),
            ChunkKind::DownJumpSection => self.down_jump(cursor, profile, rng),
            ChunkKind::WallJumpSection => self.wall_section(cursor, kind, profile, rng),
            ChunkKind::WallDownJumpSection => self.wall_section(cursor, kind, profile, rng),
        };

        log::debug!(
            "synthesized {:?} over [{:.1}, {:.1}] with {} tiles, {} hazards, {} spawns",
            descriptor.kind,
            descriptor.start_x,
            descriptor.end_x,
            descriptor.tiles.len(),
            descriptor.hazards.len(),
            descriptor.spawns.len()
        );
        descriptor
    }

    fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(self.bounds.min_y, self.bounds.max_y)
    }

    fn platform_length<R: Rng + ?Sized>(&self, profile: &DifficultyProfile, rng: &mut R) -> u32 {
        let spread = self.platforms.length_spread.max(1);
        profile.min_platform_length.max(1) + rng.gen_range(0..spread)
    }

    /// Rolls tail hazards and an enemy onto a freshly laid platform.
    fn roll_spawns<R: Rng + ?Sized>(
        &self,
        builder: &mut ChunkBuilder,
        span: PlatformSpan,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) {
        builder.roll_tail_hazards(
            span,
            profile.spike_spawn_chance,
            self.platforms.hazard_min_length,
            self.platforms.hazard_tail,
            rng,
        );
        builder.roll_enemy(span, profile.enemy_spawn_chance, &self.enemies, rng);
    }
}
