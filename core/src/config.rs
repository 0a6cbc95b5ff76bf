//! Tuning surface of the generator, loaded once at startup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ChunkWeights, EnemyKind, FeasibilityCurve, Tier};

/// Errors reported while loading or validating a [`GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize generator config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A tier declared a zero minimum platform length.
    #[error("tier {tier:?} must use a positive minimum platform length")]
    NonPositivePlatformLength {
        /// Offending tier.
        tier: Tier,
    },
    /// A weight table sums to zero, leaving nothing to select.
    #[error("chunk weight table `{table}` sums to zero")]
    DegenerateWeights {
        /// Name of the offending table.
        table: &'static str,
    },
    /// A probability fell outside `[0, 1]`.
    #[error("`{field}` must lie within [0, 1], got {value}")]
    ChanceOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Provided value.
        value: f32,
    },
    /// A range had its lower end at or above its upper end.
    #[error("`{field}` range is empty: [{min}, {max})")]
    InvalidRange {
        /// Offending field.
        field: &'static str,
        /// Lower end.
        min: f32,
        /// Upper end.
        max: f32,
    },
    /// A value that must be strictly positive was not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Provided value.
        value: f32,
    },
}

/// Aggregated tuning knobs controlling every adjustable aspect of generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Enemy prefabs drawn uniformly when an enemy spawns.
    pub enemies: Vec<EnemyKind>,
    /// Vertical limits and the level origin.
    pub bounds: BoundsConfig,
    /// Platform length rules shared by every kind.
    pub platforms: PlatformConfig,
    /// Gap sampling and shrinking parameters.
    pub gaps: GapConfig,
    /// Wall section geometry.
    pub walls: WallConfig,
    /// Fitted feasibility curves per jump archetype.
    pub feasibility: FeasibilityConfig,
    /// Per-tier difficulty baselines.
    pub tiers: TierTable,
    /// Completion-driven progression of bounded levels.
    pub progression: ProgressionConfig,
    /// Streaming-mode distances and spawn ramps.
    pub streaming: StreamingConfig,
    /// Kill floor placed under the generated terrain.
    pub hazard_floor: HazardFloorConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enemies: vec![EnemyKind::new("slime"), EnemyKind::new("bat")],
            bounds: BoundsConfig::default(),
            platforms: PlatformConfig::default(),
            gaps: GapConfig::default(),
            walls: WallConfig::default(),
            feasibility: FeasibilityConfig::default(),
            tiers: TierTable::default(),
            progression: ProgressionConfig::default(),
            streaming: StreamingConfig::default(),
            hazard_floor: HazardFloorConfig::default(),
        }
    }
}

/// Vertical limits and the level origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Horizontal position where every level and stream starts.
    pub origin_x: f32,
    /// Ground height of the initial platform.
    pub origin_y: f32,
    /// Lowest ground height any chunk may use.
    pub min_y: f32,
    /// Highest ground height any chunk may use.
    pub max_y: f32,
    /// Distance below `max_y` at which the director forces a descent.
    pub descent_margin: f32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            min_y: -12.0,
            max_y: 16.0,
            descent_margin: 4.0,
        }
    }
}

/// Platform length rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Number of extra lengths above the profile minimum; lengths fall in `[min, min + spread)`.
    pub length_spread: u32,
    /// Shortest platform laid inside a short jump series.
    pub series_length_min: u32,
    /// Longest platform laid inside a short jump series.
    pub series_length_max: u32,
    /// Shortest platform eligible for tail hazards.
    pub hazard_min_length: u32,
    /// Number of trailing tiles covered by hazards.
    pub hazard_tail: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            length_spread: 3,
            series_length_min: 2,
            series_length_max: 3,
            hazard_min_length: 3,
            hazard_tail: 1,
        }
    }
}

/// Gap sampling and shrinking parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Lower end of the initial width sampled for gaps.
    pub gap_min: f32,
    /// Upper end (exclusive) of the initial width sampled for gaps.
    pub gap_max: f32,
    /// Lower end of the initial width sampled for jumps and descents.
    pub jump_gap_min: f32,
    /// Upper end (exclusive) of the initial width sampled for jumps and descents.
    pub jump_gap_max: f32,
    /// Amount removed from an infeasible width per shrink step.
    pub shrink_step: f32,
    /// Narrowest width; accepted even when still infeasible.
    pub floor: f32,
    /// Largest rise or drop of a jump, in spacing units.
    pub max_rise_steps: u32,
    /// Fixed width between the hops of a short jump series.
    pub series_gap: f32,
    /// Fewest hops in a short jump series.
    pub series_min_steps: u32,
    /// Most hops in a short jump series.
    pub series_max_steps: u32,
    /// Smallest drop of a descent, in spacing units.
    pub descent_min_steps: u32,
    /// Largest drop of a descent, in spacing units.
    pub descent_max_steps: u32,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            gap_min: 2.0,
            gap_max: 6.5,
            jump_gap_min: 3.0,
            jump_gap_max: 7.0,
            shrink_step: 0.5,
            floor: 1.0,
            max_rise_steps: 2,
            series_gap: 2.0,
            series_min_steps: 2,
            series_max_steps: 3,
            descent_min_steps: 3,
            descent_max_steps: 5,
        }
    }
}

/// Wall section geometry, fixed by design rather than searched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Distance from the end of the entry platform to the first wall.
    pub first_offset: f32,
    /// Distance between the two walls.
    pub spacing: f32,
    /// Height of both walls; also the rise of the exit platform.
    pub height: f32,
    /// Distance from the second wall to the exit platform.
    pub exit_offset: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            first_offset: 2.0,
            spacing: 3.0,
            height: 4.0,
            exit_offset: 1.0,
        }
    }
}

/// Fitted feasibility curves per jump archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilityConfig {
    /// Standing jump.
    pub no_momentum: FeasibilityCurve,
    /// Running jump.
    pub momentum: FeasibilityCurve,
    /// Wall kick.
    pub wall_jump: FeasibilityCurve,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            no_momentum: FeasibilityCurve::new(-0.35, 2.2),
            momentum: FeasibilityCurve::new(-0.3, 2.4),
            wall_jump: FeasibilityCurve::new(-0.5, 3.2),
        }
    }
}

/// Difficulty baseline of a single tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Shortest platform laid by synthesis.
    pub min_platform_length: u32,
    /// Quantum applied to vertical deltas.
    pub vertical_spacing_unit: f32,
    /// Enemy probability installed when the tier becomes active.
    pub enemy_spawn_chance: f32,
    /// Hazard probability installed when the tier becomes active.
    pub spike_spawn_chance: f32,
    /// Danger pairs per level when the tier becomes active.
    pub chunk_count: u32,
    /// Danger kind weights.
    pub weights: ChunkWeights,
}

/// Per-tier baselines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    /// Easy tier.
    pub easy: TierConfig,
    /// Medium tier.
    pub medium: TierConfig,
    /// Hard tier.
    pub hard: TierConfig,
}

impl TierTable {
    /// Baseline of the provided tier.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            easy: TierConfig {
                min_platform_length: 4,
                vertical_spacing_unit: 1.0,
                enemy_spawn_chance: 0.15,
                spike_spawn_chance: 0.1,
                chunk_count: 3,
                weights: ChunkWeights {
                    gap: 4,
                    jump: 3,
                    short_jump_series: 2,
                    wall_jump_section: 0,
                },
            },
            medium: TierConfig {
                min_platform_length: 3,
                vertical_spacing_unit: 1.0,
                enemy_spawn_chance: 0.25,
                spike_spawn_chance: 0.2,
                chunk_count: 4,
                weights: ChunkWeights {
                    gap: 3,
                    jump: 3,
                    short_jump_series: 3,
                    wall_jump_section: 2,
                },
            },
            hard: TierConfig {
                min_platform_length: 2,
                vertical_spacing_unit: 2.0,
                enemy_spawn_chance: 0.35,
                spike_spawn_chance: 0.3,
                chunk_count: 5,
                weights: ChunkWeights {
                    gap: 0,
                    jump: 3,
                    short_jump_series: 3,
                    wall_jump_section: 3,
                },
            },
        }
    }
}

/// Completion-driven progression of bounded levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Completions required before a level grows by one danger pair.
    pub completions_per_extra_chunk: u32,
    /// Completions required before the tier upgrades.
    pub completions_per_tier: u32,
    /// Upper bound on danger pairs per level.
    pub max_chunks_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            completions_per_extra_chunk: 2,
            completions_per_tier: 5,
            max_chunks_per_level: 12,
        }
    }
}

/// Streaming-mode distances and spawn ramps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Margin ahead of the player that must always be generated.
    pub lookahead: f32,
    /// Margin behind the player beyond which chunks are evicted.
    pub cleanup_distance: f32,
    /// Tier providing platform lengths, spacing and base chances.
    pub tier: Tier,
    /// Distance travelled between two spawn-chance nudges.
    pub distance_step: f32,
    /// Enemy probability added per distance step.
    pub enemy_step: f32,
    /// Hazard probability added per distance step.
    pub spike_step: f32,
    /// Ceiling of the enemy probability.
    pub enemy_cap: f32,
    /// Ceiling of the hazard probability.
    pub spike_cap: f32,
    /// Danger kind weights used while streaming.
    pub weights: ChunkWeights,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            lookahead: 40.0,
            cleanup_distance: 50.0,
            tier: Tier::Medium,
            distance_step: 100.0,
            enemy_step: 0.02,
            spike_step: 0.02,
            enemy_cap: 0.6,
            spike_cap: 0.5,
            weights: ChunkWeights {
                gap: 3,
                jump: 3,
                short_jump_series: 2,
                wall_jump_section: 2,
            },
        }
    }
}

/// Kill floor placed under the generated terrain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardFloorConfig {
    /// Distance below the lowest ground at which the floor sits.
    pub margin: f32,
    /// Vertical size of the floor.
    pub thickness: f32,
}

impl Default for HazardFloorConfig {
    fn default() -> Self {
        Self {
            margin: 5.0,
            thickness: 1.0,
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML document, filling omitted fields with defaults, and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects configurations that would make generation degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = &self.bounds;
        ensure_range("bounds.min_y..max_y", bounds.min_y, bounds.max_y)?;
        if bounds.origin_y < bounds.min_y || bounds.origin_y > bounds.max_y {
            return Err(ConfigError::InvalidRange {
                field: "bounds.origin_y",
                min: bounds.min_y,
                max: bounds.max_y,
            });
        }
        ensure_non_negative("bounds.descent_margin", bounds.descent_margin)?;

        let platforms = &self.platforms;
        ensure_count("platforms.length_spread", platforms.length_spread)?;
        ensure_count("platforms.series_length_min", platforms.series_length_min)?;
        ensure_count_range(
            "platforms.series_length",
            platforms.series_length_min,
            platforms.series_length_max,
        )?;

        let gaps = &self.gaps;
        ensure_positive("gaps.shrink_step", gaps.shrink_step)?;
        ensure_positive("gaps.floor", gaps.floor)?;
        ensure_positive("gaps.series_gap", gaps.series_gap)?;
        ensure_range("gaps.gap", gaps.gap_min, gaps.gap_max)?;
        ensure_range("gaps.jump_gap", gaps.jump_gap_min, gaps.jump_gap_max)?;
        ensure_count("gaps.max_rise_steps", gaps.max_rise_steps)?;
        ensure_count("gaps.series_min_steps", gaps.series_min_steps)?;
        ensure_count_range(
            "gaps.series_steps",
            gaps.series_min_steps,
            gaps.series_max_steps,
        )?;
        ensure_count("gaps.descent_min_steps", gaps.descent_min_steps)?;
        ensure_count_range(
            "gaps.descent_steps",
            gaps.descent_min_steps,
            gaps.descent_max_steps,
        )?;

        ensure_positive("walls.spacing", self.walls.spacing)?;
        ensure_positive("walls.height", self.walls.height)?;
        ensure_positive("walls.exit_offset", self.walls.exit_offset)?;
        ensure_non_negative("walls.first_offset", self.walls.first_offset)?;

        for (tier, table) in [
            (Tier::Easy, "easy"),
            (Tier::Medium, "medium"),
            (Tier::Hard, "hard"),
        ] {
            validate_tier(tier, table, self.tiers.get(tier))?;
        }

        let progression = &self.progression;
        ensure_count(
            "progression.completions_per_extra_chunk",
            progression.completions_per_extra_chunk,
        )?;
        ensure_count(
            "progression.completions_per_tier",
            progression.completions_per_tier,
        )?;
        ensure_count(
            "progression.max_chunks_per_level",
            progression.max_chunks_per_level,
        )?;

        let streaming = &self.streaming;
        ensure_positive("streaming.lookahead", streaming.lookahead)?;
        ensure_positive("streaming.cleanup_distance", streaming.cleanup_distance)?;
        ensure_positive("streaming.distance_step", streaming.distance_step)?;
        ensure_chance("streaming.enemy_step", streaming.enemy_step)?;
        ensure_chance("streaming.spike_step", streaming.spike_step)?;
        ensure_chance("streaming.enemy_cap", streaming.enemy_cap)?;
        ensure_chance("streaming.spike_cap", streaming.spike_cap)?;
        if streaming.weights.total() == 0 {
            return Err(ConfigError::DegenerateWeights { table: "streaming" });
        }

        ensure_non_negative("hazard_floor.margin", self.hazard_floor.margin)?;
        ensure_positive("hazard_floor.thickness", self.hazard_floor.thickness)?;
        Ok(())
    }
}

fn validate_tier(tier: Tier, table: &'static str, config: &TierConfig) -> Result<(), ConfigError> {
    if config.min_platform_length == 0 {
        return Err(ConfigError::NonPositivePlatformLength { tier });
    }
    if config.weights.total() == 0 {
        return Err(ConfigError::DegenerateWeights { table });
    }
    ensure_positive("tiers.vertical_spacing_unit", config.vertical_spacing_unit)?;
    ensure_chance("tiers.enemy_spawn_chance", config.enemy_spawn_chance)?;
    ensure_chance("tiers.spike_spawn_chance", config.spike_spawn_chance)?;
    ensure_count("tiers.chunk_count", config.chunk_count)
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ensure_count(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value: 0.0 })
    }
}

fn ensure_chance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { field, value })
    }
}

fn ensure_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min < max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}

fn ensure_count_range(field: &'static str, min: u32, max: u32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            min: min as f32,
            max: max as f32,
        })
    }
}
