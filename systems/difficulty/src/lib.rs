#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty controllers deriving the active [`DifficultyProfile`].
//!
//! [`LevelProgression`] drives bounded levels from completed runs while
//! [`DistanceDifficulty`] ramps spawn chances with the distance travelled in
//! streaming mode. Both are plain state owned by the composition root and
//! fed through [`ledgerun_core::ProgressSource`].

mod bounded;
mod streaming;

pub use bounded::LevelProgression;
pub use streaming::DistanceDifficulty;

use ledgerun_core::{DifficultyProfile, Tier, TierConfig};

fn baseline_profile(tier: Tier, baseline: &TierConfig) -> DifficultyProfile {
    DifficultyProfile {
        tier,
        min_platform_length: baseline.min_platform_length,
        vertical_spacing_unit: baseline.vertical_spacing_unit,
        enemy_spawn_chance: baseline.enemy_spawn_chance,
        spike_spawn_chance: baseline.spike_spawn_chance,
        chunk_kind_weights: baseline.weights,
    }
}
