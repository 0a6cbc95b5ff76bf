use ledgerun_core::{
    DifficultyProfile, GeneratorConfig, ProgressSource, ProgressionConfig, SavedProgress, Tier,
    TierTable,
};

use crate::baseline_profile;

/// Completion-driven difficulty of bounded levels.
///
/// Every `completions_per_extra_chunk` completions grow the level by one
/// danger pair; every `completions_per_tier` completions upgrade the tier,
/// which resets the counter and reinstalls the new tier's baselines.
#[derive(Clone, Debug)]
pub struct LevelProgression {
    tiers: TierTable,
    rules: ProgressionConfig,
    tier: Tier,
    completions: u32,
    chunk_count: u32,
    observed: u32,
}

impl LevelProgression {
    /// Creates a progression starting at the easy tier.
    #[must_use]
    pub fn new(config: &GeneratorConfig) -> Self {
        let mut progression = Self {
            tiers: config.tiers,
            rules: config.progression,
            tier: Tier::Easy,
            completions: 0,
            chunk_count: 0,
            observed: 0,
        };
        progression.chunk_count = progression.baseline_chunk_count();
        progression
    }

    /// Tier currently in effect.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Completions recorded since the last tier change.
    #[must_use]
    pub const fn completions(&self) -> u32 {
        self.completions
    }

    /// Danger pairs the next level should contain.
    #[must_use]
    pub const fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    /// Profile handed to the director for the next level.
    #[must_use]
    pub fn profile(&self) -> DifficultyProfile {
        baseline_profile(self.tier, self.tiers.get(self.tier))
    }

    /// Records one completed level.
    pub fn record_completion(&mut self) {
        self.completions += 1;

        if self.completions % self.rules.completions_per_extra_chunk.max(1) == 0 {
            self.chunk_count = (self.chunk_count + 1).min(self.rules.max_chunks_per_level);
        }

        if self.completions >= self.rules.completions_per_tier {
            if let Some(next) = self.tier.next() {
                self.tier = next;
                self.completions = 0;
                self.chunk_count = self.baseline_chunk_count();
                log::info!(
                    "difficulty upgraded to {:?} with {} chunks per level",
                    next,
                    self.chunk_count
                );
            }
        }
    }

    /// Consumes every completion reported by `source` since the last call.
    ///
    /// A source whose total went backwards is treated as reset.
    pub fn update(&mut self, source: &impl ProgressSource) {
        let total = source.completions();
        for _ in 0..total.saturating_sub(self.observed) {
            self.record_completion();
        }
        self.observed = total;
    }

    /// Writes the bounded-mode fields of `progress`.
    pub fn store(&self, progress: &mut SavedProgress) {
        progress.tier = self.tier;
        progress.completions = self.completions;
        progress.chunk_count = self.chunk_count;
    }

    /// Restores the state saved by [`LevelProgression::store`].
    ///
    /// A missing chunk count falls back to the tier baseline.
    pub fn restore(&mut self, progress: &SavedProgress) {
        self.tier = progress.tier;
        self.completions = progress.completions;
        self.chunk_count = if progress.chunk_count == 0 {
            self.baseline_chunk_count()
        } else {
            progress.chunk_count.min(self.rules.max_chunks_per_level)
        };
    }

    fn baseline_chunk_count(&self) -> u32 {
        self.tiers
            .get(self.tier)
            .chunk_count
            .min(self.rules.max_chunks_per_level)
    }
}
