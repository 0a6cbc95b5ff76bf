use ledgerun_core::{
    DifficultyProfile, GeneratorConfig, ProgressSource, SavedProgress, StreamingConfig, TierConfig,
};

use crate::baseline_profile;

/// Distance-driven difficulty of streaming runs.
///
/// Spawn chances follow the distance covered by the current run only. The
/// best distance across runs is a high score kept for [`SavedProgress`] and
/// never feeds the ramp.
#[derive(Clone, Debug)]
pub struct DistanceDifficulty {
    baseline: TierConfig,
    ramp: StreamingConfig,
    run_distance: f32,
    best_distance: f32,
}

impl DistanceDifficulty {
    /// Creates a controller with no distance travelled.
    #[must_use]
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            baseline: *config.tiers.get(config.streaming.tier),
            ramp: config.streaming,
            run_distance: 0.0,
            best_distance: 0.0,
        }
    }

    /// Furthest distance reached by the current run.
    #[must_use]
    pub const fn run_distance(&self) -> f32 {
        self.run_distance
    }

    /// Furthest distance reached by any run, restored ones included.
    #[must_use]
    pub const fn best_distance(&self) -> f32 {
        self.best_distance
    }

    /// Number of whole distance steps reached by the current run.
    #[must_use]
    pub fn steps_reached(&self) -> u32 {
        (self.run_distance / self.ramp.distance_step).floor() as u32
    }

    /// Advances the current run to `distance` and raises the high score
    /// when it is beaten.
    pub fn observe_distance(&mut self, distance: f32) {
        self.run_distance = self.run_distance.max(distance);
        self.best_distance = self.best_distance.max(distance);
    }

    /// Starts a new run back at the baseline chances, keeping the high score.
    pub fn reset_run(&mut self) {
        self.run_distance = 0.0;
    }

    /// Observes the distance reported by `source`.
    pub fn update(&mut self, source: &impl ProgressSource) {
        self.observe_distance(source.distance());
    }

    /// Enemy probability at the current run distance.
    #[must_use]
    pub fn enemy_spawn_chance(&self) -> f32 {
        self.ramped(
            self.baseline.enemy_spawn_chance,
            self.ramp.enemy_step,
            self.ramp.enemy_cap,
        )
    }

    /// Hazard probability at the current run distance.
    #[must_use]
    pub fn spike_spawn_chance(&self) -> f32 {
        self.ramped(
            self.baseline.spike_spawn_chance,
            self.ramp.spike_step,
            self.ramp.spike_cap,
        )
    }

    /// Profile handed to the director for the next chunks.
    #[must_use]
    pub fn profile(&self) -> DifficultyProfile {
        DifficultyProfile {
            enemy_spawn_chance: self.enemy_spawn_chance(),
            spike_spawn_chance: self.spike_spawn_chance(),
            chunk_kind_weights: self.ramp.weights,
            ..baseline_profile(self.ramp.tier, &self.baseline)
        }
    }

    /// Writes the high score into `progress`.
    pub fn store(&self, progress: &mut SavedProgress) {
        progress.best_distance = self.best_distance;
    }

    /// Restores the high score saved by [`DistanceDifficulty::store`].
    ///
    /// The current run is left untouched.
    pub fn restore(&mut self, progress: &SavedProgress) {
        self.best_distance = progress.best_distance.max(0.0);
    }

    fn ramped(&self, base: f32, step: f32, cap: f32) -> f32 {
        (base + self.steps_reached() as f32 * step).min(cap)
    }
}
