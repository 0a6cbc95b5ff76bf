use std::cell::Cell;

use ledgerun_core::{GeneratorConfig, ProgressSource, SavedProgress, Tier};
use ledgerun_system_difficulty::{DistanceDifficulty, LevelProgression};

#[derive(Default)]
struct ScriptedProgress {
    completions: Cell<u32>,
    distance: Cell<f32>,
}

impl ProgressSource for ScriptedProgress {
    fn completions(&self) -> u32 {
        self.completions.get()
    }

    fn distance(&self) -> f32 {
        self.distance.get()
    }
}

#[test]
fn completions_grow_levels_then_upgrade_tier() {
    let config = GeneratorConfig::default();
    let mut progression = LevelProgression::new(&config);
    assert_eq!(progression.tier(), Tier::Easy);
    assert_eq!(progression.chunk_count(), config.tiers.easy.chunk_count);

    progression.record_completion();
    assert_eq!(progression.chunk_count(), config.tiers.easy.chunk_count);
    progression.record_completion();
    assert_eq!(progression.chunk_count(), config.tiers.easy.chunk_count + 1);

    for _ in 2..config.progression.completions_per_tier {
        progression.record_completion();
    }
    assert_eq!(progression.tier(), Tier::Medium);
    assert_eq!(progression.completions(), 0);
    assert_eq!(progression.chunk_count(), config.tiers.medium.chunk_count);
    assert_eq!(
        progression.profile().enemy_spawn_chance,
        config.tiers.medium.enemy_spawn_chance
    );
}

#[test]
fn tier_profiles_select_their_weight_tables() {
    let config = GeneratorConfig::default();
    let mut progression = LevelProgression::new(&config);

    let easy = progression.profile();
    assert_eq!(easy.chunk_kind_weights.wall_jump_section, 0);

    for _ in 0..2 * config.progression.completions_per_tier {
        progression.record_completion();
    }
    let hard = progression.profile();
    assert_eq!(hard.tier, Tier::Hard);
    assert_eq!(hard.chunk_kind_weights.gap, 0);
    assert!(hard.min_platform_length < easy.min_platform_length);
    assert!(hard.vertical_spacing_unit > easy.vertical_spacing_unit);
}

#[test]
fn update_consumes_only_new_completions() {
    let config = GeneratorConfig::default();
    let mut progression = LevelProgression::new(&config);
    let source = ScriptedProgress::default();

    source.completions.set(2);
    progression.update(&source);
    assert_eq!(progression.completions(), 2);

    progression.update(&source);
    assert_eq!(progression.completions(), 2, "repeated totals are not recounted");

    source.completions.set(3);
    progression.update(&source);
    assert_eq!(progression.completions(), 3);
}

#[test]
fn bounded_progress_survives_store_and_restore() {
    let config = GeneratorConfig::default();
    let mut progression = LevelProgression::new(&config);
    for _ in 0..7 {
        progression.record_completion();
    }

    let mut saved = SavedProgress::default();
    progression.store(&mut saved);
    assert_eq!(saved.tier, Tier::Medium);

    let mut restored = LevelProgression::new(&config);
    restored.restore(&saved);
    assert_eq!(restored.tier(), progression.tier());
    assert_eq!(restored.completions(), progression.completions());
    assert_eq!(restored.chunk_count(), progression.chunk_count());
}

#[test]
fn distance_ramps_chances_in_whole_steps() {
    let config = GeneratorConfig::default();
    let base = config.tiers.get(config.streaming.tier);
    let mut difficulty = DistanceDifficulty::new(&config);

    difficulty.observe_distance(config.streaming.distance_step * 0.5);
    assert_eq!(difficulty.enemy_spawn_chance(), base.enemy_spawn_chance);

    difficulty.observe_distance(config.streaming.distance_step * 3.0);
    assert_eq!(difficulty.steps_reached(), 3);
    let expected = base.enemy_spawn_chance + 3.0 * config.streaming.enemy_step;
    assert!((difficulty.enemy_spawn_chance() - expected).abs() < 1e-5);
}

#[test]
fn distance_chances_never_decrease_and_saturate() {
    let config = GeneratorConfig::default();
    let mut difficulty = DistanceDifficulty::new(&config);
    let source = ScriptedProgress::default();

    let mut last_enemy = difficulty.enemy_spawn_chance();
    let mut last_spike = difficulty.spike_spawn_chance();
    for distance in [150.0, 90.0, 900.0, 20.0, 5_000.0, 100_000.0, 10.0] {
        source.distance.set(distance);
        difficulty.update(&source);

        let enemy = difficulty.enemy_spawn_chance();
        let spike = difficulty.spike_spawn_chance();
        assert!(enemy >= last_enemy && spike >= last_spike);
        assert!(enemy <= config.streaming.enemy_cap);
        assert!(spike <= config.streaming.spike_cap);
        last_enemy = enemy;
        last_spike = spike;
    }

    assert_eq!(difficulty.best_distance(), 100_000.0);
    assert_eq!(difficulty.enemy_spawn_chance(), config.streaming.enemy_cap);
    assert_eq!(difficulty.spike_spawn_chance(), config.streaming.spike_cap);
}

#[test]
fn streaming_profile_uses_streaming_weights() {
    let config = GeneratorConfig::default();
    let profile = DistanceDifficulty::new(&config).profile();
    assert_eq!(profile.tier, config.streaming.tier);
    assert_eq!(profile.chunk_kind_weights, config.streaming.weights);
}

#[test]
fn restored_high_score_leaves_new_run_at_baseline() {
    let config = GeneratorConfig::default();
    let fresh = DistanceDifficulty::new(&config);

    let mut saved = SavedProgress::default();
    let mut veteran = DistanceDifficulty::new(&config);
    veteran.observe_distance(10_000.0);
    veteran.store(&mut saved);
    assert_eq!(saved.best_distance, 10_000.0);

    let mut restored = DistanceDifficulty::new(&config);
    restored.restore(&saved);
    restored.observe_distance(0.0);

    assert_eq!(restored.best_distance(), 10_000.0);
    assert_eq!(restored.steps_reached(), 0);
    assert_eq!(restored.enemy_spawn_chance(), fresh.enemy_spawn_chance());
    assert_eq!(restored.spike_spawn_chance(), fresh.spike_spawn_chance());
    assert_eq!(restored.profile(), fresh.profile());
}

#[test]
fn high_score_only_grows_when_a_run_beats_it() {
    let config = GeneratorConfig::default();
    let mut difficulty = DistanceDifficulty::new(&config);
    difficulty.restore(&SavedProgress {
        best_distance: 300.0,
        ..SavedProgress::default()
    });

    difficulty.observe_distance(120.0);
    assert_eq!(difficulty.best_distance(), 300.0);
    assert_eq!(difficulty.run_distance(), 120.0);

    difficulty.observe_distance(450.0);
    assert_eq!(difficulty.best_distance(), 450.0);
}

#[test]
fn reset_run_drops_chances_back_to_baseline() {
    let config = GeneratorConfig::default();
    let fresh = DistanceDifficulty::new(&config);
    let mut difficulty = DistanceDifficulty::new(&config);

    difficulty.observe_distance(config.streaming.distance_step * 4.0);
    assert!(difficulty.enemy_spawn_chance() > fresh.enemy_spawn_chance());

    difficulty.reset_run();
    assert_eq!(difficulty.run_distance(), 0.0);
    assert_eq!(difficulty.best_distance(), config.streaming.distance_step * 4.0);
    assert_eq!(difficulty.profile(), fresh.profile());
}
