use ledgerun_core::{
    ChunkDescriptor, ChunkKind, Cursor, DifficultyProfile, FeasibilityCurve, GeneratorConfig,
    JumpArchetype, SpawnRequest, Tier,
};
use ledgerun_system_synthesis::ChunkSynthesizer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DANGER_KINDS: [ChunkKind; 6] = [
    ChunkKind::Gap,
    ChunkKind::Jump,
    ChunkKind::ShortJumpSeries,
    ChunkKind::WallJumpSection,
    ChunkKind::DownJumpSection,
    ChunkKind::WallDownJumpSection,
];

fn profile(config: &GeneratorConfig, tier: Tier) -> DifficultyProfile {
    let baseline = config.tiers.get(tier);
    DifficultyProfile {
        tier,
        min_platform_length: baseline.min_platform_length,
        vertical_spacing_unit: baseline.vertical_spacing_unit,
        enemy_spawn_chance: baseline.enemy_spawn_chance,
        spike_spawn_chance: baseline.spike_spawn_chance,
        chunk_kind_weights: baseline.weights,
    }
}

fn sample(
    config: &GeneratorConfig,
    kind: ChunkKind,
    tier: Tier,
    cursor: Cursor,
    seed: u64,
) -> ChunkDescriptor {
    let synthesizer = ChunkSynthesizer::new(config);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    synthesizer.synthesize(cursor, kind, &profile(config, tier), &mut rng)
}

#[test]
fn crossings_land_on_whole_cells() {
    let config = GeneratorConfig::default();
    let validator = *ChunkSynthesizer::new(&config).validator();
    let floor = config.gaps.floor;

    for seed in 0..200 {
        for kind in [ChunkKind::Gap, ChunkKind::Jump, ChunkKind::ShortJumpSeries] {
            let descriptor = sample(&config, kind, Tier::Hard, Cursor::new(0.0, 0.0), seed);
            assert!(!descriptor.gaps.is_empty(), "{kind:?} recorded no crossing");

            for gap in &descriptor.gaps {
                assert_eq!(gap.width.fract(), 0.0, "width {} is off the grid", gap.width);
                assert!(gap.width >= floor);
                assert!(gap.width <= gap.initial.max(floor).ceil());
                assert_eq!(
                    gap.feasible,
                    validator.feasible(gap.archetype, gap.width, gap.dy)
                );
                assert!(gap.feasible || gap.width <= floor.ceil());
            }

            let first = descriptor.tiles[0].pos.x() as f32;
            assert_eq!(first, descriptor.gaps[0].width, "{kind:?} landed off its measure");
        }
    }
}

#[test]
fn snapped_landing_stays_inside_the_reachable_band() {
    let mut config = GeneratorConfig::default();
    // Reach is 5 at dx 1 and 6 at dx 1.5 and 2, so a 5.5 rise needs dx >= 1.5.
    config.feasibility.no_momentum = FeasibilityCurve::new(-2.0, 7.0);
    config.gaps.series_gap = 1.5;
    let synthesizer = ChunkSynthesizer::new(&config);
    let mut profile = profile(&config, Tier::Easy);
    profile.vertical_spacing_unit = 5.5;

    let mut climbs = 0;
    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let descriptor = synthesizer.synthesize(
            Cursor::new(0.0, 0.0),
            ChunkKind::ShortJumpSeries,
            &profile,
            &mut rng,
        );

        for gap in descriptor.gaps.iter().filter(|gap| gap.dy > 0.0) {
            climbs += 1;
            assert_eq!(gap.width, 2.0);
            assert!(gap.feasible);
        }
        if descriptor.gaps[0].dy > 0.0 {
            assert_eq!(descriptor.tiles[0].pos.x(), 2);
        }
    }
    assert!(climbs > 0);
}

#[test]
fn crossing_archetypes_match_chunk_kind() {
    let config = GeneratorConfig::default();
    let cursor = Cursor::new(0.0, 0.0);

    let gap = sample(&config, ChunkKind::Gap, Tier::Easy, cursor, 3);
    assert!(gap
        .gaps
        .iter()
        .all(|measure| measure.archetype == JumpArchetype::NoMomentum && measure.dy == 0.0));

    let jump = sample(&config, ChunkKind::Jump, Tier::Easy, cursor, 3);
    assert!(jump
        .gaps
        .iter()
        .all(|measure| measure.archetype == JumpArchetype::Momentum));

    let series = sample(&config, ChunkKind::ShortJumpSeries, Tier::Easy, cursor, 3);
    let hops = series.gaps.len() as u32;
    assert!((config.gaps.series_min_steps..=config.gaps.series_max_steps).contains(&hops));
    assert!(series
        .gaps
        .iter()
        .all(|measure| measure.archetype == JumpArchetype::NoMomentum));
}

#[test]
fn generated_heights_stay_within_bounds() {
    let config = GeneratorConfig::default();
    let bounds = config.bounds;
    let cursors = [
        Cursor::new(0.0, bounds.max_y),
        Cursor::new(0.0, bounds.min_y),
        Cursor::new(0.0, 0.0),
    ];

    for seed in 0..50 {
        for kind in DANGER_KINDS {
            for cursor in cursors {
                let descriptor = sample(&config, kind, Tier::Hard, cursor, seed);
                for tile in &descriptor.tiles {
                    let y = tile.pos.y() as f32;
                    assert!(
                        (bounds.min_y..=bounds.max_y).contains(&y),
                        "{kind:?} laid a tile at y {y}"
                    );
                }
                assert!((bounds.min_y..=bounds.max_y).contains(&descriptor.exit.y()));
            }
        }
    }
}

#[test]
fn jump_deltas_are_quantized_by_spacing_unit() {
    let config = GeneratorConfig::default();
    let unit = config.tiers.hard.vertical_spacing_unit;

    for seed in 0..100 {
        let descriptor = sample(&config, ChunkKind::Jump, Tier::Hard, Cursor::new(0.0, 0.0), seed);
        let dy = descriptor.gaps[0].dy;
        assert!(dy != 0.0);
        assert!(((dy / unit) - (dy / unit).round()).abs() < 1e-4);
        assert!(dy.abs() <= unit * config.gaps.max_rise_steps as f32);
    }
}

#[test]
fn tiles_lie_inside_the_chunk_span() {
    let config = GeneratorConfig::default();

    for seed in 0..50 {
        for kind in DANGER_KINDS {
            let descriptor = sample(&config, kind, Tier::Medium, Cursor::new(20.0, 2.0), seed);
            assert_eq!(descriptor.start_x, 20.0);
            assert!(descriptor.end_x > descriptor.start_x);
            assert_eq!(descriptor.exit.x(), descriptor.end_x);

            for cell in descriptor
                .tiles
                .iter()
                .map(|tile| tile.pos)
                .chain(descriptor.hazards.iter().copied())
            {
                assert!(cell.x() as f32 >= descriptor.start_x);
                assert!((cell.x() + 1) as f32 <= descriptor.end_x);
            }
        }
    }
}

#[test]
fn hazards_never_cover_the_landing_tile() {
    let mut config = GeneratorConfig::default();
    config.tiers.medium.spike_spawn_chance = 1.0;

    for seed in 0..50 {
        let descriptor = sample(&config, ChunkKind::Gap, Tier::Medium, Cursor::new(0.0, 0.0), seed);
        let landing = descriptor.tiles[0].pos;
        assert!(!descriptor.hazards.contains(&landing.above()));
        for hazard in &descriptor.hazards {
            assert!(descriptor
                .tiles
                .iter()
                .any(|tile| tile.pos.above() == *hazard));
        }
    }
}

#[test]
fn empty_enemy_pool_skips_enemy_spawns() {
    let mut config = GeneratorConfig::default();
    config.enemies.clear();
    config.tiers.hard.enemy_spawn_chance = 1.0;

    for seed in 0..20 {
        for kind in DANGER_KINDS {
            let descriptor = sample(&config, kind, Tier::Hard, Cursor::new(0.0, 0.0), seed);
            assert!(descriptor
                .spawns
                .iter()
                .all(|spawn| !matches!(spawn, SpawnRequest::Enemy { .. })));
        }
    }
}

#[test]
fn certain_enemy_chance_populates_every_platform() {
    let mut config = GeneratorConfig::default();
    config.tiers.hard.enemy_spawn_chance = 1.0;

    let descriptor = sample(&config, ChunkKind::Gap, Tier::Hard, Cursor::new(0.0, 0.0), 9);
    let enemies: Vec<_> = descriptor
        .spawns
        .iter()
        .filter_map(|spawn| match spawn {
            SpawnRequest::Enemy { kind, .. } => Some(kind.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(enemies.len(), 1);
    assert!(config.enemies.contains(&enemies[0]));
}

#[test]
fn end_platform_carries_the_goal() {
    let config = GeneratorConfig::default();
    let descriptor = sample(
        &config,
        ChunkKind::EndPlatform,
        Tier::Easy,
        Cursor::new(40.0, 3.0),
        1,
    );

    let goals: Vec<_> = descriptor
        .spawns
        .iter()
        .filter(|spawn| matches!(spawn, SpawnRequest::Goal { .. }))
        .collect();
    assert_eq!(goals.len(), 1);
    assert!(descriptor.gaps.is_empty());
    assert!(descriptor.hazards.is_empty());
    assert_eq!(descriptor.tiles[0].pos.x(), 40);
}

#[test]
fn safe_platforms_honour_the_minimum_length() {
    let config = GeneratorConfig::default();
    for seed in 0..30 {
        let descriptor = sample(
            &config,
            ChunkKind::SafePlatform,
            Tier::Easy,
            Cursor::new(0.0, 0.0),
            seed,
        );
        let length = descriptor.tiles.len() as u32;
        let min = config.tiers.easy.min_platform_length;
        assert!(length >= min && length < min + config.platforms.length_spread);
        assert!(descriptor.spawns.is_empty());
    }
}

#[test]
fn same_seed_synthesizes_identical_chunks() {
    let config = GeneratorConfig::default();
    for kind in DANGER_KINDS {
        let first = sample(&config, kind, Tier::Medium, Cursor::new(0.0, 0.0), 0xfeed);
        let second = sample(&config, kind, Tier::Medium, Cursor::new(0.0, 0.0), 0xfeed);
        assert_eq!(first, second, "{kind:?} diverged");
    }
}

#[test]
fn wall_section_places_two_walls_and_raised_exit() {
    let config = GeneratorConfig::default();
    let walls = config.walls;
    let descriptor = sample(
        &config,
        ChunkKind::WallJumpSection,
        Tier::Medium,
        Cursor::new(10.0, 0.0),
        5,
    );

    let entry_end = 10.0 + config.tiers.medium.min_platform_length as f32;
    let wall_xs: Vec<f32> = descriptor
        .spawns
        .iter()
        .filter_map(|spawn| match spawn {
            SpawnRequest::Wall { position, height } => {
                assert_eq!(*height, walls.height);
                Some(position.x())
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        wall_xs,
        vec![
            entry_end + walls.first_offset,
            entry_end + walls.first_offset + walls.spacing
        ]
    );

    assert_eq!(descriptor.exit.y(), walls.height);
    let measure = descriptor.gaps[0];
    assert_eq!(measure.archetype, JumpArchetype::WallJump);
    assert_eq!(measure.dy, walls.height);
    assert!(measure.feasible);
}

#[test]
fn wall_down_section_drops_below_entry() {
    let config = GeneratorConfig::default();
    let descriptor = sample(
        &config,
        ChunkKind::WallDownJumpSection,
        Tier::Easy,
        Cursor::new(0.0, 10.0),
        5,
    );

    let expected_drop = config.gaps.descent_min_steps as f32 + config.walls.height;
    assert_eq!(descriptor.exit.y(), 10.0 - expected_drop);
    assert_eq!(descriptor.floor_y, 10.0 - expected_drop);
    assert!(descriptor.gaps[0].feasible);
}

#[test]
fn down_jump_descends_by_at_least_the_minimum_steps() {
    let config = GeneratorConfig::default();
    for seed in 0..30 {
        let descriptor = sample(
            &config,
            ChunkKind::DownJumpSection,
            Tier::Easy,
            Cursor::new(0.0, 8.0),
            seed,
        );
        let drop = 8.0 - descriptor.exit.y();
        assert!(drop >= config.gaps.descent_min_steps as f32);
        assert!(drop <= config.gaps.descent_max_steps as f32);
    }
}
