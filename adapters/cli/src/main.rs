#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Ledgerun generator headlessly.

mod progress;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgerun_core::{ChunkKind, GeneratorConfig, ProgressStore, SavedProgress};
use ledgerun_system_difficulty::{DistanceDifficulty, LevelProgression};
use ledgerun_system_director::{LevelDirector, LevelSummary};
use ledgerun_tilemap::Tilemap;
use serde::Serialize;

use crate::progress::{JsonProgressStore, SessionProgress};

/// Command-line arguments accepted by the `ledgerun` binary.
#[derive(Debug, Parser)]
#[command(name = "ledgerun", about = "Constrained procedural level generator for 2D platformers")]
struct CliArgs {
    /// TOML file overriding the default generator configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed of the generation RNG.
    #[arg(long, global = true, default_value_t = 1)]
    seed: u64,

    /// JSON file holding progress across runs.
    #[arg(long, global = true)]
    progress: Option<PathBuf>,

    /// Prints summaries as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generates one bounded level ending in a goal.
    Level {
        /// Safe/danger pairs to generate; defaults to the saved progression.
        #[arg(long)]
        chunks: Option<u32>,

        /// Records the generated level as completed.
        #[arg(long)]
        complete: bool,

        /// Dumps the generated terrain as text.
        #[arg(long)]
        render: bool,
    },
    /// Streams terrain ahead of a player walking right.
    Stream {
        /// Distance the simulated player walks.
        #[arg(long, default_value_t = 500.0)]
        distance: f32,

        /// Distance covered between two updates.
        #[arg(long, default_value_t = 10.0)]
        step: f32,

        /// Position at which the player dies.
        #[arg(long)]
        die_at: Option<f32>,

        /// Dumps the live terrain as text once the walk ends.
        #[arg(long)]
        render: bool,
    },
    /// Prints the effective configuration as TOML.
    Config,
}

/// Aggregate outcome of a streaming walk.
#[derive(Debug, Default, Serialize)]
struct StreamSummary {
    seed: u64,
    updates: u32,
    generated: Vec<ChunkKind>,
    evicted: usize,
    despawned: usize,
    live_chunks: usize,
    frontier_x: Option<f32>,
    run_distance: f32,
    best_distance: f32,
    died_at: Option<f32>,
    infeasible_crossings: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Level {
            chunks,
            complete,
            render,
        } => run_level(&config, &args, chunks, complete, render),
        Command::Stream {
            distance,
            step,
            die_at,
            render,
        } => run_stream(&config, &args, distance, step, die_at, render),
        Command::Config => {
            let rendered = config
                .to_toml_string()
                .context("failed to render configuration")?;
            print!("{rendered}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read generator config {}", path.display()))?;
    GeneratorConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid generator config {}", path.display()))
}

fn load_progress(store: Option<&mut JsonProgressStore>) -> Result<SavedProgress> {
    let Some(store) = store else {
        return Ok(SavedProgress::default());
    };

    let saved = store
        .load()
        .with_context(|| format!("failed to load progress from {}", store.path().display()))?;
    Ok(saved.unwrap_or_default())
}

fn save_progress(store: Option<&mut JsonProgressStore>, progress: &SavedProgress) -> Result<()> {
    let Some(store) = store else {
        return Ok(());
    };

    store
        .save(progress)
        .with_context(|| format!("failed to save progress to {}", store.path().display()))?;
    log::info!("progress saved to {}", store.path().display());
    Ok(())
}

fn run_level(
    config: &GeneratorConfig,
    args: &CliArgs,
    chunks: Option<u32>,
    complete: bool,
    render: bool,
) -> Result<()> {
    let mut store = args.progress.as_ref().map(JsonProgressStore::new);
    let mut saved = load_progress(store.as_mut())?;

    let mut progression = LevelProgression::new(config);
    progression.restore(&saved);
    let profile = progression.profile();
    let chunk_count = chunks.unwrap_or_else(|| progression.chunk_count());

    let mut director: LevelDirector = LevelDirector::new(config, args.seed);
    let mut terrain = Tilemap::new();
    let mut spawner = Tilemap::with_prefabs(config.enemies.iter().cloned());
    let summary = director
        .generate(chunk_count, &profile, &mut terrain, &mut spawner)
        .context("level generation failed")?;
    log::debug!("level generated from seed {}", director.seed());

    print_level(&summary, args.json)?;
    if render {
        print!("{}", terrain.render_ascii());
    }

    if complete {
        let mut session = SessionProgress::default();
        session.complete_level();
        progression.update(&session);
        progression.store(&mut saved);
        save_progress(store.as_mut(), &saved)?;
    }
    Ok(())
}

fn print_level(summary: &LevelSummary, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("failed to encode level summary")?
        );
        return Ok(());
    }

    println!(
        "level of {} chunks over [{:.1}, {:.1}], lowest ground {:.1}",
        summary.kinds.len(),
        summary.start_x,
        summary.end_x,
        summary.lowest_y
    );
    println!("  kinds: {:?}", summary.kinds);
    println!("  entities: {}", summary.entities);
    if summary.infeasible_crossings > 0 {
        println!(
            "  crossings kept at floor width: {}",
            summary.infeasible_crossings
        );
    }
    Ok(())
}

fn run_stream(
    config: &GeneratorConfig,
    args: &CliArgs,
    distance: f32,
    step: f32,
    die_at: Option<f32>,
    render: bool,
) -> Result<()> {
    anyhow::ensure!(step > 0.0, "--step must be positive, got {step}");

    let mut store = args.progress.as_ref().map(JsonProgressStore::new);
    let mut saved = load_progress(store.as_mut())?;

    let mut difficulty = DistanceDifficulty::new(config);
    difficulty.restore(&saved);

    let mut director: LevelDirector = LevelDirector::new(config, args.seed);
    let mut terrain = Tilemap::new();
    let mut spawner = Tilemap::with_prefabs(config.enemies.iter().cloned());
    let mut session = SessionProgress::default();
    let mut summary = StreamSummary::default();

    let mut player_x = config.bounds.origin_x;
    let end_x = config.bounds.origin_x + distance;
    loop {
        if let Some(death_x) = die_at {
            if summary.died_at.is_none() && player_x >= death_x {
                director.mark_player_dead();
                summary.died_at = Some(player_x);
            }
        }

        session.travel_to(player_x - config.bounds.origin_x);
        difficulty.update(&session);
        let report = director
            .advance(player_x, &difficulty.profile(), &mut terrain, &mut spawner)
            .with_context(|| format!("streaming failed at x={player_x:.1}"))?;

        summary.updates += 1;
        summary.generated.extend(report.generated.iter().copied());
        summary.evicted += report.evicted;
        summary.despawned += report.despawned;
        summary.infeasible_crossings += report.infeasible_crossings;

        if summary.died_at.is_some() || player_x >= end_x {
            break;
        }
        player_x = (player_x + step).min(end_x);
    }

    summary.seed = director.seed();
    summary.live_chunks = director.registry().len();
    summary.frontier_x = director.registry().frontier_x();
    summary.run_distance = difficulty.run_distance();
    summary.best_distance = difficulty.best_distance();

    print_stream(&summary, args.json)?;
    if render {
        print!("{}", terrain.render_ascii());
    }

    difficulty.store(&mut saved);
    save_progress(store.as_mut(), &saved)
}

fn print_stream(summary: &StreamSummary, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("failed to encode stream summary")?
        );
        return Ok(());
    }

    println!(
        "seed {}: {} updates, {} chunks generated, {} evicted, {} live",
        summary.seed,
        summary.updates,
        summary.generated.len(),
        summary.evicted,
        summary.live_chunks
    );
    println!("  entities despawned: {}", summary.despawned);
    if let Some(frontier) = summary.frontier_x {
        println!("  frontier: {frontier:.1}");
    }
    println!(
        "  distance: {:.1} (best {:.1})",
        summary.run_distance, summary.best_distance
    );
    if let Some(death_x) = summary.died_at {
        println!("  player died at {death_x:.1}");
    }
    if summary.infeasible_crossings > 0 {
        println!(
            "  crossings kept at floor width: {}",
            summary.infeasible_crossings
        );
    }
    Ok(())
}
