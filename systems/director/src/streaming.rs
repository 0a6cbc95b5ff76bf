use ledgerun_core::{ChunkKind, DifficultyProfile, EntitySpawner, TerrainWriter};
use rand::{Rng, SeedableRng};

use crate::{
    commit::{dispose, Committed},
    select, AdvanceReport, DirectorError, GenerationPhase, LevelDirector, LifeState,
};

impl<R: Rng + SeedableRng> LevelDirector<R> {
    /// Keeps terrain generated ahead of `player_x` and evicts it behind.
    ///
    /// Chunks are committed until the frontier lies at least the lookahead
    /// distance ahead of the player; chunks ending further than the cleanup
    /// distance behind are erased and despawned. The kill floor is rebuilt
    /// whenever the live span changed. Does nothing once the player is dead.
    pub fn advance(
        &mut self,
        player_x: f32,
        profile: &DifficultyProfile,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) -> Result<AdvanceReport, DirectorError> {
        if self.life == LifeState::Dead {
            return Ok(AdvanceReport {
                frontier_x: self.registry.frontier_x(),
                ..AdvanceReport::default()
            });
        }

        self.phase = GenerationPhase::Generating;
        let result = self.stream(player_x, profile, terrain, spawner);
        self.phase = GenerationPhase::Idle;
        result
    }

    /// Freezes streaming until the next [`LevelDirector::restart`].
    pub fn mark_player_dead(&mut self) {
        if self.life == LifeState::Alive {
            log::info!("player died at frontier {:?}", self.registry.frontier_x());
        }
        self.life = LifeState::Dead;
    }

    /// Destroys the run, reseeds the RNG and brings the player back to life.
    pub fn restart(
        &mut self,
        seed: u64,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) {
        self.clear(terrain, spawner);
        self.reseed(seed);
        self.life = LifeState::Alive;
        self.phase = GenerationPhase::Idle;
        log::info!("streaming run restarted with seed {seed}");
    }

    fn stream(
        &mut self,
        player_x: f32,
        profile: &DifficultyProfile,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) -> Result<AdvanceReport, DirectorError> {
        let mut report = AdvanceReport::default();

        if self.registry.is_empty() {
            let committed =
                self.commit_kind(ChunkKind::InitialPlatform, profile, terrain, spawner)?;
            record(&mut report, committed);
        }

        let target = player_x + self.config.streaming.lookahead;
        while self.registry.frontier_x().unwrap_or(self.cursor.x()) < target {
            let kind = select::danger_kind(
                self.cursor,
                &self.config.bounds,
                &profile.chunk_kind_weights,
                &mut self.rng,
            )?;
            let committed = self.commit_kind(kind, profile, terrain, spawner)?;
            record(&mut report, committed);
        }

        let evicted = self
            .registry
            .evict_behind(player_x - self.config.streaming.cleanup_distance);
        report.evicted = evicted.len();
        for chunk in &evicted {
            report.despawned += dispose(chunk, terrain, spawner);
        }

        if report.changed() {
            self.respawn_hazard_floor(spawner);
        }
        report.frontier_x = self.registry.frontier_x();
        Ok(report)
    }
}

fn record(report: &mut AdvanceReport, committed: Committed) {
    report.generated.push(committed.kind);
    report.infeasible_crossings += committed.infeasible;
}
