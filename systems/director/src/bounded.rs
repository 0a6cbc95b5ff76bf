use ledgerun_core::{ChunkKind, DifficultyProfile, EntitySpawner, TerrainWriter};
use rand::{Rng, SeedableRng};

use crate::{commit::Committed, select, DirectorError, GenerationPhase, LevelDirector, LevelSummary};

impl<R: Rng + SeedableRng> LevelDirector<R> {
    /// Generates a complete level of `chunk_count` safe/danger pairs.
    ///
    /// Everything generated before is destroyed first. The level opens with
    /// the initial platform, closes with the end platform carrying the goal,
    /// and gets a single kill floor spanning its full width.
    pub fn generate(
        &mut self,
        chunk_count: u32,
        profile: &DifficultyProfile,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) -> Result<LevelSummary, DirectorError> {
        self.clear(terrain, spawner);
        self.phase = GenerationPhase::Generating;
        let result = self.generate_level(chunk_count, profile, terrain, spawner);
        self.phase = GenerationPhase::Idle;
        result
    }

    fn generate_level(
        &mut self,
        chunk_count: u32,
        profile: &DifficultyProfile,
        terrain: &mut impl TerrainWriter,
        spawner: &mut impl EntitySpawner,
    ) -> Result<LevelSummary, DirectorError> {
        let mut committed: Vec<Committed> = Vec::with_capacity(2 * chunk_count as usize + 2);
        committed.push(self.commit_kind(ChunkKind::InitialPlatform, profile, terrain, spawner)?);

        for _ in 0..chunk_count {
            committed.push(self.commit_kind(ChunkKind::SafePlatform, profile, terrain, spawner)?);
            let kind = select::danger_kind(
                self.cursor,
                &self.config.bounds,
                &profile.chunk_kind_weights,
                &mut self.rng,
            )?;
            committed.push(self.commit_kind(kind, profile, terrain, spawner)?);
        }

        committed.push(self.commit_kind(ChunkKind::EndPlatform, profile, terrain, spawner)?);
        self.respawn_hazard_floor(spawner);

        let summary = LevelSummary {
            kinds: committed.iter().map(|chunk| chunk.kind).collect(),
            start_x: self.registry.first_start_x().unwrap_or(self.cursor.x()),
            end_x: self.registry.frontier_x().unwrap_or(self.cursor.x()),
            lowest_y: self.registry.lowest_floor_y().unwrap_or(self.cursor.y()),
            entities: committed.iter().map(|chunk| chunk.entities).sum(),
            infeasible_crossings: committed.iter().map(|chunk| chunk.infeasible).sum(),
        };
        log::info!(
            "generated {:?} level of {} chunks spanning [{:.1}, {:.1}]",
            profile.tier,
            summary.kinds.len(),
            summary.start_x,
            summary.end_x
        );
        Ok(summary)
    }
}
