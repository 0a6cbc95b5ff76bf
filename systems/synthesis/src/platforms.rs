//! Flat platforms laid directly at the cursor.

use ledgerun_core::{ChunkDescriptor, ChunkKind, Cursor, DifficultyProfile, SpawnRequest};
use rand::Rng;

use crate::{builder::ChunkBuilder, ChunkSynthesizer};

impl ChunkSynthesizer {
    /// Initial, safe and end platforms. The end platform carries the goal.
    pub(crate) fn platform<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        kind: ChunkKind,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let mut builder = ChunkBuilder::new(kind, cursor);
        let length = self.platform_length(profile, rng);
        let span = builder.lay_platform(cursor.x(), cursor.y(), length);

        if kind == ChunkKind::EndPlatform {
            builder.spawn(SpawnRequest::Goal {
                position: span.top_center(),
            });
        }

        builder.finish()
    }
}
