//! Wall sections: entry platform, two walls and an exit platform.

use ledgerun_core::{
    ChunkDescriptor, ChunkKind, Cursor, DifficultyProfile, GapMeasure, JumpArchetype,
    SpawnRequest, WorldPoint,
};
use rand::Rng;

use crate::{builder::ChunkBuilder, ChunkSynthesizer};

impl ChunkSynthesizer {
    /// Builds a [`ChunkKind::WallJumpSection`] or [`ChunkKind::WallDownJumpSection`].
    ///
    /// Wall geometry is fixed by configuration. The crossing from the entry
    /// platform to the exit is still recorded and checked with the wall
    /// correction, measured from the entry edge against the first wall.
    pub(crate) fn wall_section<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        kind: ChunkKind,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let walls = self.walls;
        let mut builder = ChunkBuilder::new(kind, cursor);
        let entry = builder.lay_platform(
            cursor.x(),
            cursor.y(),
            profile.min_platform_length.max(1),
        );
        let entry_end = entry.end_x();

        let first_wall = entry_end + walls.first_offset;
        let second_wall = first_wall + walls.spacing;
        for wall_x in [first_wall, second_wall] {
            builder.spawn(SpawnRequest::Wall {
                position: WorldPoint::new(wall_x, cursor.y() + 1.0),
                height: walls.height,
            });
        }

        let exit_x = second_wall + walls.exit_offset;
        let exit_y = if kind == ChunkKind::WallDownJumpSection {
            let drop = self.gaps.descent_min_steps as f32 * profile.vertical_spacing_unit;
            self.clamp_y(cursor.y() - (drop + walls.height))
        } else {
            self.clamp_y(cursor.y() + walls.height)
        };

        let dx = exit_x - entry_end;
        let dy = exit_y - cursor.y();
        builder.record_gap(GapMeasure {
            archetype: JumpArchetype::WallJump,
            initial: dx,
            width: dx,
            dy,
            feasible: self.validator.feasible_from_wall(
                JumpArchetype::WallJump,
                dx,
                dy,
                entry_end,
                first_wall,
            ),
        });

        let length = self.platform_length(profile, rng);
        let exit = builder.lay_platform(exit_x, exit_y, length);
        self.roll_spawns(&mut builder, exit, profile, rng);
        builder.finish()
    }
}
