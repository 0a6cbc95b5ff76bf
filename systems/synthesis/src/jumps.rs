//! Chunks separated from the cursor by a validated crossing.

use ledgerun_core::{
    ChunkDescriptor, ChunkKind, Cursor, DifficultyProfile, GapMeasure, JumpArchetype,
};
use rand::Rng;

use crate::{builder::ChunkBuilder, ChunkSynthesizer};

impl ChunkSynthesizer {
    /// Level gap crossed with a standing jump.
    pub(crate) fn gap<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let mut builder = ChunkBuilder::new(ChunkKind::Gap, cursor);
        let initial = rng.gen_range(self.gaps.gap_min..self.gaps.gap_max);
        let width = self.crossing(
            &mut builder,
            JumpArchetype::NoMomentum,
            cursor.x(),
            initial,
            0.0,
        );

        let length = self.platform_length(profile, rng);
        let span = builder.lay_platform(cursor.x() + width, cursor.y(), length);
        self.roll_spawns(&mut builder, span, profile, rng);
        builder.finish()
    }

    /// Running jump with a quantized rise or drop.
    pub(crate) fn jump<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let mut builder = ChunkBuilder::new(ChunkKind::Jump, cursor);
        let steps = rng.gen_range(1..=self.gaps.max_rise_steps.max(1));
        let up = rng.gen_bool(0.5);
        let target = self.step_target(
            cursor.y(),
            profile.vertical_spacing_unit * steps as f32,
            up,
        );

        let initial = rng.gen_range(self.gaps.jump_gap_min..self.gaps.jump_gap_max);
        let width = self.crossing(
            &mut builder,
            JumpArchetype::Momentum,
            cursor.x(),
            initial,
            target - cursor.y(),
        );

        let length = self.platform_length(profile, rng);
        let span = builder.lay_platform(cursor.x() + width, target, length);
        self.roll_spawns(&mut builder, span, profile, rng);
        builder.finish()
    }

    /// Running jump forced into a large drop to move away from the ceiling.
    pub(crate) fn down_jump<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let mut builder = ChunkBuilder::new(ChunkKind::DownJumpSection, cursor);
        let steps = rng.gen_range(self.gaps.descent_min_steps..=self.gaps.descent_max_steps);
        let target = self.clamp_y(cursor.y() - profile.vertical_spacing_unit * steps as f32);

        let initial = rng.gen_range(self.gaps.jump_gap_min..self.gaps.jump_gap_max);
        let width = self.crossing(
            &mut builder,
            JumpArchetype::Momentum,
            cursor.x(),
            initial,
            target - cursor.y(),
        );

        let length = self.platform_length(profile, rng);
        let span = builder.lay_platform(cursor.x() + width, target, length);
        self.roll_spawns(&mut builder, span, profile, rng);
        builder.finish()
    }

    /// Two or three short hops whose vertical steps alternate direction.
    pub(crate) fn short_jump_series<R: Rng + ?Sized>(
        &self,
        cursor: Cursor,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> ChunkDescriptor {
        let mut builder = ChunkBuilder::new(ChunkKind::ShortJumpSeries, cursor);
        let hops = rng.gen_range(self.gaps.series_min_steps..=self.gaps.series_max_steps);
        let mut up = rng.gen_bool(0.5);
        let mut x = cursor.x();
        let mut y = cursor.y();

        for _ in 0..hops {
            let target = self.step_target(y, profile.vertical_spacing_unit, up);
            let width = self.crossing(
                &mut builder,
                JumpArchetype::NoMomentum,
                x,
                self.gaps.series_gap,
                target - y,
            );

            let length = rng
                .gen_range(self.platforms.series_length_min..=self.platforms.series_length_max);
            let span = builder.lay_platform(x + width, target, length);
            self.roll_spawns(&mut builder, span, profile, rng);

            x = span.end_x();
            y = target;
            up = !up;
        }

        builder.finish()
    }

    /// Validates a crossing from `origin_x`, shrinking it when needed, and
    /// returns the committed width.
    ///
    /// The landing platform starts on a whole cell, so the shrunk width is
    /// snapped onto the grid and checked again. The cell below is preferred;
    /// the next cell is taken when only that one is reachable.
    fn crossing(
        &self,
        builder: &mut ChunkBuilder,
        archetype: JumpArchetype,
        origin_x: f32,
        initial: f32,
        dy: f32,
    ) -> f32 {
        let shrunk = self.validator.shrink_to_feasible(
            archetype,
            initial,
            dy,
            self.gaps.shrink_step,
            self.gaps.floor,
        );

        let below = (origin_x + shrunk.width).floor() - origin_x;
        let measure = if below == shrunk.width {
            shrunk
        } else {
            let fits = |width: f32| self.validator.feasible(archetype, width, dy);
            let width = if below > 0.0 && (fits(below) || !fits(below + 1.0)) {
                below
            } else {
                below + 1.0
            };
            GapMeasure {
                width,
                feasible: fits(width),
                ..shrunk
            }
        };

        builder.record_gap(measure);
        measure.width
    }

    /// Moves `y` by `magnitude` in the requested direction, flipping the
    /// direction when it would leave the bounds.
    fn step_target(&self, y: f32, magnitude: f32, up: bool) -> f32 {
        let signed = if up { magnitude } else { -magnitude };
        let candidate = y + signed;
        if candidate > self.bounds.max_y || candidate < self.bounds.min_y {
            self.clamp_y(y - signed)
        } else {
            candidate
        }
    }
}
