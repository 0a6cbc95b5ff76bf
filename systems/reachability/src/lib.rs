#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-form reachability checks backed by fitted jump arcs.
//!
//! Each [`JumpArchetype`] owns a [`FeasibilityCurve`] approximating the
//! highest vertical delta the player can cross over a horizontal distance.
//! The validator never simulates movement; it only evaluates the curve.

use ledgerun_core::{FeasibilityConfig, FeasibilityCurve, GapMeasure, JumpArchetype};

/// Pure predicate deciding whether a designed crossing can be jumped.
#[derive(Clone, Copy, Debug)]
pub struct ReachabilityValidator {
    curves: FeasibilityConfig,
}

impl ReachabilityValidator {
    /// Creates a validator from the configured curves.
    #[must_use]
    pub const fn new(curves: FeasibilityConfig) -> Self {
        Self { curves }
    }

    /// Curve fitted for the provided archetype.
    #[must_use]
    pub const fn curve(&self, archetype: JumpArchetype) -> FeasibilityCurve {
        match archetype {
            JumpArchetype::NoMomentum => self.curves.no_momentum,
            JumpArchetype::Momentum => self.curves.momentum,
            JumpArchetype::WallJump => self.curves.wall_jump,
        }
    }

    /// Reports whether `dy` is crossable over `dx` using `archetype`.
    #[must_use]
    pub fn feasible(&self, archetype: JumpArchetype, dx: f32, dy: f32) -> bool {
        dy <= self.curve(archetype).reachable_height(dx)
    }

    /// Wall-aware variant of [`ReachabilityValidator::feasible`].
    ///
    /// For wall archetypes taking off left of the wall (`offset_x < wall_x`),
    /// `dx` is first adjusted by `2·(offset_x − wall_x)` to model the approach
    /// run. The adjustment is asymmetric: takeoffs at or right of the wall are
    /// evaluated unchanged.
    #[must_use]
    pub fn feasible_from_wall(
        &self,
        archetype: JumpArchetype,
        dx: f32,
        dy: f32,
        offset_x: f32,
        wall_x: f32,
    ) -> bool {
        let dx = if archetype.is_wall() && offset_x < wall_x {
            dx + 2.0 * (offset_x - wall_x)
        } else {
            dx
        };
        self.feasible(archetype, dx, dy)
    }

    /// Narrows `initial` by `step` until the crossing becomes feasible.
    ///
    /// The walk visits `initial, initial − step, …` and stops at `floor`. The
    /// floor is accepted even when it still fails, in which case the returned
    /// measure carries `feasible == false`.
    #[must_use]
    pub fn shrink_to_feasible(
        &self,
        archetype: JumpArchetype,
        initial: f32,
        dy: f32,
        step: f32,
        floor: f32,
    ) -> GapMeasure {
        let mut width = initial.max(floor);
        let mut feasible = self.feasible(archetype, width, dy);
        while !feasible && width > floor {
            width = (width - step).max(floor);
            feasible = self.feasible(archetype, width, dy);
        }

        GapMeasure {
            archetype,
            initial,
            width,
            dy,
            feasible,
        }
    }
}

impl Default for ReachabilityValidator {
    fn default() -> Self {
        Self::new(FeasibilityConfig::default())
    }
}
