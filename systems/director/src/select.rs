//! Weighted choice of the next danger kind.

use ledgerun_core::{BoundsConfig, ChunkKind, ChunkWeights, Cursor};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::DirectorError;

/// Picks the danger kind following `cursor`.
///
/// Near the ceiling a descent is forced; the wall variant is only eligible
/// when the table allows wall sections at all.
pub(crate) fn danger_kind<R: Rng + ?Sized>(
    cursor: Cursor,
    bounds: &BoundsConfig,
    weights: &ChunkWeights,
    rng: &mut R,
) -> Result<ChunkKind, DirectorError> {
    if cursor.y() >= bounds.max_y - bounds.descent_margin {
        let kind = if weights.weight(ChunkKind::WallJumpSection) > 0 && rng.gen_bool(0.5) {
            ChunkKind::WallDownJumpSection
        } else {
            ChunkKind::DownJumpSection
        };
        return Ok(kind);
    }

    let entries = weights.entries();
    let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))
        .map_err(|_| DirectorError::DegenerateWeights)?;
    Ok(entries[index.sample(rng)].0)
}
