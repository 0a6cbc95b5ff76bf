//! Ordered chunk ledger with trailing eviction.

use std::collections::VecDeque;

use thiserror::Error;

use crate::Chunk;

/// Reasons a chunk may be refused by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RegistryError {
    /// The chunk ends before it starts.
    #[error("chunk span is inverted: [{start_x}, {end_x}]")]
    InvertedSpan {
        /// Start of the refused chunk.
        start_x: f32,
        /// End of the refused chunk.
        end_x: f32,
    },
    /// The chunk starts before the current frontier.
    #[error("chunk starting at {start_x} overlaps the frontier at {frontier_x}")]
    Overlap {
        /// Start of the refused chunk.
        start_x: f32,
        /// End of the most recent chunk.
        frontier_x: f32,
    },
    /// The chunk does not move the frontier forward.
    #[error("chunk ending at {end_x} does not advance the frontier at {frontier_x}")]
    NonAdvancing {
        /// End of the refused chunk.
        end_x: f32,
        /// End of the most recent chunk.
        frontier_x: f32,
    },
}

/// Registry that stores committed chunks in spatial order.
///
/// Insertion order equals spatial order and `end_x` strictly increases, so
/// eviction only ever inspects the front of the queue.
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    chunks: VecDeque<Chunk>,
}

impl ChunkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a chunk spanning `[start_x, end_x]` could be appended.
    pub fn check_span(&self, start_x: f32, end_x: f32) -> Result<(), RegistryError> {
        if start_x > end_x {
            return Err(RegistryError::InvertedSpan { start_x, end_x });
        }

        if let Some(frontier_x) = self.frontier_x() {
            if start_x < frontier_x {
                return Err(RegistryError::Overlap {
                    start_x,
                    frontier_x,
                });
            }
            if end_x <= frontier_x {
                return Err(RegistryError::NonAdvancing { end_x, frontier_x });
            }
        }
        Ok(())
    }

    /// Appends a chunk at the frontier.
    pub fn append(&mut self, chunk: Chunk) -> Result<(), RegistryError> {
        self.check_span(chunk.start_x(), chunk.end_x())?;
        self.chunks.push_back(chunk);
        Ok(())
    }

    /// Removes every chunk ending before `threshold_x`, in spatial order.
    ///
    /// Afterwards every remaining chunk satisfies `end_x >= threshold_x`.
    pub fn evict_behind(&mut self, threshold_x: f32) -> Vec<Chunk> {
        let mut evicted = Vec::new();
        while self
            .chunks
            .front()
            .is_some_and(|chunk| chunk.end_x() < threshold_x)
        {
            if let Some(chunk) = self.chunks.pop_front() {
                evicted.push(chunk);
            }
        }

        if !evicted.is_empty() {
            log::debug!(
                "evicted {} chunk(s) behind x={threshold_x:.1}, {} remain",
                evicted.len(),
                self.chunks.len()
            );
        }
        evicted
    }

    /// Removes every chunk, in spatial order.
    pub fn clear(&mut self) -> Vec<Chunk> {
        self.chunks.drain(..).collect()
    }

    /// Number of live chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Reports whether no chunk is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterator over the live chunks in spatial order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// End of the most recent chunk.
    #[must_use]
    pub fn frontier_x(&self) -> Option<f32> {
        self.chunks.back().map(Chunk::end_x)
    }

    /// Start of the oldest live chunk.
    #[must_use]
    pub fn first_start_x(&self) -> Option<f32> {
        self.chunks.front().map(Chunk::start_x)
    }

    /// Lowest ground height across the live chunks.
    #[must_use]
    pub fn lowest_floor_y(&self) -> Option<f32> {
        self.chunks.iter().map(Chunk::floor_y).reduce(f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerun_core::{ChunkDescriptor, ChunkKind, Cursor, EntityHandle};

    fn chunk(start_x: f32, end_x: f32, floor_y: f32) -> Chunk {
        let descriptor = ChunkDescriptor {
            kind: ChunkKind::SafePlatform,
            start_x,
            end_x,
            tiles: Vec::new(),
            hazards: Vec::new(),
            spawns: Vec::new(),
            gaps: Vec::new(),
            exit: Cursor::new(end_x, floor_y),
            floor_y,
        };
        Chunk::from_descriptor(&descriptor, vec![EntityHandle::new(start_x as u64)])
    }

    fn filled(spans: &[(f32, f32)]) -> ChunkRegistry {
        let mut registry = ChunkRegistry::new();
        for &(start, end) in spans {
            registry.append(chunk(start, end, 0.0)).expect("ordered spans");
        }
        registry
    }

    #[test]
    fn append_rejects_overlapping_chunk() {
        let mut registry = filled(&[(0.0, 10.0)]);
        assert_eq!(
            registry.append(chunk(8.0, 14.0, 0.0)),
            Err(RegistryError::Overlap {
                start_x: 8.0,
                frontier_x: 10.0
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn append_rejects_inverted_and_stalled_chunks() {
        let mut registry = filled(&[(0.0, 10.0)]);
        assert!(matches!(
            registry.append(chunk(12.0, 11.0, 0.0)),
            Err(RegistryError::InvertedSpan { .. })
        ));
        assert!(matches!(
            registry.append(chunk(10.0, 10.0, 0.0)),
            Err(RegistryError::NonAdvancing { .. })
        ));
    }

    #[test]
    fn evict_behind_removes_exactly_the_trailing_chunks() {
        let mut registry = filled(&[(0.0, 10.0), (10.0, 20.0), (24.0, 30.0), (30.0, 45.0)]);

        let evicted = registry.evict_behind(30.0);
        let evicted_ends: Vec<f32> = evicted.iter().map(Chunk::end_x).collect();
        assert_eq!(evicted_ends, vec![10.0, 20.0]);

        let remaining: Vec<f32> = registry.iter().map(Chunk::end_x).collect();
        assert_eq!(remaining, vec![30.0, 45.0], "end_x == threshold stays");
    }

    #[test]
    fn evict_behind_on_empty_registry_is_noop() {
        let mut registry = ChunkRegistry::new();
        assert!(registry.evict_behind(100.0).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_drains_everything_in_order() {
        let mut registry = filled(&[(0.0, 5.0), (5.0, 9.0)]);
        let drained = registry.clear();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].end_x(), 5.0);
        assert!(registry.is_empty());
        assert_eq!(registry.frontier_x(), None);
    }

    #[test]
    fn queries_track_span_and_floor() {
        let mut registry = ChunkRegistry::new();
        registry.append(chunk(0.0, 6.0, 2.0)).expect("first");
        registry.append(chunk(8.0, 12.0, -3.0)).expect("second");
        assert_eq!(registry.first_start_x(), Some(0.0));
        assert_eq!(registry.frontier_x(), Some(12.0));
        assert_eq!(registry.lowest_floor_y(), Some(-3.0));
    }
}
