#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless terrain and entity backend.
//!
//! [`Tilemap`] implements both [`TerrainWriter`] and [`EntitySpawner`] on top
//! of ordered in-memory maps, so generated levels can be inspected, compared
//! and dumped as text without an engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use ledgerun_core::{
    EnemyKind, EntityHandle, EntitySpawner, Extent, GridPos, TerrainWriter, TileKind, WorldPoint,
};

/// Content of a painted cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Walkable ground with its platform pattern slot.
    Ground(TileKind),
    /// Damaging tile.
    Hazard,
}

/// Entity instantiated through the [`EntitySpawner`] interface.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// Enemy prefab.
    Enemy {
        /// Prefab name.
        kind: EnemyKind,
        /// Feet position.
        position: WorldPoint,
    },
    /// Wall obstacle.
    Wall {
        /// Bottom-centre.
        position: WorldPoint,
        /// Height in world units.
        height: f32,
    },
    /// Level goal.
    Goal {
        /// Position of the goal.
        position: WorldPoint,
    },
    /// Kill floor under the terrain.
    HazardFloor {
        /// Centre of the floor.
        center: WorldPoint,
        /// Footprint of the floor.
        size: Extent,
    },
}

/// In-memory tile grid and entity table.
#[derive(Clone, Debug, Default)]
pub struct Tilemap {
    cells: BTreeMap<GridPos, Cell>,
    entities: BTreeMap<EntityHandle, Entity>,
    prefabs: Option<BTreeSet<EnemyKind>>,
    next_handle: u64,
}

impl Tilemap {
    /// Creates an empty tilemap accepting every enemy kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tilemap that only knows the listed enemy prefabs.
    ///
    /// Spawning any other enemy kind yields no entity.
    #[must_use]
    pub fn with_prefabs(prefabs: impl IntoIterator<Item = EnemyKind>) -> Self {
        Self {
            prefabs: Some(prefabs.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Content of the cell at `pos`, if painted.
    #[must_use]
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        self.cells.get(&pos).copied()
    }

    /// Every painted cell in grid order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.cells.iter().map(|(pos, cell)| (*pos, *cell))
    }

    /// Number of ground tiles.
    #[must_use]
    pub fn ground_count(&self) -> usize {
        self.cells
            .values()
            .filter(|cell| matches!(cell, Cell::Ground(_)))
            .count()
    }

    /// Number of hazard tiles.
    #[must_use]
    pub fn hazard_count(&self) -> usize {
        self.cells
            .values()
            .filter(|cell| matches!(cell, Cell::Hazard))
            .count()
    }

    /// Entity behind `handle`, if still alive.
    #[must_use]
    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(&handle)
    }

    /// Live entities in spawn order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> + '_ {
        self.entities.iter().map(|(handle, entity)| (*handle, entity))
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of live goals.
    #[must_use]
    pub fn goal_count(&self) -> usize {
        self.entities
            .values()
            .filter(|entity| matches!(entity, Entity::Goal { .. }))
            .count()
    }

    /// Live kill floors.
    pub fn hazard_floors(&self) -> impl Iterator<Item = (WorldPoint, Extent)> + '_ {
        self.entities.values().filter_map(|entity| match entity {
            Entity::HazardFloor { center, size } => Some((*center, *size)),
            _ => None,
        })
    }

    /// Renders painted cells and point entities as text, top row first.
    ///
    /// Ground uses `[`, `=` and `]`, hazards `^`, enemies `e`, walls `|` and
    /// the goal `G`. The kill floor is not drawn.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let mut overlay: BTreeMap<GridPos, char> = BTreeMap::new();
        for (pos, cell) in &self.cells {
            let glyph = match cell {
                Cell::Ground(TileKind::LeftCap) => '[',
                Cell::Ground(TileKind::Center) => '=',
                Cell::Ground(TileKind::RightCap) => ']',
                Cell::Hazard => '^',
            };
            let _ = overlay.insert(*pos, glyph);
        }

        for entity in self.entities.values() {
            match entity {
                Entity::Enemy { position, .. } => {
                    let _ = overlay.insert(GridPos::from_world(position.x(), position.y()), 'e');
                }
                Entity::Goal { position } => {
                    let _ = overlay.insert(GridPos::from_world(position.x(), position.y()), 'G');
                }
                Entity::Wall { position, height } => {
                    let base = GridPos::from_world(position.x(), position.y());
                    for offset in 0..height.ceil().max(1.0) as i32 {
                        let _ = overlay.insert(GridPos::new(base.x(), base.y() + offset), '|');
                    }
                }
                Entity::HazardFloor { .. } => {}
            }
        }

        let (Some(min_x), Some(max_x)) = (
            overlay.keys().map(GridPos::x).min(),
            overlay.keys().map(GridPos::x).max(),
        ) else {
            return String::new();
        };
        let (Some(min_y), Some(max_y)) = (
            overlay.keys().map(GridPos::y).min(),
            overlay.keys().map(GridPos::y).max(),
        ) else {
            return String::new();
        };

        let mut out = String::new();
        for y in (min_y..=max_y).rev() {
            let _ = write!(out, "{y:>4} ");
            for x in min_x..=max_x {
                out.push(overlay.get(&GridPos::new(x, y)).copied().unwrap_or(' '));
            }
            out.push('\n');
        }
        out
    }

    fn insert(&mut self, entity: Entity) -> EntityHandle {
        let handle = EntityHandle::new(self.next_handle);
        self.next_handle += 1;
        let _ = self.entities.insert(handle, entity);
        handle
    }
}

impl TerrainWriter for Tilemap {
    fn set_ground_tile(&mut self, pos: GridPos, kind: TileKind) {
        let _ = self.cells.insert(pos, Cell::Ground(kind));
    }

    fn set_hazard_tile(&mut self, pos: GridPos) {
        let _ = self.cells.insert(pos, Cell::Hazard);
    }

    fn erase_tile(&mut self, pos: GridPos) {
        let _ = self.cells.remove(&pos);
    }

    fn clear_all(&mut self) {
        self.cells.clear();
    }
}

impl EntitySpawner for Tilemap {
    fn spawn_enemy(&mut self, kind: &EnemyKind, position: WorldPoint) -> Option<EntityHandle> {
        if let Some(prefabs) = &self.prefabs {
            if !prefabs.contains(kind) {
                log::debug!("no prefab registered for enemy `{}`", kind.name());
                return None;
            }
        }

        Some(self.insert(Entity::Enemy {
            kind: kind.clone(),
            position,
        }))
    }

    fn spawn_wall(&mut self, position: WorldPoint, height: f32) -> EntityHandle {
        self.insert(Entity::Wall { position, height })
    }

    fn spawn_goal(&mut self, position: WorldPoint) -> EntityHandle {
        self.insert(Entity::Goal { position })
    }

    fn spawn_hazard_floor(&mut self, position: WorldPoint, size: Extent) -> EntityHandle {
        self.insert(Entity::HazardFloor {
            center: position,
            size,
        })
    }

    fn despawn(&mut self, handle: EntityHandle) {
        if self.entities.remove(&handle).is_none() {
            log::warn!("despawn requested for unknown entity {}", handle.get());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_reused() {
        let mut map = Tilemap::new();
        let first = map.spawn_goal(WorldPoint::new(0.0, 0.0));
        map.despawn(first);
        let second = map.spawn_goal(WorldPoint::new(1.0, 0.0));
        assert_ne!(first, second);
        assert_eq!(map.entity_count(), 1);
    }

    #[test]
    fn empty_map_renders_nothing() {
        assert!(Tilemap::new().render_ascii().is_empty());
    }
}
