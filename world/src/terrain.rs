use glam::Vec2;
use strafe_core::{
    ColliderShape, Event, GroundProbe, ObjectPool, TerrainTileSnapshot, TileId, TilePlacement,
};
use tracing::trace;

use crate::config::TerrainLayout;

/// Longest downward distance a ground probe reaches.
const PROBE_DEPTH: f32 = 500.0;

#[derive(Clone, Debug, Default)]
pub(crate) struct TerrainTile {
    position: Vec2,
}

/// Pooled ground tiles scrolling right to left.
#[derive(Debug)]
pub(crate) struct TerrainField {
    layout: TerrainLayout,
    tiles: ObjectPool<TerrainTile>,
}

impl TerrainField {
    pub(crate) fn new(layout: TerrainLayout) -> Self {
        let tiles = ObjectPool::build(layout.pool_size, |_| TerrainTile::default());
        Self { layout, tiles }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.tiles.capacity()
    }

    /// Reclaims the next tile in rotation and places it, whether or not it already scrolled off.
    pub(crate) fn place(&mut self, height: f32, placement: TilePlacement, out: &mut Vec<Event>) {
        let Some(acquired) = self.tiles.acquire() else {
            return;
        };
        let x = match placement {
            TilePlacement::SpawnEdge => self.layout.spawn_x,
            TilePlacement::Prefill { index } => index as f32 * self.layout.tile_width,
        };
        let position = Vec2::new(x, height);
        if let Some(slot) = self.tiles.get_mut(acquired.index) {
            slot.payload_mut().position = position;
        }

        let tile = TileId::new(acquired.index as u32);
        if acquired.evicted_live {
            trace!(tile = tile.get(), "reclaimed terrain tile before it scrolled off");
        }
        out.push(Event::TerrainTilePlaced { tile, position });
    }

    pub(crate) fn advance(&mut self, dt: f32, out: &mut Vec<Event>) {
        let shift = self.layout.scroll_speed * dt;
        let retire_x = self.layout.retire_x;
        let mut retired = Vec::new();
        for slot in self.tiles.iter_mut().filter(|slot| slot.is_active()) {
            let index = slot.index();
            let tile = slot.payload_mut();
            tile.position.x -= shift;
            if tile.position.x < retire_x {
                retired.push(index);
            }
        }

        for index in retired {
            if self.tiles.deactivate(index) {
                out.push(Event::TerrainTileRetired {
                    tile: TileId::new(index as u32),
                });
            }
        }
    }

    pub(crate) fn is_active(&self, tile: TileId) -> bool {
        self.tiles
            .get(tile.get() as usize)
            .is_some_and(|slot| slot.is_active())
    }

    pub(crate) fn snapshots(&self) -> impl Iterator<Item = TerrainTileSnapshot> + '_ {
        self.tiles.iter_active().map(|slot| TerrainTileSnapshot {
            id: TileId::new(slot.index() as u32),
            position: slot.payload().position,
        })
    }

    /// Solid block under a tile's surface.
    pub(crate) fn collider(&self, surface: Vec2) -> ColliderShape {
        let half_width = self.layout.tile_width * 0.5;
        ColliderShape::Rect {
            min: Vec2::new(surface.x - half_width, surface.y - self.layout.tile_depth),
            max: Vec2::new(surface.x + half_width, surface.y),
        }
    }
}

impl GroundProbe for TerrainField {
    fn ground_height(&self, from: Vec2) -> Option<f32> {
        let half_width = self.layout.tile_width * 0.5;
        self.tiles
            .iter_active()
            .map(|slot| slot.payload().position)
            .filter(|surface| (surface.x - from.x).abs() <= half_width)
            .filter(|surface| surface.y <= from.y && from.y - surface.y <= PROBE_DEPTH)
            .map(|surface| surface.y)
            .fold(None, |highest: Option<f32>, height| {
                Some(highest.map_or(height, |current| current.max(height)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(pool_size: usize) -> TerrainLayout {
        TerrainLayout {
            pool_size,
            ..TerrainLayout::default()
        }
    }

    #[test]
    fn prefill_places_tiles_in_columns() {
        let mut field = TerrainField::new(layout(4));
        let mut events = Vec::new();

        field.place(-90.0, TilePlacement::Prefill { index: 3 }, &mut events);

        assert_eq!(
            events,
            vec![Event::TerrainTilePlaced {
                tile: TileId::new(0),
                position: Vec2::new(13.5, -90.0),
            }]
        );
    }

    #[test]
    fn tiles_retire_past_left_edge() {
        let mut field = TerrainField::new(TerrainLayout {
            pool_size: 2,
            scroll_speed: 10.0,
            ..TerrainLayout::default()
        });
        let mut events = Vec::new();
        field.place(-90.0, TilePlacement::Prefill { index: 0 }, &mut events);
        field.place(-90.0, TilePlacement::Prefill { index: 10 }, &mut events);
        events.clear();

        field.advance(0.5, &mut events);

        assert_eq!(
            events,
            vec![Event::TerrainTileRetired {
                tile: TileId::new(0)
            }]
        );
        assert!(!field.is_active(TileId::new(0)));
        assert!(field.is_active(TileId::new(1)));
    }

    #[test]
    fn probe_returns_highest_surface_below_origin() {
        let mut field = TerrainField::new(layout(3));
        let mut events = Vec::new();
        field.place(-100.0, TilePlacement::Prefill { index: 10 }, &mut events);
        field.place(-80.0, TilePlacement::Prefill { index: 20 }, &mut events);

        assert_eq!(field.ground_height(Vec2::new(45.0, 60.0)), Some(-100.0));
        assert_eq!(field.ground_height(Vec2::new(90.0, 60.0)), Some(-80.0));
        assert_eq!(field.ground_height(Vec2::new(90.0, -85.0)), None);
        assert_eq!(field.ground_height(Vec2::new(300.0, 60.0)), None);
    }
}
