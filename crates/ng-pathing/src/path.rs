use glam::Vec3;
use ng_core::{Scene, TileId};

/// A reconstructed route from the search origin to one reached tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Tiles from origin to destination, both included.
    pub tiles: Vec<TileId>,
    /// Total travel cost.
    pub cost: f32,
}

impl Path {
    /// The search origin.
    pub fn start(&self) -> Option<TileId> {
        self.tiles.first().copied()
    }

    /// The destination.
    pub fn destination(&self) -> Option<TileId> {
        self.tiles.last().copied()
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    /// Pawn anchors along the path, for feeding a movement spline.
    ///
    /// Tiles missing from `scene` are skipped.
    pub fn waypoints(&self, scene: &Scene) -> Vec<Vec3> {
        self.tiles
            .iter()
            .filter_map(|id| scene.get_tile(*id))
            .map(|tile| tile.pawn_anchor())
            .collect()
    }

    /// Tiles after the origin.
    pub fn moves(&self) -> &[TileId] {
        self.tiles.get(1..).unwrap_or(&[])
    }
}
