use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::movement::MovementProfile;
use crate::obstruction::{CollisionCapsule, ObstructionOracle, SweepQuery};
use crate::tile::{Tile, TileId, TileSpec};

/// A flat rectangular block of tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Centre of the first (column 0, row 0) tile.
    pub origin: Vec3,
    /// Number of tiles along +X.
    pub columns: u32,
    /// Number of tiles along +Y.
    pub rows: u32,
    /// Centre-to-centre distance.
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    /// Tiles are named `<prefix><column>_<row>` when set.
    #[serde(default)]
    pub name_prefix: Option<String>,
}

/// Upper bound on the number of tiles one grid may add.
pub const MAX_GRID_TILES: u32 = 1_000_000;

fn default_spacing() -> f32 {
    200.0
}

impl GridSpec {
    /// A grid of 200-unit tiles starting at `origin`.
    pub fn new(origin: Vec3, columns: u32, rows: u32) -> Self {
        Self {
            origin,
            columns,
            rows,
            spacing: default_spacing(),
            name_prefix: None,
        }
    }

    /// Set the centre-to-centre spacing.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Name tiles `<prefix><column>_<row>`.
    pub fn named(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }
}

/// Read-only geometry a presentation layer may draw for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    /// Centre-to-centre segments towards every neighbour.
    pub edges: Vec<(Vec3, Vec3)>,
    /// The tile's footprint corners.
    pub contact_points: [Vec3; 4],
}

/// The tile registry of one scene and the implicit graph over its tiles.
///
/// Adjacency is discovered lazily per tile by corner proximity and cached.
/// Any change to the tile population clears every neighbour cache, so the
/// relation stays symmetric.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Scene name.
    pub name: String,
    config: NavConfig,
    tiles: BTreeMap<TileId, Tile>,

    // Indexes
    by_name_lower: HashMap<String, TileId>,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, NavConfig::default())
    }

    /// Create an empty scene with the given configuration.
    pub fn with_config(name: impl Into<String>, config: NavConfig) -> Self {
        Self {
            name: name.into(),
            config,
            tiles: BTreeMap::new(),
            by_name_lower: HashMap::new(),
            next_id: 0,
        }
    }

    /// The scene configuration.
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The movement profile used when a caller supplies none.
    pub fn default_profile(&self) -> &MovementProfile {
        &self.config.default_profile
    }

    // -----------------------------------------------------------------------
    // Tile CRUD
    // -----------------------------------------------------------------------

    /// Add a tile to the scene. Returns the tile's ID.
    pub fn add_tile(&mut self, spec: TileSpec) -> NavResult<TileId> {
        let half_extent = spec.half_extent.unwrap_or(self.config.default_half_extent);
        if !(half_extent.x > 0.0 && half_extent.y > 0.0 && half_extent.is_finite()) {
            return Err(NavError::Validation(format!(
                "tile half extent must be positive, got {half_extent}"
            )));
        }
        if !spec.position.is_finite() {
            return Err(NavError::Validation(format!(
                "tile position must be finite, got {}",
                spec.position
            )));
        }
        if !spec.rotation.is_finite() {
            return Err(NavError::Validation(format!(
                "tile rotation must be finite, got {}",
                spec.rotation
            )));
        }

        let name_lower = match &spec.name {
            Some(name) if name.trim().is_empty() => {
                return Err(NavError::Validation("tile name must not be empty".into()));
            }
            Some(name) => {
                let lower = name.to_lowercase();
                if self.by_name_lower.contains_key(&lower) {
                    return Err(NavError::DuplicateName(name.clone()));
                }
                Some(lower)
            }
            None => None,
        };

        let id = TileId(self.next_id);
        self.next_id += 1;
        if let Some(lower) = name_lower {
            self.by_name_lower.insert(lower, id);
        }
        self.tiles
            .insert(id, Tile::from_spec(id, spec, self.config.default_half_extent));
        self.invalidate_caches();
        Ok(id)
    }

    /// Add a flat grid of tiles. Returns the new IDs in row-major order.
    pub fn add_grid(&mut self, grid: &GridSpec) -> NavResult<Vec<TileId>> {
        if !grid.spacing.is_finite() || grid.spacing <= 0.0 {
            return Err(NavError::Validation(format!(
                "grid spacing must be positive, got {}",
                grid.spacing
            )));
        }
        let count = grid
            .columns
            .checked_mul(grid.rows)
            .filter(|&count| count <= MAX_GRID_TILES)
            .ok_or_else(|| {
                NavError::Validation(format!(
                    "grid of {} x {} exceeds {MAX_GRID_TILES} tiles",
                    grid.columns, grid.rows
                ))
            })?;
        let mut ids = Vec::with_capacity(count as usize);
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let position = grid.origin
                    + Vec3::new(column as f32 * grid.spacing, row as f32 * grid.spacing, 0.0);
                let mut spec = TileSpec::at(position);
                if let Some(prefix) = &grid.name_prefix {
                    spec = spec.named(format!("{prefix}{column}_{row}"));
                }
                ids.push(self.add_tile(spec)?);
            }
        }
        Ok(ids)
    }

    /// Get a tile by ID.
    pub fn get_tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Get a tile by ID, failing if it is not in this scene.
    pub fn tile(&self, id: TileId) -> NavResult<&Tile> {
        self.tiles.get(&id).ok_or(NavError::TileNotFound(id))
    }

    /// Find a tile by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Tile> {
        self.find_id_by_name(name).and_then(|id| self.tiles.get(&id))
    }

    /// Find a tile ID by name (case-insensitive).
    pub fn find_id_by_name(&self, name: &str) -> Option<TileId> {
        self.by_name_lower.get(&name.to_lowercase()).copied()
    }

    /// Resolve a tile reference written either as a name or as `#<id>`.
    pub fn resolve(&self, reference: &str) -> NavResult<TileId> {
        if let Some(id) = self.find_id_by_name(reference) {
            return Ok(id);
        }
        reference
            .strip_prefix('#')
            .and_then(|raw| raw.parse().ok())
            .map(TileId)
            .filter(|id| self.tiles.contains_key(id))
            .ok_or_else(|| NavError::UnknownTileName(reference.to_string()))
    }

    /// Remove a tile. Every neighbour cache is cleared.
    pub fn remove_tile(&mut self, id: TileId) -> NavResult<Tile> {
        let tile = self.tiles.remove(&id).ok_or(NavError::TileNotFound(id))?;
        if let Some(name) = tile.name() {
            self.by_name_lower.remove(&name.to_lowercase());
        }
        self.invalidate_caches();
        Ok(tile)
    }

    /// Drop every cached neighbour list. They are rediscovered on next access.
    pub fn invalidate_caches(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.neighbours.take();
        }
    }

    /// All tiles in discovery order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// All tile IDs in discovery order.
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.keys().copied()
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Return `true` if the scene holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Display label of a tile, or its ID if it is not in the scene.
    pub fn label(&self, id: TileId) -> String {
        self.tiles
            .get(&id)
            .map(Tile::label)
            .unwrap_or_else(|| id.to_string())
    }

    // -----------------------------------------------------------------------
    // Graph
    // -----------------------------------------------------------------------

    /// Tiles adjacent to `id`, discovered on first call and cached.
    ///
    /// An ID that is not part of this scene yields an empty list.
    pub fn neighbours(&self, id: TileId) -> &[TileId] {
        let Some(tile) = self.tiles.get(&id) else {
            warn!(target: "ng_core::scene", tile = %id, scene = %self.name, "neighbour lookup for unknown tile");
            return &[];
        };
        tile.neighbours.get_or_init(|| self.discover_neighbours(tile))
    }

    fn discover_neighbours(&self, tile: &Tile) -> Vec<TileId> {
        let threshold = self.config.adjacency_threshold;
        let found: Vec<TileId> = self
            .tiles
            .values()
            .filter(|other| other.id() != tile.id() && tile.touches(other, threshold))
            .map(Tile::id)
            .collect();
        debug!(
            target: "ng_core::scene",
            tile = %tile.id(),
            neighbours = found.len(),
            "discovered neighbours"
        );
        found
    }

    /// Return `true` if `a` and `b` are neighbours.
    pub fn are_neighbours(&self, a: TileId, b: TileId) -> bool {
        self.neighbours(a).contains(&b)
    }

    /// Footprint corners of a tile.
    pub fn contact_points(&self, id: TileId) -> Option<&[Vec3; 4]> {
        self.tiles.get(&id).map(Tile::contact_points)
    }

    /// Return `true` if the tile exists and `profile` may stand on it.
    pub fn traversable(&self, id: TileId, profile: &MovementProfile) -> bool {
        self.tiles
            .get(&id)
            .is_some_and(|tile| tile.traversable_for(profile))
    }

    // -----------------------------------------------------------------------
    // Obstruction
    // -----------------------------------------------------------------------

    /// Return `true` if `capsule` cannot travel in a straight line from
    /// `from` to `to`.
    pub fn obstructed<O>(&self, from: Vec3, to: Vec3, capsule: &CollisionCapsule, oracle: &O) -> bool
    where
        O: ObstructionOracle + ?Sized,
    {
        oracle.sweep(&SweepQuery::movement(capsule, from, to))
    }

    /// Return `true` if `capsule` cannot travel from `from` to the pawn
    /// anchor of tile `id`. Unknown tiles count as obstructed.
    pub fn obstructed_at<O>(&self, id: TileId, from: Vec3, capsule: &CollisionCapsule, oracle: &O) -> bool
    where
        O: ObstructionOracle + ?Sized,
    {
        match self.tiles.get(&id) {
            Some(tile) => self.obstructed(from, tile.pawn_anchor(), capsule, oracle),
            None => true,
        }
    }

    /// Neighbours of `id` that `capsule` can reach in a straight line from
    /// `from_anchor`.
    pub fn unobstructed_neighbours<O>(
        &self,
        id: TileId,
        from_anchor: Vec3,
        capsule: &CollisionCapsule,
        oracle: &O,
    ) -> Vec<TileId>
    where
        O: ObstructionOracle + ?Sized,
    {
        self.neighbours(id)
            .iter()
            .copied()
            .filter(|&n| !self.obstructed_at(n, from_anchor, capsule, oracle))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    /// Neighbour edges and contact points of a tile, for overlays.
    pub fn debug_overlay(&self, id: TileId) -> Option<DebugOverlay> {
        let tile = self.tiles.get(&id)?;
        let edges = self
            .neighbours(id)
            .iter()
            .filter_map(|n| self.tiles.get(n))
            .map(|n| (tile.position(), n.position()))
            .collect();
        Some(DebugOverlay {
            edges,
            contact_points: *tile.contact_points(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotator;
    use crate::obstruction::{NoObstruction, Obstacle, ObstacleField};
    use glam::Vec2;

    /// A -- B -- C, 200 apart, 200 x 200 footprints.
    fn collinear() -> (Scene, TileId, TileId, TileId) {
        let mut scene = Scene::new("Test");
        let a = scene.add_tile(TileSpec::at(Vec3::ZERO).named("A")).unwrap();
        let b = scene
            .add_tile(TileSpec::at(Vec3::new(200.0, 0.0, 0.0)).named("B"))
            .unwrap();
        let c = scene
            .add_tile(TileSpec::at(Vec3::new(400.0, 0.0, 0.0)).named("C"))
            .unwrap();
        (scene, a, b, c)
    }

    #[test]
    fn collinear_tiles_link_only_their_neighbours() {
        let (scene, a, b, c) = collinear();
        assert_eq!(scene.neighbours(a), &[b]);
        assert_eq!(scene.neighbours(b), &[a, c]);
        assert_eq!(scene.neighbours(c), &[b]);
        assert!(!scene.are_neighbours(a, c));
    }

    #[test]
    fn neighbours_are_cached_after_first_lookup() {
        let (scene, a, _, _) = collinear();
        assert!(scene.get_tile(a).unwrap().cached_neighbours().is_none());
        scene.neighbours(a);
        assert!(scene.get_tile(a).unwrap().cached_neighbours().is_some());
    }

    #[test]
    fn adding_a_tile_refreshes_neighbours() {
        let (mut scene, _, _, c) = collinear();
        assert_eq!(scene.neighbours(c).len(), 1);
        let d = scene
            .add_tile(TileSpec::at(Vec3::new(600.0, 0.0, 0.0)))
            .unwrap();
        assert!(scene.are_neighbours(c, d));
        assert!(scene.are_neighbours(d, c));
    }

    #[test]
    fn removing_a_tile_drops_it_from_neighbour_lists() {
        let (mut scene, a, b, c) = collinear();
        assert_eq!(scene.neighbours(a), &[b]);
        scene.remove_tile(b).unwrap();
        assert!(scene.neighbours(a).is_empty());
        assert!(scene.neighbours(c).is_empty());
        assert!(scene.find_by_name("b").is_none());
    }

    #[test]
    fn unknown_tile_has_no_neighbours() {
        let (scene, _, _, _) = collinear();
        assert!(scene.neighbours(TileId(99)).is_empty());
        assert!(scene.debug_overlay(TileId(99)).is_none());
    }

    #[test]
    fn diagonal_tiles_share_a_corner() {
        let mut scene = Scene::new("Grid");
        let ids = scene.add_grid(&GridSpec::new(Vec3::ZERO, 2, 2)).unwrap();
        assert_eq!(ids.len(), 4);
        for &id in &ids {
            assert_eq!(scene.neighbours(id).len(), 3);
        }
    }

    #[test]
    fn sparse_tiles_are_disconnected() {
        let mut scene = Scene::new("Sparse");
        let ids = scene
            .add_grid(&GridSpec::new(Vec3::ZERO, 3, 1).with_spacing(260.0))
            .unwrap();
        assert!(ids.iter().all(|&id| scene.neighbours(id).is_empty()));
    }

    #[test]
    fn adjacency_threshold_is_configurable() {
        let mut scene = Scene::with_config(
            "Loose",
            NavConfig::default().with_adjacency_threshold(100.0),
        );
        let a = scene.add_tile(TileSpec::at(Vec3::ZERO)).unwrap();
        let b = scene
            .add_tile(TileSpec::at(Vec3::new(260.0, 0.0, 0.0)))
            .unwrap();
        assert!(scene.are_neighbours(a, b));
    }

    #[test]
    fn grid_names_tiles_by_cell() {
        let mut scene = Scene::new("Named");
        scene
            .add_grid(&GridSpec::new(Vec3::ZERO, 2, 3).named("g"))
            .unwrap();
        let tile = scene.find_by_name("G1_2").unwrap();
        assert_eq!(tile.position(), Vec3::new(200.0, 400.0, 0.0));
    }

    #[test]
    fn duplicate_names_rejected() {
        let (mut scene, _, _, _) = collinear();
        let result = scene.add_tile(TileSpec::at(Vec3::ZERO).named("a"));
        assert!(matches!(result, Err(NavError::DuplicateName(_))));
        assert_eq!(scene.tile_count(), 3);
    }

    #[test]
    fn degenerate_tiles_rejected() {
        let mut scene = Scene::new("Bad");
        let flat = TileSpec::at(Vec3::ZERO).with_half_extent(Vec2::new(0.0, 10.0));
        assert!(matches!(scene.add_tile(flat), Err(NavError::Validation(_))));
        let nowhere = TileSpec::at(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(scene.add_tile(nowhere).is_err());
        assert!(scene.add_tile(TileSpec::at(Vec3::ZERO).named("  ")).is_err());
    }

    #[test]
    fn non_finite_rotation_is_rejected() {
        let mut scene = Scene::new("Test");
        let tumbling = TileSpec::at(Vec3::ZERO).with_rotation(Rotator::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(scene.add_tile(tumbling), Err(NavError::Validation(_))));
        let spinning = TileSpec::at(Vec3::ZERO).with_rotation(Rotator::new(0.0, f32::INFINITY, 0.0));
        assert!(matches!(scene.add_tile(spinning), Err(NavError::Validation(_))));
        assert!(scene.is_empty());
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let mut scene = Scene::new("Test");
        let huge = GridSpec::new(Vec3::ZERO, 70_000, 70_000);
        assert!(matches!(scene.add_grid(&huge), Err(NavError::Validation(_))));
        let wide = GridSpec::new(Vec3::ZERO, MAX_GRID_TILES + 1, 1);
        assert!(matches!(scene.add_grid(&wide), Err(NavError::Validation(_))));
        assert!(scene.is_empty());
        assert_eq!(scene.add_grid(&GridSpec::new(Vec3::ZERO, 2, 2)).unwrap().len(), 4);
    }

    #[test]
    fn resolve_accepts_names_and_ids() {
        let (scene, a, b, _) = collinear();
        assert_eq!(scene.resolve("A").unwrap(), a);
        assert_eq!(scene.resolve(&b.to_string()).unwrap(), b);
        assert!(scene.resolve("#42").is_err());
        assert!(scene.resolve("nowhere").is_err());
    }

    #[test]
    fn steep_tile_is_not_traversable() {
        let mut scene = Scene::new("Hill");
        let steep = scene
            .add_tile(TileSpec::at(Vec3::ZERO).with_rotation(Rotator::new(50.0, 0.0, 0.0)))
            .unwrap();
        assert!(!scene.traversable(steep, scene.default_profile()));
        assert!(!scene.traversable(TileId(7), scene.default_profile()));
    }

    #[test]
    fn obstruction_filters_neighbours() {
        let (scene, a, b, c) = collinear();
        let capsule = CollisionCapsule::new(10.0, 20.0);
        let from = scene.get_tile(b).unwrap().pawn_anchor();
        let wall: ObstacleField =
            [Obstacle::new(Vec3::new(300.0, 0.0, 0.0), Vec3::new(5.0, 100.0, 100.0))]
                .into_iter()
                .collect();

        assert_eq!(scene.unobstructed_neighbours(b, from, &capsule, &NoObstruction), vec![a, c]);
        assert_eq!(scene.unobstructed_neighbours(b, from, &capsule, &wall), vec![a]);
        assert!(scene.obstructed_at(c, from, &capsule, &wall));
        assert!(!scene.obstructed_at(a, from, &capsule, &wall));
    }

    #[test]
    fn debug_overlay_lists_edges_and_corners() {
        let (scene, _, b, _) = collinear();
        let overlay = scene.debug_overlay(b).unwrap();
        assert_eq!(overlay.edges.len(), 2);
        assert!(overlay.edges.iter().all(|(from, _)| *from == Vec3::new(200.0, 0.0, 0.0)));
        assert_eq!(overlay.contact_points.len(), 4);
    }
}
