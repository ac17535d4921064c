use std::cell::OnceCell;
use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::Rotator;
use crate::movement::{MovementMode, MovementProfile};

/// Identifier of a tile within its scene. Assigned in insertion order and
/// never reused, so ordering by ID is ordering by discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Authoring-time description of a tile, as placed by a level tool or
/// read from a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    /// Optional unique name (case-insensitive).
    #[serde(default)]
    pub name: Option<String>,
    /// World position of the tile centre.
    pub position: Vec3,
    /// Tile orientation.
    #[serde(default)]
    pub rotation: Rotator,
    /// Half size of the walkable rectangle. Falls back to the scene default.
    #[serde(default)]
    pub half_extent: Option<Vec2>,
    /// Local offset of the spot a standing pawn occupies.
    #[serde(default)]
    pub pawn_offset: Vec3,
}

impl TileSpec {
    /// A flat, unnamed tile at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            name: None,
            position,
            rotation: Rotator::ZERO,
            half_extent: None,
            pawn_offset: Vec3::ZERO,
        }
    }

    /// Set the tile name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tile orientation.
    pub fn with_rotation(mut self, rotation: Rotator) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the footprint half extent.
    pub fn with_half_extent(mut self, half_extent: Vec2) -> Self {
        self.half_extent = Some(half_extent);
        self
    }

    /// Set the pawn offset.
    pub fn with_pawn_offset(mut self, offset: Vec3) -> Self {
        self.pawn_offset = offset;
        self
    }
}

/// A node of the navigation graph.
///
/// Transform data is fixed at creation. Contact points and neighbours are
/// computed on first access and cached; the neighbour cache is owned by the
/// scene, which clears it whenever the tile population changes.
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    name: Option<String>,
    position: Vec3,
    rotation: Rotator,
    half_extent: Vec2,
    pawn_offset: Vec3,
    contact_points: OnceCell<[Vec3; 4]>,
    pub(crate) neighbours: OnceCell<Vec<TileId>>,
}

impl Tile {
    pub(crate) fn from_spec(id: TileId, spec: TileSpec, default_half_extent: Vec2) -> Self {
        Self {
            id,
            name: spec.name,
            position: spec.position,
            rotation: spec.rotation,
            half_extent: spec.half_extent.unwrap_or(default_half_extent),
            pawn_offset: spec.pawn_offset,
            contact_points: OnceCell::new(),
            neighbours: OnceCell::new(),
        }
    }

    /// The tile's scene-local ID.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// The tile's name, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name if present, otherwise the ID.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// World position of the tile centre.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Tile orientation.
    pub fn rotation(&self) -> Rotator {
        self.rotation
    }

    /// Half size of the walkable rectangle.
    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    /// Where a pawn standing on this tile is located.
    pub fn pawn_anchor(&self) -> Vec3 {
        self.position + self.rotation.rotate_vector(self.pawn_offset)
    }

    /// The four world-space footprint corners.
    ///
    /// Ordered `(-x,-y), (-x,+y), (+x,-y), (+x,+y)` in tile space.
    pub fn contact_points(&self) -> &[Vec3; 4] {
        self.contact_points.get_or_init(|| {
            let (hx, hy) = (self.half_extent.x, self.half_extent.y);
            [(-hx, -hy), (-hx, hy), (hx, -hy), (hx, hy)].map(|(x, y)| {
                self.position + self.rotation.rotate_vector(Vec3::new(x, y, 0.0))
            })
        })
    }

    /// Return `true` if any corner of `self` lies closer than `threshold`
    /// to any corner of `other`.
    pub fn touches(&self, other: &Tile, threshold: f32) -> bool {
        let mine = self.contact_points();
        other
            .contact_points()
            .iter()
            .any(|theirs| mine.iter().any(|cp| cp.distance(*theirs) < threshold))
    }

    /// Return the cached neighbour list, if it has been computed.
    pub fn cached_neighbours(&self) -> Option<&[TileId]> {
        self.neighbours.get().map(Vec::as_slice)
    }

    /// Return `true` if a unit with the given abilities may stand here.
    ///
    /// Only walking is resolved: every axis of the tile's orientation must lie
    /// strictly inside `(-max_walk_angle, max_walk_angle)`.
    pub fn traversable(&self, max_walk_angle: f32, modes: &[MovementMode]) -> bool {
        modes.contains(&MovementMode::Walking)
            && self.rotation.max_axis() < max_walk_angle
            && self.rotation.min_axis() > -max_walk_angle
    }

    /// Profile-based form of [`Tile::traversable`].
    pub fn traversable_for(&self, profile: &MovementProfile) -> bool {
        self.traversable(profile.max_walk_angle, &profile.modes)
    }

    /// Return `true` if a unit may finish its move on this tile.
    pub fn legal_position_at_end_of_turn(&self, max_walk_angle: f32, modes: &[MovementMode]) -> bool {
        self.traversable(max_walk_angle, modes)
    }
}
