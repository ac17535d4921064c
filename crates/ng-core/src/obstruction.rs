//! Collision-sweep capability consumed by the tile graph.
//!
//! Tiles never detect collisions themselves. The host world supplies an
//! [`ObstructionOracle`] that answers whether a capsule swept along a
//! straight segment hits anything in the movement-blocking channel.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Collision categories a sweep may test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionChannel {
    /// Geometry and pawns that stop movement.
    BlocksMovement,
    /// Cursor and line-of-sight queries.
    Visibility,
}

/// The moving unit's collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionCapsule {
    /// Capsule radius.
    pub radius: f32,
    /// Half of the capsule's total height.
    pub half_height: f32,
    /// Offset of the capsule centre from the pawn anchor.
    #[serde(default)]
    pub offset: Vec3,
    /// The actor the capsule belongs to; its own geometry is ignored.
    #[serde(skip)]
    pub owner: Option<ActorId>,
}

impl Default for CollisionCapsule {
    fn default() -> Self {
        Self {
            radius: 34.0,
            half_height: 88.0,
            offset: Vec3::new(0.0, 0.0, 88.0),
            owner: None,
        }
    }
}

impl CollisionCapsule {
    /// A capsule with the given size, centred on the pawn anchor.
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
            offset: Vec3::ZERO,
            owner: None,
        }
    }

    /// Set the offset from the pawn anchor.
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the owning actor.
    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// A single sweep request handed to the oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepQuery {
    /// Capsule centre at the start of the sweep.
    pub start: Vec3,
    /// Capsule centre at the end of the sweep.
    pub end: Vec3,
    /// Capsule radius.
    pub radius: f32,
    /// Capsule half height.
    pub half_height: f32,
    /// Actor whose geometry must not count as a hit.
    pub ignore: Option<ActorId>,
    /// Channel tested.
    pub channel: CollisionChannel,
}

impl SweepQuery {
    /// Build the movement sweep for `capsule` travelling between two pawn
    /// anchors. The capsule offset is added to both ends.
    pub fn movement(capsule: &CollisionCapsule, from: Vec3, to: Vec3) -> Self {
        Self {
            start: from + capsule.offset,
            end: to + capsule.offset,
            radius: capsule.radius,
            half_height: capsule.half_height,
            ignore: capsule.owner,
            channel: CollisionChannel::BlocksMovement,
        }
    }
}

/// Answers "is this sweep blocked?" on behalf of the host world.
pub trait ObstructionOracle {
    /// Return `true` if the sweep hits anything.
    fn sweep(&self, query: &SweepQuery) -> bool;
}

impl<F> ObstructionOracle for F
where
    F: Fn(&SweepQuery) -> bool,
{
    fn sweep(&self, query: &SweepQuery) -> bool {
        self(query)
    }
}

/// An oracle for empty worlds: nothing is ever blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstruction;

impl ObstructionOracle for NoObstruction {
    fn sweep(&self, _query: &SweepQuery) -> bool {
        false
    }
}

/// An axis-aligned blocking volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
    /// The actor this volume belongs to, if any.
    #[serde(skip)]
    pub owner: Option<ActorId>,
    /// Channels this volume blocks.
    #[serde(default = "default_blocks")]
    pub blocks: Vec<CollisionChannel>,
}

fn default_blocks() -> Vec<CollisionChannel> {
    vec![CollisionChannel::BlocksMovement]
}

impl Obstacle {
    /// A movement-blocking box centred on `center`.
    pub fn new(center: Vec3, half_size: Vec3) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
            owner: None,
            blocks: default_blocks(),
        }
    }

    /// Attach the box to an actor.
    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Return `true` if the swept capsule of `query` intersects this box.
    ///
    /// The capsule is approximated by its bounding box: the obstacle is
    /// inflated by the radius horizontally and by the half height vertically,
    /// then the sweep segment is clipped against it.
    pub fn blocks_sweep(&self, query: &SweepQuery) -> bool {
        if !self.blocks.contains(&query.channel) {
            return false;
        }
        if self.owner.is_some() && self.owner == query.ignore {
            return false;
        }
        let pad = Vec3::new(query.radius, query.radius, query.half_height);
        segment_hits_box(query.start, query.end, self.min - pad, self.max + pad)
    }
}

fn segment_hits_box(start: Vec3, end: Vec3, min: Vec3, max: Vec3) -> bool {
    let dir = end - start;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for axis in 0..3 {
        let (s, d) = (start[axis], dir[axis]);
        let (lo, hi) = (min[axis], max[axis]);
        if d.abs() < f32::EPSILON {
            if s < lo || s > hi {
                return false;
            }
            continue;
        }
        let (mut t1, mut t2) = ((lo - s) / d, (hi - s) / d);
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// A collection of box obstacles acting as the world's collision scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an obstacle.
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Builder form of [`ObstacleField::push`].
    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.push(obstacle);
        self
    }

    /// Remove every obstacle owned by `owner`. Returns how many were removed.
    pub fn remove_owned_by(&mut self, owner: ActorId) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.owner != Some(owner));
        before - self.obstacles.len()
    }

    /// All obstacles.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Return `true` if the field has no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl FromIterator<Obstacle> for ObstacleField {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        Self {
            obstacles: iter.into_iter().collect(),
        }
    }
}

impl ObstructionOracle for ObstacleField {
    fn sweep(&self, query: &SweepQuery) -> bool {
        self.obstacles.iter().any(|o| o.blocks_sweep(query))
    }
}
