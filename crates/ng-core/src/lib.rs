//! Core types for Navgrid: tiles, scenes, adjacency, and obstruction queries.
//!
//! A [`Scene`] owns the tiles of one battlefield and exposes the implicit
//! navigation graph over them. Collision is never computed here: callers
//! hand in an [`ObstructionOracle`] supplied by the host world.

/// Actor identifiers shared by collision shapes and turn participants.
pub mod actor;
/// Scene configuration.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// JSON scene files.
pub mod file;
/// Orientation math.
pub mod geometry;
/// Movement modes and profiles.
pub mod movement;
/// Collision capsules, sweep queries, and the obstruction capability.
pub mod obstruction;
/// The tile registry and navigation graph.
pub mod scene;
/// Tiles and their cached geometry.
pub mod tile;

/// Re-export of [`actor::ActorId`].
pub use actor::ActorId;
/// Re-export of [`config::NavConfig`].
pub use config::NavConfig;
/// Re-export error types.
pub use error::{NavError, NavResult};
/// Re-export scene file types.
pub use file::{SceneFile, UnitSpec};
/// Re-export of [`geometry::Rotator`].
pub use geometry::Rotator;
/// Re-export movement types.
pub use movement::{MovementMode, MovementProfile};
/// Re-export obstruction types.
pub use obstruction::{
    CollisionCapsule, CollisionChannel, NoObstruction, Obstacle, ObstacleField, ObstructionOracle,
    SweepQuery,
};
/// Re-export scene types.
pub use scene::{DebugOverlay, GridSpec, MAX_GRID_TILES, Scene};
/// Re-export tile types.
pub use tile::{Tile, TileId, TileSpec};

/// Re-export of the vector types used in the public API.
pub use glam::{Vec2, Vec3};
