use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::movement::MovementProfile;

/// Corner distance below which two tiles count as adjacent. Large enough to
/// absorb floating-point noise along abutting tile edges.
pub const DEFAULT_ADJACENCY_THRESHOLD: f32 = 25.0;

/// Default footprint half extent: a 200 x 200 tile.
pub const DEFAULT_HALF_EXTENT: Vec2 = Vec2::new(100.0, 100.0);

/// Configuration for a tile scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Corner distance below which two tiles are neighbours.
    pub adjacency_threshold: f32,
    /// Footprint half extent for tiles that do not specify one.
    pub default_half_extent: Vec2,
    /// Movement profile used when a caller does not supply one.
    pub default_profile: MovementProfile,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            adjacency_threshold: DEFAULT_ADJACENCY_THRESHOLD,
            default_half_extent: DEFAULT_HALF_EXTENT,
            default_profile: MovementProfile::default(),
        }
    }
}

impl NavConfig {
    /// Set the adjacency threshold.
    pub fn with_adjacency_threshold(mut self, threshold: f32) -> Self {
        self.adjacency_threshold = threshold;
        self
    }

    /// Set the default footprint half extent.
    pub fn with_default_half_extent(mut self, half_extent: Vec2) -> Self {
        self.default_half_extent = half_extent;
        self
    }

    /// Set the default movement profile.
    pub fn with_default_profile(mut self, profile: MovementProfile) -> Self {
        self.default_profile = profile;
        self
    }
}
