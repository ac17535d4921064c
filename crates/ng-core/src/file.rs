use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::movement::MovementProfile;
use crate::obstruction::{CollisionCapsule, Obstacle, ObstacleField};
use crate::scene::{GridSpec, Scene};
use crate::tile::TileSpec;

/// A unit placed in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Display name.
    pub name: String,
    /// Starting tile, by name or `#<id>`.
    pub tile: String,
    /// Movement budget per turn, in distance units.
    pub budget: f32,
    /// Collision shape.
    #[serde(default)]
    pub capsule: CollisionCapsule,
    /// Movement abilities. Falls back to the scene default.
    #[serde(default)]
    pub profile: Option<MovementProfile>,
}

/// On-disk description of a scene: tiles, static obstacles and units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Scene name.
    pub name: String,
    /// Scene configuration.
    #[serde(default)]
    pub config: NavConfig,
    /// Individually placed tiles.
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    /// Grid blocks, placed after the individual tiles.
    #[serde(default)]
    pub grids: Vec<GridSpec>,
    /// Static movement blockers.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Units taking part in a skirmish.
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

impl SceneFile {
    /// Parse a scene file from JSON text.
    pub fn from_json(text: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a scene file.
    pub fn load(path: &Path) -> NavResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the tile scene. Unit start tiles are checked against it.
    pub fn build_scene(&self) -> NavResult<Scene> {
        let mut scene = Scene::with_config(self.name.clone(), self.config.clone());
        for spec in &self.tiles {
            scene.add_tile(spec.clone())?;
        }
        for grid in &self.grids {
            scene.add_grid(grid)?;
        }
        for unit in &self.units {
            if !(unit.budget.is_finite() && unit.budget >= 0.0) {
                return Err(NavError::Validation(format!(
                    "unit \"{}\" has an invalid budget {}",
                    unit.name, unit.budget
                )));
            }
            scene.resolve(&unit.tile)?;
        }
        Ok(scene)
    }

    /// The static obstacles as an oracle.
    pub fn obstacle_field(&self) -> ObstacleField {
        self.obstacles.iter().cloned().collect()
    }
}
