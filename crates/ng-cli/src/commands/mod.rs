pub mod reach;
pub mod route;
pub mod skirmish;
pub mod tiles;

use std::path::Path;

use glam::Vec3;
use ng_core::{Scene, SceneFile};

/// Load a scene file and build its scene.
fn load(path: &Path) -> Result<(SceneFile, Scene), String> {
    let file = SceneFile::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let scene = file
        .build_scene()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((file, scene))
}

/// Format a position for tables.
fn fmt_vec(v: Vec3) -> String {
    format!("({:.0}, {:.0}, {:.0})", v.x, v.y, v.z)
}

/// Format a travel cost.
fn fmt_cost(cost: f32) -> String {
    if cost.is_finite() {
        format!("{cost:.1}")
    } else {
        "unreachable".to_string()
    }
}
