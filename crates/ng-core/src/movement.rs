use std::fmt;

use serde::{Deserialize, Serialize};

/// The ways a unit may move between tiles.
///
/// Only [`MovementMode::Walking`] is resolved today; the other modes are
/// accepted in profiles but never make a tile traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Ground movement limited by slope.
    Walking,
    /// Airborne movement.
    Flying,
    /// Movement up or down steep surfaces.
    Climbing,
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walking => write!(f, "walking"),
            Self::Flying => write!(f, "flying"),
            Self::Climbing => write!(f, "climbing"),
        }
    }
}

/// What a moving unit is able to traverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    /// Largest tile tilt (degrees, any axis) a walker can stand on.
    pub max_walk_angle: f32,
    /// Movement modes available to the unit.
    pub modes: Vec<MovementMode>,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::walking(45.0)
    }
}

impl MovementProfile {
    /// A walking-only profile with the given slope limit.
    pub fn walking(max_walk_angle: f32) -> Self {
        Self {
            max_walk_angle,
            modes: vec![MovementMode::Walking],
        }
    }

    /// Set the slope limit.
    pub fn with_max_walk_angle(mut self, angle: f32) -> Self {
        self.max_walk_angle = angle;
        self
    }

    /// Replace the available movement modes.
    pub fn with_modes(mut self, modes: Vec<MovementMode>) -> Self {
        self.modes = modes;
        self
    }

    /// Return `true` if the profile includes the given mode.
    pub fn has_mode(&self, mode: MovementMode) -> bool {
        self.modes.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_walks_up_to_45_degrees() {
        let profile = MovementProfile::default();
        assert!(profile.has_mode(MovementMode::Walking));
        assert!((profile.max_walk_angle - 45.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_replaces_modes() {
        let profile = MovementProfile::default().with_modes(vec![MovementMode::Flying]);
        assert!(!profile.has_mode(MovementMode::Walking));
        assert!(profile.has_mode(MovementMode::Flying));
    }

    #[test]
    fn modes_deserialize_from_snake_case() {
        let modes: Vec<MovementMode> = serde_json::from_str(r#"["walking", "climbing"]"#).unwrap();
        assert_eq!(modes, vec![MovementMode::Walking, MovementMode::Climbing]);
    }
}
