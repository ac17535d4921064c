use std::fmt;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch/yaw/roll orientation in degrees.
///
/// Yaw turns about +Z, pitch about +Y and roll about +X, applied in that
/// order (yaw outermost). Angles are kept as authored; use
/// [`Rotator::normalized`] to fold them into `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation about the Y axis, in degrees.
    #[serde(default)]
    pub pitch: f32,
    /// Rotation about the Z axis, in degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Rotation about the X axis, in degrees.
    #[serde(default)]
    pub roll: f32,
}

impl Rotator {
    /// The identity orientation.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    /// Create a rotator from pitch, yaw and roll in degrees.
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Return `true` if every axis is finite.
    pub fn is_finite(self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }

    /// Fold every axis into `(-180, 180]`.
    pub fn normalized(self) -> Self {
        Self {
            pitch: normalize_axis(self.pitch),
            yaw: normalize_axis(self.yaw),
            roll: normalize_axis(self.roll),
        }
    }

    /// Largest of the three (normalized) axes.
    pub fn max_axis(self) -> f32 {
        let n = self.normalized();
        n.pitch.max(n.yaw).max(n.roll)
    }

    /// Smallest of the three (normalized) axes.
    pub fn min_axis(self) -> f32 {
        let n = self.normalized();
        n.pitch.min(n.yaw).min(n.roll)
    }

    /// The equivalent quaternion.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Rotate a local-space vector into world orientation.
    pub fn rotate_vector(self, v: Vec3) -> Vec3 {
        self.to_quat() * v
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={:.1} Y={:.1} R={:.1}",
            self.pitch, self.yaw, self.roll
        )
    }
}

fn normalize_axis(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}
