//! Channel endpoints and their interpolation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use swarm_api_core::{from_euler_degrees, wrap_degrees};

/// How a rotation channel interpolates.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RotateMode {
    /// Quaternion lerp between two orientations.
    #[default]
    XYZ,
    /// Sweep an angle around one Euler axis.
    X,
    Y,
    Z,
}

impl RotateMode {
    #[inline]
    pub fn is_single_axis(self) -> bool {
        !matches!(self, RotateMode::XYZ)
    }
}

/// From/to pair for a vector channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TweenFloat3 {
    pub from: Vec3,
    pub to: Vec3,
}

impl TweenFloat3 {
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    /// Reversed passes swap the endpoints.
    #[inline]
    pub fn sample(&self, ease: f32, reversed: bool) -> Vec3 {
        let (a, b) = if reversed {
            (self.to, self.from)
        } else {
            (self.from, self.to)
        };
        a.lerp(b, ease)
    }
}

/// Rotation endpoints. Single-axis sweeps keep the starting Euler angles and
/// the swept angle instead of two orientations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TweenRotation {
    pub from: Quat,
    pub to: Quat,
    pub from_euler: Vec3,
    pub angle: f32,
}

impl Default for TweenRotation {
    fn default() -> Self {
        Self {
            from: Quat::IDENTITY,
            to: Quat::IDENTITY,
            from_euler: Vec3::ZERO,
            angle: 0.0,
        }
    }
}

impl TweenRotation {
    pub fn between(from: Quat, to: Quat) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn sweep(from_euler: Vec3, angle: f32) -> Self {
        Self {
            from_euler,
            angle,
            ..Self::default()
        }
    }

    pub fn sample(&self, ease: f32, reversed: bool, mode: RotateMode) -> Quat {
        let axis = match mode {
            RotateMode::XYZ => {
                let (a, b) = if reversed {
                    (self.to, self.from)
                } else {
                    (self.from, self.to)
                };
                return a.lerp(b, ease.clamp(0.0, 1.0));
            }
            RotateMode::X => 0,
            RotateMode::Y => 1,
            RotateMode::Z => 2,
        };
        let ease = if reversed { 1.0 - ease } else { ease };
        let mut euler = self.from_euler;
        euler[axis] = wrap_degrees(euler[axis] + self.angle * ease);
        from_euler_degrees(euler)
    }
}
