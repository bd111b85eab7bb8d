//! Euler angle conventions.
//!
//! Angles are degrees, applied yaw (Y) then pitch (X) then roll (Z), which is
//! the convention axis-relative rotation sweeps are authored in.

use glam::{EulerRot, Quat, Vec3};

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Build a rotation from `(x, y, z)` Euler angles in degrees.
#[inline]
pub fn from_euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

/// Decompose a rotation into `(x, y, z)` Euler angles in degrees, wrapped into `[0, 360)`.
#[inline]
pub fn to_euler_degrees(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        wrap_degrees(x.to_degrees()),
        wrap_degrees(y.to_degrees()),
        wrap_degrees(z.to_degrees()),
    )
}
