use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::euler::to_euler_degrees;

/// Opaque key naming a spatial target owned by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Coordinate space a read or write is expressed in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Space {
    #[default]
    World,
    Local,
}

impl Space {
    #[inline]
    pub fn is_world(self) -> bool {
        matches!(self, Space::World)
    }
}

/// Read/write access to host transforms.
///
/// Reads return `None` when the host no longer knows the target. Writes to an
/// unknown target are ignored; the tween core keeps running the slot and the
/// host decides what a missing target means.
pub trait SpatialTargets {
    fn position(&self, target: TargetId, space: Space) -> Option<Vec3>;
    fn set_position(&mut self, target: TargetId, space: Space, value: Vec3);

    fn rotation(&self, target: TargetId, space: Space) -> Option<Quat>;
    fn set_rotation(&mut self, target: TargetId, space: Space, value: Quat);

    fn local_scale(&self, target: TargetId) -> Option<Vec3>;
    fn set_local_scale(&mut self, target: TargetId, value: Vec3);

    /// Current Euler angles in degrees, each wrapped into `[0, 360)`.
    fn euler_angles(&self, target: TargetId, space: Space) -> Option<Vec3> {
        self.rotation(target, space).map(to_euler_degrees)
    }
}
