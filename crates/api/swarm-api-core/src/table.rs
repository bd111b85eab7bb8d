//! In-memory transform hierarchy implementing [`SpatialTargets`].
//!
//! Useful for headless hosts and tests: records carry a local transform and an
//! optional parent, and world-space reads/writes are resolved through the
//! parent chain.

use glam::{Affine3A, Quat, Vec3};
use hashbrown::HashMap;

use crate::target::{Space, SpatialTargets, TargetId};

/// Local transform of one target plus its parent link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformRecord {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub parent: Option<TargetId>,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parent: None,
        }
    }
}

impl TransformRecord {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    #[inline]
    fn local_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Default)]
pub struct TransformTable {
    records: HashMap<TargetId, TransformRecord>,
    next_id: u64,
}

impl TransformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under a freshly allocated id.
    pub fn insert(&mut self, record: TransformRecord) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.records.insert(id, record);
        id
    }

    pub fn spawn_at(&mut self, translation: Vec3) -> TargetId {
        self.insert(TransformRecord::from_translation(translation))
    }

    pub fn get(&self, id: TargetId) -> Option<&TransformRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut TransformRecord> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<TransformRecord> {
        self.records.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-parent `child`. Returns false (and changes nothing) when either id is
    /// unknown or the link would create a cycle.
    pub fn set_parent(&mut self, child: TargetId, parent: Option<TargetId>) -> bool {
        if !self.records.contains_key(&child) {
            return false;
        }
        if let Some(p) = parent {
            if !self.records.contains_key(&p) {
                return false;
            }
            let mut cursor = Some(p);
            for _ in 0..self.records.len() {
                let Some(id) = cursor else {
                    break;
                };
                if id == child {
                    return false;
                }
                cursor = self.records.get(&id).and_then(|r| r.parent);
            }
        }
        if let Some(record) = self.records.get_mut(&child) {
            record.parent = parent;
        }
        true
    }

    /// World transform of `id`. A dangling parent link is treated as a root.
    ///
    /// The walk visits at most `len()` ancestors, so a cycle written through
    /// [`TransformTable::get_mut`] ends instead of recursing forever.
    pub fn world_affine(&self, id: TargetId) -> Option<Affine3A> {
        let record = self.records.get(&id)?;
        let mut world = record.local_affine();
        let mut parent = record.parent;
        for _ in 0..self.records.len() {
            let Some(record) = parent.and_then(|p| self.records.get(&p)) else {
                break;
            };
            world = record.local_affine() * world;
            parent = record.parent;
        }
        Some(world)
    }

    fn parent_affine(&self, id: TargetId) -> Option<Affine3A> {
        self.records
            .get(&id)
            .and_then(|r| r.parent)
            .and_then(|p| self.world_affine(p))
    }
}

impl SpatialTargets for TransformTable {
    fn position(&self, target: TargetId, space: Space) -> Option<Vec3> {
        match space {
            Space::Local => self.records.get(&target).map(|r| r.translation),
            Space::World => self
                .world_affine(target)
                .map(|world| Vec3::from(world.translation)),
        }
    }

    fn set_position(&mut self, target: TargetId, space: Space, value: Vec3) {
        let local = match (space, self.parent_affine(target)) {
            (Space::World, Some(parent)) => parent.inverse().transform_point3(value),
            _ => value,
        };
        if let Some(record) = self.records.get_mut(&target) {
            record.translation = local;
        }
    }

    fn rotation(&self, target: TargetId, space: Space) -> Option<Quat> {
        match space {
            Space::Local => self.records.get(&target).map(|r| r.rotation),
            Space::World => self
                .world_affine(target)
                .map(|world| world.to_scale_rotation_translation().1),
        }
    }

    fn set_rotation(&mut self, target: TargetId, space: Space, value: Quat) {
        let local = match (space, self.parent_affine(target)) {
            (Space::World, Some(parent)) => {
                let (_, parent_rotation, _) = parent.to_scale_rotation_translation();
                parent_rotation.inverse() * value
            }
            _ => value,
        };
        if let Some(record) = self.records.get_mut(&target) {
            record.rotation = local.normalize();
        }
    }

    fn local_scale(&self, target: TargetId) -> Option<Vec3> {
        self.records.get(&target).map(|r| r.scale)
    }

    fn set_local_scale(&mut self, target: TargetId, value: Vec3) {
        if let Some(record) = self.records.get_mut(&target) {
            record.scale = value;
        }
    }
}
