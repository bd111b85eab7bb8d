//! Entity transforms as tween targets.
//!
//! A [`TargetId`] is the entity's bit pattern, so ids stay valid exactly as
//! long as the entity does. World-space access composes local transforms up
//! the `Parent` chain instead of reading `GlobalTransform`, which lags until
//! propagation runs.

use bevy::math::Affine3A;
use bevy::prelude::*;
use swarm_api_core::{Space, SpatialTargets, TargetId};

pub fn target_id(entity: Entity) -> TargetId {
    TargetId(entity.to_bits())
}

pub fn entity_of(target: TargetId) -> Option<Entity> {
    Entity::try_from_bits(target.0).ok()
}

pub type TransformQuery<'w, 's> = Query<'w, 's, (&'static mut Transform, Option<&'static Parent>)>;

pub struct EntityTargets<'a, 'w, 's> {
    transforms: &'a mut TransformQuery<'w, 's>,
}

impl<'a, 'w, 's> EntityTargets<'a, 'w, 's> {
    pub fn new(transforms: &'a mut TransformQuery<'w, 's>) -> Self {
        Self { transforms }
    }

    fn world_affine(&self, entity: Entity) -> Option<Affine3A> {
        let (transform, parent) = self.transforms.get(entity).ok()?;
        let local = transform.compute_affine();
        match parent.and_then(|p| self.world_affine(p.get())) {
            Some(parent) => Some(parent * local),
            None => Some(local),
        }
    }

    fn parent_affine(&self, entity: Entity) -> Option<Affine3A> {
        let (_, parent) = self.transforms.get(entity).ok()?;
        parent.and_then(|p| self.world_affine(p.get()))
    }

    fn transform_mut(&mut self, target: TargetId) -> Option<Mut<'_, Transform>> {
        let entity = entity_of(target)?;
        self.transforms.get_mut(entity).ok().map(|(transform, _)| transform)
    }
}

impl SpatialTargets for EntityTargets<'_, '_, '_> {
    fn position(&self, target: TargetId, space: Space) -> Option<Vec3> {
        let entity = entity_of(target)?;
        match space {
            Space::Local => self.transforms.get(entity).ok().map(|(t, _)| t.translation),
            Space::World => self
                .world_affine(entity)
                .map(|world| Vec3::from(world.translation)),
        }
    }

    fn set_position(&mut self, target: TargetId, space: Space, value: Vec3) {
        let Some(entity) = entity_of(target) else {
            return;
        };
        let local = match (space, self.parent_affine(entity)) {
            (Space::World, Some(parent)) => parent.inverse().transform_point3(value),
            _ => value,
        };
        if let Some(mut transform) = self.transform_mut(target) {
            transform.translation = local;
        }
    }

    fn rotation(&self, target: TargetId, space: Space) -> Option<Quat> {
        let entity = entity_of(target)?;
        match space {
            Space::Local => self.transforms.get(entity).ok().map(|(t, _)| t.rotation),
            Space::World => self
                .world_affine(entity)
                .map(|world| world.to_scale_rotation_translation().1),
        }
    }

    fn set_rotation(&mut self, target: TargetId, space: Space, value: Quat) {
        let Some(entity) = entity_of(target) else {
            return;
        };
        let local = match (space, self.parent_affine(entity)) {
            (Space::World, Some(parent)) => {
                let (_, parent_rotation, _) = parent.to_scale_rotation_translation();
                parent_rotation.inverse() * value
            }
            _ => value,
        };
        if let Some(mut transform) = self.transform_mut(target) {
            transform.rotation = local.normalize();
        }
    }

    fn local_scale(&self, target: TargetId) -> Option<Vec3> {
        let entity = entity_of(target)?;
        self.transforms.get(entity).ok().map(|(t, _)| t.scale)
    }

    fn set_local_scale(&mut self, target: TargetId, value: Vec3) {
        if let Some(mut transform) = self.transform_mut(target) {
            transform.scale = value;
        }
    }
}
