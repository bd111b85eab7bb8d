use glam::{Quat, Vec3};
use swarm_api_core::{Space, SpatialTargets, TransformRecord, TransformTable};

fn approx_vec(a: Vec3, b: Vec3, eps: f32) {
    assert!((a - b).length() <= eps, "left={a:?} right={b:?} eps={eps}");
}

/// Same orientation up to quaternion sign, compared through the dot product.
fn approx_quat(a: Quat, b: Quat, eps: f32) {
    assert!(1.0 - a.dot(b).abs() <= eps, "left={a:?} right={b:?} eps={eps}");
}

#[test]
fn world_position_composes_parent_chain() {
    let mut table = TransformTable::new();
    let root = table.spawn_at(Vec3::new(10.0, 0.0, 0.0));
    let child = table.spawn_at(Vec3::new(0.0, 2.0, 0.0));
    assert!(table.set_parent(child, Some(root)));

    approx_vec(
        table.position(child, Space::World).unwrap(),
        Vec3::new(10.0, 2.0, 0.0),
        1e-5,
    );
    approx_vec(
        table.position(child, Space::Local).unwrap(),
        Vec3::new(0.0, 2.0, 0.0),
        1e-5,
    );
}

#[test]
fn world_write_under_scaled_parent_resolves_local() {
    let mut table = TransformTable::new();
    let root = table.insert(TransformRecord {
        translation: Vec3::new(1.0, 0.0, 0.0),
        scale: Vec3::splat(2.0),
        ..TransformRecord::default()
    });
    let child = table.spawn_at(Vec3::ZERO);
    table.set_parent(child, Some(root));

    table.set_position(child, Space::World, Vec3::new(5.0, 0.0, 0.0));
    approx_vec(table.get(child).unwrap().translation, Vec3::new(2.0, 0.0, 0.0), 1e-5);
    approx_vec(
        table.position(child, Space::World).unwrap(),
        Vec3::new(5.0, 0.0, 0.0),
        1e-5,
    );
}

#[test]
fn world_rotation_write_cancels_parent_rotation() {
    let mut table = TransformTable::new();
    let root = table.insert(TransformRecord {
        rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ..TransformRecord::default()
    });
    let child = table.spawn_at(Vec3::ZERO);
    table.set_parent(child, Some(root));

    table.set_rotation(child, Space::World, Quat::IDENTITY);
    let world = table.rotation(child, Space::World).unwrap();
    approx_quat(world, Quat::IDENTITY, 1e-6);
}

#[test]
fn set_parent_rejects_cycles_and_unknown_ids() {
    let mut table = TransformTable::new();
    let a = table.spawn_at(Vec3::ZERO);
    let b = table.spawn_at(Vec3::ZERO);
    assert!(table.set_parent(b, Some(a)));
    assert!(!table.set_parent(a, Some(b)));
    assert!(!table.set_parent(a, Some(swarm_api_core::TargetId(999))));
    assert_eq!(table.get(a).unwrap().parent, None);
}

#[test]
fn parent_cycles_from_direct_edits_stay_bounded() {
    let mut table = TransformTable::new();
    let a = table.spawn_at(Vec3::X);
    let b = table.spawn_at(Vec3::Y);
    let c = table.spawn_at(Vec3::Z);
    table.get_mut(a).unwrap().parent = Some(b);
    table.get_mut(b).unwrap().parent = Some(a);

    let world = table.position(a, Space::World).unwrap();
    assert!(world.is_finite(), "got {world:?}");
    assert!(table.rotation(b, Space::World).is_some());
    table.set_position(a, Space::World, Vec3::ZERO);
    assert!(table.set_parent(c, Some(a)));
    assert!(table.world_affine(c).is_some());
}

#[test]
fn writes_to_missing_targets_are_ignored() {
    let mut table = TransformTable::new();
    let id = table.spawn_at(Vec3::ONE);
    table.remove(id);
    table.set_local_scale(id, Vec3::splat(3.0));
    assert!(table.local_scale(id).is_none());
    assert!(table.is_empty());
}

#[test]
fn euler_angles_default_reads_rotation() {
    let mut table = TransformTable::new();
    let id = table.insert(TransformRecord {
        rotation: swarm_api_core::from_euler_degrees(Vec3::new(0.0, 45.0, 0.0)),
        ..TransformRecord::default()
    });
    approx_vec(
        table.euler_angles(id, Space::Local).unwrap(),
        Vec3::new(0.0, 45.0, 0.0),
        1e-3,
    );
}
