use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::{Quat, Vec3};
use swarm_api_core::{from_euler_degrees, Space, SpatialTargets, TransformRecord, TransformTable};
use swarm_tween_core::{
    Config, EaseType, LoopType, RotateMode, TweenEngine, TweenError, TweenEvent, TweenOptions,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_vec(a: Vec3, b: Vec3, eps: f32) {
    assert!((a - b).length() <= eps, "left={a:?} right={b:?} eps={eps}");
}

/// Same orientation up to quaternion sign, compared through the dot product.
fn approx_quat(a: Quat, b: Quat, eps: f32) {
    assert!(1.0 - a.dot(b).abs() <= eps, "left={a:?} right={b:?} eps={eps}");
}

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&hits);
    (hits, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn linear_move_is_halfway_after_half_duration() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    let handle = engine.move_to(
        target,
        Vec3::ZERO,
        Vec3::new(10.0, 0.0, 0.0),
        2.0,
        TweenOptions::new(),
    );
    assert!(handle.is_none());

    engine.update(1.0, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 5.0, 1e-5);

    engine.update(1.0, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 10.0, 1e-5);
    // fire-and-forget tweens are gone the frame they complete
    assert_eq!(engine.stats().single_slots, 0);
}

#[test]
fn handle_tween_waits_for_play_and_starts_once() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let (starts, on_start) = counter();

    let handle = engine
        .move_to(
            target,
            Vec3::ZERO,
            Vec3::ONE,
            1.0,
            TweenOptions::new().with_handle(),
        )
        .expect("handle requested");
    handle.on_started(on_start);
    assert!(handle.is_paused());

    engine.update(0.25, &mut table);
    assert_eq!(starts.load(Ordering::SeqCst), 0);
    approx_vec(table.position(target, Space::World).unwrap(), Vec3::ZERO, 1e-6);

    handle.play();
    engine.update(0.25, &mut table);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert!(engine.outputs().started().any(|k| k == handle.key()));
    assert!(handle.is_playing());

    engine.update(0.25, &mut table);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    approx_vec(table.position(target, Space::World).unwrap(), Vec3::splat(0.5), 1e-5);
}

#[test]
fn handle_tween_survives_completion_until_recycled() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let (completes, on_complete) = counter();

    let handle = engine
        .move_to(
            target,
            Vec3::ZERO,
            Vec3::X,
            0.5,
            TweenOptions::new().with_handle(),
        )
        .unwrap();
    handle.on_completed(on_complete);
    handle.play();

    engine.update(1.0, &mut table);
    assert!(handle.is_completed());
    assert!(handle.is_live());
    assert_eq!(completes.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stats().single_slots, 1);

    // restart replays from the start and completes again
    handle.restart();
    engine.update(0.25, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 0.5, 1e-5);
    engine.update(0.25, &mut table);
    assert_eq!(completes.load(Ordering::SeqCst), 2);

    handle.recycle();
    engine.update(0.0, &mut table);
    assert!(!handle.is_live());
    assert_eq!(engine.stats().single_slots, 0);
    assert_eq!(engine.stats().live_handles, 0);
    // recycling never reports completion
    assert_eq!(completes.load(Ordering::SeqCst), 2);
}

#[test]
fn commands_on_recycled_handle_are_dropped() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    let handle = engine
        .move_to(target, Vec3::ZERO, Vec3::X, 1.0, TweenOptions::new().with_handle())
        .unwrap();
    handle.recycle();
    engine.update(0.1, &mut table);
    assert!(!handle.is_live());

    handle.play();
    let out = engine.update(0.1, &mut table);
    assert!(out.events.iter().any(|e| matches!(
        e,
        TweenEvent::CommandDropped { handle: key, .. } if *key == handle.key()
    )));
    assert_eq!(engine.stats().single_slots, 0);
}

#[test]
fn stale_handle_does_not_alias_reused_record() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let a = table.spawn_at(Vec3::ZERO);
    let b = table.spawn_at(Vec3::ZERO);

    let old = engine
        .move_to(a, Vec3::ZERO, Vec3::X, 1.0, TweenOptions::new().with_handle())
        .unwrap();
    old.recycle();
    engine.update(0.0, &mut table);

    let fresh = engine
        .move_to(b, Vec3::ZERO, Vec3::X, 1.0, TweenOptions::new().with_handle())
        .unwrap();
    assert_eq!(fresh.key().index, old.key().index);

    old.play();
    engine.update(0.5, &mut table);
    assert!(fresh.is_paused());
    approx_vec(table.position(b, Space::World).unwrap(), Vec3::ZERO, 1e-6);
}

#[test]
fn pause_freezes_and_play_resumes() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    let handle = engine
        .move_to(target, Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 4.0, TweenOptions::new().with_handle())
        .unwrap();
    handle.play();
    engine.update(1.0, &mut table);
    handle.pause();
    engine.update(1.0, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 1.0, 1e-5);
    handle.play();
    engine.update(1.0, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 2.0, 1e-5);
}

#[test]
fn stop_reports_completion_without_recycling() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    let handle = engine
        .move_to(target, Vec3::ZERO, Vec3::X, 10.0, TweenOptions::new().with_handle())
        .unwrap();
    handle.play();
    engine.update(1.0, &mut table);
    handle.stop();
    let out = engine.update(1.0, &mut table);
    assert!(out.completed().any(|k| k == handle.key()));
    assert!(handle.is_completed());
    assert!(handle.is_live());
}

#[test]
fn creation_callbacks_fire_for_fire_and_forget_tweens() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let (starts, on_start) = counter();
    let (completes, on_complete) = counter();

    let handle = engine.scale_to(
        target,
        Vec3::ONE,
        Vec3::splat(3.0),
        1.0,
        TweenOptions::new().on_start(on_start).on_complete(on_complete),
    );
    assert!(handle.is_none());

    engine.update(0.5, &mut table);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    approx_vec(table.local_scale(target).unwrap(), Vec3::splat(2.0), 1e-5);

    engine.update(0.5, &mut table);
    assert_eq!(completes.load(Ordering::SeqCst), 1);
    let stats = engine.stats();
    assert_eq!(stats.single_slots, 0);
    assert_eq!(stats.live_handles, 0);
}

#[test]
fn recycling_is_capped_per_frame_oldest_first() {
    let cfg = Config {
        recycle_per_frame: 500,
        ..Config::inline()
    };
    let mut engine = TweenEngine::new(cfg);
    let mut table = TransformTable::new();
    let targets: Vec<_> = (0..600).map(|_| table.spawn_at(Vec3::ZERO)).collect();
    for &t in &targets {
        engine.move_to(t, Vec3::ZERO, Vec3::X, 0.5, TweenOptions::new());
    }
    // a late long-running tween keeps its slot
    let survivor = table.spawn_at(Vec3::ZERO);
    engine.move_to(survivor, Vec3::ZERO, Vec3::splat(10.0), 10.0, TweenOptions::new());

    engine.update(1.0, &mut table);
    assert_eq!(engine.stats().single_slots, 101);

    engine.update(1.0, &mut table);
    assert_eq!(engine.stats().single_slots, 1);
    // the survivor kept being driven after the slots below it were compacted
    approx_vec(table.position(survivor, Space::World).unwrap(), Vec3::splat(2.0), 1e-4);
}

#[test]
fn local_and_world_space_writes() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let parent = table.spawn_at(Vec3::new(100.0, 0.0, 0.0));
    let child = table.spawn_at(Vec3::ZERO);
    table.set_parent(child, Some(parent));

    engine.move_to(
        child,
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        1.0,
        TweenOptions::new().space(Space::Local),
    );
    engine.update(1.0, &mut table);
    approx_vec(table.get(child).unwrap().translation, Vec3::new(2.0, 0.0, 0.0), 1e-5);

    engine.move_to(
        child,
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        1.0,
        TweenOptions::new().space(Space::World),
    );
    engine.update(1.0, &mut table);
    approx_vec(table.get(child).unwrap().translation, Vec3::new(-98.0, 0.0, 0.0), 1e-4);
}

#[test]
fn rotate_between_orientations() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let to = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

    engine.rotate_to(target, Quat::IDENTITY, to, 1.0, TweenOptions::new());
    engine.update(1.0, &mut table);
    let got = table.rotation(target, Space::World).unwrap();
    approx_quat(got, to, 1e-6);
}

#[test]
fn overshooting_ease_does_not_rotate_past_the_endpoints() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let to = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

    engine.rotate_to(
        target,
        Quat::IDENTITY,
        to,
        1.0,
        TweenOptions::new().ease(EaseType::BackIn),
    );
    // BackIn dips below zero early in the pass
    assert!(EaseType::BackIn.evaluate(0.2, 1.0) < 0.0);
    engine.update(0.2, &mut table);
    let got = table.rotation(target, Space::World).unwrap();
    approx_quat(got, Quat::IDENTITY, 1e-6);
}

#[test]
fn rotate_on_axis_sweeps_from_current_angles() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.insert(TransformRecord {
        rotation: from_euler_degrees(Vec3::new(0.0, 30.0, 0.0)),
        ..TransformRecord::default()
    });

    engine
        .rotate_on_axis(&table, target, 60.0, 2.0, RotateMode::Y, TweenOptions::new())
        .unwrap();
    engine.update(1.0, &mut table);
    let euler = table.euler_angles(target, Space::World).unwrap();
    approx(euler.y, 60.0, 1e-2);
    engine.update(1.0, &mut table);
    let euler = table.euler_angles(target, Space::World).unwrap();
    approx(euler.y, 90.0, 1e-2);
}

#[test]
fn rotate_on_axis_rejects_all_axis_mode_and_unknown_targets() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    let err = engine
        .rotate_on_axis(&table, target, 90.0, 1.0, RotateMode::XYZ, TweenOptions::new())
        .unwrap_err();
    assert_eq!(err, TweenError::InvalidRotateMode(RotateMode::XYZ));

    table.remove(target);
    let err = engine
        .rotate_on_axis(&table, target, 90.0, 1.0, RotateMode::Z, TweenOptions::new())
        .unwrap_err();
    assert_eq!(err, TweenError::UnknownTarget(target));
    assert_eq!(engine.stats().single_slots, 0);
}

#[test]
fn restart_loops_replay_and_complete_after_all_passes() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);
    let (completes, on_complete) = counter();

    engine.move_to(
        target,
        Vec3::ZERO,
        Vec3::X,
        1.0,
        TweenOptions::new()
            .looping(LoopType::Restart, 2)
            .on_complete(on_complete),
    );
    for _ in 0..2 {
        engine.update(1.0, &mut table);
        assert_eq!(completes.load(Ordering::SeqCst), 0);
    }
    engine.update(1.0, &mut table);
    assert_eq!(completes.load(Ordering::SeqCst), 1);
}

#[test]
fn eased_values_follow_curve() {
    let mut engine = TweenEngine::new(Config::inline());
    let mut table = TransformTable::new();
    let target = table.spawn_at(Vec3::ZERO);

    engine.move_to(
        target,
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
        1.0,
        TweenOptions::new().ease(EaseType::QuadIn),
    );
    engine.update(0.5, &mut table);
    approx(table.position(target, Space::World).unwrap().x, 0.25, 1e-5);
}

#[test]
fn parallel_dispatch_matches_inline() {
    let mut parallel = TweenEngine::new(Config {
        batch_size: 8,
        ..Config::default()
    });
    let mut inline = TweenEngine::new(Config::inline());
    let mut table_a = TransformTable::new();
    let mut table_b = TransformTable::new();
    for i in 0..300 {
        let a = table_a.spawn_at(Vec3::ZERO);
        let b = table_b.spawn_at(Vec3::ZERO);
        let to = Vec3::splat(i as f32);
        let opts = || TweenOptions::new().ease(EaseType::SineInOut);
        parallel.move_to(a, Vec3::ZERO, to, 3.0, opts());
        inline.move_to(b, Vec3::ZERO, to, 3.0, opts());
    }
    for _ in 0..2 {
        parallel.update(1.0, &mut table_a);
        inline.update(1.0, &mut table_b);
    }
    for i in 0..300u64 {
        let id = swarm_api_core::TargetId(i);
        assert_eq!(
            table_a.position(id, Space::World),
            table_b.position(id, Space::World)
        );
    }
}

#[test]
fn slots_added_from_outside_a_frame_wait_for_the_next_one() {
    let mut engine = TweenEngine::new(Config::default());
    let mut table = TransformTable::new();
    let first = table.spawn_at(Vec3::ZERO);
    let second = table.spawn_at(Vec3::ZERO);

    engine.move_to(first, Vec3::ZERO, Vec3::X, 2.0, TweenOptions::new());
    engine.early_update(1.0);
    // added while the compute phase may still be running
    engine.move_to(second, Vec3::ZERO, Vec3::X, 2.0, TweenOptions::new());
    engine.late_update(&mut table);

    approx(table.position(first, Space::World).unwrap().x, 0.5, 1e-5);
    approx(table.position(second, Space::World).unwrap().x, 0.0, 1e-6);

    engine.update(1.0, &mut table);
    approx(table.position(second, Space::World).unwrap().x, 0.5, 1e-5);
}
