//! Engine: owns both schedulers and exposes the request surface and the
//! two-phase frame.
//!
//! Per frame the host calls [`TweenEngine::early_update`] (commands, start
//! events, compute dispatch) and later [`TweenEngine::late_update`] (join,
//! apply, complete events, recycling). Anything the host does in between
//! overlaps with the compute phase.

use std::ops::Range;

use glam::{Quat, Vec3};
use swarm_api_core::{SpatialTargets, TargetId};

use crate::batch::BatchTweener;
use crate::channels::{RotateMode, TweenFloat3, TweenRotation};
use crate::collections::{TweenSequence, TweenSet};
use crate::config::Config;
use crate::error::{check_range, TweenError};
use crate::handle::TweenHandle;
use crate::lifetime::TweenLifetime;
use crate::options::TweenOptions;
use crate::outputs::{Outputs, TweenStats};
use crate::single::SingleTweener;
use crate::slots::{space_flags, SlotRecord};
use crate::state::{ChannelFlags, SpaceFlags, StateFlags, TransformState};

/// Endpoint slices for a batch that drives every channel.
#[derive(Clone, Copy, Debug)]
pub struct TransformEndpoints<'a> {
    pub from_positions: &'a [Vec3],
    pub to_positions: &'a [Vec3],
    pub from_rotations: &'a [Quat],
    pub to_rotations: &'a [Quat],
    pub from_scales: &'a [Vec3],
    pub to_scales: &'a [Vec3],
}

pub struct TweenEngine {
    cfg: Config,
    single: SingleTweener,
    batch: BatchTweener,
    outputs: Outputs,
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn record(
    target: TargetId,
    channels: ChannelFlags,
    space: SpaceFlags,
    rotate_mode: RotateMode,
    clock: TweenLifetime,
) -> SlotRecord {
    SlotRecord {
        target,
        state: TransformState {
            flags: StateFlags::empty(),
            channels,
            space,
            rotate_mode,
        },
        position: TweenFloat3::default(),
        rotation: TweenRotation::default(),
        scale: TweenFloat3::default(),
        position_clock: clock,
        rotation_clock: clock,
        scale_clock: clock,
    }
}

fn check_batch<T>(
    what: &'static str,
    slice: &[T],
    range: &Range<usize>,
) -> Result<(), TweenError> {
    check_range(what, slice, range.start, range.len())
}

impl TweenEngine {
    pub fn new(cfg: Config) -> Self {
        Self {
            single: SingleTweener::new(&cfg),
            batch: BatchTweener::new(&cfg),
            cfg,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn single(&self) -> &SingleTweener {
        &self.single
    }

    pub fn batch(&self) -> &BatchTweener {
        &self.batch
    }

    pub fn stats(&self) -> TweenStats {
        TweenStats {
            single_slots: self.single.len(),
            batch_slots: self.batch.slot_count(),
            batches: self.batch.len(),
            live_handles: self.single.live_handles() + self.batch.live_handles(),
        }
    }

    /// Events of the most recent frame.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // ---- single-target requests ----

    pub fn move_to(
        &mut self,
        target: TargetId,
        from: Vec3,
        to: Vec3,
        duration: f32,
        opts: TweenOptions,
    ) -> Option<TweenHandle> {
        let space = space_flags(opts.space) & SpaceFlags::WORLD_MOVEMENT;
        let mut slot = record(
            target,
            ChannelFlags::MOVEMENT,
            space,
            RotateMode::XYZ,
            opts.lifetime(duration),
        );
        slot.position = TweenFloat3::new(from, to);
        self.single.add(slot, opts)
    }

    /// Scale is always local.
    pub fn scale_to(
        &mut self,
        target: TargetId,
        from: Vec3,
        to: Vec3,
        duration: f32,
        opts: TweenOptions,
    ) -> Option<TweenHandle> {
        let mut slot = record(
            target,
            ChannelFlags::SCALING,
            SpaceFlags::empty(),
            RotateMode::XYZ,
            opts.lifetime(duration),
        );
        slot.scale = TweenFloat3::new(from, to);
        self.single.add(slot, opts)
    }

    pub fn rotate_to(
        &mut self,
        target: TargetId,
        from: Quat,
        to: Quat,
        duration: f32,
        opts: TweenOptions,
    ) -> Option<TweenHandle> {
        let space = space_flags(opts.space) & SpaceFlags::WORLD_ROTATION;
        let mut slot = record(
            target,
            ChannelFlags::ROTATION,
            space,
            RotateMode::XYZ,
            opts.lifetime(duration),
        );
        slot.rotation = TweenRotation::between(from, to);
        self.single.add(slot, opts)
    }

    /// Sweep `angle` degrees around one Euler axis, starting from the
    /// target's current angles in `opts.space`.
    pub fn rotate_on_axis(
        &mut self,
        targets: &dyn SpatialTargets,
        target: TargetId,
        angle: f32,
        duration: f32,
        axis: RotateMode,
        opts: TweenOptions,
    ) -> Result<Option<TweenHandle>, TweenError> {
        if !axis.is_single_axis() {
            return Err(TweenError::InvalidRotateMode(axis));
        }
        let from_euler = targets
            .euler_angles(target, opts.space)
            .ok_or(TweenError::UnknownTarget(target))?;
        let space = space_flags(opts.space) & SpaceFlags::WORLD_ROTATION;
        let mut slot = record(
            target,
            ChannelFlags::ROTATION,
            space,
            axis,
            opts.lifetime(duration),
        );
        slot.rotation = TweenRotation::sweep(from_euler, angle);
        Ok(self.single.add(slot, opts))
    }

    // ---- batch requests ----

    pub fn batch_move(
        &mut self,
        targets: &[TargetId],
        from: &[Vec3],
        to: &[Vec3],
        range: Range<usize>,
        duration: f32,
        opts: TweenOptions,
    ) -> Result<Option<TweenHandle>, TweenError> {
        check_batch("targets", targets, &range)?;
        check_batch("from positions", from, &range)?;
        check_batch("to positions", to, &range)?;
        let clock = opts.lifetime(duration);
        let space = space_flags(opts.space) & SpaceFlags::WORLD_MOVEMENT;
        let slots = range.map(|i| {
            let mut slot = record(targets[i], ChannelFlags::MOVEMENT, space, RotateMode::XYZ, clock);
            slot.position = TweenFloat3::new(from[i], to[i]);
            slot
        });
        Ok(self.batch.add(slots, clock, opts))
    }

    pub fn batch_scale(
        &mut self,
        targets: &[TargetId],
        from: &[Vec3],
        to: &[Vec3],
        range: Range<usize>,
        duration: f32,
        opts: TweenOptions,
    ) -> Result<Option<TweenHandle>, TweenError> {
        check_batch("targets", targets, &range)?;
        check_batch("from scales", from, &range)?;
        check_batch("to scales", to, &range)?;
        let clock = opts.lifetime(duration);
        let slots = range.map(|i| {
            let mut slot = record(
                targets[i],
                ChannelFlags::SCALING,
                SpaceFlags::empty(),
                RotateMode::XYZ,
                clock,
            );
            slot.scale = TweenFloat3::new(from[i], to[i]);
            slot
        });
        Ok(self.batch.add(slots, clock, opts))
    }

    pub fn batch_rotate(
        &mut self,
        targets: &[TargetId],
        from: &[Quat],
        to: &[Quat],
        range: Range<usize>,
        duration: f32,
        opts: TweenOptions,
    ) -> Result<Option<TweenHandle>, TweenError> {
        check_batch("targets", targets, &range)?;
        check_batch("from rotations", from, &range)?;
        check_batch("to rotations", to, &range)?;
        let clock = opts.lifetime(duration);
        let space = space_flags(opts.space) & SpaceFlags::WORLD_ROTATION;
        let slots = range.map(|i| {
            let mut slot = record(targets[i], ChannelFlags::ROTATION, space, RotateMode::XYZ, clock);
            slot.rotation = TweenRotation::between(from[i], to[i]);
            slot
        });
        Ok(self.batch.add(slots, clock, opts))
    }

    /// One batch driving movement, rotation and scale together.
    pub fn batch_update_all(
        &mut self,
        targets: &[TargetId],
        ends: TransformEndpoints<'_>,
        range: Range<usize>,
        duration: f32,
        opts: TweenOptions,
    ) -> Result<Option<TweenHandle>, TweenError> {
        check_batch("targets", targets, &range)?;
        check_batch("from positions", ends.from_positions, &range)?;
        check_batch("to positions", ends.to_positions, &range)?;
        check_batch("from rotations", ends.from_rotations, &range)?;
        check_batch("to rotations", ends.to_rotations, &range)?;
        check_batch("from scales", ends.from_scales, &range)?;
        check_batch("to scales", ends.to_scales, &range)?;
        let clock = opts.lifetime(duration);
        let space = space_flags(opts.space);
        let channels = ChannelFlags::MOVEMENT | ChannelFlags::ROTATION | ChannelFlags::SCALING;
        let slots = range.map(|i| {
            let mut slot = record(targets[i], channels, space, RotateMode::XYZ, clock);
            slot.position = TweenFloat3::new(ends.from_positions[i], ends.to_positions[i]);
            slot.rotation = TweenRotation::between(ends.from_rotations[i], ends.to_rotations[i]);
            slot.scale = TweenFloat3::new(ends.from_scales[i], ends.to_scales[i]);
            slot
        });
        Ok(self.batch.add(slots, clock, opts))
    }

    // ---- aggregates ----

    pub fn new_set(&self) -> TweenSet {
        TweenSet::new()
    }

    pub fn new_sequence(&self) -> TweenSequence {
        TweenSequence::new()
    }

    // ---- frame ----

    /// Drain commands, deliver start events and dispatch the compute phase.
    pub fn early_update(&mut self, dt: f32) {
        self.outputs.clear();
        self.single.early_update(dt, &mut self.outputs);
        self.batch.early_update(dt, &mut self.outputs);
    }

    /// Join the compute phase, write the host, deliver complete events and
    /// recycle finished slots.
    pub fn late_update(&mut self, targets: &mut dyn SpatialTargets) -> &Outputs {
        self.single.late_update(targets, &mut self.outputs);
        self.batch.late_update(targets, &mut self.outputs);
        &self.outputs
    }

    /// Both halves back to back.
    pub fn update(&mut self, dt: f32, targets: &mut dyn SpatialTargets) -> &Outputs {
        self.early_update(dt);
        self.late_update(targets)
    }
}
