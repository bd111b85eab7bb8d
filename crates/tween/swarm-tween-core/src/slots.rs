//! Structure-of-arrays slot table shared by both schedulers.

use swarm_api_core::{Space, SpatialTargets, TargetId};

use crate::channels::{TweenFloat3, TweenRotation};
use crate::lifetime::TweenLifetime;
use crate::pipeline::SlotJob;
use crate::state::{ChannelFlags, SpaceFlags, TransformState};
use crate::store::DynamicStore;

/// One slot's worth of values, used only to append.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SlotRecord {
    pub target: TargetId,
    pub state: TransformState,
    pub position: TweenFloat3,
    pub rotation: TweenRotation,
    pub scale: TweenFloat3,
    pub position_clock: TweenLifetime,
    pub rotation_clock: TweenLifetime,
    pub scale_clock: TweenLifetime,
}

/// Parallel arenas addressed by slot index. Every mutation touches all of
/// them so they always have the same length.
pub(crate) struct SlotTable {
    pub targets: DynamicStore<TargetId>,
    pub states: DynamicStore<TransformState>,
    pub positions: DynamicStore<TweenFloat3>,
    pub rotations: DynamicStore<TweenRotation>,
    pub scales: DynamicStore<TweenFloat3>,
    pub position_clocks: DynamicStore<TweenLifetime>,
    pub rotation_clocks: DynamicStore<TweenLifetime>,
    pub scale_clocks: DynamicStore<TweenLifetime>,
}

impl SlotTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: DynamicStore::with_capacity(capacity),
            states: DynamicStore::with_capacity(capacity),
            positions: DynamicStore::with_capacity(capacity),
            rotations: DynamicStore::with_capacity(capacity),
            scales: DynamicStore::with_capacity(capacity),
            position_clocks: DynamicStore::with_capacity(capacity),
            rotation_clocks: DynamicStore::with_capacity(capacity),
            scale_clocks: DynamicStore::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn push(&mut self, record: SlotRecord) -> usize {
        let index = self.len();
        self.targets.push(record.target);
        self.states.push(record.state);
        self.positions.push(record.position);
        self.rotations.push(record.rotation);
        self.scales.push(record.scale);
        self.position_clocks.push(record.position_clock);
        self.rotation_clocks.push(record.rotation_clock);
        self.scale_clocks.push(record.scale_clock);
        index
    }

    pub fn remove_range(&mut self, start: usize, length: usize) {
        self.targets.remove_range(start, length);
        self.states.remove_range(start, length);
        self.positions.remove_range(start, length);
        self.rotations.remove_range(start, length);
        self.scales.remove_range(start, length);
        self.position_clocks.remove_range(start, length);
        self.rotation_clocks.remove_range(start, length);
        self.scale_clocks.remove_range(start, length);
    }

    pub fn restart_clocks(&mut self, index: usize) {
        self.position_clocks[index].restart();
        self.rotation_clocks[index].restart();
        self.scale_clocks[index].restart();
    }

    /// Snapshot every slot into `job`, reusing its buffers.
    pub fn fill_job(&self, job: &mut SlotJob) {
        fn copy<T: Copy>(dst: &mut Vec<T>, src: &DynamicStore<T>) {
            dst.clear();
            dst.extend_from_slice(src.as_slice());
        }
        copy(&mut job.states, &self.states);
        copy(&mut job.positions, &self.positions);
        copy(&mut job.rotations, &self.rotations);
        copy(&mut job.scales, &self.scales);
        copy(&mut job.position_clocks, &self.position_clocks);
        copy(&mut job.rotation_clocks, &self.rotation_clocks);
        copy(&mut job.scale_clocks, &self.scale_clocks);
    }

    /// Copy the advanced states and clocks back over the snapshotted prefix.
    pub fn absorb_job(&mut self, job: &SlotJob) {
        let n = job.len();
        self.states.as_mut_slice()[..n].copy_from_slice(&job.states);
        self.position_clocks.as_mut_slice()[..n].copy_from_slice(&job.position_clocks);
        self.rotation_clocks.as_mut_slice()[..n].copy_from_slice(&job.rotation_clocks);
        self.scale_clocks.as_mut_slice()[..n].copy_from_slice(&job.scale_clocks);
    }

    /// Write this frame's samples to the host. Runs serialized on the calling thread.
    pub fn apply(&self, job: &SlotJob, targets: &mut dyn SpatialTargets) {
        for (i, sample) in job.samples.iter().enumerate() {
            if sample.channels.is_empty() {
                continue;
            }
            let target = self.targets[i];
            let space = job.states[i].space;
            if sample.channels.contains(ChannelFlags::MOVEMENT) {
                let s = space_of(space, SpaceFlags::WORLD_MOVEMENT);
                targets.set_position(target, s, sample.position);
            }
            if sample.channels.contains(ChannelFlags::ROTATION) {
                let s = space_of(space, SpaceFlags::WORLD_ROTATION);
                targets.set_rotation(target, s, sample.rotation);
            }
            if sample.channels.contains(ChannelFlags::SCALING) {
                targets.set_local_scale(target, sample.scale);
            }
        }
    }
}

#[inline]
fn space_of(flags: SpaceFlags, world_bit: SpaceFlags) -> Space {
    if flags.contains(world_bit) {
        Space::World
    } else {
        Space::Local
    }
}

/// Space bits for a request that moves and rotates in `space`.
#[inline]
pub(crate) fn space_flags(space: Space) -> SpaceFlags {
    match space {
        Space::World => SpaceFlags::WORLD_MOVEMENT | SpaceFlags::WORLD_ROTATION,
        Space::Local => SpaceFlags::empty(),
    }
}
