//! Compute phase of the frame: job buffers, kernels and the join handle.
//!
//! `early_update` snapshots the mutable slot data into a job, hands it to the
//! rayon pool (or runs it inline) and returns at once. `late_update` joins the
//! job, copies the advanced clocks and states back and applies the samples.
//! Slots appended between the two calls are not part of the snapshot, so they
//! are untouched until the next frame.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use glam::{Quat, Vec3};
use rayon::prelude::*;

use crate::channels::{TweenFloat3, TweenRotation};
use crate::lifetime::TweenLifetime;
use crate::state::{ChannelFlags, StateFlags, TransformState};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DispatchMode {
    /// Run on the calling thread before `schedule` returns.
    Inline,
    /// Run on the rayon global pool.
    Parallel,
}

struct Completion<T> {
    result: Mutex<Option<T>>,
    ready: Condvar,
}

enum JobState<T> {
    Ready(T),
    Pending(Arc<Completion<T>>),
}

/// Join handle for a scheduled job. The work buffer comes back on `complete`.
pub struct JobHandle<T> {
    state: JobState<T>,
}

/// Run `f` over `work` according to `mode`.
pub fn schedule<T, F>(mode: DispatchMode, mut work: T, f: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&mut T) + Send + 'static,
{
    match mode {
        DispatchMode::Inline => {
            f(&mut work);
            JobHandle {
                state: JobState::Ready(work),
            }
        }
        DispatchMode::Parallel => {
            let completion = Arc::new(Completion {
                result: Mutex::new(None),
                ready: Condvar::new(),
            });
            let signal = Arc::clone(&completion);
            rayon::spawn(move || {
                f(&mut work);
                let mut slot = signal.result.lock().unwrap_or_else(PoisonError::into_inner);
                *slot = Some(work);
                signal.ready.notify_all();
            });
            JobHandle {
                state: JobState::Pending(completion),
            }
        }
    }
}

impl<T> JobHandle<T> {
    pub fn is_finished(&self) -> bool {
        match &self.state {
            JobState::Ready(_) => true,
            JobState::Pending(c) => c
                .result
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
        }
    }

    /// Block until the job is done and take its buffer back.
    pub fn complete(self) -> T {
        match self.state {
            JobState::Ready(work) => work,
            JobState::Pending(completion) => {
                let mut slot = completion
                    .result
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                loop {
                    if let Some(work) = slot.take() {
                        return work;
                    }
                    slot = completion
                        .ready
                        .wait(slot)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Values computed for one slot this frame. `channels` is empty when the
/// slot was not playing, in which case nothing is written to the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformSample {
    pub channels: ChannelFlags,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for TransformSample {
    fn default() -> Self {
        Self {
            channels: ChannelFlags::empty(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Snapshot of a slot table for one compute pass. Buffers are reused frame
/// to frame.
#[derive(Default)]
pub(crate) struct SlotJob {
    pub dt: f32,
    pub batch_size: usize,
    pub parallel: bool,
    pub states: Vec<TransformState>,
    pub positions: Vec<TweenFloat3>,
    pub rotations: Vec<TweenRotation>,
    pub scales: Vec<TweenFloat3>,
    pub position_clocks: Vec<TweenLifetime>,
    pub rotation_clocks: Vec<TweenLifetime>,
    pub scale_clocks: Vec<TweenLifetime>,
    pub samples: Vec<TransformSample>,
}

struct Endpoints<'a> {
    positions: &'a [TweenFloat3],
    rotations: &'a [TweenRotation],
    scales: &'a [TweenFloat3],
}

impl Endpoints<'_> {
    fn process(
        &self,
        i: usize,
        dt: f32,
        state: &mut TransformState,
        clocks: [&mut TweenLifetime; 3],
        sample: &mut TransformSample,
    ) {
        if !state.flags.is_playing() {
            sample.channels = ChannelFlags::empty();
            return;
        }
        let [position_clock, rotation_clock, scale_clock] = clocks;
        let mut finished = true;
        if state.channels.contains(ChannelFlags::MOVEMENT) {
            position_clock.update(dt);
            sample.position =
                self.positions[i].sample(position_clock.ease(), position_clock.is_reversed());
            finished &= position_clock.is_finished();
        }
        if state.channels.contains(ChannelFlags::ROTATION) {
            rotation_clock.update(dt);
            sample.rotation = self.rotations[i].sample(
                rotation_clock.ease(),
                rotation_clock.is_reversed(),
                state.rotate_mode,
            );
            finished &= rotation_clock.is_finished();
        }
        if state.channels.contains(ChannelFlags::SCALING) {
            scale_clock.update(dt);
            sample.scale = self.scales[i].sample(scale_clock.ease(), scale_clock.is_reversed());
            finished &= scale_clock.is_finished();
        }
        sample.channels = state.channels;
        if finished {
            state.flags = state.flags.complete_naturally();
        }
    }
}

impl SlotJob {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn run(&mut self) {
        let dt = self.dt;
        let ends = Endpoints {
            positions: &self.positions,
            rotations: &self.rotations,
            scales: &self.scales,
        };
        self.samples.clear();
        self.samples
            .resize(self.states.len(), TransformSample::default());

        if self.parallel {
            self.states
                .par_iter_mut()
                .zip(self.position_clocks.par_iter_mut())
                .zip(self.rotation_clocks.par_iter_mut())
                .zip(self.scale_clocks.par_iter_mut())
                .zip(self.samples.par_iter_mut())
                .enumerate()
                .with_min_len(self.batch_size.max(1))
                .for_each(|(i, ((((state, pc), rc), sc), sample))| {
                    ends.process(i, dt, state, [pc, rc, sc], sample)
                });
        } else {
            self.states
                .iter_mut()
                .zip(self.position_clocks.iter_mut())
                .zip(self.rotation_clocks.iter_mut())
                .zip(self.scale_clocks.iter_mut())
                .zip(self.samples.iter_mut())
                .enumerate()
                .for_each(|(i, ((((state, pc), rc), sc), sample))| {
                    ends.process(i, dt, state, [pc, rc, sc], sample)
                });
        }
    }
}

/// Snapshot of the batch clocks for one compute pass.
#[derive(Default)]
pub(crate) struct BatchJob {
    pub dt: f32,
    pub parallel: bool,
    pub states: Vec<StateFlags>,
    pub clocks: Vec<TweenLifetime>,
}

#[inline]
fn advance_batch(dt: f32, state: &mut StateFlags, clock: &mut TweenLifetime) {
    if !state.is_playing() {
        return;
    }
    clock.update(dt);
    if clock.is_finished() {
        *state = state.complete_naturally();
    }
}

impl BatchJob {
    pub fn run(&mut self) {
        let dt = self.dt;
        if self.parallel {
            self.states
                .par_iter_mut()
                .zip(self.clocks.par_iter_mut())
                .for_each(|(state, clock)| advance_batch(dt, state, clock));
        } else {
            for (state, clock) in self.states.iter_mut().zip(self.clocks.iter_mut()) {
                advance_batch(dt, state, clock);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::EaseType;
    use crate::lifetime::LoopType;

    fn job_with(parallel: bool, n: usize) -> SlotJob {
        let clock = TweenLifetime::new(2.0, EaseType::Linear, LoopType::None, 0);
        SlotJob {
            dt: 1.0,
            batch_size: 4,
            parallel,
            states: vec![
                TransformState {
                    flags: StateFlags::NO_HANDLE_START,
                    channels: ChannelFlags::MOVEMENT,
                    ..TransformState::default()
                };
                n
            ],
            positions: (0..n)
                .map(|i| TweenFloat3::new(Vec3::ZERO, Vec3::splat(i as f32)))
                .collect(),
            rotations: vec![TweenRotation::default(); n],
            scales: vec![TweenFloat3::default(); n],
            position_clocks: vec![clock; n],
            rotation_clocks: vec![clock; n],
            scale_clocks: vec![clock; n],
            samples: Vec::new(),
        }
    }

    #[test]
    fn parallel_and_inline_agree() {
        let a = schedule(DispatchMode::Parallel, job_with(true, 97), |job| job.run());
        let b = schedule(DispatchMode::Inline, job_with(false, 97), |job| job.run());
        assert!(b.is_finished());
        let (a, b) = (a.complete(), b.complete());
        assert_eq!(a.len(), 97);
        assert_eq!(a.samples, b.samples);
        assert_eq!(a.samples[10].position, Vec3::splat(5.0));
    }

    #[test]
    fn paused_slots_produce_no_sample() {
        let mut job = job_with(false, 2);
        job.states[1].flags = StateFlags::HANDLE_START_PAUSED;
        job.run();
        assert_eq!(job.samples[0].channels, ChannelFlags::MOVEMENT);
        assert!(job.samples[1].channels.is_empty());
        assert_eq!(job.position_clocks[1].current(), 0.0);
    }

    #[test]
    fn slot_completes_when_clock_runs_out() {
        let mut job = job_with(false, 1);
        job.run();
        assert!(job.states[0].flags.is_playing());
        job.run();
        assert!(job.states[0].flags.is_completed());
        assert!(job.states[0].flags.requires_recycling());
    }

    #[test]
    fn batch_clock_completes_batch() {
        let mut job = BatchJob {
            dt: 0.5,
            parallel: false,
            states: vec![StateFlags::HANDLE_START_PLAYING],
            clocks: vec![TweenLifetime::new(1.0, EaseType::Linear, LoopType::None, 0)],
        };
        job.run();
        assert!(job.states[0].is_playing());
        job.run();
        assert!(job.states[0].is_completed());
        assert!(!job.states[0].requires_recycling());
    }
}
