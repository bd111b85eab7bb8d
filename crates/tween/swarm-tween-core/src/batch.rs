//! Scheduler for batches: contiguous slot ranges sharing one clock and one state.
//!
//! A batch owns `[start, start + length)` of the slot table. Slot states are
//! copies of the batch state (refreshed on every command) and slot clocks run
//! in lockstep with the batch clock, which alone decides completion. Removing
//! a batch removes its range and shifts the start of every later batch down.

use log::{debug, trace, warn};
use swarm_api_core::SpatialTargets;

use crate::command::{HandleCommand, QueuedCommand};
use crate::config::Config;
use crate::handle::{HandleTable, Listener, TweenHandle};
use crate::ids::{HandleKey, HandleScope};
use crate::lifetime::TweenLifetime;
use crate::options::TweenOptions;
use crate::outputs::{Outputs, TweenEvent};
use crate::pipeline::{schedule, BatchJob, DispatchMode, JobHandle, SlotJob};
use crate::single::{dispatch_mode, register};
use crate::slots::{SlotRecord, SlotTable};
use crate::state::StateFlags;
use crate::store::DynamicStore;

const SCOPE: HandleScope = HandleScope::Batch;

/// Slot range owned by one batch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BatchRange {
    pub start: usize,
    pub length: usize,
}

pub struct BatchTweener {
    slots: SlotTable,
    ranges: DynamicStore<BatchRange>,
    states: DynamicStore<StateFlags>,
    clocks: DynamicStore<TweenLifetime>,
    keys: DynamicStore<Option<HandleKey>>,
    handles: HandleTable,
    mode: DispatchMode,
    batch_size: usize,
    slot_job: Option<JobHandle<SlotJob>>,
    batch_job: Option<JobHandle<BatchJob>>,
    spare_slots: Option<SlotJob>,
    spare_batches: Option<BatchJob>,
    started: Vec<HandleKey>,
    completed: Vec<HandleKey>,
    retired: Vec<HandleKey>,
}

impl BatchTweener {
    pub fn new(cfg: &Config) -> Self {
        Self {
            slots: SlotTable::with_capacity(cfg.initial_capacity),
            ranges: DynamicStore::new(),
            states: DynamicStore::new(),
            clocks: DynamicStore::new(),
            keys: DynamicStore::new(),
            handles: HandleTable::new(SCOPE, cfg.handle_pool_size),
            mode: dispatch_mode(cfg),
            batch_size: cfg.batch_size,
            slot_job: None,
            batch_job: None,
            spare_slots: None,
            spare_batches: None,
            started: Vec::new(),
            completed: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn live_handles(&self) -> usize {
        self.handles.live()
    }

    /// `(start, length)` of every live batch, in slot order.
    pub fn batch_ranges(&self) -> Vec<(usize, usize)> {
        self.ranges.iter().map(|r| (r.start, r.length)).collect()
    }

    pub(crate) fn add<I>(
        &mut self,
        records: I,
        clock: TweenLifetime,
        opts: TweenOptions,
    ) -> Option<TweenHandle>
    where
        I: IntoIterator<Item = SlotRecord>,
    {
        let flags = if opts.handle {
            StateFlags::HANDLE_START_PAUSED
        } else {
            StateFlags::NO_HANDLE_START
        };
        let key = register(&mut self.handles, self.ranges.len(), flags, &opts);
        let TweenOptions { handle, on_start, on_complete, .. } = opts;
        if let Some(key) = key {
            if let Some(cb) = on_start {
                self.handles.listen(key, Listener::Started, cb);
            }
            if let Some(cb) = on_complete {
                self.handles.listen(key, Listener::Completed, cb);
            }
        }

        let start = self.slots.len();
        for mut record in records {
            record.state.flags = flags;
            self.slots.push(record);
        }
        self.ranges.push(BatchRange {
            start,
            length: self.slots.len() - start,
        });
        self.states.push(flags);
        self.clocks.push(clock);
        self.keys.push(key);
        key.filter(|_| handle).map(|k| self.handles.handle(k))
    }

    /// Copy the batch state onto its slots.
    fn sync_slots(&mut self, batch: usize) {
        let BatchRange { start, length } = self.ranges[batch];
        let flags = self.states[batch];
        for state in &mut self.slots.states.as_mut_slice()[start..start + length] {
            state.flags = flags;
        }
    }

    fn drain_commands(&mut self, out: &mut Outputs) {
        let pending = self.handles.queue().drain();
        for QueuedCommand { key, command } in pending {
            let Some(batch) = self.handles.resolve(key) else {
                warn!("{}", SCOPE.stale_message());
                out.push_event(TweenEvent::CommandDropped {
                    scope: SCOPE,
                    handle: key,
                    command: match command {
                        HandleCommand::Control(cmd) => Some(cmd),
                        _ => None,
                    },
                });
                continue;
            };
            match command {
                HandleCommand::Control(cmd) => {
                    let transition = self.states[batch].apply(cmd);
                    self.states[batch] = transition.state;
                    self.sync_slots(batch);
                    if transition.rewound {
                        self.clocks[batch].restart();
                        let BatchRange { start, length } = self.ranges[batch];
                        for i in start..start + length {
                            self.slots.restart_clocks(i);
                        }
                    }
                    self.handles.publish(key, transition.state);
                }
                HandleCommand::OnStarted(cb) => {
                    self.handles.listen(key, Listener::Started, cb);
                }
                HandleCommand::OnCompleted(cb) => {
                    self.handles.listen(key, Listener::Completed, cb);
                }
            }
        }
    }

    fn join(&mut self) -> Option<SlotJob> {
        if let Some(handle) = self.batch_job.take() {
            let job = handle.complete();
            let n = job.states.len();
            self.states.as_mut_slice()[..n].copy_from_slice(&job.states);
            self.clocks.as_mut_slice()[..n].copy_from_slice(&job.clocks);
            self.spare_batches = Some(job);
        }
        let job = self.slot_job.take()?.complete();
        self.slots.absorb_job(&job);
        Some(job)
    }

    pub fn early_update(&mut self, dt: f32, out: &mut Outputs) {
        if let Some(job) = self.join() {
            warn!("early update called before the previous frame was applied; dropping its samples");
            self.spare_slots = Some(job);
        }
        self.drain_commands(out);
        if self.ranges.is_empty() {
            return;
        }

        for batch in 0..self.ranges.len() {
            if self.states[batch].take_start() {
                self.sync_slots(batch);
                if let Some(key) = self.keys[batch] {
                    self.handles.publish(key, self.states[batch]);
                    self.started.push(key);
                }
            }
        }

        let parallel = self.mode == DispatchMode::Parallel;
        let mut slot_job = self.spare_slots.take().unwrap_or_default();
        slot_job.dt = dt;
        slot_job.batch_size = self.batch_size;
        slot_job.parallel = parallel;
        self.slots.fill_job(&mut slot_job);

        let mut batch_job = self.spare_batches.take().unwrap_or_default();
        batch_job.dt = dt;
        batch_job.parallel = parallel;
        batch_job.states.clear();
        batch_job.states.extend_from_slice(self.states.as_slice());
        batch_job.clocks.clear();
        batch_job.clocks.extend_from_slice(self.clocks.as_slice());

        self.batch_job = Some(schedule(self.mode, batch_job, BatchJob::run));
        self.slot_job = Some(schedule(self.mode, slot_job, SlotJob::run));

        for key in self.started.drain(..) {
            out.push_event(TweenEvent::Started {
                scope: SCOPE,
                handle: key,
            });
            self.handles.fire(key, Listener::Started);
        }
    }

    pub fn late_update(&mut self, targets: &mut dyn SpatialTargets, out: &mut Outputs) {
        if let Some(job) = self.join() {
            self.slots.apply(&job, targets);
            self.spare_slots = Some(job);
        }

        let mut lowest_removed = None;
        for batch in (0..self.ranges.len()).rev() {
            let ended = self.states[batch].take_end();
            if let Some(key) = self.keys[batch] {
                self.handles.publish(key, self.states[batch]);
                if ended {
                    self.completed.push(key);
                }
            }
            if self.states[batch].requires_recycling() {
                self.remove_batch(batch);
                lowest_removed = Some(batch);
            }
        }

        if let Some(lowest) = lowest_removed {
            for batch in lowest..self.keys.len() {
                if let Some(key) = self.keys[batch] {
                    self.handles.rebind(key, batch);
                }
            }
            debug!(
                "{} batches over {} slots remain after compaction",
                self.ranges.len(),
                self.slots.len()
            );
        }

        for key in self.completed.drain(..) {
            out.push_event(TweenEvent::Completed {
                scope: SCOPE,
                handle: key,
            });
            self.handles.fire(key, Listener::Completed);
        }
        for key in self.retired.drain(..) {
            self.handles.release(key);
        }
    }

    fn remove_batch(&mut self, batch: usize) {
        let BatchRange { start, length } = self.ranges[batch];
        trace!("removing batch {batch} covering slots {start}..{}", start + length);
        self.slots.remove_range(start, length);
        for later in &mut self.ranges.as_mut_slice()[batch + 1..] {
            later.start -= length;
        }
        self.ranges.remove_at(batch);
        self.states.remove_at(batch);
        self.clocks.remove_at(batch);
        if let Some(key) = self.keys.remove_at(batch) {
            self.retired.push(key);
        }
    }
}
