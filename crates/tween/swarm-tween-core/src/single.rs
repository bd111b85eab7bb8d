//! Scheduler for independent single-target tweens.

use log::{debug, warn};
use swarm_api_core::SpatialTargets;

use crate::command::{HandleCommand, QueuedCommand};
use crate::config::Config;
use crate::handle::{HandleTable, Listener, TweenHandle};
use crate::ids::{HandleKey, HandleScope};
use crate::options::TweenOptions;
use crate::outputs::{Outputs, TweenEvent};
use crate::pipeline::{schedule, DispatchMode, JobHandle, SlotJob};
use crate::slots::{SlotRecord, SlotTable};
use crate::state::StateFlags;
use crate::store::DynamicStore;

const SCOPE: HandleScope = HandleScope::Single;

pub struct SingleTweener {
    slots: SlotTable,
    /// Handle record per slot, parallel to `slots`.
    keys: DynamicStore<Option<HandleKey>>,
    handles: HandleTable,
    mode: DispatchMode,
    batch_size: usize,
    recycle_per_frame: usize,
    job: Option<JobHandle<SlotJob>>,
    spare: Option<SlotJob>,
    started: Vec<HandleKey>,
    completed: Vec<HandleKey>,
    retired: Vec<HandleKey>,
    recyclable: Vec<usize>,
}

impl SingleTweener {
    pub fn new(cfg: &Config) -> Self {
        Self {
            slots: SlotTable::with_capacity(cfg.initial_capacity),
            keys: DynamicStore::with_capacity(cfg.initial_capacity),
            handles: HandleTable::new(SCOPE, cfg.handle_pool_size),
            mode: dispatch_mode(cfg),
            batch_size: cfg.batch_size,
            recycle_per_frame: cfg.recycle_per_frame.max(1),
            job: None,
            spare: None,
            started: Vec::new(),
            completed: Vec::new(),
            retired: Vec::new(),
            recyclable: Vec::new(),
        }
    }

    /// Live slots, including completed ones still waiting for recycling.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn live_handles(&self) -> usize {
        self.handles.live()
    }

    pub(crate) fn add(&mut self, mut record: SlotRecord, opts: TweenOptions) -> Option<TweenHandle> {
        let flags = if opts.handle {
            StateFlags::HANDLE_START_PAUSED
        } else {
            StateFlags::NO_HANDLE_START
        };
        record.state.flags = flags;
        let key = register(&mut self.handles, self.slots.len(), flags, &opts);
        let TweenOptions { handle, on_start, on_complete, .. } = opts;
        if let Some(key) = key {
            if let Some(cb) = on_start {
                self.handles.listen(key, Listener::Started, cb);
            }
            if let Some(cb) = on_complete {
                self.handles.listen(key, Listener::Completed, cb);
            }
        }
        self.slots.push(record);
        self.keys.push(key);
        key.filter(|_| handle).map(|k| self.handles.handle(k))
    }

    fn drain_commands(&mut self, out: &mut Outputs) {
        let pending = self.handles.queue().drain();
        for QueuedCommand { key, command } in pending {
            let Some(index) = self.handles.resolve(key) else {
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
                    let transition = self.slots.states[index].flags.apply(cmd);
                    self.slots.states[index].flags = transition.state;
                    if transition.rewound {
                        self.slots.restart_clocks(index);
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

    /// Merge a job the caller never joined. Its samples are discarded.
    fn settle_outstanding(&mut self) {
        if let Some(job) = self.job.take() {
            warn!("early update called before the previous frame was applied; dropping its samples");
            let job = job.complete();
            self.slots.absorb_job(&job);
            self.spare = Some(job);
        }
    }

    /// Early half of the frame: commands, start events, compute dispatch.
    pub fn early_update(&mut self, dt: f32, out: &mut Outputs) {
        self.settle_outstanding();
        self.drain_commands(out);
        if self.slots.is_empty() {
            return;
        }

        for i in 0..self.slots.len() {
            let flags = &mut self.slots.states[i].flags;
            if flags.take_start() {
                if let Some(key) = self.keys[i] {
                    self.handles.publish(key, *flags);
                    self.started.push(key);
                }
            }
        }

        let mut job = self.spare.take().unwrap_or_default();
        job.dt = dt;
        job.batch_size = self.batch_size;
        job.parallel = self.mode == DispatchMode::Parallel;
        self.slots.fill_job(&mut job);
        self.job = Some(schedule(self.mode, job, SlotJob::run));

        for key in self.started.drain(..) {
            out.push_event(TweenEvent::Started {
                scope: SCOPE,
                handle: key,
            });
            self.handles.fire(key, Listener::Started);
        }
    }

    /// Late half of the frame: join, apply, complete events, recycling.
    pub fn late_update(&mut self, targets: &mut dyn SpatialTargets, out: &mut Outputs) {
        if let Some(handle) = self.job.take() {
            let job = handle.complete();
            self.slots.absorb_job(&job);
            self.slots.apply(&job, targets);
            self.spare = Some(job);
        }

        for i in (0..self.slots.len()).rev() {
            let flags = &mut self.slots.states[i].flags;
            let ended = flags.take_end();
            if let Some(key) = self.keys[i] {
                self.handles.publish(key, *flags);
                if ended {
                    self.completed.push(key);
                }
            }
        }

        self.recycle();

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

    /// Remove up to `recycle_per_frame` recyclable slots, oldest first, as
    /// contiguous ranges walked from the top so lower indices stay valid.
    fn recycle(&mut self) {
        self.recyclable.clear();
        for (i, state) in self.slots.states.iter().enumerate() {
            if state.flags.requires_recycling() {
                self.recyclable.push(i);
                if self.recyclable.len() == self.recycle_per_frame {
                    break;
                }
            }
        }
        let Some(&lowest) = self.recyclable.first() else {
            return;
        };

        let mut end = self.recyclable.len();
        while end > 0 {
            let mut start = end - 1;
            while start > 0 && self.recyclable[start - 1] + 1 == self.recyclable[start] {
                start -= 1;
            }
            let first = self.recyclable[start];
            let length = end - start;
            for key in self.keys.as_slice()[first..first + length].iter().flatten() {
                self.retired.push(*key);
            }
            self.slots.remove_range(first, length);
            self.keys.remove_range(first, length);
            end = start;
        }

        for i in lowest..self.keys.len() {
            if let Some(key) = self.keys[i] {
                self.handles.rebind(key, i);
            }
        }
        debug!(
            "recycled {} tween slots, {} remain",
            self.recyclable.len(),
            self.slots.len()
        );
    }
}

pub(crate) fn dispatch_mode(cfg: &Config) -> DispatchMode {
    if cfg.features.parallel {
        DispatchMode::Parallel
    } else {
        DispatchMode::Inline
    }
}

/// Acquire a handle record when the request needs one.
pub(crate) fn register(
    handles: &mut HandleTable,
    index: usize,
    flags: StateFlags,
    opts: &TweenOptions,
) -> Option<HandleKey> {
    opts.needs_record().then(|| handles.acquire(index, flags))
}
