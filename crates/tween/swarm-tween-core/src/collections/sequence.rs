use std::sync::{Arc, Mutex, Weak};

use super::{lock, notify, Observer};
use crate::handle::TweenHandle;

#[derive(Default)]
struct SequenceState {
    members: Vec<TweenHandle>,
    /// Index of the next member to run.
    cursor: usize,
    current: Option<TweenHandle>,
    on_start: Vec<Observer>,
    on_step: Vec<Observer>,
    on_complete: Vec<Observer>,
}

/// Members run one after another. Each completion plays the next member and
/// fires `on_step`; the last completion fires `on_complete`.
#[derive(Clone, Default)]
pub struct TweenSequence {
    state: Arc<Mutex<SequenceState>>,
}

impl TweenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handle: TweenHandle) {
        let weak = Arc::downgrade(&self.state);
        handle.on_completed(move || member_completed(&weak));
        lock(&self.state).members.push(handle);
    }

    pub fn len(&self) -> usize {
        lock(&self.state).members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn on_start<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.state).on_start.push(Arc::new(f));
    }

    pub fn on_step<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.state).on_step.push(Arc::new(f));
    }

    pub fn on_complete<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.state).on_complete.push(Arc::new(f));
    }

    /// Start at the first member, or resume the current one.
    pub fn play(&self) {
        let mut state = lock(&self.state);
        if state.current.is_none() && state.cursor == 0 {
            let Some(first) = state.members.first().cloned() else {
                return;
            };
            let weak = Arc::downgrade(&self.state);
            first.on_started(move || member_started(&weak));
            first.play();
            state.cursor = 1;
            state.current = Some(first);
        } else if let Some(current) = &state.current {
            current.play();
        }
    }

    pub fn pause(&self) {
        if let Some(current) = &lock(&self.state).current {
            current.pause();
        }
    }

    pub fn stop(&self) {
        if let Some(current) = &lock(&self.state).current {
            current.stop();
        }
    }

    fn rewind_members(state: &mut SequenceState) {
        for member in &state.members {
            member.rewind();
        }
        match state.members.first() {
            Some(first) => {
                state.current = Some(first.clone());
                state.cursor = 1;
            }
            None => {
                state.current = None;
                state.cursor = 0;
            }
        }
    }

    /// Rewind every member and park the cursor on the first, paused.
    pub fn rewind(&self) {
        Self::rewind_members(&mut lock(&self.state));
    }

    /// Rewind every member and play the first.
    pub fn restart(&self) {
        let mut state = lock(&self.state);
        Self::rewind_members(&mut state);
        if let Some(current) = &state.current {
            current.play();
        }
    }

    /// Recycle every member and forget them.
    pub fn recycle(&self) {
        let mut state = lock(&self.state);
        for member in &state.members {
            member.recycle();
        }
        state.members.clear();
        state.current = None;
        state.cursor = 0;
    }

    /// Recycle every member, then drop members and observers.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        for member in &state.members {
            member.recycle();
        }
        state.members.clear();
        state.current = None;
        state.cursor = 0;
        state.on_start.clear();
        state.on_step.clear();
        state.on_complete.clear();
    }

    /// Member currently running, if the sequence was started.
    pub fn current(&self) -> Option<TweenHandle> {
        lock(&self.state).current.clone()
    }
}

fn member_started(state: &Weak<Mutex<SequenceState>>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let observers = lock(&state).on_start.clone();
    notify(observers);
}

fn member_completed(state: &Weak<Mutex<SequenceState>>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let observers = {
        let mut state = lock(&state);
        match state.members.get(state.cursor).cloned() {
            Some(next) => {
                state.cursor += 1;
                next.play();
                state.current = Some(next);
                state.on_step.clone()
            }
            None => state.on_complete.clone(),
        }
    };
    notify(observers);
}
