use std::sync::{Arc, Mutex, Weak};

use super::{lock, notify, Observer};
use crate::handle::TweenHandle;
use crate::ids::HandleKey;
use crate::store::DynamicStore;

#[derive(Default)]
struct SetState {
    members: DynamicStore<TweenHandle>,
    started: bool,
    completed: bool,
    on_start: Vec<Observer>,
    on_complete: Vec<Observer>,
}

impl SetState {
    fn is_member(&self, key: HandleKey) -> bool {
        self.members.iter().any(|h| h.key() == key)
    }
}

/// Members run concurrently. Started fires on the first member start;
/// completed fires once every member is complete.
#[derive(Clone, Default)]
pub struct TweenSet {
    state: Arc<Mutex<SetState>>,
}

impl TweenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handle: TweenHandle) {
        let key = handle.key();
        let weak = Arc::downgrade(&self.state);
        handle.on_started({
            let weak = weak.clone();
            move || member_started(&weak, key)
        });
        handle.on_completed(move || member_completed(&weak, key));
        lock(&self.state).members.push(handle);
    }

    /// Drop a member without touching its tween. Returns false when absent.
    pub fn remove(&self, handle: &TweenHandle) -> bool {
        let mut state = lock(&self.state);
        match state.members.index_of(handle) {
            Some(index) => {
                state.members.swap_remove_at(index);
                true
            }
            None => false,
        }
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

    pub fn on_complete<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.state).on_complete.push(Arc::new(f));
    }

    fn each(&self, f: impl Fn(&TweenHandle)) {
        for handle in lock(&self.state).members.iter() {
            f(handle);
        }
    }

    fn reset_events(&self) {
        let mut state = lock(&self.state);
        state.started = false;
        state.completed = false;
    }

    pub fn play(&self) {
        self.each(TweenHandle::play);
    }

    pub fn pause(&self) {
        self.each(TweenHandle::pause);
    }

    pub fn stop(&self) {
        self.each(TweenHandle::stop);
    }

    pub fn rewind(&self) {
        self.each(TweenHandle::rewind);
        self.reset_events();
    }

    pub fn restart(&self) {
        self.each(TweenHandle::restart);
        self.reset_events();
    }

    /// Recycle every member and forget them.
    pub fn recycle(&self) {
        self.each(TweenHandle::recycle);
        self.reset_events();
        lock(&self.state).members.clear();
    }

    /// Recycle every member, then drop members and observers.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        for member in state.members.iter() {
            member.recycle();
        }
        state.members.clear();
        state.started = false;
        state.completed = false;
        state.on_start.clear();
        state.on_complete.clear();
    }

    pub fn is_started(&self) -> bool {
        lock(&self.state).started
    }

    pub fn is_completed(&self) -> bool {
        lock(&self.state).completed
    }
}

fn member_started(state: &Weak<Mutex<SetState>>, key: HandleKey) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let observers = {
        let mut state = lock(&state);
        if state.started || !state.is_member(key) {
            return;
        }
        state.started = true;
        state.on_start.clone()
    };
    notify(observers);
}

fn member_completed(state: &Weak<Mutex<SetState>>, key: HandleKey) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let observers = {
        let mut state = lock(&state);
        if state.completed || !state.is_member(key) {
            return;
        }
        if !state.members.iter().all(TweenHandle::is_completed) {
            return;
        }
        state.completed = true;
        state.on_complete.clone()
    };
    notify(observers);
}
