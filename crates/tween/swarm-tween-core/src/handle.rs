//! Pooled handle records and the caller-facing [`TweenHandle`].
//!
//! A scheduler owns one [`HandleTable`]. Records are reused through a free
//! list; each reuse bumps the generation so keys held by callers go stale
//! instead of aliasing the new tween. Callers never touch the table: they push
//! commands onto the shared [`CommandQueue`] and read state from the shared
//! [`StatusBoard`], which the scheduler keeps in sync.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::command::{Callback, CommandQueue, HandleCommand};
use crate::ids::{HandleKey, HandleScope};
use crate::state::{ControlCommand, StateFlags};

#[inline]
fn pack(generation: u32, flags: StateFlags) -> u64 {
    ((generation as u64) << 32) | flags.bits() as u64
}

/// Lock-free per-record state mirror, indexed like the handle table.
#[derive(Debug, Default)]
pub struct StatusBoard {
    cells: RwLock<Vec<AtomicU64>>,
}

impl StatusBoard {
    /// State of `key`, or `None` once the record was released.
    pub fn read(&self, key: HandleKey) -> Option<StateFlags> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        let packed = cells.get(key.index as usize)?.load(Ordering::Acquire);
        if (packed >> 32) as u32 != key.generation {
            return None;
        }
        Some(StateFlags::from_bits_truncate(packed as u8))
    }

    fn publish(&self, key: HandleKey, flags: StateFlags) {
        let index = key.index as usize;
        {
            let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cell) = cells.get(index) {
                cell.store(pack(key.generation, flags), Ordering::Release);
                return;
            }
        }
        let mut cells = self.cells.write().unwrap_or_else(PoisonError::into_inner);
        if cells.len() <= index {
            cells.resize_with(index + 1, || AtomicU64::new(pack(u32::MAX, StateFlags::empty())));
        }
        cells[index].store(pack(key.generation, flags), Ordering::Release);
    }
}

/// Which observer list an event targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Listener {
    Started,
    Completed,
}

#[derive(Default)]
struct HandleEntry {
    generation: u32,
    bound: Option<usize>,
    on_started: Vec<Callback>,
    on_completed: Vec<Callback>,
}

pub(crate) struct HandleTable {
    scope: HandleScope,
    entries: Vec<HandleEntry>,
    free: Vec<u32>,
    queue: Arc<CommandQueue>,
    status: Arc<StatusBoard>,
}

impl HandleTable {
    pub fn new(scope: HandleScope, pool_size: usize) -> Self {
        let mut entries = Vec::with_capacity(pool_size);
        entries.resize_with(pool_size, HandleEntry::default);
        Self {
            scope,
            entries,
            free: (0..pool_size as u32).rev().collect(),
            queue: Arc::new(CommandQueue::new()),
            status: Arc::new(StatusBoard::default()),
        }
    }

    #[inline]
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Bind a pooled record to `index` and publish its initial state.
    pub fn acquire(&mut self, index: usize, flags: StateFlags) -> HandleKey {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.entries.push(HandleEntry::default());
                (self.entries.len() - 1) as u32
            }
        };
        let entry = &mut self.entries[slot as usize];
        entry.bound = Some(index);
        let key = HandleKey {
            index: slot,
            generation: entry.generation,
        };
        self.status.publish(key, flags);
        key
    }

    fn entry(&self, key: HandleKey) -> Option<&HandleEntry> {
        self.entries
            .get(key.index as usize)
            .filter(|e| e.generation == key.generation && e.bound.is_some())
    }

    fn entry_mut(&mut self, key: HandleKey) -> Option<&mut HandleEntry> {
        self.entries
            .get_mut(key.index as usize)
            .filter(|e| e.generation == key.generation && e.bound.is_some())
    }

    /// Slot or batch index the key is bound to.
    pub fn resolve(&self, key: HandleKey) -> Option<usize> {
        self.entry(key).and_then(|e| e.bound)
    }

    pub fn rebind(&mut self, key: HandleKey, index: usize) {
        if let Some(entry) = self.entry_mut(key) {
            entry.bound = Some(index);
        }
    }

    #[inline]
    pub fn publish(&self, key: HandleKey, flags: StateFlags) {
        self.status.publish(key, flags);
    }

    /// Return the record to the pool; outstanding keys go stale.
    pub fn release(&mut self, key: HandleKey) {
        let Some(entry) = self.entry_mut(key) else {
            return;
        };
        entry.bound = None;
        entry.on_started.clear();
        entry.on_completed.clear();
        entry.generation = entry.generation.wrapping_add(1);
        let next = HandleKey {
            index: key.index,
            generation: entry.generation,
        };
        self.status.publish(next, StateFlags::empty());
        self.free.push(key.index);
    }

    pub fn listen(&mut self, key: HandleKey, listener: Listener, callback: Callback) -> bool {
        let Some(entry) = self.entry_mut(key) else {
            return false;
        };
        match listener {
            Listener::Started => entry.on_started.push(callback),
            Listener::Completed => entry.on_completed.push(callback),
        }
        true
    }

    pub fn fire(&mut self, key: HandleKey, listener: Listener) {
        let Some(entry) = self.entry_mut(key) else {
            return;
        };
        let callbacks = match listener {
            Listener::Started => &mut entry.on_started,
            Listener::Completed => &mut entry.on_completed,
        };
        for callback in callbacks.iter_mut() {
            callback();
        }
    }

    /// Caller-facing handle for a bound key.
    pub fn handle(&self, key: HandleKey) -> TweenHandle {
        TweenHandle {
            key,
            scope: self.scope,
            queue: Arc::clone(&self.queue),
            status: Arc::clone(&self.status),
        }
    }

    pub fn live(&self) -> usize {
        self.entries.iter().filter(|e| e.bound.is_some()).count()
    }
}

/// Caller-owned reference to a single tween or a batch.
///
/// Commands are deferred: they take effect at the start of the next update
/// pass. State queries read the mirror the scheduler refreshes after every
/// command and every late update. A handle whose tween was recycled reports
/// completed and its commands are dropped with a warning.
#[derive(Clone)]
pub struct TweenHandle {
    key: HandleKey,
    scope: HandleScope,
    queue: Arc<CommandQueue>,
    status: Arc<StatusBoard>,
}

impl TweenHandle {
    #[inline]
    pub fn key(&self) -> HandleKey {
        self.key
    }

    #[inline]
    pub fn scope(&self) -> HandleScope {
        self.scope
    }

    fn send(&self, command: HandleCommand) {
        self.queue.push(self.key, command);
    }

    pub fn play(&self) {
        self.send(HandleCommand::Control(ControlCommand::Play));
    }

    pub fn pause(&self) {
        self.send(HandleCommand::Control(ControlCommand::Pause));
    }

    pub fn stop(&self) {
        self.send(HandleCommand::Control(ControlCommand::Stop));
    }

    pub fn rewind(&self) {
        self.send(HandleCommand::Control(ControlCommand::Rewind));
    }

    pub fn restart(&self) {
        self.send(HandleCommand::Control(ControlCommand::Restart));
    }

    /// Release the tween without a complete event.
    pub fn recycle(&self) {
        self.send(HandleCommand::Control(ControlCommand::Recycle));
    }

    pub fn on_started<F>(&self, f: F)
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.send(HandleCommand::OnStarted(Box::new(f)));
    }

    pub fn on_completed<F>(&self, f: F)
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.send(HandleCommand::OnCompleted(Box::new(f)));
    }

    /// Mirrored state; a released record reads as completed.
    pub fn state(&self) -> StateFlags {
        self.status.read(self.key).unwrap_or(StateFlags::COMPLETED)
    }

    /// False once the tween behind this handle has been recycled.
    pub fn is_live(&self) -> bool {
        self.status.read(self.key).is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.state().is_paused()
    }

    pub fn is_completed(&self) -> bool {
        self.state().is_completed()
    }
}

impl PartialEq for TweenHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && Arc::ptr_eq(&self.queue, &other.queue)
    }
}

impl Eq for TweenHandle {}

impl fmt::Debug for TweenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHandle")
            .field("key", &self.key)
            .field("scope", &self.scope)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn released_keys_go_stale_and_records_are_reused() {
        let mut table = HandleTable::new(HandleScope::Single, 1);
        let first = table.acquire(3, StateFlags::HANDLE_START_PAUSED);
        assert_eq!(table.resolve(first), Some(3));
        let handle = table.handle(first);
        assert!(handle.is_paused());

        table.release(first);
        assert_eq!(table.resolve(first), None);
        assert!(!handle.is_live());
        assert!(handle.is_completed());

        let second = table.acquire(0, StateFlags::HANDLE_START_PLAYING);
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
        assert!(!handle.is_live());
        assert!(table.handle(second).is_playing());
    }

    #[test]
    fn pool_grows_past_initial_size() {
        let mut table = HandleTable::new(HandleScope::Batch, 0);
        let a = table.acquire(0, StateFlags::NO_HANDLE_START);
        let b = table.acquire(1, StateFlags::NO_HANDLE_START);
        assert_ne!(a.index, b.index);
        assert_eq!(table.live(), 2);
        assert!(table.handle(b).is_playing());
    }

    #[test]
    fn listeners_fire_until_release() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut table = HandleTable::new(HandleScope::Single, 2);
        let key = table.acquire(0, StateFlags::NO_HANDLE_START);
        let counter = Arc::clone(&hits);
        assert!(table.listen(
            key,
            Listener::Completed,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        ));
        table.fire(key, Listener::Completed);
        table.fire(key, Listener::Started);
        table.release(key);
        table.fire(key, Listener::Completed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
