//! Aggregates over tween handles.
//!
//! Both aggregates only talk to their members through handle commands and
//! listeners, so they work the same for single tweens and batches and never
//! need access to the engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

mod sequence;
mod set;

pub use sequence::TweenSequence;
pub use set::TweenSet;

/// Aggregate-level observer. Shared so it can be invoked outside the lock.
pub type Observer = Arc<dyn Fn() + Send + Sync + 'static>;

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(observers: Vec<Observer>) {
    for observer in observers {
        observer();
    }
}
