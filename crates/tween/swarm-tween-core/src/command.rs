//! Deferred command queue shared between handles and their scheduler.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::ids::HandleKey;
use crate::state::ControlCommand;

/// Observer invoked on start or completion.
pub type Callback = Box<dyn FnMut() + Send + Sync + 'static>;

pub enum HandleCommand {
    Control(ControlCommand),
    OnStarted(Callback),
    OnCompleted(Callback),
}

impl fmt::Debug for HandleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleCommand::Control(cmd) => f.debug_tuple("Control").field(cmd).finish(),
            HandleCommand::OnStarted(_) => f.write_str("OnStarted(..)"),
            HandleCommand::OnCompleted(_) => f.write_str("OnCompleted(..)"),
        }
    }
}

#[derive(Debug)]
pub struct QueuedCommand {
    pub key: HandleKey,
    pub command: HandleCommand,
}

/// FIFO of commands, drained once per frame at the start of the update pass.
#[derive(Debug, Default)]
pub struct CommandQueue {
    inner: Mutex<VecDeque<QueuedCommand>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, key: HandleKey, command: HandleCommand) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(QueuedCommand { key, command });
    }

    /// Take every queued command in arrival order.
    pub fn drain(&self) -> VecDeque<QueuedCommand> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
