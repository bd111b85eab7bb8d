//! Per-frame output contract.
//!
//! Transform values go straight to the host through `SpatialTargets`; what
//! remains here are the semantic events of the frame, in delivery order.
//! Callers that need to react with new requests (which needs `&mut` engine
//! access a callback cannot have) read these after `late_update`.

use serde::{Deserialize, Serialize};

use crate::ids::{HandleKey, HandleScope};
use crate::state::ControlCommand;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenEvent {
    Started {
        scope: HandleScope,
        handle: HandleKey,
    },
    Completed {
        scope: HandleScope,
        handle: HandleKey,
    },
    /// A command named a handle whose tween is gone.
    CommandDropped {
        scope: HandleScope,
        handle: HandleKey,
        command: Option<ControlCommand>,
    },
}

/// Counts of live scheduler records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweenStats {
    pub single_slots: usize,
    pub batch_slots: usize,
    pub batches: usize,
    pub live_handles: usize,
}

/// Events gathered across one early+late frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<TweenEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: TweenEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn started(&self) -> impl Iterator<Item = HandleKey> + '_ {
        self.events.iter().filter_map(|e| match e {
            TweenEvent::Started { handle, .. } => Some(*handle),
            _ => None,
        })
    }

    pub fn completed(&self) -> impl Iterator<Item = HandleKey> + '_ {
        self.events.iter().filter_map(|e| match e {
            TweenEvent::Completed { handle, .. } => Some(*handle),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
