//! Slot and batch state flags plus the command transition table.
//!
//! All state changes go through [`StateFlags::apply`] or
//! [`StateFlags::complete_naturally`] so the single and batch schedulers
//! share one transition table.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::channels::RotateMode;

bitflags! {
    /// Lifecycle bits of a slot or batch.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        const PLAYING = 1 << 0;
        const PAUSED = 1 << 1;
        const COMPLETED = 1 << 2;
        /// Start event not yet delivered.
        const JUST_STARTED = 1 << 3;
        /// Complete event not yet delivered.
        const JUST_ENDED = 1 << 4;
        /// A caller holds a handle and decides when the slot is recycled.
        const HAS_HANDLE = 1 << 5;
        const REQUIRES_RECYCLING = 1 << 6;
    }
}

bitflags! {
    /// Which transform channels a slot drives.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChannelFlags: u8 {
        const MOVEMENT = 1 << 0;
        const ROTATION = 1 << 1;
        const SCALING = 1 << 2;
    }
}

bitflags! {
    /// World-space bits; a cleared bit means local space.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpaceFlags: u8 {
        const WORLD_MOVEMENT = 1 << 0;
        const WORLD_ROTATION = 1 << 1;
    }
}

impl StateFlags {
    /// Fire-and-forget request: runs immediately, recycled on completion.
    pub const NO_HANDLE_START: StateFlags =
        StateFlags::PLAYING.union(StateFlags::JUST_STARTED);
    /// Handle request: waits for `play`.
    pub const HANDLE_START_PAUSED: StateFlags = StateFlags::PAUSED
        .union(StateFlags::JUST_STARTED)
        .union(StateFlags::HAS_HANDLE);
    pub const HANDLE_START_PLAYING: StateFlags = StateFlags::PLAYING
        .union(StateFlags::JUST_STARTED)
        .union(StateFlags::HAS_HANDLE);

    #[inline]
    pub fn is_playing(self) -> bool {
        self.contains(StateFlags::PLAYING)
    }

    #[inline]
    pub fn is_paused(self) -> bool {
        self.contains(StateFlags::PAUSED)
    }

    #[inline]
    pub fn is_completed(self) -> bool {
        self.contains(StateFlags::COMPLETED)
    }

    #[inline]
    pub fn requires_recycling(self) -> bool {
        self.contains(StateFlags::REQUIRES_RECYCLING)
    }

    /// Apply a control command. `rewound` is set when the command also
    /// restarts the lifetimes behind this state.
    pub fn apply(self, command: ControlCommand) -> Transition {
        let mut state = self;
        let mut rewound = false;
        match command {
            ControlCommand::Play => {
                if state.is_paused() && !state.is_completed() {
                    state.remove(StateFlags::PAUSED);
                    state.insert(StateFlags::PLAYING);
                }
            }
            ControlCommand::Pause => {
                if state.is_playing() {
                    state.remove(StateFlags::PLAYING);
                    state.insert(StateFlags::PAUSED);
                }
            }
            ControlCommand::Stop => {
                if state.intersects(StateFlags::PLAYING | StateFlags::PAUSED) {
                    state.remove(StateFlags::PLAYING | StateFlags::PAUSED);
                    state.insert(StateFlags::COMPLETED | StateFlags::JUST_ENDED);
                }
            }
            ControlCommand::Rewind => {
                state = StateFlags::HANDLE_START_PAUSED;
                rewound = true;
            }
            ControlCommand::Restart => {
                state = StateFlags::HANDLE_START_PLAYING;
                rewound = true;
            }
            ControlCommand::Recycle => {
                state.remove(StateFlags::PAUSED | StateFlags::PLAYING | StateFlags::HAS_HANDLE);
                state.insert(StateFlags::COMPLETED | StateFlags::REQUIRES_RECYCLING);
            }
        }
        Transition { state, rewound }
    }

    /// Lifetimes ran out. Only handle-less slots are queued for recycling.
    pub fn complete_naturally(self) -> StateFlags {
        let mut state = self;
        state.remove(StateFlags::PLAYING);
        state.insert(StateFlags::COMPLETED | StateFlags::JUST_ENDED);
        if !state.contains(StateFlags::HAS_HANDLE) {
            state.insert(StateFlags::REQUIRES_RECYCLING);
        }
        state
    }

    /// Consume the pending start event. Returns true when one was pending.
    pub fn take_start(&mut self) -> bool {
        if self.is_playing() && self.contains(StateFlags::JUST_STARTED) {
            self.remove(StateFlags::JUST_STARTED);
            return true;
        }
        false
    }

    /// Consume the pending complete event. Returns true when one was pending.
    pub fn take_end(&mut self) -> bool {
        if self.is_completed() && self.contains(StateFlags::JUST_ENDED) {
            self.remove(StateFlags::JUST_ENDED);
            return true;
        }
        false
    }
}

/// Caller-visible control commands.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ControlCommand {
    Play,
    Pause,
    Stop,
    Rewind,
    Restart,
    Recycle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: StateFlags,
    pub rewound: bool,
}

/// Everything a slot needs to know besides its clocks and endpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TransformState {
    pub flags: StateFlags,
    pub channels: ChannelFlags,
    pub space: SpaceFlags,
    pub rotate_mode: RotateMode,
}
