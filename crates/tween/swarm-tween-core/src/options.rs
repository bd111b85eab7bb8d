//! Per-request parameters.

use std::fmt;

use swarm_api_core::Space;

use crate::command::Callback;
use crate::ease::EaseType;
use crate::lifetime::{LoopType, TweenLifetime};

/// How a tween runs: space, curve, looping, and who controls it.
///
/// Without [`TweenOptions::with_handle`] the tween starts playing at once and
/// is recycled as soon as it completes. With it, the tween waits for `play`
/// and stays alive until the handle recycles it.
pub struct TweenOptions {
    pub space: Space,
    pub ease: EaseType,
    pub loop_type: LoopType,
    pub loop_count: i32,
    pub handle: bool,
    pub on_start: Option<Callback>,
    pub on_complete: Option<Callback>,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            space: Space::World,
            ease: EaseType::Linear,
            loop_type: LoopType::None,
            loop_count: 0,
            handle: false,
            on_start: None,
            on_complete: None,
        }
    }
}

impl fmt::Debug for TweenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenOptions")
            .field("space", &self.space)
            .field("ease", &self.ease)
            .field("loop_type", &self.loop_type)
            .field("loop_count", &self.loop_count)
            .field("handle", &self.handle)
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl TweenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn space(mut self, space: Space) -> Self {
        self.space = space;
        self
    }

    pub fn ease(mut self, ease: EaseType) -> Self {
        self.ease = ease;
        self
    }

    /// `count` extra passes; `-1` repeats forever.
    pub fn looping(mut self, loop_type: LoopType, count: i32) -> Self {
        self.loop_type = loop_type;
        self.loop_count = count;
        self
    }

    pub fn with_handle(mut self) -> Self {
        self.handle = true;
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub(crate) fn lifetime(&self, duration: f32) -> TweenLifetime {
        TweenLifetime::new(duration, self.ease, self.loop_type, self.loop_count)
    }

    /// A handle record is needed for a caller handle or for creation callbacks.
    pub(crate) fn needs_record(&self) -> bool {
        self.handle || self.on_start.is_some() || self.on_complete.is_some()
    }
}
