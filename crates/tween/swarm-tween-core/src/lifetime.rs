//! Per-channel clock: elapsed time, looping and direction.

use serde::{Deserialize, Serialize};

use crate::ease::EaseType;

/// Elapsed times this close to zero count as "not started".
const PROGRESS_EPSILON: f32 = 1e-5;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LoopType {
    /// Play once.
    #[default]
    None,
    /// Jump back to the start after each pass.
    Restart,
    /// Alternate forward and reverse passes.
    PingPong,
}

/// Loop count meaning "repeat forever".
pub const INFINITE_LOOPS: i16 = -1;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TweenLifetime {
    duration: f32,
    current: f32,
    loop_count: i16,
    original_loop_count: i16,
    ease: EaseType,
    loop_type: LoopType,
    reversed: bool,
}

impl TweenLifetime {
    /// `loop_count` is the number of extra passes; `-1` loops forever.
    pub fn new(duration: f32, ease: EaseType, loop_type: LoopType, loop_count: i32) -> Self {
        let loop_count = loop_count.clamp(INFINITE_LOOPS as i32, i16::MAX as i32) as i16;
        Self {
            duration: duration.max(0.0),
            current: 0.0,
            loop_count,
            original_loop_count: loop_count,
            ease,
            loop_type,
            reversed: false,
        }
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn loop_count(&self) -> i16 {
        self.loop_count
    }

    #[inline]
    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    #[inline]
    pub fn ease_type(&self) -> EaseType {
        self.ease
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Advance by `dt`. Time past the end of a pass is discarded.
    pub fn update(&mut self, dt: f32) {
        self.current = (self.current + dt).min(self.duration);
        if self.loop_type == LoopType::None || self.progress() < 1.0 {
            return;
        }
        if self.loop_count != INFINITE_LOOPS && self.loop_count <= 0 {
            return;
        }
        self.current = 0.0;
        match self.loop_type {
            LoopType::Restart => {
                if self.loop_count > 0 {
                    self.loop_count -= 1;
                }
            }
            LoopType::PingPong => {
                self.reversed = !self.reversed;
                // one loop is spent per forward+reverse round trip
                if self.reversed && self.loop_count > 0 {
                    self.loop_count -= 1;
                }
            }
            LoopType::None => {}
        }
    }

    /// Fraction of the current pass in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        if self.current.abs() <= PROGRESS_EPSILON {
            return 0.0;
        }
        (self.current / self.duration).min(1.0)
    }

    /// Eased fraction of the current pass.
    pub fn ease(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.ease.evaluate(self.current, self.duration)
    }

    /// True once the clock sits at the end of its final pass.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn restart(&mut self) {
        self.current = 0.0;
        self.loop_count = self.original_loop_count;
        self.reversed = false;
    }
}
