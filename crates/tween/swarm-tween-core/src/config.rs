//! Core configuration for swarm-tween-core.

use serde::{Deserialize, Serialize};

/// Engine sizing and feature flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for every slot arena.
    pub initial_capacity: usize,
    /// Handle records pre-allocated per scheduler.
    pub handle_pool_size: usize,
    /// Upper bound on single-target slots recycled in one frame.
    pub recycle_per_frame: usize,
    /// Minimum slots handed to one parallel task.
    pub batch_size: usize,

    pub features: Features,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Run the compute phase on the rayon pool. When false the job runs inline
    /// on the thread that calls `early_update`.
    pub parallel: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            handle_pool_size: 128,
            recycle_per_frame: 500,
            batch_size: 128,
            features: Features::default(),
        }
    }
}

impl Config {
    /// Same sizing, compute phase forced inline.
    pub fn inline() -> Self {
        Self {
            features: Features { parallel: false },
            ..Self::default()
        }
    }
}
