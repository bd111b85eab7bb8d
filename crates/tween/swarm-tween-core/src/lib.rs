//! swarm-tween-core: bulk transform tweening (engine-agnostic).
//!
//! Tweens live in structure-of-arrays slot tables owned by two schedulers:
//! one for independent single-target tweens and one for batches that share
//! a clock. Each frame runs in two halves. `early_update` applies queued
//! handle commands, delivers start events and dispatches the compute phase
//! to the rayon pool; `late_update` joins it, writes the results to the host
//! through `swarm_api_core::SpatialTargets`, delivers complete events and
//! recycles finished slots.

pub mod batch;
pub mod channels;
pub mod collections;
pub mod command;
pub mod config;
pub mod ease;
pub mod engine;
pub mod error;
pub mod handle;
pub mod ids;
pub mod lifetime;
pub mod options;
pub mod outputs;
pub mod pipeline;
pub mod single;
mod slots;
pub mod state;
pub mod store;

// Re-exports for consumers (adapters)
pub use batch::{BatchRange, BatchTweener};
pub use channels::{RotateMode, TweenFloat3, TweenRotation};
pub use collections::{TweenSequence, TweenSet};
pub use config::{Config, Features};
pub use ease::EaseType;
pub use engine::{TransformEndpoints, TweenEngine};
pub use error::TweenError;
pub use handle::TweenHandle;
pub use ids::{HandleKey, HandleScope};
pub use lifetime::{LoopType, TweenLifetime, INFINITE_LOOPS};
pub use options::TweenOptions;
pub use outputs::{Outputs, TweenEvent, TweenStats};
pub use single::SingleTweener;
pub use state::{ControlCommand, StateFlags};
pub use store::DynamicStore;
pub use swarm_api_core::{Space, SpatialTargets, TargetId};
