use bevy::prelude::*;
use bevy::transform::TransformSystem;
use swarm_tween_core::{Config, TweenEngine};

pub mod resources;
pub mod systems;
pub mod targets;

pub use resources::{SwarmTweenEvent, SwarmTweens};
pub use targets::{entity_of, target_id, EntityTargets};

/// Frame halves of the tween pipeline.
///
/// `Dispatch` runs in `PreUpdate` so gameplay systems in `Update` overlap with
/// the compute phase; `Apply` runs in `PostUpdate` ahead of transform
/// propagation so written transforms reach `GlobalTransform` the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SwarmTweenSystems {
    Dispatch,
    Apply,
}

#[derive(Default)]
pub struct SwarmTweenPlugin {
    pub config: Config,
}

impl Plugin for SwarmTweenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SwarmTweens(TweenEngine::new(self.config.clone())))
            .add_event::<SwarmTweenEvent>()
            .configure_sets(
                PostUpdate,
                SwarmTweenSystems::Apply.before(TransformSystem::TransformPropagate),
            )
            .add_systems(
                PreUpdate,
                systems::dispatch_tweens_system.in_set(SwarmTweenSystems::Dispatch),
            )
            .add_systems(
                PostUpdate,
                systems::apply_tweens_system.in_set(SwarmTweenSystems::Apply),
            );
    }
}
