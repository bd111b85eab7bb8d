use bevy::prelude::*;
use swarm_tween_core::{TweenEngine, TweenEvent};

/// The tween engine. Systems request tweens through it between the dispatch
/// and apply halves of the frame.
#[derive(Resource)]
pub struct SwarmTweens(pub TweenEngine);

impl Default for SwarmTweens {
    fn default() -> Self {
        Self(TweenEngine::default())
    }
}

/// Start, complete and dropped-command notices re-sent as Bevy events after
/// each apply pass.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct SwarmTweenEvent(pub TweenEvent);
