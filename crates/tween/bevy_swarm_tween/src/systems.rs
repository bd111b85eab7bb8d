use bevy::prelude::*;

use crate::resources::{SwarmTweenEvent, SwarmTweens};
use crate::targets::{EntityTargets, TransformQuery};

/// Apply queued handle commands and start the compute phase.
pub fn dispatch_tweens_system(mut tweens: ResMut<SwarmTweens>, time: Res<Time>) {
    tweens.0.early_update(time.delta_seconds());
}

/// Join the compute phase, write entity transforms and forward the frame's
/// events.
pub fn apply_tweens_system(
    mut tweens: ResMut<SwarmTweens>,
    mut transforms: TransformQuery,
    mut events: EventWriter<SwarmTweenEvent>,
) {
    let mut targets = EntityTargets::new(&mut transforms);
    let outputs = tweens.0.late_update(&mut targets);
    events.send_batch(outputs.events.iter().cloned().map(SwarmTweenEvent));
}
