//! Movement systems.
//!
//! Path-following movers and straight-flying missiles, both stepped by the
//! scaled world delta.

use bevy_ecs::prelude::*;
use log::error;

use crate::components::missile::Missile;
use crate::components::mover::Mover;
use crate::resources::worldtime::WorldTime;

/// Walk every mover along its target and queued waypoints.
pub fn path_movement_system(mut query: Query<&mut Mover>, time: Res<WorldTime>) {
    for mut mover in query.iter_mut() {
        if mover.is_idle() {
            // Idle movers stay unchanged so facing sync skips them
            continue;
        }
        mover.step(time.delta);
    }
}

/// Fly every missile and advance its animation.
pub fn missile_system(mut query: Query<(Entity, &mut Missile)>, time: Res<WorldTime>) {
    for (entity, mut missile) in query.iter_mut() {
        if let Err(e) = missile.advance(time.delta) {
            error!("Missile {:?} failed to advance: {}", entity, e);
        }
    }
}
