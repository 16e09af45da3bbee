//! Composite systems.
//!
//! - [`composite_advance_system`] steps every [`Composite`] by the world delta
//! - [`sync_composite_facing_system`] turns composites towards their mover's facing
//! - [`render_composites`] draws composites back to front onto a [`Surface`]
//!
//! # Related
//!
//! - [`crate::components::composite`] – composite state and mode building
//! - [`crate::systems::movement`] – the movement that changes facings

use bevy_ecs::prelude::*;
use log::error;

use crate::components::composite::Composite;
use crate::components::missile::Missile;
use crate::components::mover::Mover;
use crate::resources::worldtime::WorldTime;
use crate::surface::Surface;

/// Screen pixels per subtile along each isometric axis.
const SUBTILE_SCREEN_WIDTH: f64 = 16.0;
const SUBTILE_SCREEN_HEIGHT: f64 = 8.0;

/// Advance every composite by the scaled delta.
///
/// An error stops that entity's layers for this tick only; the other
/// entities still advance.
pub fn composite_advance_system(mut query: Query<(Entity, &mut Composite)>, time: Res<WorldTime>) {
    for (entity, mut composite) in query.iter_mut() {
        if let Err(e) = composite.advance(time.delta) {
            error!("Composite {:?} failed to advance: {}", entity, e);
        }
    }
}

/// Re-issue the active mode with the mover's facing.
///
/// `set_mode` is a no-op when the facing resolves to the same native
/// direction, so this only rebuilds on an actual turn.
pub fn sync_composite_facing_system(mut query: Query<(Entity, &Mover, &mut Composite), Changed<Mover>>) {
    for (entity, mover, mut composite) in query.iter_mut() {
        let Some(mode) = composite.mode() else {
            continue;
        };
        let animation_mode = mode.animation_mode().to_string();
        let weapon_class = mode.weapon_class().to_string();

        if let Err(e) = composite.set_mode(&animation_mode, &weapon_class, mover.facing()) {
            error!("Composite {:?} failed to turn to {}: {}", entity, mover.facing(), e);
        }
    }
}

/// Screen offset of a subtile position.
pub fn screen_translation(mover: &Mover) -> (i32, i32) {
    let pos = mover.position();
    (
        ((pos.x - pos.y) * SUBTILE_SCREEN_WIDTH) as i32,
        ((pos.x + pos.y) * SUBTILE_SCREEN_HEIGHT) as i32,
    )
}

/// Isometric depth, larger is nearer the viewer.
fn depth(mover: Option<&Mover>) -> Option<i32> {
    mover.map(|mover| {
        let (x, y) = mover.tile();
        x + y
    })
}

/// Draw every composite back to front, then every missile.
///
/// Entities without a [`Mover`] are drawn first at the surface origin. A
/// render error is logged and the pass carries on with the next entity.
pub fn render_composites(world: &mut World, surface: &mut dyn Surface) {
    let mut query = world.query::<(Entity, &Composite, Option<&Mover>)>();
    let mut composites: Vec<_> = query.iter(world).collect();
    composites.sort_by_key(|(entity, _, mover)| (depth(*mover), *entity));

    for (entity, composite, mover) in composites {
        let (x, y) = mover.map_or((0, 0), screen_translation);
        surface.push_translation(x, y);
        let result = composite.render(surface);
        surface.pop();
        if let Err(e) = result {
            error!("Composite {:?} failed to render: {}", entity, e);
        }
    }

    let mut query = world.query::<(Entity, &Missile)>();
    for (entity, missile) in query.iter(world) {
        let (x, y) = screen_translation(missile.mover());
        surface.push_translation(x, y);
        let result = missile.render(surface);
        surface.pop();
        if let Err(e) = result {
            error!("Missile {:?} failed to render: {}", entity, e);
        }
    }
}
