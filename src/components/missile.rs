//! Missiles: single-animation projectiles that fly in a straight line.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::layeranimation::LayerAnimation;
use crate::components::mover::{DoneCallback, Mover};
use crate::error::Result;
use crate::resources::assetstore::AssetSource;
use crate::surface::Surface;

/// Directory holding missile animations.
pub const MISSILE_DATA: &str = "/data/global/missiles";

fn default_loop() -> bool {
    true
}

/// Static description of a missile type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissileRecord {
    pub name: String,
    pub cel_file_name: String,
    #[serde(default)]
    pub has_sub_loop: bool,
    #[serde(default)]
    pub sub_starting_frame: usize,
    #[serde(default)]
    pub sub_ending_frame: usize,
    #[serde(default = "default_loop")]
    pub loop_animation: bool,
    /// Subtiles per second.
    pub velocity: f64,
}

#[derive(Component, Debug)]
pub struct Missile {
    name: String,
    mover: Mover,
    animation: LayerAnimation,
}

impl Missile {
    /// Spawn a missile at a subtile position. Its animation is drawn additively.
    pub fn new(x: f64, y: f64, record: &MissileRecord, assets: &dyn AssetSource, palette: &str) -> Result<Self> {
        let path = format!("{}/{}.dcc", MISSILE_DATA, record.cel_file_name);
        let mut animation = assets.load_animation(&path, palette, 255)?;

        if record.has_sub_loop {
            animation.set_sub_loop(record.sub_starting_frame, record.sub_ending_frame);
        }
        animation.set_blend(true);
        animation.set_play_loop(record.loop_animation);
        animation.play_forward();

        Ok(Self {
            name: record.name.clone(),
            mover: Mover::new(x, y).with_speed(record.velocity),
            animation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn animation(&self) -> &LayerAnimation {
        &self.animation
    }

    /// Fly `range` subtiles along `radians` and face the flight direction.
    pub fn set_radians(&mut self, radians: f64, range: f64, done: Option<DoneCallback>) -> Result<()> {
        let from = self.mover.position();
        let x = from.x + range * radians.cos();
        let y = from.y + range * radians.sin();
        self.mover.set_target(x, y, done);
        self.animation.set_direction(self.mover.facing())
    }

    pub fn advance(&mut self, dt: f64) -> Result<()> {
        self.mover.step(dt);
        self.animation.advance(dt)
    }

    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        self.animation.render_from_origin(surface)
    }
}
