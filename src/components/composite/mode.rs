//! A composite animation resolved for one mode, weapon class and facing.
//!
//! The mode owns the layer animations, the draw order of its native
//! direction and a shared frame clock. The clock only picks which draw order
//! entry is used; every layer keeps stepping its own frames.

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::components::appearance::EntityAppearance;
use crate::components::composite::direction::{FACING_DIRECTIONS, resolve_direction};
use crate::components::composite::resolver::{LayerResolver, layer_blend};
use crate::components::layeranimation::LayerAnimation;
use crate::components::layerslot::LayerSlot;
use crate::error::{CompositeError, Result};
use crate::resources::animationdata::AnimationDataTable;
use crate::resources::assetstore::AssetSource;
use crate::surface::Surface;

/// Numerator of the raw-speed to seconds-per-frame conversion.
pub const ANIMATION_NUMERATOR: f64 = 1.0;

/// Back-to-front layer slots of one frame.
pub type DrawOrder = ArrayVec<LayerSlot, { LayerSlot::COUNT }>;

/// Seconds per frame for a raw animation speed. Non-positive speeds never advance.
pub fn seconds_per_frame(raw_speed: i32) -> f64 {
    if raw_speed <= 0 {
        return f64::INFINITY;
    }
    ANIMATION_NUMERATOR / ((raw_speed as f64 * 25.0) / 256.0)
}

/// Everything a mode build reads.
pub struct BuildContext<'a> {
    pub appearance: &'a EntityAppearance,
    pub palette: &'a str,
    pub assets: &'a dyn AssetSource,
    pub timing: &'a AnimationDataTable,
}

#[derive(Debug)]
pub struct CompositeMode {
    animation_mode: String,
    weapon_class: String,
    /// Native direction.
    direction: usize,
    direction_count: usize,
    frame_count: usize,
    frame_index: usize,
    last_frame_time: f64,
    played_count: usize,
    animation_speed: f64,
    layers: [Option<LayerAnimation>; LayerSlot::COUNT],
    draw_order: Vec<DrawOrder>,
}

impl CompositeMode {
    /// Resolve the descriptor, timing and layers for a mode.
    ///
    /// Missing descriptors, timing and unknown layer types abort the build.
    /// Layers whose animation cannot be found are left empty.
    pub fn build(
        ctx: &BuildContext<'_>,
        animation_mode: &str,
        weapon_class: &str,
        direction: usize,
    ) -> Result<Self> {
        if direction >= FACING_DIRECTIONS {
            return Err(CompositeError::InvalidDirection(direction));
        }

        let resolver = LayerResolver::new(ctx.appearance, ctx.assets, ctx.palette);

        let cof_path = resolver.cof_path(animation_mode, weapon_class);
        if !ctx.assets.resource_exists(&cof_path) {
            return Err(CompositeError::CompositeNotFound { path: cof_path });
        }
        let cof = ctx.assets.load_direction_descriptor(&cof_path)?;

        let native_direction = resolve_direction(direction, cof.direction_count);

        let key = resolver.animation_key(animation_mode, weapon_class);
        let timing = match ctx.timing.lookup(&key).first() {
            Some(timing) if timing.frames_per_direction > 0 => *timing,
            _ => return Err(CompositeError::AnimationDataMissing { key }),
        };
        if cof.frames_per_direction > 0 && cof.frames_per_direction != timing.frames_per_direction {
            return Err(CompositeError::DescriptorLoad {
                path: cof_path,
                reason: format!(
                    "descriptor has {} frames per direction, timing {} has {}",
                    cof.frames_per_direction, key, timing.frames_per_direction
                ),
            });
        }
        let animation_speed = seconds_per_frame(timing.animation_speed);

        let mut draw_order = Vec::with_capacity(timing.frames_per_direction);
        for frame in 0..timing.frames_per_direction {
            let priority = cof.frame_priority(native_direction, frame).ok_or_else(|| {
                CompositeError::DescriptorLoad {
                    path: cof_path.clone(),
                    reason: format!(
                        "no draw order for direction {} frame {} of {}",
                        native_direction, frame, timing.frames_per_direction
                    ),
                }
            })?;

            let mut order = DrawOrder::new();
            for &id in priority {
                match LayerSlot::from_u8(id) {
                    Some(slot) if !order.contains(&slot) => order.push(slot),
                    Some(_) => {}
                    None => warn!("{}: skipping unknown layer id {} in draw order", cof_path, id),
                }
            }
            draw_order.push(order);
        }

        let mut layers: [Option<LayerAnimation>; LayerSlot::COUNT] = std::array::from_fn(|_| None);
        for cof_layer in &cof.layers {
            let (slot, code) = resolver.layer_key_value(cof_layer.layer_type)?;
            let (transparency, blend) = layer_blend(cof_layer);

            match resolver.load_layer(slot, code, animation_mode, weapon_class, transparency) {
                Ok(mut layer) => {
                    layer.set_play_speed(animation_speed);
                    layer.play_forward();
                    layer.set_blend(blend);
                    // Layers map the abstract facing onto their own direction count
                    layer.set_direction(direction)?;
                    layers[slot.index()] = Some(layer);
                }
                Err(e) => debug!("{}: layer {} left empty: {}", cof_path, slot.key(), e),
            }
        }

        Ok(Self {
            animation_mode: animation_mode.to_string(),
            weapon_class: weapon_class.to_string(),
            direction: native_direction,
            direction_count: cof.direction_count,
            frame_count: timing.frames_per_direction,
            frame_index: 0,
            last_frame_time: 0.0,
            played_count: 0,
            animation_speed,
            layers,
            draw_order,
        })
    }

    pub fn animation_mode(&self) -> &str {
        &self.animation_mode
    }

    pub fn weapon_class(&self) -> &str {
        &self.weapon_class
    }

    /// Native direction the draw order was taken from.
    pub fn direction(&self) -> usize {
        self.direction
    }

    pub fn direction_count(&self) -> usize {
        self.direction_count
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Unconsumed time towards the next frame.
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame_time
    }

    pub fn played_count(&self) -> usize {
        self.played_count
    }

    /// Seconds per frame of the shared clock.
    pub fn animation_speed(&self) -> f64 {
        self.animation_speed
    }

    pub fn layer(&self, slot: LayerSlot) -> Option<&LayerAnimation> {
        self.layers[slot.index()].as_ref()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.iter().flatten().count()
    }

    pub fn draw_order(&self, frame: usize) -> Option<&[LayerSlot]> {
        self.draw_order.get(frame).map(|order| order.as_slice())
    }

    /// Whether this mode already shows `direction` for the mode and weapon class.
    pub fn matches(&self, animation_mode: &str, weapon_class: &str, direction: usize) -> bool {
        self.animation_mode == animation_mode
            && self.weapon_class == weapon_class
            && self.direction == resolve_direction(direction, self.direction_count)
    }

    /// Set the raw speed of the shared clock and of every layer.
    pub fn set_speed(&mut self, raw_speed: i32) {
        self.animation_speed = seconds_per_frame(raw_speed);
        for layer in self.layers.iter_mut().flatten() {
            layer.set_play_speed(self.animation_speed);
        }
    }

    /// Step the shared clock, then every layer by the same elapsed time.
    pub fn advance(&mut self, elapsed: f64) -> Result<()> {
        if elapsed.is_finite() {
            self.last_frame_time += elapsed;
        }
        let frames = (self.last_frame_time / self.animation_speed).floor();
        if frames.is_finite() && frames >= 1.0 {
            self.last_frame_time = (self.last_frame_time - frames * self.animation_speed).max(0.0);
            let frame_count = self.frame_count as f64;
            let partial = frames % frame_count;
            let loops = ((frames - partial) / frame_count) as usize;
            self.frame_index += partial as usize;
            self.played_count = self
                .played_count
                .saturating_add(loops)
                .saturating_add(self.frame_index / self.frame_count);
            self.frame_index %= self.frame_count;
        }

        for layer in self.layers.iter_mut().flatten() {
            layer.advance(elapsed)?;
        }
        Ok(())
    }

    /// Draw present layers in this frame's back-to-front order.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let Some(order) = self.draw_order.get(self.frame_index) else {
            return Ok(());
        };
        for slot in order {
            if let Some(layer) = &self.layers[slot.index()] {
                layer.render_from_origin(surface)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl CompositeMode {
    /// Bare clock with no layers, for timing tests.
    pub(crate) fn with_clock(frame_count: usize, animation_speed: f64) -> Self {
        Self {
            animation_mode: "NU".to_string(),
            weapon_class: "HTH".to_string(),
            direction: 0,
            direction_count: 1,
            frame_count,
            frame_index: 0,
            last_frame_time: 0.0,
            played_count: 0,
            animation_speed,
            layers: std::array::from_fn(|_| None),
            draw_order: (0..frame_count).map(|_| DrawOrder::new()).collect(),
        }
    }
}
