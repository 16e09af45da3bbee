//! Layer resolution.
//!
//! Turns descriptor layer ids into layer slots and equipment codes, builds
//! the resource paths a composite needs and loads layer animations, falling
//! back to the hand-to-hand weapon class and to the older frame format.

use log::debug;

use crate::components::appearance::EntityAppearance;
use crate::components::layeranimation::LayerAnimation;
use crate::components::layerslot::LayerSlot;
use crate::error::{CompositeError, Result};
use crate::resources::assetstore::AssetSource;
use crate::resources::cof::{CofLayer, DrawEffect};

/// Weapon class every creature has animations for.
pub const FALLBACK_WEAPON_CLASS: &str = "HTH";

/// Resolves the layers of one entity against an asset backend.
pub struct LayerResolver<'a> {
    appearance: &'a EntityAppearance,
    assets: &'a dyn AssetSource,
    palette: &'a str,
}

impl<'a> LayerResolver<'a> {
    pub fn new(appearance: &'a EntityAppearance, assets: &'a dyn AssetSource, palette: &'a str) -> Self {
        Self {
            appearance,
            assets,
            palette,
        }
    }

    /// `{base}/{token}/COF/{token}{mode}{weapon_class}.COF`
    pub fn cof_path(&self, animation_mode: &str, weapon_class: &str) -> String {
        let EntityAppearance { base, token, .. } = self.appearance;
        format!("{base}/{token}/COF/{token}{animation_mode}{weapon_class}.COF")
    }

    /// Lowercase timing table key.
    pub fn animation_key(&self, animation_mode: &str, weapon_class: &str) -> String {
        format!("{}{}{}", self.appearance.token, animation_mode, weapon_class).to_lowercase()
    }

    /// Slot and equipment code of a descriptor layer id.
    pub fn layer_key_value(&self, layer_type: u8) -> Result<(LayerSlot, &'a str)> {
        let slot = LayerSlot::from_u8(layer_type).ok_or(CompositeError::UnknownLayerType(layer_type))?;
        Ok((slot, self.appearance.code(slot)))
    }

    /// Candidate paths in load order: own weapon class then the fallback, `.dcc` before `.dc6`.
    pub fn layer_candidates(
        &self,
        slot: LayerSlot,
        code: &str,
        animation_mode: &str,
        weapon_class: &str,
    ) -> [String; 4] {
        let EntityAppearance { base, token, .. } = self.appearance;
        let key = slot.key();
        let path = |class: &str, ext: &str| {
            format!("{base}/{token}/{key}/{token}{key}{code}{animation_mode}{class}.{ext}")
        };
        [
            path(weapon_class, "dcc"),
            path(FALLBACK_WEAPON_CLASS, "dcc"),
            path(weapon_class, "dc6"),
            path(FALLBACK_WEAPON_CLASS, "dc6"),
        ]
    }

    /// Load the first candidate that exists and decodes.
    pub fn load_layer(
        &self,
        slot: LayerSlot,
        code: &str,
        animation_mode: &str,
        weapon_class: &str,
        transparency: u8,
    ) -> Result<LayerAnimation> {
        if code.is_empty() {
            debug!("Layer {} has no equipment code", slot.key());
            return Err(CompositeError::LayerLoadFailure {
                layer: slot.key().to_string(),
            });
        }

        for path in self.layer_candidates(slot, code, animation_mode, weapon_class) {
            if !self.assets.resource_exists(&path) {
                continue;
            }
            match self.assets.load_animation(&path, self.palette, transparency) {
                Ok(animation) => return Ok(animation),
                Err(e) => debug!("Layer candidate {} failed: {}", path, e),
            }
        }

        Err(CompositeError::LayerLoadFailure {
            layer: slot.key().to_string(),
        })
    }
}

/// Transparency and additive blend flag for a descriptor layer.
pub fn layer_blend(layer: &CofLayer) -> (u8, bool) {
    if !layer.transparent {
        return (255, false);
    }
    match layer.draw_effect {
        DrawEffect::PctTransparency25 => (64, false),
        DrawEffect::PctTransparency50 => (128, false),
        DrawEffect::PctTransparency75 => (192, false),
        DrawEffect::Modulate => (255, true),
        DrawEffect::Burn | DrawEffect::Normal => (255, false),
    }
}
