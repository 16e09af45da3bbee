use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::layerslot::LayerSlot;

/// Read-only look of a character or creature: where its assets live and what
/// it wears in each layer slot.
///
/// An empty or missing code means the slot has nothing equipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAppearance {
    /// Asset root of the entity class, e.g. `/data/global/chars`.
    pub base: String,
    /// Creature or character type token, e.g. `AM`.
    pub token: String,
    #[serde(default)]
    pub layers: FxHashMap<LayerSlot, String>,
}

impl EntityAppearance {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            token: token.into(),
            layers: FxHashMap::default(),
        }
    }

    pub fn with_layer(mut self, slot: LayerSlot, code: impl Into<String>) -> Self {
        self.layers.insert(slot, code.into());
        self
    }

    /// Equipment code worn in `slot`, empty if none.
    pub fn code(&self, slot: LayerSlot) -> &str {
        self.layers.get(&slot).map(String::as_str).unwrap_or("")
    }
}
