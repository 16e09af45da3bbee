//! Direction descriptors (COF data).
//!
//! A descriptor tells a composite how many facings an animation mode has,
//! which layers take part and, for every direction and frame, the
//! back-to-front order the layers are drawn in. Parsing the binary container
//! is left to the asset backend; this module only holds the decoded data.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::composite::direction::FACING_DIRECTIONS;
use crate::error::{CompositeError, Result};

/// Per-frame draw order: layer type ids, back to front.
pub type LayerPriority = SmallVec<[u8; 16]>;

/// How a layer is blended when it is flagged transparent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawEffect {
    PctTransparency25,
    PctTransparency50,
    PctTransparency75,
    Modulate,
    Burn,
    #[default]
    Normal,
}

/// One layer taking part in a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CofLayer {
    /// Raw layer type id, see [`LayerSlot`](crate::components::layerslot::LayerSlot).
    pub layer_type: u8,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub draw_effect: DrawEffect,
}

impl CofLayer {
    pub fn new(layer_type: u8) -> Self {
        Self {
            layer_type,
            transparent: false,
            draw_effect: DrawEffect::Normal,
        }
    }

    pub fn with_effect(mut self, draw_effect: DrawEffect) -> Self {
        self.transparent = true;
        self.draw_effect = draw_effect;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionDescriptor {
    /// Number of native facings, a divisor of 64.
    pub direction_count: usize,
    /// Frames of every direction. 0 leaves the count to the timing table.
    #[serde(default)]
    pub frames_per_direction: usize,
    pub layers: Vec<CofLayer>,
    /// `priority[direction][frame]` lists layer ids back to front.
    pub priority: Vec<Vec<LayerPriority>>,
}

impl DirectionDescriptor {
    /// Check the structural invariants the composite relies on.
    pub fn validate(&self, path: &str) -> Result<()> {
        let fail = |reason: String| {
            Err(CompositeError::DescriptorLoad {
                path: path.to_string(),
                reason,
            })
        };

        if self.direction_count == 0 || FACING_DIRECTIONS % self.direction_count != 0 {
            return fail(format!(
                "direction count {} does not divide {}",
                self.direction_count, FACING_DIRECTIONS
            ));
        }
        if self.priority.len() != self.direction_count {
            return fail(format!(
                "priority table has {} directions, expected {}",
                self.priority.len(),
                self.direction_count
            ));
        }
        if self.frames_per_direction > 0 {
            if let Some((direction, rows)) = self
                .priority
                .iter()
                .enumerate()
                .find(|(_, rows)| rows.len() != self.frames_per_direction)
            {
                return fail(format!(
                    "direction {} has {} draw orders, expected {}",
                    direction,
                    rows.len(),
                    self.frames_per_direction
                ));
            }
        }
        Ok(())
    }

    /// Draw order for one frame of one native direction.
    pub fn frame_priority(&self, direction: usize, frame: usize) -> Option<&LayerPriority> {
        self.priority.get(direction)?.get(frame)
    }
}
