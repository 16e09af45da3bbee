//! Animation timing table.
//!
//! Frame counts and nominal speeds per creature token, animation mode and
//! weapon class. Keys are stored lowercase; lookups lowercase their input.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Timing of one animation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationTiming {
    pub frames_per_direction: usize,
    /// Raw speed; 256 plays 25 frames per second.
    pub animation_speed: i32,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "FxHashMap<String, Vec<AnimationTiming>>",
    into = "FxHashMap<String, Vec<AnimationTiming>>"
)]
pub struct AnimationDataTable {
    entries: FxHashMap<String, Vec<AnimationTiming>>,
}

impl From<FxHashMap<String, Vec<AnimationTiming>>> for AnimationDataTable {
    fn from(raw: FxHashMap<String, Vec<AnimationTiming>>) -> Self {
        let mut table = Self::default();
        for (key, timings) in raw {
            for timing in timings {
                table.insert(&key, timing);
            }
        }
        table
    }
}

impl From<AnimationDataTable> for FxHashMap<String, Vec<AnimationTiming>> {
    fn from(table: AnimationDataTable) -> Self {
        table.entries
    }
}

impl AnimationDataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timing record under `key`.
    pub fn insert(&mut self, key: &str, timing: AnimationTiming) {
        self.entries
            .entry(key.to_lowercase())
            .or_default()
            .push(timing);
    }

    /// All timing records for `key`, empty when unknown.
    pub fn lookup(&self, key: &str) -> &[AnimationTiming] {
        self.entries
            .get(&key.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
