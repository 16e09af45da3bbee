//! Asset collaborators.
//!
//! Decoding animation containers and raster data belongs to the asset
//! backend. Composites talk to it through [`AssetSource`] and get back
//! [`FrameSource`] handles describing decoded frames.
//!
//! [`MemoryAssetStore`] is an in-memory backend populated programmatically or
//! from a JSON manifest. It is what the demo binary and the tests run on.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::appearance::EntityAppearance;
use crate::components::layeranimation::LayerAnimation;
use crate::components::missile::MissileRecord;
use crate::resources::animationdata::AnimationDataTable;
use crate::resources::cof::DirectionDescriptor;
use crate::error::{CompositeError, Result};

/// A decoded directional animation resource.
pub trait FrameSource: Send + Sync {
    /// Path the resource was loaded from.
    fn path(&self) -> &str;
    fn direction_count(&self) -> usize;
    fn frames_per_direction(&self) -> usize;
    /// Draw offset of a frame relative to the entity origin.
    fn frame_offset(&self, _direction: usize, _frame: usize) -> (i32, i32) {
        (0, 0)
    }
}

impl fmt::Debug for dyn FrameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSource")
            .field("path", &self.path())
            .field("direction_count", &self.direction_count())
            .field("frames_per_direction", &self.frames_per_direction())
            .finish()
    }
}

/// Asset backend used to build composites.
pub trait AssetSource: Send + Sync {
    fn resource_exists(&self, path: &str) -> bool;

    fn load_direction_descriptor(&self, path: &str) -> Result<Arc<DirectionDescriptor>>;

    /// Decode the frames at `path` with `palette`.
    fn load_frames(&self, path: &str, palette: &str) -> Result<Arc<dyn FrameSource>>;

    /// Load a fresh playable animation. Play state is never shared.
    fn load_animation(&self, path: &str, palette: &str, transparency: u8) -> Result<LayerAnimation> {
        let frames = self.load_frames(path, palette)?;
        Ok(LayerAnimation::new(frames).with_transparency(transparency))
    }
}

/// Frame layout of an in-memory animation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSheet {
    pub direction_count: usize,
    pub frames_per_direction: usize,
    #[serde(default)]
    pub origin: (i32, i32),
}

impl FrameSheet {
    pub fn new(direction_count: usize, frames_per_direction: usize) -> Self {
        Self {
            direction_count,
            frames_per_direction,
            origin: (0, 0),
        }
    }
}

#[derive(Debug)]
struct MemoryFrames {
    path: String,
    sheet: FrameSheet,
}

impl FrameSource for MemoryFrames {
    fn path(&self) -> &str {
        &self.path
    }

    fn direction_count(&self) -> usize {
        self.sheet.direction_count
    }

    fn frames_per_direction(&self) -> usize {
        self.sheet.frames_per_direction
    }

    fn frame_offset(&self, _direction: usize, _frame: usize) -> (i32, i32) {
        self.sheet.origin
    }
}

/// In-memory [`AssetSource`].
///
/// Decoded frames are memoized per path and palette, so each pair is built at
/// most once no matter how many composites load it.
#[derive(Default)]
pub struct MemoryAssetStore {
    descriptors: FxHashMap<String, Arc<DirectionDescriptor>>,
    sheets: FxHashMap<String, FrameSheet>,
    loaded: Mutex<FxHashMap<(String, String), Arc<MemoryFrames>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_descriptor(&mut self, path: impl Into<String>, descriptor: DirectionDescriptor) {
        self.descriptors.insert(path.into(), Arc::new(descriptor));
    }

    pub fn insert_sheet(&mut self, path: impl Into<String>, sheet: FrameSheet) {
        self.sheets.insert(path.into(), sheet);
    }

    /// Number of distinct (path, palette) decodes performed so far.
    pub fn decoded_count(&self) -> usize {
        self.loaded.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl AssetSource for MemoryAssetStore {
    fn resource_exists(&self, path: &str) -> bool {
        self.descriptors.contains_key(path) || self.sheets.contains_key(path)
    }

    fn load_direction_descriptor(&self, path: &str) -> Result<Arc<DirectionDescriptor>> {
        let descriptor = self
            .descriptors
            .get(path)
            .ok_or_else(|| CompositeError::DescriptorLoad {
                path: path.to_string(),
                reason: "no such resource".to_string(),
            })?;
        descriptor.validate(path)?;
        Ok(Arc::clone(descriptor))
    }

    fn load_frames(&self, path: &str, palette: &str) -> Result<Arc<dyn FrameSource>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        let key = (path.to_string(), palette.to_string());
        if let Some(frames) = loaded.get(&key) {
            return Ok(Arc::clone(frames) as Arc<dyn FrameSource>);
        }

        let sheet = self
            .sheets
            .get(path)
            .ok_or_else(|| CompositeError::LayerLoadFailure {
                layer: path.to_string(),
            })?;
        if sheet.direction_count == 0 {
            return Err(CompositeError::EmptyAnimation {
                path: path.to_string(),
            });
        }

        debug!("Decoding {} with palette {}", path, palette);
        let frames = Arc::new(MemoryFrames {
            path: path.to_string(),
            sheet: sheet.clone(),
        });
        loaded.insert(key, Arc::clone(&frames));
        Ok(frames as Arc<dyn FrameSource>)
    }
}

/// JSON description of a complete asset set.
///
/// ```json
/// {
///   "descriptors": { "/data/global/monsters/ZM/COF/ZMWLHTH.COF": { ... } },
///   "animations": { "/data/global/monsters/ZM/TR/ZMTRLITWLHTH.dcc": { "direction_count": 8, "frames_per_direction": 8 } },
///   "timing": { "zmwlhth": [ { "frames_per_direction": 8, "animation_speed": 256 } ] },
///   "entities": [ { "base": "/data/global/monsters", "token": "ZM", "layers": { "TR": "LIT" } } ],
///   "missiles": [ { "name": "firebolt", "cel_file_name": "firebolt", "velocity": 10.0 } ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub descriptors: FxHashMap<String, DirectionDescriptor>,
    #[serde(default)]
    pub animations: FxHashMap<String, FrameSheet>,
    #[serde(default)]
    pub timing: AnimationDataTable,
    #[serde(default)]
    pub entities: Vec<EntityAppearance>,
    #[serde(default)]
    pub missiles: Vec<MissileRecord>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let manifest = Self::from_json(&json)?;
        info!(
            "Loaded manifest {:?}: {} descriptors, {} animations, {} timing keys, {} entities, {} missiles",
            path,
            manifest.descriptors.len(),
            manifest.animations.len(),
            manifest.timing.len(),
            manifest.entities.len(),
            manifest.missiles.len()
        );
        Ok(manifest)
    }

    /// Split into the asset store, the timing table and the entity records.
    ///
    /// Missile records are not part of the split; take them out first.
    pub fn into_parts(self) -> (MemoryAssetStore, AnimationDataTable, Vec<EntityAppearance>) {
        let mut store = MemoryAssetStore::new();
        for (path, descriptor) in self.descriptors {
            store.insert_descriptor(path, descriptor);
        }
        for (path, sheet) in self.animations {
            store.insert_sheet(path, sheet);
        }
        (store, self.timing, self.entities)
    }
}
