//! Error types for composite building, playback and asset loading.

use thiserror::Error;

/// Errors raised by composites, layer animations and their asset collaborators.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// No direction descriptor exists for the requested mode.
    #[error("composite not found: {path}")]
    CompositeNotFound { path: String },

    /// The direction descriptor exists but could not be read or is malformed.
    #[error("failed to load direction descriptor {path}: {reason}")]
    DescriptorLoad { path: String, reason: String },

    /// The animation timing table has no entry for the key.
    #[error("could not find animation data for '{key}'")]
    AnimationDataMissing { key: String },

    /// A descriptor layer references a layer type the resolver does not know.
    #[error("unknown layer type {0}")]
    UnknownLayerType(u8),

    /// None of the candidate paths for a layer could be loaded.
    #[error("animation not found for layer {layer}")]
    LayerLoadFailure { layer: String },

    /// An operation needing an active mode was called before any successful `set_mode`.
    #[error("composite has no active mode")]
    NoActiveMode,

    /// Abstract facing outside of the 64-direction space.
    #[error("invalid direction index {0}")]
    InvalidDirection(usize),

    /// The animation has no frames for its current direction.
    #[error("animation {path} has no frames")]
    EmptyAnimation { path: String },

    /// The surface backend refused a draw.
    #[error("render failed: {0}")]
    Render(String),

    #[error("invalid asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for composite operations.
pub type Result<T> = std::result::Result<T, CompositeError>;
