//! ECS components for map entities.
//!
//! Submodules overview:
//! - [`appearance`] – base path, token and equipment codes of a character
//! - [`composite`] – layered character animation and its active mode
//! - [`layeranimation`] – play state of one directional animation
//! - [`layerslot`] – the sixteen body and equipment layer slots
//! - [`missile`] – projectiles with a single blended animation
//! - [`mover`] – path-following movement and facing

pub mod appearance;
pub mod composite;
pub mod layeranimation;
pub mod layerslot;
pub mod missile;
pub mod mover;
