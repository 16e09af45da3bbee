//! Isometric composite animation library.
//!
//! Characters are drawn as a stack of independently animated layers (head,
//! torso, legs, weapons, ...). This crate resolves which layer animations to
//! load for an animation mode, keeps them in step on a shared clock and draws
//! them in the per-frame order their direction descriptor prescribes.

pub mod components;
pub mod error;
pub mod resources;
pub mod surface;
pub mod systems;
