//! ECS systems.
//!
//! Submodules overview
//! - [`composite`] – advance composites, follow mover facings, render back to front
//! - [`movement`] – step movers along their paths and fly missiles
//! - [`time`] – update simulation time and delta

pub mod composite;
pub mod movement;
pub mod time;
