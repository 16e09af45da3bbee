//! ECS resources and asset collaborators.
//!
//! Overview
//! - `animationdata` – frame counts and raw speeds keyed by token, mode and weapon class
//! - `assetstore` – asset backend traits, the in-memory store and its JSON manifest
//! - `cof` – direction descriptors: layers, draw effects and per-frame draw order
//! - `config` – demo settings loaded from an INI file
//! - `worldtime` – simulation time and delta
pub mod animationdata;
pub mod assetstore;
pub mod cof;
pub mod config;
pub mod worldtime;
