//! Layered composite animation.
//!
//! A [`Composite`] assembles a character from independently animated body and
//! equipment layers. It keeps at most one active [`CompositeMode`], rebuilt
//! whenever the animation mode, weapon class or facing changes.
//!
//! # Flow
//!
//! 1. [`Composite::set_mode`] loads the direction descriptor and timing for the
//!    mode and loads every layer the descriptor lists ([`mode::CompositeMode::build`])
//! 2. [`Composite::advance`] steps the shared frame clock, then each layer
//! 3. [`Composite::render`] draws the present layers in the draw order of the
//!    current frame
//!
//! # Related
//!
//! - [`crate::systems::composite`] – advance system and render pass
//! - [`crate::resources::assetstore`] – asset backend the build reads from

pub mod direction;
pub mod mode;
pub mod resolver;

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::appearance::EntityAppearance;
use crate::components::composite::direction::FACING_DIRECTIONS;
use crate::error::{CompositeError, Result};
use crate::resources::animationdata::AnimationDataTable;
use crate::resources::assetstore::AssetSource;
use crate::surface::Surface;

pub use mode::CompositeMode;
use mode::BuildContext;

#[derive(Component)]
pub struct Composite {
    appearance: Arc<EntityAppearance>,
    palette: Arc<str>,
    assets: Arc<dyn AssetSource>,
    timing: Arc<AnimationDataTable>,
    mode: Option<CompositeMode>,
}

impl Composite {
    pub fn new(
        appearance: Arc<EntityAppearance>,
        palette: impl Into<Arc<str>>,
        assets: Arc<dyn AssetSource>,
        timing: Arc<AnimationDataTable>,
    ) -> Self {
        Self {
            appearance,
            palette: palette.into(),
            assets,
            timing,
            mode: None,
        }
    }

    pub fn appearance(&self) -> &EntityAppearance {
        &self.appearance
    }

    /// Active mode, if any.
    pub fn mode(&self) -> Option<&CompositeMode> {
        self.mode.as_ref()
    }

    /// Advance the shared clock and every layer. Stops at the first layer error.
    pub fn advance(&mut self, elapsed: f64) -> Result<()> {
        match self.mode.as_mut() {
            Some(mode) => mode.advance(elapsed),
            None => Ok(()),
        }
    }

    /// Render the current frame. Stops at the first layer error.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        match &self.mode {
            Some(mode) => mode.render(surface),
            None => Ok(()),
        }
    }

    pub fn animation_mode(&self) -> Result<&str> {
        self.mode
            .as_ref()
            .map(CompositeMode::animation_mode)
            .ok_or(CompositeError::NoActiveMode)
    }

    pub fn weapon_class(&self) -> Result<&str> {
        self.mode
            .as_ref()
            .map(CompositeMode::weapon_class)
            .ok_or(CompositeError::NoActiveMode)
    }

    /// Switch to a mode, weapon class and abstract facing in `[0, 64)`.
    ///
    /// Does nothing if the active mode already shows the same resolved
    /// direction. On failure the active mode is left untouched.
    pub fn set_mode(&mut self, animation_mode: &str, weapon_class: &str, direction: usize) -> Result<()> {
        if direction >= FACING_DIRECTIONS {
            return Err(CompositeError::InvalidDirection(direction));
        }
        if self
            .mode
            .as_ref()
            .is_some_and(|mode| mode.matches(animation_mode, weapon_class, direction))
        {
            return Ok(());
        }

        let ctx = BuildContext {
            appearance: &self.appearance,
            palette: &self.palette,
            assets: self.assets.as_ref(),
            timing: &self.timing,
        };
        let mode = CompositeMode::build(&ctx, animation_mode, weapon_class, direction)?;

        debug!(
            "{}: mode {}{} direction {}/{} with {} layers",
            self.appearance.token,
            animation_mode,
            weapon_class,
            mode.direction(),
            mode.direction_count(),
            mode.layer_count()
        );
        self.mode = Some(mode);
        Ok(())
    }

    /// Set the raw animation speed of the active mode.
    pub fn set_speed(&mut self, raw_speed: i32) -> Result<()> {
        let mode = self.mode.as_mut().ok_or(CompositeError::NoActiveMode)?;
        mode.set_speed(raw_speed);
        Ok(())
    }

    /// Native facings of the active mode, 0 without one.
    pub fn direction_count(&self) -> usize {
        self.mode.as_ref().map_or(0, CompositeMode::direction_count)
    }

    /// Full loops completed since the mode was set, 0 without one.
    pub fn played_count(&self) -> usize {
        self.mode.as_ref().map_or(0, CompositeMode::played_count)
    }
}
