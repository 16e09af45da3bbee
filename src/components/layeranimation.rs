//! Play state of a single directional animation.
//!
//! A [`LayerAnimation`] wraps a decoded [`FrameSource`] and steps through the
//! frames of its current direction on its own clock. Composites own one per
//! layer; missiles own exactly one.

use std::fmt;
use std::sync::Arc;

use crate::components::composite::direction::{FACING_DIRECTIONS, resolve_direction};
use crate::error::{CompositeError, Result};
use crate::resources::assetstore::FrameSource;
use crate::surface::{BlendMode, FrameRef, Surface};

/// Playback direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayMode {
    #[default]
    Forward,
    Backward,
    Paused,
}

/// Outcome of a single frame step.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Step {
    Moved,
    Wrapped,
    Ended,
}

#[derive(Clone)]
pub struct LayerAnimation {
    source: Arc<dyn FrameSource>,
    direction: usize,
    frame_index: usize,
    last_frame_time: f64,
    /// Seconds per frame.
    frame_duration: f64,
    play_mode: PlayMode,
    play_loop: bool,
    blend: bool,
    transparency: u8,
    played_count: usize,
    /// `[start, end)` frame range looped after the first full play.
    sub_loop: Option<(usize, usize)>,
}

impl fmt::Debug for LayerAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerAnimation")
            .field("path", &self.source.path())
            .field("direction", &self.direction)
            .field("frame_index", &self.frame_index)
            .field("frame_duration", &self.frame_duration)
            .field("play_mode", &self.play_mode)
            .field("play_loop", &self.play_loop)
            .field("blend", &self.blend)
            .field("transparency", &self.transparency)
            .finish()
    }
}

impl LayerAnimation {
    /// Fresh play state over `source`: direction 0, frame 0, looping forward,
    /// one direction's worth of frames per second.
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        let frames = source.frames_per_direction().max(1);
        Self {
            source,
            direction: 0,
            frame_index: 0,
            last_frame_time: 0.0,
            frame_duration: 1.0 / frames as f64,
            play_mode: PlayMode::Forward,
            play_loop: true,
            blend: false,
            transparency: 255,
            played_count: 0,
            sub_loop: None,
        }
    }

    pub fn with_transparency(mut self, transparency: u8) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn path(&self) -> &str {
        self.source.path()
    }

    pub fn frame_count(&self) -> usize {
        self.source.frames_per_direction()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Native direction index within the source.
    pub fn direction(&self) -> usize {
        self.direction
    }

    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn is_looping(&self) -> bool {
        self.play_loop
    }

    pub fn is_blend(&self) -> bool {
        self.blend
    }

    pub fn transparency(&self) -> u8 {
        self.transparency
    }

    pub fn played_count(&self) -> usize {
        self.played_count
    }

    /// Set seconds per frame. Non-positive or NaN durations stop the clock.
    pub fn set_play_speed(&mut self, seconds_per_frame: f64) {
        self.frame_duration = if seconds_per_frame > 0.0 {
            seconds_per_frame
        } else {
            f64::INFINITY
        };
    }

    pub fn play_forward(&mut self) {
        self.play_mode = PlayMode::Forward;
        self.last_frame_time = 0.0;
    }

    pub fn play_backward(&mut self) {
        self.play_mode = PlayMode::Backward;
        self.last_frame_time = 0.0;
    }

    pub fn pause(&mut self) {
        self.play_mode = PlayMode::Paused;
    }

    pub fn set_play_loop(&mut self, play_loop: bool) {
        self.play_loop = play_loop;
    }

    pub fn set_blend(&mut self, blend: bool) {
        self.blend = blend;
    }

    pub fn set_sub_loop(&mut self, start: usize, end: usize) {
        self.sub_loop = Some((start, end));
    }

    /// Face an abstract direction in `[0, 64)` and restart at frame 0.
    pub fn set_direction(&mut self, direction: usize) -> Result<()> {
        if direction >= FACING_DIRECTIONS {
            return Err(CompositeError::InvalidDirection(direction));
        }
        self.direction = resolve_direction(direction, self.source.direction_count());
        self.frame_index = 0;
        Ok(())
    }

    fn blend_mode(&self) -> BlendMode {
        if self.blend {
            BlendMode::Additive
        } else {
            BlendMode::Alpha(self.transparency)
        }
    }

    fn loop_bounds(&self, frame_count: usize) -> (usize, usize) {
        match self.sub_loop {
            Some((start, end)) if self.played_count > 0 => {
                let end = if end == 0 { frame_count } else { end.min(frame_count) };
                (start.min(end - 1), end)
            }
            _ => (0, frame_count),
        }
    }

    /// Advance the clock by `elapsed` seconds, stepping whole frames.
    pub fn advance(&mut self, elapsed: f64) -> Result<()> {
        if self.play_mode == PlayMode::Paused {
            return Ok(());
        }

        let frame_count = self.source.frames_per_direction();
        if frame_count == 0 {
            return Err(CompositeError::EmptyAnimation {
                path: self.source.path().to_string(),
            });
        }

        if elapsed.is_finite() {
            self.last_frame_time += elapsed;
        }
        let frames = (self.last_frame_time / self.frame_duration).floor();
        if !frames.is_finite() || frames < 1.0 {
            return Ok(());
        }
        self.last_frame_time = (self.last_frame_time - frames * self.frame_duration).max(0.0);

        let mut remaining = frames;
        while remaining >= 1.0 {
            let step = self.step(frame_count);
            if step == Step::Ended {
                break;
            }
            remaining -= 1.0;
            if step == Step::Wrapped {
                // Whole cycles of the current loop land back on this frame
                let (start, end) = self.loop_bounds(frame_count);
                let span = (end - start) as f64;
                let partial = remaining % span;
                let cycles = ((remaining - partial) / span) as usize;
                self.played_count = self.played_count.saturating_add(cycles);
                remaining = partial;
            }
        }
        Ok(())
    }

    /// Move one frame.
    fn step(&mut self, frame_count: usize) -> Step {
        let (start, end) = self.loop_bounds(frame_count);
        match self.play_mode {
            PlayMode::Forward => {
                self.frame_index += 1;
                if self.frame_index >= end {
                    self.played_count = self.played_count.saturating_add(1);
                    if !self.play_loop {
                        self.frame_index = end - 1;
                        return Step::Ended;
                    }
                    self.frame_index = self.loop_bounds(frame_count).0;
                    return Step::Wrapped;
                }
            }
            PlayMode::Backward => {
                if self.frame_index <= start {
                    self.played_count = self.played_count.saturating_add(1);
                    if !self.play_loop {
                        self.frame_index = start;
                        return Step::Ended;
                    }
                    self.frame_index = self.loop_bounds(frame_count).1 - 1;
                    return Step::Wrapped;
                } else {
                    self.frame_index -= 1;
                }
            }
            PlayMode::Paused => return Step::Ended,
        }
        Step::Moved
    }

    /// Draw the current frame at the entity origin.
    pub fn render_from_origin(&self, surface: &mut dyn Surface) -> Result<()> {
        let (x, y) = self.source.frame_offset(self.direction, self.frame_index);
        surface.push_translation(x, y);
        surface.push_blend(self.blend_mode());
        let result = surface.draw_frame(FrameRef {
            path: self.source.path(),
            direction: self.direction,
            frame: self.frame_index,
        });
        surface.pop();
        surface.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Frames {
        directions: usize,
        frames: usize,
    }

    impl FrameSource for Frames {
        fn path(&self) -> &str {
            "/data/test.dcc"
        }
        fn direction_count(&self) -> usize {
            self.directions
        }
        fn frames_per_direction(&self) -> usize {
            self.frames
        }
        fn frame_offset(&self, direction: usize, frame: usize) -> (i32, i32) {
            (direction as i32, frame as i32)
        }
    }

    #[derive(Default)]
    struct Recorder {
        depth: usize,
        draws: Vec<(usize, usize, BlendMode)>,
        blend: Vec<BlendMode>,
        fail: bool,
    }

    impl Surface for Recorder {
        fn push_translation(&mut self, _x: i32, _y: i32) {
            self.depth += 1;
        }
        fn push_blend(&mut self, blend: BlendMode) {
            self.depth += 1;
            self.blend.push(blend);
        }
        fn pop(&mut self) {
            self.depth -= 1;
        }
        fn draw_frame(&mut self, frame: FrameRef<'_>) -> Result<()> {
            if self.fail {
                return Err(CompositeError::Render("boom".to_string()));
            }
            let blend = self.blend.last().copied().unwrap_or_default();
            self.draws.push((frame.direction, frame.frame, blend));
            Ok(())
        }
    }

    fn animation(directions: usize, frames: usize) -> LayerAnimation {
        let mut anim = LayerAnimation::new(Arc::new(Frames { directions, frames }));
        anim.set_play_speed(0.25);
        anim
    }

    #[test]
    fn advances_whole_frames_and_keeps_remainder() {
        let mut anim = animation(8, 4);
        anim.advance(0.375).unwrap();
        assert_eq!(anim.frame_index(), 1);
        anim.advance(0.125).unwrap();
        assert_eq!(anim.frame_index(), 2);
    }

    #[test]
    fn forward_loop_wraps_and_counts_plays() {
        let mut anim = animation(8, 4);
        anim.advance(1.0).unwrap();
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.played_count(), 1);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let mut anim = animation(8, 4);
        anim.set_play_loop(false);
        anim.advance(5.0).unwrap();
        assert_eq!(anim.frame_index(), 3);
        assert_eq!(anim.played_count(), 1);
    }

    #[test]
    fn backward_play_wraps_to_last_frame() {
        let mut anim = animation(8, 4);
        anim.play_backward();
        anim.advance(0.25).unwrap();
        assert_eq!(anim.frame_index(), 3);
        anim.advance(0.5).unwrap();
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn paused_animation_does_not_move() {
        let mut anim = animation(8, 4);
        anim.pause();
        anim.advance(3.0).unwrap();
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn sub_loop_applies_after_first_play() {
        let mut anim = animation(1, 6);
        anim.set_sub_loop(2, 4);
        // Six frames to finish the first play, then 2, 3, 2
        anim.advance(0.25 * 6.0).unwrap();
        assert_eq!(anim.frame_index(), 2);
        anim.advance(0.25).unwrap();
        assert_eq!(anim.frame_index(), 3);
        anim.advance(0.25).unwrap();
        assert_eq!(anim.frame_index(), 2);
    }

    #[test]
    fn many_cycles_skip_to_the_same_frame() {
        let mut anim = animation(1, 6);
        anim.set_sub_loop(2, 4);
        // First play, a hundred sub-loop cycles, then one more frame
        anim.advance(0.25 * 207.0).unwrap();
        assert_eq!(anim.frame_index(), 3);
        assert_eq!(anim.played_count(), 101);
    }

    #[test]
    fn huge_elapsed_returns_in_range() {
        let mut anim = animation(8, 4);
        anim.advance(1e300).unwrap();
        assert!(anim.frame_index() < 4);
        assert!(anim.played_count() > 0);

        anim.play_backward();
        anim.advance(1e300).unwrap();
        assert!(anim.frame_index() < 4);
    }

    #[test]
    fn non_positive_speed_stops_the_clock() {
        let mut anim = animation(8, 4);
        anim.set_play_speed(0.0);
        anim.advance(100.0).unwrap();
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn empty_direction_is_an_error() {
        let mut anim = animation(8, 0);
        assert!(matches!(
            anim.advance(0.1),
            Err(CompositeError::EmptyAnimation { .. })
        ));
    }

    #[test]
    fn set_direction_maps_to_native_count_and_resets_frame() {
        let mut anim = animation(8, 4);
        anim.advance(0.5).unwrap();
        anim.set_direction(16).unwrap();
        assert_eq!(anim.direction(), 2);
        assert_eq!(anim.frame_index(), 0);
        assert!(matches!(
            anim.set_direction(64),
            Err(CompositeError::InvalidDirection(64))
        ));
    }

    #[test]
    fn render_uses_blend_and_balances_stack() {
        let mut anim = animation(8, 4).with_transparency(128);
        let mut surface = Recorder::default();
        anim.render_from_origin(&mut surface).unwrap();
        anim.set_blend(true);
        anim.render_from_origin(&mut surface).unwrap();
        assert_eq!(surface.depth, 0);
        assert_eq!(
            surface.draws,
            vec![(0, 0, BlendMode::Alpha(128)), (0, 0, BlendMode::Additive)]
        );
    }

    #[test]
    fn render_error_still_pops() {
        let anim = animation(8, 4);
        let mut surface = Recorder {
            fail: true,
            ..Default::default()
        };
        assert!(anim.render_from_origin(&mut surface).is_err());
        assert_eq!(surface.depth, 0);
    }
}
