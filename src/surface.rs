//! Render target abstraction.
//!
//! Pixel blitting and palette handling live in the rendering backend. The
//! composite only needs a stack of translations and blend modes plus a way to
//! ask the backend to draw one decoded frame.

use log::debug;

use crate::error::Result;

/// How a frame is combined with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Regular alpha blending with a fixed alpha value.
    Alpha(u8),
    /// Additive blending, used for light and fire effects.
    Additive,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Alpha(255)
    }
}

/// Identifies one decoded frame of an animation resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub path: &'a str,
    pub direction: usize,
    pub frame: usize,
}

/// A renderable target.
pub trait Surface {
    fn push_translation(&mut self, x: i32, y: i32);
    fn push_blend(&mut self, blend: BlendMode);
    fn pop(&mut self);
    fn draw_frame(&mut self, frame: FrameRef<'_>) -> Result<()>;
}

#[derive(Clone, Copy, Debug)]
enum StackEntry {
    Translation(i32, i32),
    Blend(BlendMode),
}

/// Headless surface that logs every draw.
///
/// Used by the demo binary to trace what a real backend would blit.
#[derive(Debug, Default)]
pub struct LogSurface {
    stack: Vec<StackEntry>,
    draws: usize,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames drawn since creation.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Sum of all translations currently on the stack.
    pub fn translation(&self) -> (i32, i32) {
        self.stack.iter().fold((0, 0), |(ax, ay), entry| match entry {
            StackEntry::Translation(x, y) => (ax + x, ay + y),
            StackEntry::Blend(_) => (ax, ay),
        })
    }

    /// Innermost blend mode, or the default when none was pushed.
    pub fn blend(&self) -> BlendMode {
        self.stack
            .iter()
            .rev()
            .find_map(|entry| match entry {
                StackEntry::Blend(b) => Some(*b),
                StackEntry::Translation(..) => None,
            })
            .unwrap_or_default()
    }
}

impl Surface for LogSurface {
    fn push_translation(&mut self, x: i32, y: i32) {
        self.stack.push(StackEntry::Translation(x, y));
    }

    fn push_blend(&mut self, blend: BlendMode) {
        self.stack.push(StackEntry::Blend(blend));
    }

    fn pop(&mut self) {
        // Underflow is ignored
        self.stack.pop();
    }

    fn draw_frame(&mut self, frame: FrameRef<'_>) -> Result<()> {
        let (x, y) = self.translation();
        debug!(
            "draw {} dir={} frame={} at ({}, {}) blend={:?}",
            frame.path,
            frame.direction,
            frame.frame,
            x,
            y,
            self.blend()
        );
        self.draws += 1;
        Ok(())
    }
}
