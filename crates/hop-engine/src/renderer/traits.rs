//! Renderer trait for drawing backends.
//!
//! The engine never touches the GPU. Each frame it hands the backend a
//! [`FrameData`] holding every draw command recorded during the Drawing phase,
//! already ordered back-to-front, plus the camera transform.

use glam::Affine2;
use serde::Serialize;

use super::draw::DrawCommand;
use crate::math::Color;

/// Timing information from a draw call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawTiming {
    /// Time spent submitting draw calls (microseconds)
    pub draw_us: u32,
}

/// Drawing backend.
///
/// ```ignore
/// struct CanvasRenderer { ctx: web_sys::CanvasRenderingContext2d }
///
/// impl Renderer for CanvasRenderer {
///     fn backend(&self) -> &'static str { "canvas2d" }
///
///     fn draw(&mut self, frame: &FrameData) -> DrawTiming {
///         // replay frame.commands...
///     }
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "webgl", "canvas2d", "buffer")
    fn backend(&self) -> &'static str;

    /// Draw a complete frame. Fire-and-forget from the engine's side.
    fn draw(&mut self, frame: &FrameData) -> DrawTiming;

    /// Handle a resize of the drawing surface.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Complete frame data for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FrameData<'a> {
    /// Draw commands in back-to-front order.
    pub commands: &'a [DrawCommand],
    /// World-to-screen transform for commands not in screen space.
    pub cam_transform: Affine2,
    pub width: f32,
    pub height: f32,
    pub clear_color: Color,
}

/// Headless backend that keeps a copy of every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Vec<DrawCommand>>,
    pub size: Option<(u32, u32)>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&[DrawCommand]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl Renderer for RecordingRenderer {
    fn backend(&self) -> &'static str {
        "recording"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawTiming {
        self.frames.push(frame.commands.to_vec());
        DrawTiming::default()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}
