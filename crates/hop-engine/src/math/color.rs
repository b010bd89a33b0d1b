use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGBA color with 0.0-1.0 channels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn lighten(self, n: f32) -> Self {
        Self::rgba(
            (self.r + n).min(1.0),
            (self.g + n).min(1.0),
            (self.b + n).min(1.0),
            self.a,
        )
    }

    pub fn darken(self, n: f32) -> Self {
        self.lighten(-n)
    }

    pub fn invert(self) -> Self {
        Self::rgba(1.0 - self.r, 1.0 - self.g, 1.0 - self.b, self.a)
    }

    /// Perceived brightness below the threshold (default 0.5).
    pub fn is_dark(self, threshold: Option<f32>) -> bool {
        self.luminance() < threshold.unwrap_or(0.5)
    }

    pub fn is_light(self, threshold: Option<f32>) -> bool {
        self.luminance() >= threshold.unwrap_or(0.5)
    }

    fn luminance(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Sub-rectangle of a texture in normalized UV space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Quad {
    pub const FULL: Quad = Quad::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Map `other` (relative to this quad) into this quad's space.
    pub fn scale(self, other: Quad) -> Quad {
        Quad::new(
            self.x + self.w * other.x,
            self.y + self.h * other.y,
            self.w * other.w,
            self.h * other.h,
        )
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::FULL
    }
}
