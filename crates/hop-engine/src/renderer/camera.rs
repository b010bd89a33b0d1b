use glam::{Affine2, Vec2};

use crate::math::{lerp, Rect, Rng};

/// 2D camera mapping world space to screen space.
///
/// `pos` is the world point shown at the center of the screen. Layers named
/// in `ignore` are drawn in screen space, unaffected by the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// Screen size in world units.
    pub width: f32,
    pub height: f32,
    pub pos: Vec2,
    pub scale: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub ignore: Vec<String>,
    /// Optional world bounds the view is kept inside.
    pub bounds: Option<Rect>,
    /// Smoothing factor for `follow` (0.0 = instant, 0.99 = very slow).
    pub smoothing: f32,
    shake: f32,
    shake_offset: Vec2,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pos: Vec2::new(width / 2.0, height / 2.0),
            scale: Vec2::ONE,
            angle: 0.0,
            ignore: Vec::new(),
            bounds: None,
            smoothing: 0.0,
            shake: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }

    /// World-to-screen transform, including the current shake.
    pub fn transform(&self) -> Affine2 {
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        Affine2::from_translation(center + self.shake_offset)
            * Affine2::from_scale(self.scale)
            * Affine2::from_angle(self.angle)
            * Affine2::from_translation(-self.pos)
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.transform().transform_point2(world)
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        self.transform().inverse().transform_point2(screen)
    }

    /// Whether `layer` is drawn in screen space. The unnamed default layer
    /// never is.
    pub fn is_ignored(&self, layer: Option<&str>) -> bool {
        layer.is_some_and(|l| self.ignore.iter().any(|i| i == l))
    }

    /// Start a shake of the given intensity in world units.
    pub fn shake(&mut self, intensity: f32) {
        self.shake = intensity;
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake
    }

    /// Decay the shake and pick this frame's offset.
    pub fn tick(&mut self, dt: f32, rng: &mut Rng) {
        self.shake = lerp(self.shake, 0.0, (5.0 * dt).min(1.0));
        self.shake_offset = if self.shake > f32::EPSILON {
            Vec2::new(
                rng.gen_range(-self.shake, self.shake),
                rng.gen_range(-self.shake, self.shake),
            )
        } else {
            Vec2::ZERO
        };
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        self.clamp_to_bounds();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.pos = target;
        self.clamp_to_bounds();
    }

    /// Move toward `target`, honoring smoothing. Call once per frame.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            let t = 1.0 - self.smoothing.powf(dt * 60.0);
            self.pos += (target - self.pos) * t;
            self.clamp_to_bounds();
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some(b) = self.bounds else {
            return;
        };
        let half = Vec2::new(self.width, self.height) / (2.0 * self.scale);
        if half.x * 2.0 >= b.width() {
            self.pos.x = b.center().x;
        } else {
            self.pos.x = self.pos.x.clamp(b.p1.x + half.x, b.p2.x - half.x);
        }
        if half.y * 2.0 >= b.height() {
            self.pos.y = b.center().y;
        } else {
            self.pos.y = self.pos.y.clamp(b.p1.y + half.y, b.p2.y - half.y);
        }
    }

    /// Whether a world point lands on screen.
    pub fn is_visible(&self, world: Vec2) -> bool {
        let s = self.to_screen(world);
        s.x >= 0.0 && s.x <= self.width && s.y >= 0.0 && s.y <= self.height
    }
}
