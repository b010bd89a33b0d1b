use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Component;
use crate::api::types::CompId;

/// World position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PosComp {
    pub pos: Vec2,
}

impl PosComp {
    pub const ID: CompId = "pos";

    pub fn new(x: f32, y: f32) -> Self {
        Self { pos: Vec2::new(x, y) }
    }

    pub fn at(pos: Vec2) -> Self {
        Self { pos }
    }

    /// Move by `vel` units per second over `dt`.
    pub fn move_by(&mut self, vel: Vec2, dt: f32) {
        self.pos += vel * dt;
    }

    /// Step toward `dest`. With no speed, snap there. Never overshoots.
    pub fn move_to(&mut self, dest: Vec2, speed: Option<f32>, dt: f32) {
        let Some(speed) = speed else {
            self.pos = dest;
            return;
        };
        let diff = dest - self.pos;
        let step = speed * dt;
        if diff.length() <= step {
            self.pos = dest;
        } else {
            self.pos += diff.normalize() * step;
        }
    }
}

impl Component for PosComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn inspect(&self) -> Option<String> {
        Some(format!("pos: ({:.1}, {:.1})", self.pos.x, self.pos.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleComp {
    pub scale: Vec2,
}

impl ScaleComp {
    pub const ID: CompId = "scale";

    pub fn new(x: f32, y: f32) -> Self {
        Self { scale: Vec2::new(x, y) }
    }

    pub fn uniform(s: f32) -> Self {
        Self { scale: Vec2::splat(s) }
    }
}

impl Default for ScaleComp {
    fn default() -> Self {
        Self { scale: Vec2::ONE }
    }
}

impl Component for ScaleComp {
    fn id(&self) -> CompId {
        Self::ID
    }
}

/// Rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotateComp {
    pub angle: f32,
}

impl RotateComp {
    pub const ID: CompId = "rotate";

    pub fn new(angle: f32) -> Self {
        Self { angle }
    }
}

impl Component for RotateComp {
    fn id(&self) -> CompId {
        Self::ID
    }
}

/// Anchor point of an entity's footprint relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BotLeft,
    Bot,
    BotRight,
    /// Custom anchor in [-1, 1] on each axis.
    Custom(Vec2),
}

impl Origin {
    /// Anchor as a vector in [-1, 1]: top-left is (-1, -1).
    pub fn as_vec2(self) -> Vec2 {
        match self {
            Origin::TopLeft => Vec2::new(-1.0, -1.0),
            Origin::Top => Vec2::new(0.0, -1.0),
            Origin::TopRight => Vec2::new(1.0, -1.0),
            Origin::Left => Vec2::new(-1.0, 0.0),
            Origin::Center => Vec2::ZERO,
            Origin::Right => Vec2::new(1.0, 0.0),
            Origin::BotLeft => Vec2::new(-1.0, 1.0),
            Origin::Bot => Vec2::new(0.0, 1.0),
            Origin::BotRight => Vec2::new(1.0, 1.0),
            Origin::Custom(v) => v,
        }
    }

    /// Offset from the anchor to the top-left corner of a `size` footprint.
    pub fn top_left_offset(self, size: Vec2) -> Vec2 {
        -(self.as_vec2() + Vec2::ONE) * 0.5 * size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OriginComp {
    pub origin: Origin,
}

impl OriginComp {
    pub const ID: CompId = "origin";

    pub fn new(origin: Origin) -> Self {
        Self { origin }
    }
}

impl Component for OriginComp {
    fn id(&self) -> CompId {
        Self::ID
    }
}
