use std::collections::HashMap;

use glam::Vec2;
use serde::Serialize;

use crate::components::transform::Origin;
use crate::math::{Color, Quad};

/// Transform and tint shared by every draw primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderProps {
    pub pos: Vec2,
    pub scale: Vec2,
    /// Rotation in radians.
    pub rot: f32,
    pub color: Color,
    pub origin: Origin,
}

impl Default for RenderProps {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            rot: 0.0,
            color: Color::WHITE,
            origin: Origin::TopLeft,
        }
    }
}

impl RenderProps {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, ..Default::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rot(mut self, rot: f32) -> Self {
        self.rot = rot;
        self
    }
}

/// What to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Sprite {
        sprite: String,
        frame: usize,
        quad: Quad,
        width: Option<f32>,
        height: Option<f32>,
        flip_x: bool,
        flip_y: bool,
        tiled: bool,
    },
    Rect {
        width: f32,
        height: f32,
    },
    RectStroke {
        width: f32,
        height: f32,
        line_width: f32,
    },
    Text {
        text: String,
        size: f32,
        font: Option<String>,
        wrap_width: Option<f32>,
    },
    Line {
        p1: Vec2,
        p2: Vec2,
        line_width: f32,
    },
    Tri {
        p1: Vec2,
        p2: Vec2,
        p3: Vec2,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShaderBinding {
    pub name: String,
    pub uniform: HashMap<String, Vec<f32>>,
}

/// One recorded draw call, stamped with where it goes in the frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub props: RenderProps,
    pub layer: usize,
    pub z: f32,
    /// Drawn without the camera transform (camera-ignored layer).
    pub screen_space: bool,
    pub shader: Option<ShaderBinding>,
}

/// Layer/z/space stamp applied to commands recorded from now on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawTarget {
    pub layer: usize,
    pub z: f32,
    pub screen_space: bool,
    pub shader: Option<ShaderBinding>,
}

/// Draw commands recorded during one Drawing phase, in submission order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    target: DrawTarget,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            target: DrawTarget::default(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.target = DrawTarget::default();
    }

    pub fn set_target(&mut self, target: DrawTarget) {
        self.target = target;
    }

    pub fn target(&self) -> &DrawTarget {
        &self.target
    }

    pub fn push(&mut self, primitive: Primitive, props: RenderProps) {
        self.commands.push(DrawCommand {
            primitive,
            props,
            layer: self.target.layer,
            z: self.target.z,
            screen_space: self.target.screen_space,
            shader: self.target.shader.clone(),
        });
    }

    /// Order commands by layer, then z. Submission order breaks ties.
    pub fn sort(&mut self) {
        self.commands
            .sort_by(|a, b| a.layer.cmp(&b.layer).then(a.z.total_cmp(&b.z)));
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
