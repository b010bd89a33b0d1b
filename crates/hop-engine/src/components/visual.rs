use std::collections::HashMap;

use super::{Component, HookCtx};
use crate::api::types::CompId;
use crate::math::Color;
use crate::renderer::draw::Primitive;

/// Tint applied to everything the entity draws.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorComp {
    pub color: Color,
}

impl ColorComp {
    pub const ID: CompId = "color";

    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { color: Color::rgb(r, g, b) }
    }
}

impl Component for ColorComp {
    fn id(&self) -> CompId {
        Self::ID
    }
}

/// Stroke drawn around the entity's rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineComp {
    pub line_width: f32,
    pub line_color: Color,
}

impl OutlineComp {
    pub const ID: CompId = "outline";

    pub fn new(line_width: Option<f32>, line_color: Option<Color>) -> Self {
        Self {
            line_width: line_width.unwrap_or(1.0),
            line_color: line_color.unwrap_or(Color::BLACK),
        }
    }
}

impl Default for OutlineComp {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Component for OutlineComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn on_draw(&mut self, ctx: &mut HookCtx<'_>) {
        let Some(size) = ctx.scene.footprint(ctx.entity) else {
            return;
        };
        let props = ctx.scene.render_props(ctx.entity).with_color(self.line_color);
        ctx.scene.draw(
            Primitive::RectStroke {
                width: size.x,
                height: size.y,
                line_width: self.line_width,
            },
            props,
        );
    }
}

/// Custom shader program, by asset name, with its uniforms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderComp {
    pub shader: String,
    pub uniform: HashMap<String, Vec<f32>>,
}

impl ShaderComp {
    pub const ID: CompId = "shader";

    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            uniform: HashMap::new(),
        }
    }

    pub fn with_uniform(mut self, name: impl Into<String>, value: Vec<f32>) -> Self {
        self.uniform.insert(name.into(), value);
        self
    }
}

impl Component for ShaderComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn inspect(&self) -> Option<String> {
        Some(format!("shader: {}", self.shader))
    }
}
