use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Component, HookCtx};
use crate::api::types::CompId;
use crate::renderer::draw::Primitive;

pub const DEFAULT_TEXT_SIZE: f32 = 16.0;

/// Filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectComp {
    pub width: f32,
    pub height: f32,
}

impl RectComp {
    pub const ID: CompId = "rect";

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Component for RectComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn on_draw(&mut self, ctx: &mut HookCtx<'_>) {
        let props = ctx.scene.render_props(ctx.entity);
        ctx.scene.draw(
            Primitive::Rect {
                width: self.width,
                height: self.height,
            },
            props,
        );
    }

    fn size(&self) -> Option<Vec2> {
        Some(Vec2::new(self.width, self.height))
    }

    fn inspect(&self) -> Option<String> {
        Some(format!("rect: {}x{}", self.width, self.height))
    }
}

/// Optional text settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextConf {
    #[serde(default)]
    pub font: Option<String>,
    /// Wrap lines at this width.
    #[serde(default)]
    pub width: Option<f32>,
}

/// Monospace bitmap text. Glyphs are `size` tall and as wide as the font's
/// grid aspect allows.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComp {
    pub text: String,
    pub text_size: f32,
    pub font: Option<String>,
    pub wrap_width: Option<f32>,
    /// Glyph width over glyph height, resolved from the font on load.
    aspect: f32,
}

impl TextComp {
    pub const ID: CompId = "text";

    pub fn new(text: impl Into<String>, size: Option<f32>) -> Self {
        Self::with_conf(text, size, TextConf::default())
    }

    pub fn with_conf(text: impl Into<String>, size: Option<f32>, conf: TextConf) -> Self {
        Self {
            text: text.into(),
            text_size: size.unwrap_or(DEFAULT_TEXT_SIZE),
            font: conf.font,
            wrap_width: conf.width,
            aspect: 1.0,
        }
    }

    fn glyph_width(&self) -> f32 {
        self.text_size * self.aspect
    }

    /// Text broken into lines by newlines and the wrap width.
    pub fn lines(&self) -> Vec<String> {
        let max_chars = self
            .wrap_width
            .map(|w| ((w / self.glyph_width()).floor() as usize).max(1));
        let mut out = Vec::new();
        for line in self.text.split('\n') {
            match max_chars {
                Some(max) if line.chars().count() > max => {
                    let chars: Vec<char> = line.chars().collect();
                    out.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
                }
                _ => out.push(line.to_string()),
            }
        }
        out
    }

    /// Rendered size of the whole text block.
    pub fn measure(&self) -> Vec2 {
        let lines = self.lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Vec2::new(
            widest as f32 * self.glyph_width(),
            lines.len() as f32 * self.text_size,
        )
    }
}

impl Component for TextComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn on_load(&mut self, ctx: &mut HookCtx<'_>) {
        if let Some(font) = self.font.as_deref() {
            match ctx.scene.assets().font(font) {
                Some(data) => self.aspect = data.aspect(),
                None => log::warn!("font '{}' not loaded", font),
            }
        }
    }

    fn on_draw(&mut self, ctx: &mut HookCtx<'_>) {
        let props = ctx.scene.render_props(ctx.entity);
        ctx.scene.draw(
            Primitive::Text {
                text: self.text.clone(),
                size: self.text_size,
                font: self.font.clone(),
                wrap_width: self.wrap_width,
            },
            props,
        );
    }

    fn size(&self) -> Option<Vec2> {
        Some(self.measure())
    }

    fn inspect(&self) -> Option<String> {
        Some(format!("text: \"{}\"", self.text))
    }
}
