use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Component, HookCtx};
use crate::api::types::{events, CompId, EventArgs};
use crate::assets::SpriteData;
use crate::math::Quad;
use crate::renderer::draw::Primitive;

/// Seconds per animation frame unless configured otherwise.
pub const DEFAULT_ANIM_SPEED: f32 = 0.1;

/// Optional sprite settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteConf {
    #[serde(default)]
    pub quad: Option<Quad>,
    #[serde(default)]
    pub frame: Option<usize>,
    #[serde(default)]
    pub anim_speed: Option<f32>,
    #[serde(default)]
    pub tiled: bool,
    /// Stretch to this width. Height follows the frame aspect if unset.
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct CurAnim {
    name: String,
    looping: bool,
    timer: f32,
}

/// Frame of a sprite sheet, with optional named animations.
///
/// Sheet metadata is resolved from the asset registry on load. An animation
/// requested before that starts playing once the sheet is known.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComp {
    pub sprite: String,
    pub frame: usize,
    pub quad: Quad,
    pub anim_speed: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub tiled: bool,
    conf_width: Option<f32>,
    conf_height: Option<f32>,
    data: Option<SpriteData>,
    cur_anim: Option<CurAnim>,
}

impl SpriteComp {
    pub const ID: CompId = "sprite";

    pub fn new(sprite: impl Into<String>) -> Self {
        Self::with_conf(sprite, SpriteConf::default())
    }

    pub fn with_conf(sprite: impl Into<String>, conf: SpriteConf) -> Self {
        Self {
            sprite: sprite.into(),
            frame: conf.frame.unwrap_or(0),
            quad: conf.quad.unwrap_or(Quad::FULL),
            anim_speed: conf.anim_speed.unwrap_or(DEFAULT_ANIM_SPEED),
            flip_x: conf.flip_x,
            flip_y: conf.flip_y,
            tiled: conf.tiled,
            conf_width: conf.width,
            conf_height: conf.height,
            data: None,
            cur_anim: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn num_frames(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.frames.len())
    }

    pub fn cur_anim(&self) -> Option<&str> {
        self.cur_anim.as_ref().map(|a| a.name.as_str())
    }

    /// Start a named animation. Returns `false` if the sheet is loaded and
    /// has no such animation.
    pub fn play(&mut self, anim: &str, looping: bool) -> bool {
        if let Some(data) = &self.data {
            let Some(range) = data.anims.get(anim) else {
                log::warn!("sprite '{}' has no anim '{}'", self.sprite, anim);
                return false;
            };
            self.frame = range.from;
        }
        self.cur_anim = Some(CurAnim {
            name: anim.to_string(),
            looping,
            timer: 0.0,
        });
        true
    }

    pub fn stop(&mut self) {
        self.cur_anim = None;
    }

    /// Drawn size after configured stretching.
    pub fn dimensions(&self) -> Option<Vec2> {
        let frame = match &self.data {
            Some(data) => {
                let q = data.frame(self.frame).scale(self.quad);
                Vec2::new(data.width * q.w, data.height * q.h)
            }
            None => {
                return match (self.conf_width, self.conf_height) {
                    (Some(w), Some(h)) => Some(Vec2::new(w, h)),
                    _ => None,
                };
            }
        };
        let size = match (self.conf_width, self.conf_height) {
            (Some(w), Some(h)) => Vec2::new(w, h),
            (Some(w), None) if frame.x > 0.0 => Vec2::new(w, frame.y * w / frame.x),
            (None, Some(h)) if frame.y > 0.0 => Vec2::new(frame.x * h / frame.y, h),
            _ => frame,
        };
        Some(size)
    }

    fn resolve(&mut self, data: SpriteData) {
        if let Some(anim) = self.cur_anim.as_ref() {
            match data.anims.get(&anim.name) {
                Some(range) => self.frame = range.from,
                None => {
                    log::warn!("sprite '{}' has no anim '{}'", self.sprite, anim.name);
                    self.cur_anim = None;
                }
            }
        }
        self.data = Some(data);
    }

    /// Advance the current animation by `dt`. Returns the name of an
    /// animation that just finished.
    fn advance(&mut self, dt: f32) -> Option<String> {
        let data = self.data.as_ref()?;
        let cur = self.cur_anim.as_mut()?;
        let range = *data.anims.get(&cur.name)?;
        cur.timer += dt;
        if cur.timer < self.anim_speed {
            return None;
        }
        cur.timer -= self.anim_speed;
        if self.frame < range.to {
            self.frame += 1;
            return None;
        }
        if cur.looping {
            self.frame = range.from;
            None
        } else {
            self.cur_anim.take().map(|a| a.name)
        }
    }
}

impl Component for SpriteComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn on_load(&mut self, ctx: &mut HookCtx<'_>) {
        match ctx.scene.assets().sprite(&self.sprite) {
            Some(data) => {
                let data = data.clone();
                self.resolve(data);
            }
            None => log::warn!("sprite '{}' not loaded", self.sprite),
        }
    }

    fn on_update(&mut self, ctx: &mut HookCtx<'_>) {
        if let Some(name) = self.advance(ctx.dt()) {
            ctx.scene.trigger(
                ctx.entity,
                events::ANIM_END,
                &EventArgs::Data(serde_json::Value::String(name)),
            );
        }
    }

    fn on_draw(&mut self, ctx: &mut HookCtx<'_>) {
        let props = ctx.scene.render_props(ctx.entity);
        ctx.scene.draw(
            Primitive::Sprite {
                sprite: self.sprite.clone(),
                frame: self.frame,
                quad: self.quad,
                width: self.conf_width,
                height: self.conf_height,
                flip_x: self.flip_x,
                flip_y: self.flip_y,
                tiled: self.tiled,
            },
            props,
        );
    }

    fn size(&self) -> Option<Vec2> {
        self.dimensions()
    }

    fn inspect(&self) -> Option<String> {
        self.cur_anim().map(|a| format!("anim: {a}"))
    }
}
