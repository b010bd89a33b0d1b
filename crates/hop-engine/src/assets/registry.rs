use std::collections::HashMap;

use glam::Vec2;

use crate::assets::manifest::AssetManifest;
use crate::math::Quad;

/// Inclusive frame range of a named animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteAnim {
    pub from: usize,
    pub to: usize,
}

/// Metadata of a loaded sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteData {
    /// Texture size in pixels.
    pub width: f32,
    pub height: f32,
    /// Frames as UV sub-rectangles, row-major.
    pub frames: Vec<Quad>,
    pub anims: HashMap<String, SpriteAnim>,
}

impl SpriteData {
    /// Slice a `width` x `height` texture into a `slice_x` x `slice_y` grid.
    pub fn sliced(width: f32, height: f32, slice_x: u32, slice_y: u32) -> Self {
        let sx = slice_x.max(1);
        let sy = slice_y.max(1);
        let fw = 1.0 / sx as f32;
        let fh = 1.0 / sy as f32;
        let mut frames = Vec::with_capacity((sx * sy) as usize);
        for row in 0..sy {
            for col in 0..sx {
                frames.push(Quad::new(col as f32 * fw, row as f32 * fh, fw, fh));
            }
        }
        Self {
            width,
            height,
            frames,
            anims: HashMap::new(),
        }
    }

    pub fn with_anim(mut self, name: impl Into<String>, from: usize, to: usize) -> Self {
        self.anims.insert(name.into(), SpriteAnim { from, to });
        self
    }

    pub fn frame(&self, index: usize) -> Quad {
        self.frames.get(index).copied().unwrap_or(Quad::FULL)
    }

    /// Pixel size of one frame.
    pub fn frame_size(&self, index: usize) -> Vec2 {
        let q = self.frame(index);
        Vec2::new(self.width * q.w, self.height * q.h)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontData {
    pub path: String,
    pub grid_width: f32,
    pub grid_height: f32,
    pub chars: Option<String>,
}

impl FontData {
    /// Glyph width relative to its height.
    pub fn aspect(&self) -> f32 {
        if self.grid_height > 0.0 {
            self.grid_width / self.grid_height
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderData {
    pub vert: Option<String>,
    pub frag: Option<String>,
}

/// Handle for one outstanding load. Resolve it with
/// [`AssetRegistry::finish`] or [`AssetRegistry::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Name-based lookup for loaded asset metadata plus the pending-load latch.
///
/// The registry never fetches anything itself: the host calls
/// [`begin_load`](Self::begin_load) when it starts a fetch and resolves the
/// ticket when the fetch settles. The scene is ready once no tickets are
/// outstanding.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    root: String,
    sprites: HashMap<String, SpriteData>,
    sounds: HashMap<String, SoundData>,
    fonts: HashMap<String, FontData>,
    shaders: HashMap<String, ShaderData>,
    outstanding: HashMap<LoadTicket, String>,
    next_ticket: u64,
    errors: Vec<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path prefix for later loads, if given, and return the current one.
    pub fn load_root(&mut self, path: Option<&str>) -> &str {
        if let Some(path) = path {
            self.root = path.to_string();
        }
        &self.root
    }

    /// `path` resolved against the load root.
    pub fn resolve_path(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    pub fn begin_load(&mut self, name: impl Into<String>) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.outstanding.insert(ticket, name.into());
        ticket
    }

    /// Mark a load as done. Returns `false` for an unknown or already
    /// resolved ticket.
    pub fn finish(&mut self, ticket: LoadTicket) -> bool {
        self.outstanding.remove(&ticket).is_some()
    }

    /// Mark a load as failed. The latch still counts it as resolved.
    pub fn fail(&mut self, ticket: LoadTicket, reason: &str) -> bool {
        match self.outstanding.remove(&ticket) {
            Some(name) => {
                log::error!("failed to load asset '{}': {}", name, reason);
                self.errors.push(format!("{name}: {reason}"));
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_ready(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Register the metadata of every asset a manifest describes.
    pub fn register_manifest(&mut self, manifest: &AssetManifest) {
        for (name, desc) in &manifest.sprites {
            let mut data = SpriteData::sliced(desc.width, desc.height, desc.slice_x, desc.slice_y);
            for (anim, range) in &desc.anims {
                data.anims.insert(
                    anim.clone(),
                    SpriteAnim {
                        from: range.from,
                        to: range.to,
                    },
                );
            }
            self.sprites.insert(name.clone(), data);
        }
        for (name, desc) in &manifest.sounds {
            let path = self.resolve_path(&desc.path);
            self.sounds.insert(name.clone(), SoundData { path });
        }
        for (name, desc) in &manifest.fonts {
            let path = self.resolve_path(&desc.path);
            self.fonts.insert(
                name.clone(),
                FontData {
                    path,
                    grid_width: desc.grid_width,
                    grid_height: desc.grid_height,
                    chars: desc.chars.clone(),
                },
            );
        }
        for (name, desc) in &manifest.shaders {
            self.shaders.insert(
                name.clone(),
                ShaderData {
                    vert: desc.vert.clone(),
                    frag: desc.frag.clone(),
                },
            );
        }
    }

    pub fn add_sprite(&mut self, name: impl Into<String>, data: SpriteData) {
        self.sprites.insert(name.into(), data);
    }

    pub fn add_sound(&mut self, name: impl Into<String>, data: SoundData) {
        self.sounds.insert(name.into(), data);
    }

    pub fn add_font(&mut self, name: impl Into<String>, data: FontData) {
        self.fonts.insert(name.into(), data);
    }

    pub fn add_shader(&mut self, name: impl Into<String>, data: ShaderData) {
        self.shaders.insert(name.into(), data);
    }

    pub fn sprite(&self, name: &str) -> Option<&SpriteData> {
        self.sprites.get(name)
    }

    pub fn sound(&self, name: &str) -> Option<&SoundData> {
        self.sounds.get(name)
    }

    pub fn font(&self, name: &str) -> Option<&FontData> {
        self.fonts.get(name)
    }

    pub fn shader(&self, name: &str) -> Option<&ShaderData> {
        self.shaders.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "sprites": {
                "hero": {
                    "path": "hero.png", "width": 32, "height": 32,
                    "slice_x": 2, "slice_y": 2,
                    "anims": { "idle": { "from": 0, "to": 1 } }
                }
            },
            "sounds": { "jump": { "path": "jump.mp3" } }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let mut reg = AssetRegistry::new();
        reg.load_root(Some("assets/"));
        reg.register_manifest(&manifest);

        let hero = reg.sprite("hero").expect("hero should exist");
        assert_eq!(hero.frames.len(), 4);
        assert_eq!(hero.frame(3), Quad::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!(hero.frame_size(0), Vec2::new(16.0, 16.0));
        assert_eq!(hero.anims["idle"], SpriteAnim { from: 0, to: 1 });
        assert_eq!(reg.sound("jump").unwrap().path, "assets/jump.mp3");
    }

    #[test]
    fn unknown_returns_none() {
        let reg = AssetRegistry::new();
        assert!(reg.sprite("nonexistent").is_none());
        assert!(reg.font("nonexistent").is_none());
    }

    #[test]
    fn latch_counts_outstanding_loads() {
        let mut reg = AssetRegistry::new();
        assert!(reg.is_ready());
        let a = reg.begin_load("a");
        let b = reg.begin_load("b");
        assert_eq!(reg.pending(), 2);
        assert!(reg.finish(a));
        assert!(!reg.finish(a));
        assert!(!reg.is_ready());
        assert!(reg.fail(b, "404"));
        assert!(reg.is_ready());
        assert_eq!(reg.errors(), &["b: 404".to_string()]);
    }

    #[test]
    fn out_of_range_frame_falls_back_to_full_quad() {
        let data = SpriteData::sliced(10.0, 10.0, 1, 1);
        assert_eq!(data.frame(5), Quad::FULL);
        assert_eq!(data.frame_size(0), Vec2::new(10.0, 10.0));
    }
}
