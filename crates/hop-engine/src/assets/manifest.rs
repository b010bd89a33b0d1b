use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Asset manifest describing the sprites, sounds, fonts and shaders a game
/// uses. Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Named sprite sheets.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
    /// Bitmap fonts laid out on a fixed grid.
    #[serde(default)]
    pub fonts: HashMap<String, FontDescriptor>,
    #[serde(default)]
    pub shaders: HashMap<String, ShaderDescriptor>,
}

/// Describes a sprite sheet sliced into a regular grid of frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Path relative to the load root (e.g., "hero.png").
    pub path: String,
    /// Texture size in pixels.
    pub width: f32,
    pub height: f32,
    /// Number of frame columns (default: 1).
    #[serde(default = "default_slice")]
    pub slice_x: u32,
    /// Number of frame rows (default: 1).
    #[serde(default = "default_slice")]
    pub slice_y: u32,
    /// Named animations as inclusive frame ranges.
    #[serde(default)]
    pub anims: HashMap<String, AnimDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimDescriptor {
    pub from: usize,
    pub to: usize,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub path: String,
    /// Size of one glyph cell in pixels.
    pub grid_width: f32,
    pub grid_height: f32,
    /// Glyphs in grid order. Printable ASCII when absent.
    #[serde(default)]
    pub chars: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShaderDescriptor {
    #[serde(default)]
    pub vert: Option<String>,
    #[serde(default)]
    pub frag: Option<String>,
}

fn default_slice() -> u32 {
    1
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sprite_with_anims() {
        let json = r#"{
            "sprites": {
                "hero": {
                    "path": "hero.png",
                    "width": 64, "height": 16,
                    "slice_x": 4,
                    "anims": { "run": { "from": 0, "to": 3 } }
                }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let hero = &manifest.sprites["hero"];
        assert_eq!(hero.slice_x, 4);
        assert_eq!(hero.slice_y, 1);
        assert_eq!(hero.anims["run"], AnimDescriptor { from: 0, to: 3 });
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.sprites.is_empty());
        assert!(manifest.sounds.is_empty());
    }

    #[test]
    fn parse_fonts_and_shaders() {
        let json = r#"{
            "sounds": { "jump": { "path": "jump.mp3" } },
            "fonts": { "unscii": { "path": "unscii.png", "grid_width": 8, "grid_height": 8 } },
            "shaders": { "wave": { "frag": "void main() {}" } }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds["jump"].path, "jump.mp3");
        assert_eq!(manifest.fonts["unscii"].grid_width, 8.0);
        assert!(manifest.fonts["unscii"].chars.is_none());
        assert!(manifest.shaders["wave"].vert.is_none());
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(AssetManifest::from_json("{ \"sprites\": 3 }").is_err());
    }
}
