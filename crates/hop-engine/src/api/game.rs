use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::types::EventArgs;
use crate::core::error::{isolate, SceneError, SceneResult};
use crate::core::scene::Scene;
use crate::math::Color;
use crate::renderer::traits::{DrawTiming, Renderer};

/// Default downward gravity, in units per second squared.
pub const DEFAULT_GRAVITY: f32 = 980.0;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical screen width in world units.
    pub width: f32,
    /// Logical screen height in world units.
    pub height: f32,
    /// Pixel scale applied by the host canvas.
    pub scale: f32,
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub gravity: f32,
    /// Enables the developer keys (inspect, pause, step, time scale).
    pub debug: bool,
    /// How many debug log lines stay on screen.
    pub log_max: usize,
    pub clear_color: Color,
    pub inspect_color: Color,
    /// Treat touches as mouse presses.
    pub touch_to_mouse: bool,
    /// Seed for the scene RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            scale: 1.0,
            fixed_dt: 1.0 / 60.0,
            gravity: DEFAULT_GRAVITY,
            debug: false,
            log_max: 1,
            clear_color: Color::BLACK,
            inspect_color: Color::rgb(0.0, 1.0, 1.0),
            touch_to_mouse: true,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a config, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Define scenes and enter the first one.
    fn init(&mut self, engine: &mut Engine);

    /// Optional per-tick hook, called before the scene runs its frame.
    fn update(&mut self, _scene: &mut Scene) {}
}

/// Builds the contents of a scene. Receives the arguments passed to `go`.
pub type SceneDef = dyn Fn(&mut Scene, &EventArgs);

/// Owns the named scene definitions and the active [`Scene`].
pub struct Engine {
    config: GameConfig,
    scenes: HashMap<String, Rc<SceneDef>>,
    scene: Scene,
    current: Option<String>,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        let scene = Scene::with_config(&config);
        Self {
            config,
            scenes: HashMap::new(),
            scene,
            current: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Name of the scene entered last, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn define_scene(&mut self, name: &str, def: impl Fn(&mut Scene, &EventArgs) + 'static) {
        self.scenes.insert(name.to_string(), Rc::new(def));
    }

    /// Tear down the active scene and build `name` from scratch. Assets and
    /// debug settings carry over.
    pub fn go(&mut self, name: &str, args: EventArgs) -> SceneResult<()> {
        let Some(def) = self.scenes.get(name).cloned() else {
            log::error!("go: no scene named '{}'", name);
            return Err(SceneError::UnknownScene(name.to_string()));
        };

        let mut fresh = Scene::with_config(&self.config);
        fresh.assets = std::mem::take(&mut self.scene.assets);
        fresh.debug = self.scene.debug.clone();
        self.scene.events.clear();
        self.scene = fresh;
        self.current = Some(name.to_string());

        log::info!("entering scene '{}'", name);
        let scene = &mut self.scene;
        isolate(&|| format!("scene '{}' definition", name), || (*def)(scene, &args));
        Ok(())
    }

    /// Run one frame of the active scene, then perform any scene switch it
    /// asked for.
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> DrawTiming {
        let timing = self.scene.frame(dt, renderer);
        if let Some((name, args)) = self.scene.take_pending_go() {
            if let Err(err) = self.go(&name, args) {
                let time = self.scene.time();
                self.scene.debug.error(err.to_string(), time);
            }
        }
        timing
    }
}
