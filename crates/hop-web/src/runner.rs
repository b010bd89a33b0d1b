use hop_engine::{
    AssetManifest, DrawTiming, Engine, FixedTimestep, FrameData, Game, InputEvent, Renderer,
};

/// Renderer that keeps the latest frame as a JSON string for the host to
/// replay on its canvas.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    json: String,
    frames: u64,
}

impl FrameBuffer {
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Frames serialized so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for FrameBuffer {
    fn backend(&self) -> &'static str {
        "json"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawTiming {
        match serde_json::to_string(frame) {
            Ok(json) => {
                self.json = json;
                self.frames += 1;
            }
            Err(err) => log::error!("frame serialization failed: {}", err),
        }
        DrawTiming::default()
    }
}

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    engine: Engine,
    timestep: FixedTimestep,
    frame: FrameBuffer,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        Self {
            game,
            engine: Engine::new(config),
            timestep,
            frame: FrameBuffer::default(),
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.engine);
        self.initialized = true;
    }

    /// Queue an input event for the next scene frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.engine.scene_mut().push_input(event);
    }

    /// Advance by wall-clock `dt`, running as many fixed steps as have
    /// accumulated.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(self.engine.scene_mut());
            self.engine.frame(self.timestep.dt(), &mut self.frame);
        }
    }

    /// Parse a manifest and register its assets with the active scene.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                self.engine.scene_mut().assets_mut().register_manifest(&manifest);
                log::info!("manifest loaded");
            }
            Err(err) => log::error!("bad asset manifest: {}", err),
        }
    }

    /// The last drawn frame, serialized.
    pub fn frame_json(&self) -> &str {
        self.frame.json()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn world_width(&self) -> f32 {
        self.engine.scene().width()
    }

    pub fn world_height(&self) -> f32 {
        self.engine.scene().height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_engine::{EntityBuilder, EventArgs, GameConfig, PosComp, RectComp};

    #[derive(Default)]
    struct Boxes {
        updates: u32,
    }

    impl Game for Boxes {
        fn config(&self) -> GameConfig {
            GameConfig {
                width: 320.0,
                height: 200.0,
                fixed_dt: 0.125,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, engine: &mut Engine) {
            engine.define_scene("main", |scene, _| {
                scene
                    .add(
                        EntityBuilder::new()
                            .with(PosComp::new(10.0, 10.0))
                            .with(RectComp::new(4.0, 4.0)),
                    )
                    .unwrap();
            });
            engine.go("main", EventArgs::None).unwrap();
        }

        fn update(&mut self, _scene: &mut hop_engine::Scene) {
            self.updates += 1;
        }
    }

    #[test]
    fn tick_runs_fixed_steps() {
        let mut runner = GameRunner::new(Boxes::default());
        runner.tick(1.0);
        assert_eq!(runner.game.updates, 0);

        runner.init();
        runner.tick(0.3);
        assert_eq!(runner.game.updates, 2);
        assert_eq!(runner.frame.frames(), 2);
        runner.tick(0.1);
        assert_eq!(runner.game.updates, 3);
    }

    #[test]
    fn frame_json_holds_last_frame() {
        let mut runner = GameRunner::new(Boxes::default());
        runner.init();
        assert_eq!(runner.frame_json(), "");
        runner.tick(0.125);
        let frame: serde_json::Value = serde_json::from_str(runner.frame_json()).unwrap();
        assert_eq!(frame["width"], 320.0);
        assert_eq!(frame["commands"].as_array().map(Vec::len), Some(1));
        assert_eq!(runner.world_height(), 200.0);
    }

    #[test]
    fn manifest_registers_sprites() {
        let mut runner = GameRunner::new(Boxes::default());
        runner.init();
        runner.load_manifest("{ nope");
        assert!(runner.engine().scene().assets().sprite("hero").is_none());
        runner.load_manifest(
            r#"{ "sprites": { "hero": { "path": "hero.png", "width": 64, "height": 16, "slice_x": 4 } } }"#,
        );
        assert!(runner.engine().scene().assets().sprite("hero").is_some());
    }
}
