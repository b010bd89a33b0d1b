pub mod runner;

pub use runner::{FrameBuffer, GameRunner};

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, frame accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use hop_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// hop_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `hop_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Runs `f` against the runner. Calls made before `game_init` are
        /// logged and dropped.
        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: game_init() has not been called", $game_name);
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key: &str, repeat: bool) {
            let key = key.to_string();
            with_runner(|r| r.push_input(InputEvent::KeyDown { key, repeat }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key: &str) {
            let key = key.to_string();
            with_runner(|r| r.push_input(InputEvent::KeyUp { key }));
        }

        /// Forward a typed character. Only the first char of `text` is used.
        #[wasm_bindgen]
        pub fn game_char(text: &str) {
            if let Some(ch) = text.chars().next() {
                with_runner(|r| r.push_input(InputEvent::Char { ch }));
            }
        }

        #[wasm_bindgen]
        pub fn game_touch_start(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchStart { id: id as u64, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_touch_move(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchMove { id: id as u64, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_touch_end(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchEnd { id: id as u64, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        // ---- Frame accessors ----

        #[wasm_bindgen]
        pub fn get_frame_json() -> String {
            with_runner(|r| r.frame_json().to_string())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }
    };
}
