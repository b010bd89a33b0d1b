pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod math;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Engine, Game, GameConfig, SceneDef, DEFAULT_GRAVITY};
pub use api::types::{events, CompId, EntityId, EventArgs};
pub use assets::{AssetManifest, AssetRegistry, LoadTicket, SpriteData};
pub use components::area::AreaComp;
pub use components::body::{BodyComp, BodyConf};
pub use components::layer::{LayerComp, Layers, ZComp};
pub use components::shape::{RectComp, TextComp, TextConf};
pub use components::solid::{SolidComp, SOLID_TAG};
pub use components::sprite::{SpriteComp, SpriteConf};
pub use components::transform::{Origin, OriginComp, PosComp, RotateComp, ScaleComp};
pub use components::visual::{ColorComp, OutlineComp, ShaderComp};
pub use components::{Component, ComponentTable, Hook, HookCtx};
pub use core::debug::{DebugState, LogEntry, LogLevel};
pub use core::error::{SceneError, SceneResult};
pub use core::events::{EventCanceller, Scope};
pub use core::frame::FramePhase;
pub use core::scene::{EntityBuilder, Scene};
pub use core::time::{Clock, FixedTimestep};
pub use input::{InputEvent, InputQueue, InputState};
pub use math::{Color, Quad, Rect, Rng, Side};
pub use renderer::camera::Camera2D;
pub use renderer::draw::{DrawCommand, Primitive, RenderProps};
pub use renderer::traits::{DrawTiming, FrameData, RecordingRenderer, Renderer};
pub use systems::collision::{PushOut, SpatialKind};
