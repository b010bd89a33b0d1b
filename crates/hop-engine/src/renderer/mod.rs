pub mod camera;
pub mod draw;
pub mod traits;

// Re-export key types for convenient access
pub use camera::Camera2D;
pub use draw::{DrawCommand, DrawList, DrawTarget, Primitive, RenderProps, ShaderBinding};
pub use traits::{DrawTiming, FrameData, RecordingRenderer, Renderer};
