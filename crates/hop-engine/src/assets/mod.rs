pub mod manifest;
pub mod registry;

pub use manifest::AssetManifest;
pub use registry::{AssetRegistry, FontData, LoadTicket, ShaderData, SoundData, SpriteAnim, SpriteData};
