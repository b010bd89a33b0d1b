pub mod debug;
pub mod error;
pub mod events;
pub mod frame;
pub mod registry;
pub mod scene;
pub mod tags;
pub mod time;
pub mod timer;
