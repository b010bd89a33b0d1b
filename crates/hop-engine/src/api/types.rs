use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Generation-checked handle to an entity in a [`Scene`](crate::Scene).
///
/// Slots are recycled only after the end-of-frame flush, and every reuse
/// bumps `generation`, so a stale handle never resolves to a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Capability identifier, unique per entity (e.g. `"pos"`, `"area"`).
pub type CompId = &'static str;

/// Payload carried by an event.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventArgs {
    #[default]
    None,
    /// Another entity involved in the event (collision partner, platform...).
    Entity(EntityId),
    /// A position, in world space unless stated otherwise.
    Point(Vec2),
    Key(String),
    Char(char),
    Touch { id: u64, pos: Vec2 },
    /// Free-form game data.
    Data(serde_json::Value),
}

impl EventArgs {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            EventArgs::Entity(id) => Some(*id),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<Vec2> {
        match self {
            EventArgs::Point(p) | EventArgs::Touch { pos: p, .. } => Some(*p),
            _ => None,
        }
    }
}

/// Names of the events the engine itself publishes.
pub mod events {
    pub const UPDATE: &str = "update";
    pub const DRAW: &str = "draw";
    pub const ADD: &str = "add";
    pub const DESTROY: &str = "destroy";
    pub const GROUNDED: &str = "grounded";
    pub const HEADBUMP: &str = "headbump";
    pub const ANIM_END: &str = "anim_end";
    pub const KEY_DOWN: &str = "key_down";
    pub const KEY_PRESS: &str = "key_press";
    pub const KEY_PRESS_REP: &str = "key_press_rep";
    pub const KEY_RELEASE: &str = "key_release";
    pub const CHAR_INPUT: &str = "char_input";
    pub const MOUSE_DOWN: &str = "mouse_down";
    pub const MOUSE_CLICK: &str = "mouse_click";
    pub const MOUSE_RELEASE: &str = "mouse_release";
    pub const MOUSE_MOVE: &str = "mouse_move";
    pub const TOUCH_START: &str = "touch_start";
    pub const TOUCH_MOVE: &str = "touch_move";
    pub const TOUCH_END: &str = "touch_end";
    pub const CUSTOM: &str = "custom";
}
