use std::cell::Cell;

use glam::Vec2;

use super::transform::{Origin, PosComp};
use super::Component;
use crate::api::types::CompId;
use crate::math::Rect;

/// Everything the world-space area depends on. The cached rect is reused
/// only while the key is unchanged. Rotation is not part of it: areas are
/// axis-aligned and ignore `rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AreaKey {
    pub pos: Vec2,
    pub scale: Vec2,
    pub origin: Origin,
    /// Footprint of the renderable component, if any.
    pub size: Option<Vec2>,
}

/// Axis-aligned collision bounds. Entity rotation does not affect them.
///
/// With an explicit local rect the area is `pos + rect * scale`. Otherwise it
/// is sized from the entity's renderable footprint, anchored by its origin,
/// and shrunk or grown around its center by `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaComp {
    pub area: Option<Rect>,
    pub scale: Vec2,
    cache: Cell<Option<(AreaKey, Option<Rect>)>>,
}

impl AreaComp {
    pub const ID: CompId = "area";

    /// Area that follows the renderable's footprint.
    pub fn new() -> Self {
        Self::scaled(Vec2::ONE)
    }

    pub fn scaled(scale: Vec2) -> Self {
        Self {
            area: None,
            scale,
            cache: Cell::new(None),
        }
    }

    /// Explicit area in local space relative to `pos`.
    pub fn explicit(p1: Vec2, p2: Vec2) -> Self {
        Self {
            area: Some(Rect::new(p1, p2)),
            scale: Vec2::ONE,
            cache: Cell::new(None),
        }
    }

    pub(crate) fn world_area(&self, key: AreaKey) -> Option<Rect> {
        if let Some((cached, rect)) = self.cache.get() {
            if cached == key {
                return rect;
            }
        }
        let rect = self.compute(key);
        self.cache.set(Some((key, rect)));
        rect
    }

    fn compute(&self, key: AreaKey) -> Option<Rect> {
        if let Some(local) = self.area {
            return Some(Rect::new(
                key.pos + local.p1 * key.scale,
                key.pos + local.p2 * key.scale,
            ));
        }
        let full = key.size? * key.scale;
        let top_left = key.pos + key.origin.top_left_offset(full);
        let center = top_left + full * 0.5;
        let half = full * self.scale * 0.5;
        Some(Rect::new(center - half, center + half))
    }
}

impl Default for AreaComp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for AreaComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn requires(&self) -> &'static [CompId] {
        &[PosComp::ID]
    }
}
