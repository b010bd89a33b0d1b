use super::{Component, HookCtx};
use crate::api::types::CompId;

/// Tag applied to every entity carrying a [`SolidComp`].
pub const SOLID_TAG: &str = "solid";

/// Marks an entity as an obstacle that bodies get pushed out of.
/// Setting `solid` to `false` lets things pass through without detaching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidComp {
    pub solid: bool,
    /// Set when attaching added the tag, so detaching only removes that.
    owns_tag: bool,
}

impl SolidComp {
    pub const ID: CompId = "solid";

    pub fn new() -> Self {
        Self {
            solid: true,
            owns_tag: false,
        }
    }
}

impl Default for SolidComp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SolidComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn on_add(&mut self, ctx: &mut HookCtx<'_>) {
        if ctx.scene.exists(ctx.entity) {
            self.owns_tag = ctx.scene.tags.tag(ctx.entity, SOLID_TAG);
        }
    }

    fn on_destroy(&mut self, ctx: &mut HookCtx<'_>) {
        // the entity is already gone when this runs from the flush
        if self.owns_tag {
            let _ = ctx.scene.untag(ctx.entity, SOLID_TAG);
        }
    }
}
