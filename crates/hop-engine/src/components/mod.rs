//! Components: named capability bundles attached to entities at runtime.
//!
//! Every component implements the same flat [`Component`] surface. Hooks are
//! optional; the scheduler calls them with a [`HookCtx`] that grants full
//! scene access while the component itself is temporarily checked out of its
//! entity's [`ComponentTable`].

pub mod area;
pub mod body;
pub mod layer;
pub mod shape;
pub mod solid;
pub mod sprite;
pub mod transform;
pub mod visual;

use std::any::Any;

use glam::Vec2;

use crate::api::types::{CompId, EntityId};
use crate::core::scene::Scene;

/// Downcasting support for `dyn Component`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A capability instance attached to an entity.
pub trait Component: AsAny {
    /// Capability id, unique per entity.
    fn id(&self) -> CompId;

    /// Capabilities that must already be present when this one is attached.
    fn requires(&self) -> &'static [CompId] {
        &[]
    }

    fn on_add(&mut self, _ctx: &mut HookCtx<'_>) {}
    fn on_load(&mut self, _ctx: &mut HookCtx<'_>) {}
    fn on_update(&mut self, _ctx: &mut HookCtx<'_>) {}
    fn on_draw(&mut self, _ctx: &mut HookCtx<'_>) {}
    fn on_destroy(&mut self, _ctx: &mut HookCtx<'_>) {}

    /// Debug inspector line, if the component has anything to show.
    fn inspect(&self) -> Option<String> {
        None
    }

    /// Unscaled footprint for components that render something with a size.
    fn size(&self) -> Option<Vec2> {
        None
    }
}

/// What a hook gets to work with.
pub struct HookCtx<'a> {
    pub scene: &'a mut Scene,
    pub entity: EntityId,
}

impl HookCtx<'_> {
    pub fn dt(&self) -> f32 {
        self.scene.dt()
    }
}

/// Lifecycle hook selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Add,
    Load,
    Update,
    Draw,
    Destroy,
}

impl Hook {
    pub fn name(self) -> &'static str {
        match self {
            Hook::Add => "add",
            Hook::Load => "load",
            Hook::Update => "update",
            Hook::Draw => "draw",
            Hook::Destroy => "destroy",
        }
    }

    pub(crate) fn call(self, comp: &mut dyn Component, ctx: &mut HookCtx<'_>) {
        match self {
            Hook::Add => comp.on_add(ctx),
            Hook::Load => comp.on_load(ctx),
            Hook::Update => comp.on_update(ctx),
            Hook::Draw => comp.on_draw(ctx),
            Hook::Destroy => comp.on_destroy(ctx),
        }
    }
}

struct Slot {
    id: CompId,
    stamp: u64,
    /// `None` while the component is checked out for a hook call.
    comp: Option<Box<dyn Component>>,
}

/// Where a checked-out component ended up when it was handed back.
pub(crate) enum Restore {
    Restored,
    /// Its slot was detached while it was out; the caller owes it `on_destroy`.
    Detached(Box<dyn Component>),
    /// A newer component took over the capability id while it was out.
    Replaced(Box<dyn Component>),
}

/// Per-entity map from capability id to component, in attach order.
#[derive(Default)]
pub struct ComponentTable {
    slots: Vec<Slot>,
    next_stamp: u64,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `comp` under its id. An existing component with the same id is
    /// overwritten in place and returned.
    pub(crate) fn insert(&mut self, comp: Box<dyn Component>) -> Option<Box<dyn Component>> {
        let id = comp.id();
        self.next_stamp += 1;
        let stamp = self.next_stamp;
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                slot.stamp = stamp;
                slot.comp.replace(comp)
            }
            None => {
                self.slots.push(Slot {
                    id,
                    stamp,
                    comp: Some(comp),
                });
                None
            }
        }
    }

    /// Remove the slot for `id`. The outer `Option` says whether the slot
    /// existed; the inner one is `None` if the component was checked out.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Option<Box<dyn Component>>> {
        let idx = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(idx).comp)
    }

    /// Check a component out for a hook call.
    pub(crate) fn take(&mut self, id: &str) -> Option<(u64, Box<dyn Component>)> {
        let slot = self.slots.iter_mut().find(|s| s.id == id)?;
        let comp = slot.comp.take()?;
        Some((slot.stamp, comp))
    }

    /// Hand back a component obtained from [`take`](Self::take).
    pub(crate) fn restore(&mut self, id: &str, stamp: u64, comp: Box<dyn Component>) -> Restore {
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) if slot.stamp == stamp && slot.comp.is_none() => {
                slot.comp = Some(comp);
                Restore::Restored
            }
            Some(_) => Restore::Replaced(comp),
            None => Restore::Detached(comp),
        }
    }

    /// Whether the capability is present, including while checked out.
    pub fn has(&self, id: &str) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub fn has_all(&self, ids: &[&str]) -> bool {
        ids.iter().all(|id| self.has(id))
    }

    pub fn get(&self, id: &str) -> Option<&dyn Component> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.comp.as_deref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Component + 'static)> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.comp.as_deref_mut())
    }

    /// First component of concrete type `T`.
    pub fn get_as<T: Component>(&self) -> Option<&T> {
        self.slots
            .iter()
            .filter_map(|s| s.comp.as_deref())
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn get_as_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .filter_map(|s| s.comp.as_deref_mut())
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Capability ids in attach order.
    pub fn ids(&self) -> Vec<CompId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Iterate components that are currently in the table.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.slots.iter().filter_map(|s| s.comp.as_deref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
