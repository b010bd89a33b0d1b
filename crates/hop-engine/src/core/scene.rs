use glam::Vec2;
use serde_json::{Map, Value};

use crate::api::game::GameConfig;
use crate::api::types::{events, CompId, EntityId, EventArgs};
use crate::assets::AssetRegistry;
use crate::components::layer::{LayerComp, Layers, ZComp};
use crate::components::transform::{OriginComp, PosComp, RotateComp, ScaleComp};
use crate::components::visual::ColorComp;
use crate::components::{Component, ComponentTable, Hook, HookCtx, Restore};
use crate::core::debug::DebugState;
use crate::core::error::{isolate, SceneError, SceneResult};
use crate::core::events::{EventCanceller, EventDispatcher, Handler, Scope};
use crate::core::frame::FramePhase;
use crate::core::registry::EntityRegistry;
use crate::core::tags::TagIndex;
use crate::core::time::Clock;
use crate::core::timer::TimerQueue;
use crate::input::{InputEvent, InputQueue, InputState};
use crate::math::{Color, Rng};
use crate::renderer::camera::Camera2D;
use crate::renderer::draw::{DrawList, Primitive, RenderProps};
use crate::systems::collision::SpatialSubs;

/// Components, tags and custom data for a new entity.
#[derive(Default)]
pub struct EntityBuilder {
    comps: Vec<Box<dyn Component>>,
    tags: Vec<String>,
    data: Map<String, Value>,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, comp: impl Component) -> Self {
        self.comps.push(Box::new(comp));
        self
    }

    pub fn with_boxed(mut self, comp: Box<dyn Component>) -> Self {
        self.comps.push(comp);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }
}

/// A self-contained world: entities, their components and tags, event
/// subscriptions, timers, camera and per-frame state.
///
/// Scenes share nothing, so several can exist side by side. All mutation
/// happens on one thread; structural changes made from hooks and handlers
/// are safe because every iteration works on a snapshot and destruction is
/// deferred to the end-of-frame flush.
pub struct Scene {
    pub(crate) entities: EntityRegistry,
    pub(crate) tags: TagIndex,
    pub(crate) events: EventDispatcher,
    pub(crate) spatial: SpatialSubs,
    pub(crate) timers: TimerQueue,
    pub(crate) clock: Clock,
    pub(crate) input: InputState,
    input_queue: InputQueue,
    pub camera: Camera2D,
    pub(crate) layers: Layers,
    pub(crate) draw_list: DrawList,
    pub(crate) assets: AssetRegistry,
    pub debug: DebugState,
    pub rng: Rng,
    /// Downward acceleration applied to bodies, in units per second squared.
    pub gravity: f32,
    width: f32,
    height: f32,
    pub(crate) clear_color: Color,
    pub(crate) inspect_color: Color,
    pub(crate) phase: FramePhase,
    pub(crate) pending_go: Option<(String, EventArgs)>,
    pub(crate) loaded: bool,
    ready: Vec<Box<dyn FnOnce(&mut Scene)>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        let mut debug = DebugState::new(config.log_max);
        debug.keys = config.debug;
        Self {
            entities: EntityRegistry::new(),
            tags: TagIndex::new(),
            events: EventDispatcher::new(),
            spatial: SpatialSubs::new(),
            timers: TimerQueue::new(),
            clock: Clock::new(),
            input: InputState::new(config.touch_to_mouse),
            input_queue: InputQueue::new(),
            camera: Camera2D::new(config.width, config.height),
            layers: Layers::default(),
            draw_list: DrawList::new(),
            assets: AssetRegistry::new(),
            debug,
            rng: Rng::new(config.seed),
            gravity: config.gravity,
            width: config.width,
            height: config.height,
            clear_color: config.clear_color,
            inspect_color: config.inspect_color,
            phase: FramePhase::Idle,
            pending_go: None,
            loaded: false,
            ready: Vec::new(),
        }
    }

    // -- Entity lifecycle --

    /// Create an entity from a builder.
    pub fn add(&mut self, builder: EntityBuilder) -> SceneResult<EntityId> {
        let EntityBuilder { comps, tags, data } = builder;
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        let id = self.create(comps, &tags)?;
        if let Some(record) = self.entities.get_mut(id) {
            record.data.extend(data);
        }
        Ok(id)
    }

    /// Create an entity with the given components and tags.
    ///
    /// Requirements are checked against the whole initial set, so components
    /// may be listed in any order. On failure nothing is created. Components
    /// get `on_add` in list order, then `on_load` if assets are ready, then
    /// the entity receives an `"add"` event.
    pub fn create(&mut self, comps: Vec<Box<dyn Component>>, tags: &[&str]) -> SceneResult<EntityId> {
        for comp in &comps {
            for req in comp.requires() {
                if !comps.iter().any(|c| c.id() == *req) {
                    return Err(SceneError::Requirement {
                        component: comp.id(),
                        missing: *req,
                    });
                }
            }
        }

        let id = self.entities.spawn();
        for tag in tags {
            self.tags.tag(id, tag);
        }
        for comp in comps {
            let cid = comp.id();
            if let Some(record) = self.entities.get_mut(id) {
                record.comps.insert(comp);
            }
            self.run_hook(id, cid, Hook::Add);
        }
        if self.loaded {
            self.run_hooks(id, Hook::Load);
        }
        self.trigger(id, events::ADD, &EventArgs::None);
        Ok(id)
    }

    /// Queue `id` for removal at the end of the frame. It disappears from
    /// queries and dispatch immediately.
    pub fn destroy(&mut self, id: EntityId) -> SceneResult<()> {
        if self.entities.mark_destroyed(id) {
            Ok(())
        } else {
            Err(SceneError::InvalidHandle(id))
        }
    }

    pub fn destroy_all(&mut self, tag: &str) {
        for id in self.query(Some(tag)) {
            let _ = self.destroy(id);
        }
    }

    pub fn exists(&self, id: EntityId) -> bool {
        self.entities.exists(id)
    }

    /// Live entities, optionally filtered by tag, in insertion order.
    /// The result is a snapshot: later structural changes do not affect it.
    pub fn query(&self, tag: Option<&str>) -> Vec<EntityId> {
        let live = self.entities.live();
        match tag {
            Some(tag) => live.into_iter().filter(|id| self.tags.has(*id, tag)).collect(),
            None => live,
        }
    }

    /// Live entities carrying every listed capability.
    pub fn with_all(&self, ids: &[&str]) -> Vec<EntityId> {
        self.entities
            .live()
            .into_iter()
            .filter(|id| self.has_all(*id, ids))
            .collect()
    }

    /// Run `f` for each entity matching `tag`. Entities destroyed along the
    /// way are skipped.
    pub fn every(&mut self, tag: Option<&str>, mut f: impl FnMut(&mut Scene, EntityId)) {
        for id in self.query(tag) {
            if self.exists(id) {
                f(self, id);
            }
        }
    }

    /// Like [`every`](Self::every), newest first.
    pub fn revery(&mut self, tag: Option<&str>, mut f: impl FnMut(&mut Scene, EntityId)) {
        for id in self.query(tag).into_iter().rev() {
            if self.exists(id) {
                f(self, id);
            }
        }
    }

    /// Move `id` to the end of iteration and draw order.
    pub fn readd(&mut self, id: EntityId) -> SceneResult<()> {
        self.check(id)?;
        self.entities.move_to_back(id);
        Ok(())
    }

    /// Number of live entities.
    pub fn obj_count(&self) -> usize {
        self.entities.len()
    }

    fn check(&self, id: EntityId) -> SceneResult<()> {
        if self.exists(id) {
            Ok(())
        } else {
            Err(SceneError::InvalidHandle(id))
        }
    }

    // -- Tags and flags --

    pub fn tag(&mut self, id: EntityId, tag: &str) -> SceneResult<()> {
        self.check(id)?;
        self.tags.tag(id, tag);
        Ok(())
    }

    pub fn untag(&mut self, id: EntityId, tag: &str) -> SceneResult<()> {
        self.check(id)?;
        self.tags.untag(id, tag);
        Ok(())
    }

    pub fn is(&self, id: EntityId, tag: &str) -> bool {
        self.exists(id) && self.tags.has(id, tag)
    }

    pub fn tags(&self, id: EntityId) -> Vec<String> {
        if self.exists(id) {
            self.tags.tags_of(id).to_vec()
        } else {
            Vec::new()
        }
    }

    pub fn set_paused(&mut self, id: EntityId, paused: bool) -> SceneResult<()> {
        let record = self.entities.get_mut(id).ok_or(SceneError::InvalidHandle(id))?;
        record.paused = paused;
        Ok(())
    }

    pub fn set_hidden(&mut self, id: EntityId, hidden: bool) -> SceneResult<()> {
        let record = self.entities.get_mut(id).ok_or(SceneError::InvalidHandle(id))?;
        record.hidden = hidden;
        Ok(())
    }

    pub fn is_paused(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|r| r.paused)
    }

    pub fn is_hidden(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|r| r.hidden)
    }

    // -- Custom data --

    pub fn data(&self, id: EntityId, key: &str) -> Option<&Value> {
        self.entities.get(id)?.data.get(key)
    }

    pub fn set_data(&mut self, id: EntityId, key: &str, value: Value) -> SceneResult<()> {
        let record = self.entities.get_mut(id).ok_or(SceneError::InvalidHandle(id))?;
        record.data.insert(key.to_string(), value);
        Ok(())
    }

    // -- Components --

    /// Attach a component, replacing any existing one with the same id, and
    /// run its `on_add` (and `on_load` once assets are ready).
    pub fn attach(&mut self, id: EntityId, comp: impl Component) -> SceneResult<()> {
        self.attach_boxed(id, Box::new(comp))
    }

    pub fn attach_boxed(&mut self, id: EntityId, comp: Box<dyn Component>) -> SceneResult<()> {
        let record = self.entities.get_mut(id).ok_or(SceneError::InvalidHandle(id))?;
        if let Some(&missing) = comp.requires().iter().find(|r| !record.comps.has(r)) {
            return Err(SceneError::Requirement {
                component: comp.id(),
                missing,
            });
        }
        let cid = comp.id();
        record.comps.insert(comp);
        self.run_hook(id, cid, Hook::Add);
        if self.loaded {
            self.run_hook(id, cid, Hook::Load);
        }
        Ok(())
    }

    /// Detach a capability, running its `on_destroy`. Returns `false` if the
    /// entity did not have it.
    pub fn detach(&mut self, id: EntityId, cid: &str) -> SceneResult<bool> {
        let record = self.entities.get_mut(id).ok_or(SceneError::InvalidHandle(id))?;
        match record.comps.remove(cid) {
            None => Ok(false),
            Some(Some(comp)) => {
                self.run_detached(id, comp);
                Ok(true)
            }
            // Checked out by a running hook: it gets `on_destroy` when handed back.
            Some(None) => Ok(true),
        }
    }

    pub fn has(&self, id: EntityId, cid: &str) -> bool {
        self.entities.get(id).is_some_and(|r| r.comps.has(cid))
    }

    pub fn has_all(&self, id: EntityId, cids: &[&str]) -> bool {
        self.entities.get(id).is_some_and(|r| r.comps.has_all(cids))
    }

    pub fn comp(&self, id: EntityId, cid: &str) -> Option<&dyn Component> {
        self.entities.get(id)?.comps.get(cid)
    }

    pub fn comp_as<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(id)?.comps.get_as::<T>()
    }

    pub fn comp_as_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(id)?.comps.get_as_mut::<T>()
    }

    /// Capability ids of `id`, in attach order.
    pub fn comp_ids(&self, id: EntityId) -> Vec<CompId> {
        self.entities.get(id).map_or_else(Vec::new, |r| r.comps.ids())
    }

    pub fn pos(&self, id: EntityId) -> Option<Vec2> {
        self.comp_as::<PosComp>(id).map(|p| p.pos)
    }

    /// Footprint of the first component that has one.
    pub fn footprint(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(id)?.comps.iter().find_map(|c| c.size())
    }

    fn table(&self, id: EntityId) -> Option<&ComponentTable> {
        self.entities.get(id).map(|r| &r.comps)
    }

    /// Transform and tint of `id` for drawing.
    pub fn render_props(&self, id: EntityId) -> RenderProps {
        let Some(comps) = self.table(id) else {
            return RenderProps::default();
        };
        RenderProps {
            pos: comps.get_as::<PosComp>().map_or(Vec2::ZERO, |p| p.pos),
            scale: comps.get_as::<ScaleComp>().map_or(Vec2::ONE, |s| s.scale),
            rot: comps.get_as::<RotateComp>().map_or(0.0, |r| r.angle),
            color: comps.get_as::<ColorComp>().map_or(Color::WHITE, |c| c.color),
            origin: comps.get_as::<OriginComp>().map(|o| o.origin).unwrap_or_default(),
        }
    }

    pub(crate) fn layer_name(&self, id: EntityId) -> Option<&str> {
        self.comp_as::<LayerComp>(id).map(|l| l.layer.as_str())
    }

    pub(crate) fn z(&self, id: EntityId) -> f32 {
        self.comp_as::<ZComp>(id).map_or(0.0, |z| z.z)
    }

    // -- Hooks --

    /// Run `hook` on every component of `id` in attach order. Update and draw
    /// hooks stop as soon as the entity is destroyed.
    pub(crate) fn run_hooks(&mut self, id: EntityId, hook: Hook) {
        let Some(record) = self.entities.record(id) else {
            return;
        };
        for cid in record.comps.ids() {
            if hook != Hook::Destroy && !self.exists(id) {
                break;
            }
            self.run_hook(id, cid, hook);
        }
    }

    /// Check the component out, call the hook with full scene access, and
    /// hand it back. A panicking hook is logged and the frame goes on.
    pub(crate) fn run_hook(&mut self, id: EntityId, cid: CompId, hook: Hook) {
        let Some(record) = self.entities.record_mut(id) else {
            return;
        };
        let Some((stamp, mut comp)) = record.comps.take(cid) else {
            return;
        };
        isolate(
            &|| format!("'{}' {} hook of {}", cid, hook.name(), id),
            || {
                let mut ctx = HookCtx { scene: self, entity: id };
                hook.call(comp.as_mut(), &mut ctx);
            },
        );
        let Some(record) = self.entities.record_mut(id) else {
            return;
        };
        match record.comps.restore(cid, stamp, comp) {
            Restore::Restored | Restore::Replaced(_) => {}
            Restore::Detached(comp) => {
                if hook != Hook::Destroy {
                    self.run_detached(id, comp);
                }
            }
        }
    }

    fn run_detached(&mut self, id: EntityId, mut comp: Box<dyn Component>) {
        let cid = comp.id();
        isolate(
            &|| format!("'{}' destroy hook of {}", cid, id),
            || {
                let mut ctx = HookCtx { scene: self, entity: id };
                Hook::Destroy.call(comp.as_mut(), &mut ctx);
            },
        );
    }

    // -- Events --

    /// Subscribe to `event` for every entity tagged `tag`.
    pub fn on(
        &mut self,
        event: &str,
        tag: &str,
        mut f: impl FnMut(&mut Scene, EntityId, &EventArgs) + 'static,
    ) -> EventCanceller {
        self.subscribe(
            event,
            Scope::Tag(tag.to_string()),
            Box::new(move |scene, id, args| {
                if let Some(id) = id {
                    f(scene, id, args)
                }
            }),
        )
    }

    /// Subscribe to `event` for a single entity.
    pub fn on_entity(
        &mut self,
        id: EntityId,
        event: &str,
        mut f: impl FnMut(&mut Scene, EntityId, &EventArgs) + 'static,
    ) -> EventCanceller {
        self.subscribe(
            event,
            Scope::Entity(id),
            Box::new(move |scene, id, args| {
                if let Some(id) = id {
                    f(scene, id, args)
                }
            }),
        )
    }

    /// Subscribe to a global occurrence of `event`.
    pub fn on_global(
        &mut self,
        event: &str,
        mut f: impl FnMut(&mut Scene, &EventArgs) + 'static,
    ) -> EventCanceller {
        self.subscribe(event, Scope::Global, Box::new(move |scene, _, args| f(scene, args)))
    }

    pub fn subscribe(&mut self, event: &str, scope: Scope, handler: Box<Handler>) -> EventCanceller {
        self.events.subscribe(event, scope, handler)
    }

    /// Per-frame update for every active entity tagged `tag`.
    pub fn action(&mut self, tag: &str, mut f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        self.on(events::UPDATE, tag, move |scene, id, _| f(scene, id))
    }

    /// Per-frame update that always runs, whatever entities are paused.
    pub fn action_global(&mut self, mut f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_global(events::UPDATE, move |scene, _| f(scene))
    }

    /// Per-frame draw for every visible entity tagged `tag`.
    pub fn render(&mut self, tag: &str, mut f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        self.on(events::DRAW, tag, move |scene, id, _| f(scene, id))
    }

    pub fn render_global(&mut self, mut f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_global(events::DRAW, move |scene, _| f(scene))
    }

    /// Publish `event` to the entities tagged `tag`, or to every live entity
    /// and to global subscribers when `tag` is `None`.
    pub fn publish(&mut self, event: &str, tag: Option<&str>, args: &EventArgs) {
        let candidates = self.query(tag);
        self.dispatch(event, &candidates, args, tag.is_none(), false);
    }

    /// Fire `event` on one entity: its own subscriptions and tag
    /// subscriptions matching its tags. Does nothing for a dead entity.
    pub fn trigger(&mut self, id: EntityId, event: &str, args: &EventArgs) {
        self.dispatch(event, &[id], args, false, false);
    }

    /// Core dispatch loop over a snapshot of the subscriber list.
    ///
    /// Subscriptions fire in registration order; within a tag subscription
    /// the candidates fire in the given order. Each call first re-checks that
    /// the subscription is still live and the entity still qualifies.
    pub(crate) fn dispatch(
        &mut self,
        event: &str,
        candidates: &[EntityId],
        args: &EventArgs,
        include_globals: bool,
        allow_dead: bool,
    ) {
        for sub in self.events.snapshot(event) {
            match &sub.scope {
                Scope::Global => {
                    if include_globals {
                        sub.invoke(self, None, args, event);
                    }
                }
                Scope::Tag(tag) => {
                    for &id in candidates {
                        if sub.is_cancelled() {
                            break;
                        }
                        let alive = allow_dead || self.exists(id);
                        if alive && self.tags.has(id, tag) {
                            sub.invoke(self, Some(id), args, event);
                        }
                    }
                }
                Scope::Entity(target) => {
                    let target = *target;
                    if candidates.contains(&target) && (allow_dead || self.exists(target)) {
                        sub.invoke(self, Some(target), args, event);
                    }
                }
            }
        }
    }

    // -- Input --

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input_queue.push(event);
    }

    pub(crate) fn drain_input(&mut self) {
        for event in self.input_queue.drain() {
            self.input.apply(event);
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_pressed(&self, key: &str) -> bool {
        self.input.key_pressed(key)
    }

    pub fn key_pressed_rep(&self, key: &str) -> bool {
        self.input.key_pressed_rep(key)
    }

    pub fn key_released(&self, key: &str) -> bool {
        self.input.key_released(key)
    }

    /// Cursor in world space.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos_in(None)
    }

    /// Cursor position as seen from `layer`: screen space if the camera
    /// ignores the layer, world space otherwise.
    pub fn mouse_pos_in(&self, layer: Option<&str>) -> Vec2 {
        let screen = self.input.mouse_pos();
        if self.camera.is_ignored(layer) {
            screen
        } else {
            self.camera.to_world(screen)
        }
    }

    fn on_key_event(
        &mut self,
        event: &str,
        key: &str,
        mut f: impl FnMut(&mut Scene) + 'static,
    ) -> EventCanceller {
        let key = key.to_string();
        self.on_global(event, move |scene, args| {
            if matches!(args, EventArgs::Key(k) if *k == key) {
                f(scene)
            }
        })
    }

    /// Every frame while `key` is held.
    pub fn on_key_down(&mut self, key: &str, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_key_event(events::KEY_DOWN, key, f)
    }

    pub fn on_key_press(&mut self, key: &str, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_key_event(events::KEY_PRESS, key, f)
    }

    /// On press and on every auto-repeat.
    pub fn on_key_press_rep(&mut self, key: &str, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_key_event(events::KEY_PRESS_REP, key, f)
    }

    pub fn on_key_release(&mut self, key: &str, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.on_key_event(events::KEY_RELEASE, key, f)
    }

    pub fn on_char_input(&mut self, mut f: impl FnMut(&mut Scene, char) + 'static) -> EventCanceller {
        self.on_global(events::CHAR_INPUT, move |scene, args| {
            if let EventArgs::Char(ch) = args {
                f(scene, *ch)
            }
        })
    }

    fn on_mouse_event(&mut self, event: &str, mut f: impl FnMut(&mut Scene, Vec2) + 'static) -> EventCanceller {
        self.on_global(event, move |scene, _| {
            let pos = scene.mouse_pos();
            f(scene, pos)
        })
    }

    /// Mouse handlers receive the cursor in world space.
    pub fn on_mouse_down(&mut self, f: impl FnMut(&mut Scene, Vec2) + 'static) -> EventCanceller {
        self.on_mouse_event(events::MOUSE_DOWN, f)
    }

    pub fn on_mouse_click(&mut self, f: impl FnMut(&mut Scene, Vec2) + 'static) -> EventCanceller {
        self.on_mouse_event(events::MOUSE_CLICK, f)
    }

    pub fn on_mouse_release(&mut self, f: impl FnMut(&mut Scene, Vec2) + 'static) -> EventCanceller {
        self.on_mouse_event(events::MOUSE_RELEASE, f)
    }

    pub fn on_mouse_move(&mut self, f: impl FnMut(&mut Scene, Vec2) + 'static) -> EventCanceller {
        self.on_mouse_event(events::MOUSE_MOVE, f)
    }

    fn on_touch_event(
        &mut self,
        event: &str,
        mut f: impl FnMut(&mut Scene, u64, Vec2) + 'static,
    ) -> EventCanceller {
        self.on_global(event, move |scene, args| {
            if let EventArgs::Touch { id, pos } = args {
                f(scene, *id, *pos)
            }
        })
    }

    /// Touch handlers receive the touch position in screen space.
    pub fn on_touch_start(&mut self, f: impl FnMut(&mut Scene, u64, Vec2) + 'static) -> EventCanceller {
        self.on_touch_event(events::TOUCH_START, f)
    }

    pub fn on_touch_move(&mut self, f: impl FnMut(&mut Scene, u64, Vec2) + 'static) -> EventCanceller {
        self.on_touch_event(events::TOUCH_MOVE, f)
    }

    pub fn on_touch_end(&mut self, f: impl FnMut(&mut Scene, u64, Vec2) + 'static) -> EventCanceller {
        self.on_touch_event(events::TOUCH_END, f)
    }

    /// Custom host events. The payload is `{ "kind", "a", "b", "c" }`.
    pub fn on_custom(&mut self, mut f: impl FnMut(&mut Scene, &Value) + 'static) -> EventCanceller {
        self.on_global(events::CUSTOM, move |scene, args| {
            if let EventArgs::Data(v) = args {
                f(scene, v)
            }
        })
    }

    // -- Timers --

    /// Run `f` once, `secs` from now.
    pub fn wait(&mut self, secs: f32, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.timers.wait(secs, Box::new(f))
    }

    /// Run `f` on the next update, then every `secs`.
    pub fn loop_every(&mut self, secs: f32, f: impl FnMut(&mut Scene) + 'static) -> EventCanceller {
        self.timers.loop_every(secs, Box::new(f))
    }

    // -- Time, view and assets --

    pub fn dt(&self) -> f32 {
        self.clock.dt()
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Shake the camera.
    pub fn cam_shake(&mut self, intensity: f32) {
        self.camera.shake(intensity);
    }

    /// Declare draw layers, back to front.
    pub fn layers(&mut self, names: &[&str], default: Option<&str>) {
        self.layers = Layers::new(names, default);
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    /// Whether every pending asset load has settled and `on_load` ran.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Run `f` once assets are ready: now if they already are, otherwise at
    /// the start of the first frame after the last load settles.
    pub fn ready(&mut self, f: impl FnOnce(&mut Scene) + 'static) {
        if self.loaded {
            f(self);
        } else {
            self.ready.push(Box::new(f));
        }
    }

    pub(crate) fn check_ready(&mut self) {
        if self.loaded || !self.assets.is_ready() {
            return;
        }
        self.loaded = true;
        for id in self.entities.live() {
            self.run_hooks(id, Hook::Load);
        }
        for f in std::mem::take(&mut self.ready) {
            isolate(&|| "ready callback".to_string(), || f(self));
        }
    }

    /// Ask the engine to switch to scene `name` once this frame ends.
    pub fn go(&mut self, name: &str, args: EventArgs) {
        self.pending_go = Some((name.to_string(), args));
    }

    pub(crate) fn take_pending_go(&mut self) -> Option<(String, EventArgs)> {
        self.pending_go.take()
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    // -- Immediate-mode drawing --

    /// Record a draw command. Only valid during the Drawing phase.
    pub fn draw(&mut self, primitive: Primitive, props: RenderProps) {
        if self.phase != FramePhase::Drawing {
            log::warn!("draw call outside the drawing phase ignored ({:?})", self.phase);
            return;
        }
        self.draw_list.push(primitive, props);
    }

    pub fn draw_rect(&mut self, pos: Vec2, width: f32, height: f32, color: Color) {
        self.draw(Primitive::Rect { width, height }, RenderProps::at(pos).with_color(color));
    }

    pub fn draw_rect_stroke(&mut self, pos: Vec2, width: f32, height: f32, line_width: f32, color: Color) {
        self.draw(
            Primitive::RectStroke { width, height, line_width },
            RenderProps::at(pos).with_color(color),
        );
    }

    pub fn draw_line(&mut self, p1: Vec2, p2: Vec2, line_width: f32, color: Color) {
        self.draw(
            Primitive::Line { p1, p2, line_width },
            RenderProps::default().with_color(color),
        );
    }

    pub fn draw_tri(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color) {
        self.draw(Primitive::Tri { p1, p2, p3 }, RenderProps::default().with_color(color));
    }

    pub fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.draw(
            Primitive::Text {
                text: text.to_string(),
                size,
                font: None,
                wrap_width: None,
            },
            RenderProps::at(pos).with_color(color),
        );
    }

    pub fn draw_sprite(&mut self, sprite: &str, frame: usize, pos: Vec2) {
        self.draw(
            Primitive::Sprite {
                sprite: sprite.to_string(),
                frame,
                quad: crate::math::Quad::FULL,
                width: None,
                height: None,
                flip_x: false,
                flip_y: false,
                tiled: false,
            },
            RenderProps::at(pos),
        );
    }
}
