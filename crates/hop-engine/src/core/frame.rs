//! The per-frame scheduler.
//!
//! One call to [`Scene::frame`] walks the fixed phase sequence
//! `Idle -> Updating -> PhysicsIntegrating -> Resolving -> Drawing -> Flushing -> Idle`.

use crate::api::types::{events, EntityId, EventArgs};
use crate::components::Hook;
use crate::core::scene::Scene;
use crate::core::{debug, timer};
use crate::renderer::traits::{DrawTiming, Renderer};
use crate::systems::{collision, physics, render};

/// Where the scheduler currently is within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    Updating,
    PhysicsIntegrating,
    Resolving,
    Drawing,
    Flushing,
}

impl Scene {
    /// Run one full frame with `dt` seconds of real time.
    ///
    /// While the debugger is paused only drawing runs (plus a single full
    /// step when one was requested).
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> DrawTiming {
        if self.phase != FramePhase::Idle {
            log::warn!("frame() called re-entrantly during {:?}, ignored", self.phase);
            return DrawTiming::default();
        }

        self.drain_input();
        debug::poll_keys(self);
        let running = !self.debug.paused || self.debug.take_step();
        let scaled = if running { dt.max(0.0) * self.debug.time_scale } else { 0.0 };
        self.clock.advance(scaled);
        self.check_ready();

        if running {
            self.phase = FramePhase::Updating;
            self.update(scaled);

            self.phase = FramePhase::PhysicsIntegrating;
            physics::integrate(self, scaled);

            self.phase = FramePhase::Resolving;
            physics::resolve_bodies(self);
            collision::resolve_spatial(self);
        }

        self.phase = FramePhase::Drawing;
        self.camera.tick(scaled, &mut self.rng);
        let timing = render::draw_phase(self, renderer);

        self.phase = FramePhase::Flushing;
        self.flush();

        self.input.end_frame();
        let draw_calls = self.draw_list.len();
        let obj_count = self.obj_count();
        self.debug.record_frame(dt, obj_count, draw_calls);
        self.phase = FramePhase::Idle;
        timing
    }

    fn update(&mut self, dt: f32) {
        for (event, args) in self.input.frame_events() {
            self.publish(event, None, &args);
        }

        timer::tick(self, dt);

        let active: Vec<_> = self
            .entities
            .live()
            .into_iter()
            .filter(|id| self.is_active(*id))
            .collect();
        for &id in &active {
            if self.is_active(id) {
                self.run_hooks(id, Hook::Update);
            }
        }
        let active: Vec<_> = active.into_iter().filter(|id| self.is_active(*id)).collect();
        self.dispatch(events::UPDATE, &active, &EventArgs::None, true, false);
    }

    /// Live, not paused and not hidden.
    fn is_active(&self, id: EntityId) -> bool {
        self.entities
            .get(id)
            .is_some_and(|r| !r.paused && !r.hidden)
    }

    /// Remove every entity destroyed so far. Entities destroyed by destroy
    /// handlers are removed in the same flush.
    pub(crate) fn flush(&mut self) {
        while self.entities.has_pending() {
            for id in self.entities.take_pending() {
                self.dispatch(events::DESTROY, &[id], &EventArgs::None, false, true);
                self.run_hooks(id, Hook::Destroy);
                self.tags.remove_entity(id);
                self.events.cancel_entity(id);
                self.spatial.cancel_entity(id);
                self.entities.release(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::components::area::AreaComp;
    use crate::components::body::BodyComp;
    use crate::components::shape::RectComp;
    use crate::components::solid::SolidComp;
    use crate::components::transform::PosComp;
    use crate::components::{Component, HookCtx};
    use crate::core::scene::EntityBuilder;
    use crate::input::InputEvent;
    use crate::renderer::traits::RecordingRenderer;
    use crate::api::types::CompId;
    use crate::core::error::SceneError;

    fn step(scene: &mut Scene, dt: f32) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::default();
        scene.frame(dt, &mut renderer);
        renderer
    }

    struct PhaseProbe {
        seen: Rc<RefCell<Vec<FramePhase>>>,
    }

    impl Component for PhaseProbe {
        fn id(&self) -> CompId {
            "probe"
        }
        fn on_update(&mut self, ctx: &mut HookCtx<'_>) {
            self.seen.borrow_mut().push(ctx.scene.phase());
        }
        fn on_draw(&mut self, ctx: &mut HookCtx<'_>) {
            self.seen.borrow_mut().push(ctx.scene.phase());
        }
        fn on_destroy(&mut self, ctx: &mut HookCtx<'_>) {
            self.seen.borrow_mut().push(ctx.scene.phase());
        }
    }

    #[test]
    fn phases_run_in_order_and_return_to_idle() {
        let mut scene = Scene::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = scene
            .add(EntityBuilder::new().with(PhaseProbe { seen: Rc::clone(&seen) }))
            .unwrap();
        step(&mut scene, 0.1);
        scene.destroy(id).unwrap();
        step(&mut scene, 0.1);
        assert_eq!(
            *seen.borrow(),
            vec![
                FramePhase::Updating,
                FramePhase::Drawing,
                FramePhase::Flushing,
            ]
        );
        assert_eq!(scene.phase(), FramePhase::Idle);
    }

    struct Faulty {
        runs: Rc<Cell<u32>>,
    }

    impl Component for Faulty {
        fn id(&self) -> CompId {
            "bad"
        }
        fn on_update(&mut self, _ctx: &mut HookCtx<'_>) {
            self.runs.set(self.runs.get() + 1);
            panic!("broken update hook");
        }
    }

    #[test]
    fn panicking_hook_keeps_component_and_frame_going() {
        let mut scene = Scene::new();
        let runs = Rc::new(Cell::new(0));
        let id = scene
            .add(EntityBuilder::new().with(Faulty { runs: Rc::clone(&runs) }))
            .unwrap();
        let global = Rc::new(Cell::new(0));
        let g = Rc::clone(&global);
        scene.action_global(move |_| g.set(g.get() + 1));

        step(&mut scene, 0.1);
        step(&mut scene, 0.1);
        assert_eq!(runs.get(), 2);
        assert_eq!(global.get(), 2);
        assert!(scene.comp(id, "bad").is_some());
        assert_eq!(scene.phase(), FramePhase::Idle);
    }

    #[test]
    fn paused_and_hidden_entities_skip_update() {
        let mut scene = Scene::new();
        let a = scene.add(EntityBuilder::new().tag("e")).unwrap();
        let b = scene.add(EntityBuilder::new().tag("e")).unwrap();
        let c = scene.add(EntityBuilder::new().tag("e")).unwrap();
        scene.set_paused(b, true).unwrap();
        scene.set_hidden(c, true).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        scene.action("e", move |_, id| s.borrow_mut().push(id));
        let global = Rc::new(Cell::new(0));
        let g = Rc::clone(&global);
        scene.action_global(move |_| g.set(g.get() + 1));
        step(&mut scene, 0.1);
        assert_eq!(*seen.borrow(), vec![a]);
        assert_eq!(global.get(), 1);
    }

    #[test]
    fn destroy_hooks_fire_once_at_flush_then_handle_dies() {
        let mut scene = Scene::new();
        let id = scene.add(EntityBuilder::new().tag("e")).unwrap();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        scene.on("destroy", "e", move |scene, who, _| {
            assert!(!scene.exists(who));
            f.set(f.get() + 1);
        });
        scene.destroy(id).unwrap();
        assert_eq!(fired.get(), 0);
        step(&mut scene, 0.1);
        assert_eq!(fired.get(), 1);
        step(&mut scene, 0.1);
        assert_eq!(fired.get(), 1);

        let fresh = scene.add(EntityBuilder::new()).unwrap();
        assert_eq!(fresh.index, id.index);
        assert_ne!(fresh.generation, id.generation);
        assert_eq!(scene.destroy(id), Err(SceneError::InvalidHandle(id)));
    }

    #[test]
    fn entity_subscriptions_die_with_entity() {
        let mut scene = Scene::new();
        let id = scene.add(EntityBuilder::new()).unwrap();
        let canceller = scene.on_entity(id, "ping", |_, _, _| {});
        scene.destroy(id).unwrap();
        step(&mut scene, 0.1);
        assert!(canceller.is_cancelled());
        assert_eq!(scene.events.count("ping"), 0);
    }

    #[test]
    fn destroy_from_destroy_handler_flushes_same_frame() {
        let mut scene = Scene::new();
        let a = scene.add(EntityBuilder::new().tag("a")).unwrap();
        let b = scene.add(EntityBuilder::new()).unwrap();
        scene.on("destroy", "a", move |scene, _, _| {
            let _ = scene.destroy(b);
        });
        scene.destroy(a).unwrap();
        step(&mut scene, 0.1);
        assert_eq!(scene.obj_count(), 0);
        assert!(!scene.entities.has_pending());
    }

    #[test]
    fn debug_pause_freezes_updates_but_draws() {
        let mut scene = Scene::new();
        scene.add(EntityBuilder::new().with(PosComp::default()).with(RectComp::new(2.0, 2.0))).unwrap();
        let ticks = Rc::new(Cell::new(0));
        let t = Rc::clone(&ticks);
        scene.action_global(move |_| t.set(t.get() + 1));
        scene.debug.paused = true;
        let r = step(&mut scene, 0.1);
        assert_eq!(ticks.get(), 0);
        assert_eq!(scene.time(), 0.0);
        assert_eq!(r.frames[0].len(), 1);

        scene.debug.step_frame();
        step(&mut scene, 0.1);
        assert_eq!(ticks.get(), 1);
        step(&mut scene, 0.1);
        assert_eq!(ticks.get(), 1);
    }

    #[test]
    fn input_events_published_during_update() {
        let mut scene = Scene::new();
        let pressed = Rc::new(Cell::new(0));
        let p = Rc::clone(&pressed);
        scene.on_key_press("space", move |_| p.set(p.get() + 1));
        scene.push_input(InputEvent::KeyDown { key: "space".into(), repeat: false });
        step(&mut scene, 0.1);
        step(&mut scene, 0.1);
        assert_eq!(pressed.get(), 1);
        assert!(scene.key_down("space"));
    }

    #[test]
    fn jump_then_one_step() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let player = scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(0.0, 0.0))
                    .with(RectComp::new(10.0, 10.0))
                    .with(AreaComp::new())
                    .with(BodyComp::new())
                    .tag("player"),
            )
            .unwrap();
        scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(-50.0, 10.0))
                    .with(RectComp::new(100.0, 10.0))
                    .with(AreaComp::new())
                    .with(SolidComp::new())
                    .tag("platform"),
            )
            .unwrap();
        for _ in 0..3 {
            step(&mut scene, 0.1);
        }
        assert!(scene.grounded(player));
        assert!(scene.pos(player).unwrap().y.abs() < 1e-4);

        assert_eq!(scene.jump(player, Some(10.0)), Ok(true));
        step(&mut scene, 0.1);
        let body = scene.comp_as::<BodyComp>(player).unwrap();
        assert!((body.velocity_y() + 8.0).abs() < 1e-5);
        assert!(!body.grounded());
        assert!(scene.pos(player).unwrap().y < 0.0);
        assert_eq!(scene.pos(player).map(|p| p.x), Some(0.0));
    }
}
