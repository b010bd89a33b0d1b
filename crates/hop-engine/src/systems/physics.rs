//! Platformer physics: gravity, platform carry and landing.

use glam::Vec2;

use crate::api::types::{events, EntityId, EventArgs};
use crate::components::body::BodyComp;
use crate::components::solid::SOLID_TAG;
use crate::components::transform::PosComp;
use crate::core::error::{SceneError, SceneResult};
use crate::core::scene::Scene;
use crate::math::Side;

/// How far below its feet a grounded body looks for its platform.
const GROUND_PROBE: f32 = 1.0;

impl Scene {
    /// Make `id` jump. Returns `Ok(false)` when it is airborne.
    pub fn jump(&mut self, id: EntityId, force: Option<f32>) -> SceneResult<bool> {
        if !self.exists(id) {
            return Err(SceneError::InvalidHandle(id));
        }
        Ok(self
            .comp_as_mut::<BodyComp>(id)
            .is_some_and(|body| body.jump(force)))
    }

    pub fn grounded(&self, id: EntityId) -> bool {
        self.comp_as::<BodyComp>(id).is_some_and(BodyComp::grounded)
    }

    pub fn falling(&self, id: EntityId) -> bool {
        self.comp_as::<BodyComp>(id).is_some_and(BodyComp::falling)
    }

    /// Live, unpaused entities with a body.
    fn bodies(&self) -> Vec<EntityId> {
        self.entities
            .live()
            .into_iter()
            .filter(|id| !self.is_paused(*id) && self.has(*id, BodyComp::ID))
            .collect()
    }

    /// Whether the grounded body `id` still stands on `platform`, which must
    /// still be a live solid.
    fn still_on(&self, id: EntityId, platform: EntityId) -> bool {
        if !self.exists(platform) || !self.is_solid(platform) || !self.is(platform, SOLID_TAG) {
            return false;
        }
        match (self.world_area(id), self.world_area(platform)) {
            (Some(feet), Some(ground)) => {
                let probe = feet.translate(Vec2::new(0.0, GROUND_PROBE));
                probe.overlaps(&ground)
            }
            _ => false,
        }
    }
}

/// Apply gravity to airborne bodies and carry grounded ones along with
/// their platform.
pub(crate) fn integrate(scene: &mut Scene, dt: f32) {
    let gravity = scene.gravity;
    for id in scene.bodies() {
        let platform = scene.comp_as::<BodyComp>(id).and_then(|b| {
            if b.grounded {
                Some(b.cur_platform)
            } else {
                None
            }
        });

        if let Some(platform) = platform {
            let on = platform.is_some_and(|p| scene.still_on(id, p));
            let platform_pos = platform.and_then(|p| scene.pos(p));
            match (on, platform_pos) {
                (true, Some(now)) => {
                    let carry = scene
                        .comp_as_mut::<BodyComp>(id)
                        .and_then(|b| b.last_platform_pos.replace(now))
                        .map_or(Vec2::ZERO, |before| now - before);
                    if carry != Vec2::ZERO {
                        if let Some(pos) = scene.comp_as_mut::<PosComp>(id) {
                            pos.pos += carry;
                        }
                    }
                    continue;
                }
                _ => {
                    if let Some(body) = scene.comp_as_mut::<BodyComp>(id) {
                        body.leave_ground();
                    }
                }
            }
        }

        let Some(body) = scene.comp_as_mut::<BodyComp>(id) else {
            continue;
        };
        body.velocity_y = (body.velocity_y + gravity * dt).min(body.max_vel);
        let dy = body.velocity_y * dt;
        if let Some(pos) = scene.comp_as_mut::<PosComp>(id) {
            pos.pos.y += dy;
        }
    }
}

/// Push every body out of the solids it sank into. Landing on top grounds
/// it; hitting a ceiling while rising stops the rise.
pub(crate) fn resolve_bodies(scene: &mut Scene) {
    for id in scene.bodies() {
        for push in scene.push_out_all(id) {
            let platform_pos = scene.pos(push.other).unwrap_or_default();
            let Some(body) = scene.comp_as_mut::<BodyComp>(id) else {
                break;
            };
            match push.side {
                Side::Bottom if body.velocity_y >= 0.0 => {
                    if body.land(push.other, platform_pos) {
                        scene.trigger(id, events::GROUNDED, &EventArgs::Entity(push.other));
                    }
                }
                Side::Top if body.velocity_y < 0.0 => {
                    body.velocity_y = 0.0;
                    scene.trigger(id, events::HEADBUMP, &EventArgs::Entity(push.other));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::components::area::AreaComp;
    use crate::components::shape::RectComp;
    use crate::components::solid::SolidComp;
    use crate::core::scene::EntityBuilder;

    fn body(scene: &mut Scene, x: f32, y: f32) -> EntityId {
        scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(x, y))
                    .with(RectComp::new(10.0, 10.0))
                    .with(AreaComp::new())
                    .with(BodyComp::new())
                    .tag("player"),
            )
            .unwrap()
    }

    fn platform(scene: &mut Scene, x: f32, y: f32) -> EntityId {
        scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(x, y))
                    .with(RectComp::new(100.0, 10.0))
                    .with(AreaComp::new())
                    .with(SolidComp::new())
                    .tag("platform"),
            )
            .unwrap()
    }

    fn physics_step(scene: &mut Scene, dt: f32) {
        integrate(scene, dt);
        resolve_bodies(scene);
    }

    #[test]
    fn gravity_accumulates_while_airborne() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        integrate(&mut scene, 0.1);
        integrate(&mut scene, 0.1);
        let b = scene.comp_as::<BodyComp>(p).unwrap();
        assert!((b.velocity_y() - 4.0).abs() < 1e-5);
        assert!(b.falling());
        assert!((scene.pos(p).unwrap().y - 0.6).abs() < 1e-5);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let mut scene = Scene::new();
        scene.gravity = 10_000.0;
        let p = body(&mut scene, 0.0, 0.0);
        scene.comp_as_mut::<BodyComp>(p).unwrap().max_vel = 50.0;
        integrate(&mut scene, 1.0);
        assert_eq!(scene.comp_as::<BodyComp>(p).unwrap().velocity_y(), 50.0);
    }

    #[test]
    fn landing_grounds_once_and_fires_event() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        let ground = platform(&mut scene, -50.0, 10.0);
        let landed = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&landed);
        scene.on_entity(p, events::GROUNDED, move |_, _, args| l.borrow_mut().push(args.entity()));

        for _ in 0..4 {
            physics_step(&mut scene, 0.1);
        }
        assert!(scene.grounded(p));
        assert!(!scene.falling(p));
        assert_eq!(scene.comp_as::<BodyComp>(p).unwrap().cur_platform(), Some(ground));
        assert!(scene.pos(p).unwrap().abs_diff_eq(Vec2::ZERO, 1e-4));
        assert_eq!(*landed.borrow(), vec![Some(ground)]);
    }

    #[test]
    fn jump_scenario() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        platform(&mut scene, -50.0, 10.0);
        physics_step(&mut scene, 0.1);
        assert!(scene.grounded(p));

        assert_eq!(scene.jump(p, Some(10.0)), Ok(true));
        physics_step(&mut scene, 0.1);
        let b = scene.comp_as::<BodyComp>(p).unwrap();
        assert!((b.velocity_y() + 8.0).abs() < 1e-5);
        assert!(!b.grounded());
        assert_eq!(scene.jump(p, None), Ok(false));
    }

    #[test]
    fn platform_removed_drops_ground() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        let ground = platform(&mut scene, -50.0, 10.0);
        physics_step(&mut scene, 0.1);
        assert!(scene.grounded(p));
        scene.destroy(ground).unwrap();
        scene.flush();
        physics_step(&mut scene, 0.1);
        assert!(!scene.grounded(p));
        assert_eq!(scene.comp_as::<BodyComp>(p).unwrap().cur_platform(), None);
        assert!(scene.pos(p).unwrap().y > 0.0);
    }

    #[test]
    fn platform_turned_non_solid_drops_body() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        let ground = platform(&mut scene, -50.0, 10.0);
        physics_step(&mut scene, 0.1);
        assert!(scene.grounded(p));

        scene.comp_as_mut::<SolidComp>(ground).unwrap().solid = false;
        for _ in 0..5 {
            physics_step(&mut scene, 0.1);
        }
        assert!(!scene.grounded(p));
        assert_eq!(scene.comp_as::<BodyComp>(p).unwrap().cur_platform(), None);
        assert!(scene.pos(p).unwrap().y > 0.0);
    }

    #[test]
    fn detaching_solid_drops_body() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        let ground = platform(&mut scene, -50.0, 10.0);
        physics_step(&mut scene, 0.1);
        assert!(scene.grounded(p));

        assert_eq!(scene.detach(ground, "solid"), Ok(true));
        for _ in 0..5 {
            physics_step(&mut scene, 0.1);
        }
        assert!(!scene.grounded(p));
        assert!(scene.falling(p));
        assert!(scene.pos(p).unwrap().y > 0.0);
    }

    #[test]
    fn grounded_body_rides_moving_platform() {
        let mut scene = Scene::new();
        scene.gravity = 20.0;
        let p = body(&mut scene, 0.0, 0.0);
        let ground = platform(&mut scene, -50.0, 10.0);
        physics_step(&mut scene, 0.1);
        scene.comp_as_mut::<PosComp>(ground).unwrap().pos += Vec2::new(3.0, 0.0);
        physics_step(&mut scene, 0.1);
        assert!(scene.pos(p).unwrap().abs_diff_eq(Vec2::new(3.0, 0.0), 1e-4));
        assert!(scene.grounded(p));
    }

    #[test]
    fn ceiling_stops_rise() {
        let mut scene = Scene::new();
        scene.gravity = 0.0;
        let p = body(&mut scene, 0.0, 20.0);
        platform(&mut scene, -50.0, 10.0);
        let bumps = Rc::new(RefCell::new(0));
        let b = Rc::clone(&bumps);
        scene.on("headbump", "player", move |_, _, _| *b.borrow_mut() += 1);
        scene.comp_as_mut::<BodyComp>(p).unwrap().velocity_y = -20.0;
        physics_step(&mut scene, 0.1);
        assert!(scene.pos(p).unwrap().abs_diff_eq(Vec2::new(0.0, 20.0), 1e-4));
        assert_eq!(scene.comp_as::<BodyComp>(p).unwrap().velocity_y(), 0.0);
        assert_eq!(*bumps.borrow(), 1);
    }

    #[test]
    fn jump_on_stale_handle_fails() {
        let mut scene = Scene::new();
        let p = body(&mut scene, 0.0, 0.0);
        scene.destroy(p).unwrap();
        assert_eq!(scene.jump(p, None), Err(SceneError::InvalidHandle(p)));
    }
}
