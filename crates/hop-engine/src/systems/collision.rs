//! Area queries, push-out and the per-frame resolver for collide, overlap,
//! click and hover registrations.

use std::rc::Rc;

use glam::Vec2;

use crate::api::types::{EntityId, EventArgs};
use crate::components::area::{AreaComp, AreaKey};
use crate::components::solid::{SolidComp, SOLID_TAG};
use crate::components::transform::{OriginComp, PosComp, ScaleComp};
use crate::core::events::{EventCanceller, Handler, Scope, Subscription};
use crate::core::scene::Scene;
use crate::math::{Rect, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialKind {
    /// Areas touch or overlap (closed test).
    Collide,
    /// Areas overlap strictly.
    Overlap,
    /// Clicked this frame while under the cursor.
    Click,
    /// Under the cursor.
    Hover,
}

impl SpatialKind {
    fn name(self) -> &'static str {
        match self {
            SpatialKind::Collide => "collide",
            SpatialKind::Overlap => "overlap",
            SpatialKind::Click => "click",
            SpatialKind::Hover => "hover",
        }
    }
}

pub(crate) struct SpatialSub {
    kind: SpatialKind,
    /// Tag of the partner group, for pair kinds.
    other: Option<String>,
    sub: Subscription,
}

/// Spatial registrations, checked once per frame in registration order.
#[derive(Default)]
pub struct SpatialSubs {
    subs: Vec<Rc<SpatialSub>>,
}

impl SpatialSubs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(
        &mut self,
        kind: SpatialKind,
        scope: Scope,
        other: Option<&str>,
        handler: Box<Handler>,
    ) -> EventCanceller {
        let (sub, canceller) = Subscription::new(scope, handler);
        self.subs.push(Rc::new(SpatialSub {
            kind,
            other: other.map(str::to_string),
            sub,
        }));
        canceller
    }

    fn snapshot(&mut self) -> Vec<Rc<SpatialSub>> {
        self.subs.retain(|s| !s.sub.is_cancelled());
        self.subs.clone()
    }

    pub fn cancel_entity(&mut self, id: EntityId) {
        self.subs.retain(|s| {
            if s.sub.scope == Scope::Entity(id) {
                s.sub.cancel();
                false
            } else {
                true
            }
        });
    }

    pub fn len(&self) -> usize {
        self.subs.iter().filter(|s| !s.sub.is_cancelled()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of pushing one entity out of another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushOut {
    pub moved: EntityId,
    pub other: EntityId,
    /// Side of `moved` that was in contact. `Bottom` means it was lifted.
    pub side: Side,
    pub dis: f32,
}

impl Scene {
    /// World-space area of `id`, if it has one that can be sized.
    pub fn world_area(&self, id: EntityId) -> Option<Rect> {
        let comps = &self.entities.get(id)?.comps;
        let area = comps.get_as::<AreaComp>()?;
        let key = AreaKey {
            pos: comps.get_as::<PosComp>()?.pos,
            scale: comps.get_as::<ScaleComp>().map_or(Vec2::ONE, |s| s.scale),
            origin: comps.get_as::<OriginComp>().map(|o| o.origin).unwrap_or_default(),
            size: comps.iter().find_map(|c| c.size()),
        };
        area.world_area(key)
    }

    /// Closed point containment.
    pub fn has_pt(&self, id: EntityId, pt: Vec2) -> bool {
        self.world_area(id).is_some_and(|r| r.has_pt(pt))
    }

    /// Areas touch or overlap.
    pub fn is_collided(&self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        match (self.world_area(a), self.world_area(b)) {
            (Some(ra), Some(rb)) => ra.collides(&rb),
            _ => false,
        }
    }

    /// Areas overlap strictly. Touching edges do not count.
    pub fn is_overlapped(&self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        match (self.world_area(a), self.world_area(b)) {
            (Some(ra), Some(rb)) => ra.overlaps(&rb),
            _ => false,
        }
    }

    /// The cursor, as seen from the entity's layer, is inside its area.
    pub fn is_hovered(&self, id: EntityId) -> bool {
        let pt = self.mouse_pos_in(self.layer_name(id));
        self.has_pt(id, pt)
    }

    pub fn is_clicked(&self, id: EntityId) -> bool {
        self.input.mouse_clicked() && self.is_hovered(id)
    }

    pub fn is_solid(&self, id: EntityId) -> bool {
        self.comp_as::<SolidComp>(id).is_some_and(|s| s.solid)
    }

    /// Move `moved` out of `other` along the shallowest side and return what
    /// happened. `None` if they do not overlap or either has no area.
    pub fn push_out(&mut self, moved: EntityId, other: EntityId) -> Option<PushOut> {
        if moved == other {
            return None;
        }
        let pen = self.world_area(moved)?.push_out(&self.world_area(other)?)?;
        self.comp_as_mut::<PosComp>(moved)?.pos += pen.delta;
        Some(PushOut {
            moved,
            other,
            side: pen.side,
            dis: pen.dis,
        })
    }

    /// Push `moved` out of every solid entity in turn. Each push is applied
    /// before the next solid is tested.
    pub fn push_out_all(&mut self, moved: EntityId) -> Vec<PushOut> {
        let mut out = Vec::new();
        for other in self.query(Some(SOLID_TAG)) {
            if !self.exists(moved) {
                break;
            }
            if !self.exists(other) || !self.is_solid(other) {
                continue;
            }
            if let Some(p) = self.push_out(moved, other) {
                out.push(p);
            }
        }
        out
    }

    // -- Registrations --

    fn pair_handler(mut f: impl FnMut(&mut Scene, EntityId, EntityId) + 'static) -> Box<Handler> {
        Box::new(move |scene, id, args| {
            if let (Some(a), Some(b)) = (id, args.entity()) {
                f(scene, a, b)
            }
        })
    }

    fn point_handler(mut f: impl FnMut(&mut Scene, EntityId) + 'static) -> Box<Handler> {
        Box::new(move |scene, id, _| {
            if let Some(id) = id {
                f(scene, id)
            }
        })
    }

    /// Every frame an entity tagged `tag` touches one tagged `other`.
    pub fn collides(
        &mut self,
        tag: &str,
        other: &str,
        f: impl FnMut(&mut Scene, EntityId, EntityId) + 'static,
    ) -> EventCanceller {
        let scope = Scope::Tag(tag.to_string());
        self.spatial
            .register(SpatialKind::Collide, scope, Some(other), Self::pair_handler(f))
    }

    pub fn overlaps(
        &mut self,
        tag: &str,
        other: &str,
        f: impl FnMut(&mut Scene, EntityId, EntityId) + 'static,
    ) -> EventCanceller {
        let scope = Scope::Tag(tag.to_string());
        self.spatial
            .register(SpatialKind::Overlap, scope, Some(other), Self::pair_handler(f))
    }

    pub fn clicks(&mut self, tag: &str, f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        let scope = Scope::Tag(tag.to_string());
        self.spatial
            .register(SpatialKind::Click, scope, None, Self::point_handler(f))
    }

    pub fn hovers(&mut self, tag: &str, f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        let scope = Scope::Tag(tag.to_string());
        self.spatial
            .register(SpatialKind::Hover, scope, None, Self::point_handler(f))
    }

    pub fn on_collide(
        &mut self,
        id: EntityId,
        other: &str,
        f: impl FnMut(&mut Scene, EntityId, EntityId) + 'static,
    ) -> EventCanceller {
        self.spatial
            .register(SpatialKind::Collide, Scope::Entity(id), Some(other), Self::pair_handler(f))
    }

    pub fn on_overlap(
        &mut self,
        id: EntityId,
        other: &str,
        f: impl FnMut(&mut Scene, EntityId, EntityId) + 'static,
    ) -> EventCanceller {
        self.spatial
            .register(SpatialKind::Overlap, Scope::Entity(id), Some(other), Self::pair_handler(f))
    }

    pub fn on_click(&mut self, id: EntityId, f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        self.spatial
            .register(SpatialKind::Click, Scope::Entity(id), None, Self::point_handler(f))
    }

    pub fn on_hover(&mut self, id: EntityId, f: impl FnMut(&mut Scene, EntityId) + 'static) -> EventCanceller {
        self.spatial
            .register(SpatialKind::Hover, Scope::Entity(id), None, Self::point_handler(f))
    }

    /// Live, unpaused entities a registration applies to.
    fn spatial_candidates(&self, scope: &Scope) -> Vec<EntityId> {
        let ids = match scope {
            Scope::Global => self.query(None),
            Scope::Tag(tag) => self.query(Some(tag)),
            Scope::Entity(id) => vec![*id],
        };
        ids.into_iter().filter(|id| self.is_live_unpaused(*id)).collect()
    }

    fn is_live_unpaused(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|r| !r.paused)
    }
}

/// Run every spatial registration against the current areas.
pub(crate) fn resolve_spatial(scene: &mut Scene) {
    for reg in scene.spatial.snapshot() {
        let kind = reg.kind;
        let sub = &reg.sub;
        let event = kind.name();
        for a in scene.spatial_candidates(&sub.scope) {
            if sub.is_cancelled() {
                break;
            }
            match (kind, reg.other.as_deref()) {
                (SpatialKind::Collide | SpatialKind::Overlap, Some(other)) => {
                    for b in scene.query(Some(other)) {
                        if sub.is_cancelled() || !scene.is_live_unpaused(a) {
                            break;
                        }
                        if a == b || !scene.is_live_unpaused(b) {
                            continue;
                        }
                        let hit = match kind {
                            SpatialKind::Collide => scene.is_collided(a, b),
                            _ => scene.is_overlapped(a, b),
                        };
                        if hit {
                            sub.invoke(scene, Some(a), &EventArgs::Entity(b), event);
                        }
                    }
                }
                (SpatialKind::Click | SpatialKind::Hover, _) => {
                    if !scene.is_live_unpaused(a) {
                        continue;
                    }
                    let hit = match kind {
                        SpatialKind::Click => scene.is_clicked(a),
                        _ => scene.is_hovered(a),
                    };
                    if hit {
                        let pt = scene.mouse_pos_in(scene.layer_name(a));
                        sub.invoke(scene, Some(a), &EventArgs::Point(pt), event);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::components::shape::RectComp;
    use crate::core::scene::EntityBuilder;
    use crate::input::InputEvent;
    use crate::renderer::traits::RecordingRenderer;

    fn boxed(scene: &mut Scene, x: f32, y: f32, w: f32, h: f32, tag: &str) -> EntityId {
        scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(x, y))
                    .with(RectComp::new(w, h))
                    .with(AreaComp::new())
                    .tag(tag),
            )
            .unwrap()
    }

    #[test]
    fn edge_contact_collides_but_does_not_overlap() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "a");
        let b = boxed(&mut scene, 10.0, 0.0, 10.0, 10.0, "b");
        assert!(scene.is_collided(a, b));
        assert!(!scene.is_overlapped(a, b));
        assert!(!scene.is_collided(a, a));
    }

    #[test]
    fn has_pt_is_closed() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "a");
        assert!(scene.has_pt(a, Vec2::new(10.0, 10.0)));
        assert!(!scene.has_pt(a, Vec2::new(10.5, 10.0)));
    }

    #[test]
    fn area_follows_position_changes() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "a");
        assert_eq!(scene.world_area(a), Some(Rect::from_size(Vec2::ZERO, 10.0, 10.0)));
        scene.comp_as_mut::<PosComp>(a).unwrap().pos = Vec2::new(5.0, 5.0);
        assert_eq!(
            scene.world_area(a),
            Some(Rect::from_size(Vec2::new(5.0, 5.0), 10.0, 10.0))
        );
    }

    #[test]
    fn rotation_leaves_area_axis_aligned() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 4.0, "a");
        scene.attach(a, crate::components::transform::RotateComp::new(1.2)).unwrap();
        assert_eq!(scene.world_area(a), Some(Rect::from_size(Vec2::ZERO, 10.0, 4.0)));
    }

    #[test]
    fn push_out_separates_and_second_push_is_noop() {
        let mut scene = Scene::new();
        let mover = boxed(&mut scene, 0.0, 8.0, 10.0, 10.0, "m");
        let floor = boxed(&mut scene, -20.0, 15.0, 50.0, 10.0, "f");
        let p = scene.push_out(mover, floor).unwrap();
        assert_eq!(p.side, Side::Bottom);
        assert_eq!(p.dis, 3.0);
        assert_eq!(scene.pos(mover), Some(Vec2::new(0.0, 5.0)));
        assert!(!scene.is_overlapped(mover, floor));
        assert!(scene.push_out(mover, floor).is_none());
        assert!(scene.push_out(mover, mover).is_none());
    }

    #[test]
    fn push_out_all_is_sequential_over_solids() {
        let mut scene = Scene::new();
        let mover = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "m");
        let w1 = boxed(&mut scene, 8.0, -20.0, 10.0, 50.0, "wall");
        let w2 = boxed(&mut scene, 5.0, -20.0, 10.0, 50.0, "wall");
        scene.attach(w1, SolidComp::new()).unwrap();
        scene.attach(w2, SolidComp::new()).unwrap();
        let pushes = scene.push_out_all(mover);
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].other, w1);
        assert_eq!(pushes[0].side, Side::Right);
        assert_eq!(pushes[1].other, w2);
        assert_eq!(scene.pos(mover), Some(Vec2::new(-5.0, 0.0)));
    }

    #[test]
    fn non_solid_flag_is_skipped() {
        let mut scene = Scene::new();
        let mover = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "m");
        let w = boxed(&mut scene, 5.0, 0.0, 10.0, 10.0, "wall");
        let mut solid = SolidComp::new();
        solid.solid = false;
        scene.attach(w, solid).unwrap();
        assert!(scene.push_out_all(mover).is_empty());
    }

    #[test]
    fn collide_pairs_fire_per_frame_without_self_pairs() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "e");
        let b = boxed(&mut scene, 5.0, 0.0, 10.0, 10.0, "e");
        boxed(&mut scene, 100.0, 0.0, 10.0, 10.0, "e");
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = Rc::clone(&hits);
        scene.collides("e", "e", move |_, x, y| h.borrow_mut().push((x, y)));
        let mut r = RecordingRenderer::default();
        scene.frame(0.1, &mut r);
        assert_eq!(*hits.borrow(), vec![(a, b), (b, a)]);
    }

    #[test]
    fn panicking_pair_callback_does_not_stop_resolve() {
        let mut scene = Scene::new();
        boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "player");
        boxed(&mut scene, 5.0, 0.0, 10.0, 10.0, "coin");
        scene.collides("player", "coin", |_, _, _| panic!("bad pair callback"));
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        scene.collides("player", "coin", move |_, _, _| *h.borrow_mut() += 1);
        let mut r = RecordingRenderer::default();
        scene.frame(0.1, &mut r);
        scene.frame(0.1, &mut r);
        assert_eq!(*hits.borrow(), 2);
        assert_eq!(r.frames.len(), 2);
        assert_eq!(scene.phase(), crate::core::frame::FramePhase::Idle);
    }

    #[test]
    fn destroyed_partner_is_skipped_mid_resolve() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "player");
        boxed(&mut scene, 5.0, 0.0, 10.0, 10.0, "coin");
        boxed(&mut scene, 6.0, 0.0, 10.0, 10.0, "coin");
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        scene.on_collide(a, "coin", move |scene, _, _coin| {
            *h.borrow_mut() += 1;
            scene.destroy_all("coin");
        });
        let mut r = RecordingRenderer::default();
        scene.frame(0.1, &mut r);
        assert_eq!(*hits.borrow(), 1);
        assert!(scene.query(Some("coin")).is_empty());
    }

    #[test]
    fn click_and_hover_use_cursor() {
        let mut scene = Scene::new();
        let button = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "button");
        let clicks = Rc::new(RefCell::new(0));
        let hovers = Rc::new(RefCell::new(0));
        let (c, h) = (Rc::clone(&clicks), Rc::clone(&hovers));
        scene.clicks("button", move |_, _| *c.borrow_mut() += 1);
        let canceller = scene.on_hover(button, move |_, _| *h.borrow_mut() += 1);

        let mut r = RecordingRenderer::default();
        let center = scene.camera.to_screen(Vec2::new(5.0, 5.0));
        scene.push_input(InputEvent::PointerDown { x: center.x, y: center.y });
        scene.frame(0.1, &mut r);
        assert!(scene.is_hovered(button));
        assert_eq!(*clicks.borrow(), 1);
        assert_eq!(*hovers.borrow(), 1);

        canceller.cancel();
        scene.frame(0.1, &mut r);
        assert_eq!(*clicks.borrow(), 1);
        assert_eq!(*hovers.borrow(), 1);
    }

    #[test]
    fn entity_registrations_dropped_at_flush() {
        let mut scene = Scene::new();
        let a = boxed(&mut scene, 0.0, 0.0, 10.0, 10.0, "a");
        let c = scene.on_hover(a, |_, _| {});
        assert_eq!(scene.spatial.len(), 1);
        scene.destroy(a).unwrap();
        scene.flush();
        assert!(c.is_cancelled());
        assert!(scene.spatial.is_empty());
    }
}
