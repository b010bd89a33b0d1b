//! The Drawing phase: run draw hooks in layer/z/insertion order, add the
//! debug overlays and hand the sorted command list to the renderer.

use glam::Vec2;

use crate::api::types::{events, EntityId, EventArgs};
use crate::components::visual::ShaderComp;
use crate::components::Hook;
use crate::core::debug::LogLevel;
use crate::core::scene::Scene;
use crate::math::Color;
use crate::renderer::draw::{DrawTarget, Primitive, RenderProps, ShaderBinding};
use crate::renderer::traits::{DrawTiming, FrameData, Renderer};

const INSPECT_TEXT_SIZE: f32 = 12.0;
const LOG_TEXT_SIZE: f32 = 12.0;

pub(crate) fn draw_phase(scene: &mut Scene, renderer: &mut dyn Renderer) -> DrawTiming {
    scene.draw_list.clear();

    let mut order: Vec<(usize, f32, usize, EntityId)> = scene
        .entities
        .live()
        .into_iter()
        .filter(|id| !scene.is_hidden(*id))
        .map(|id| {
            let layer = scene.layers.resolve(scene.layer_name(id));
            let seq = scene.entities.order_of(id).unwrap_or(usize::MAX);
            (layer, scene.z(id), seq, id)
        })
        .collect();
    order.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));

    for (layer, z, _, id) in order {
        if !scene.exists(id) || scene.is_hidden(id) {
            continue;
        }
        let target = DrawTarget {
            layer,
            z,
            screen_space: scene.camera.is_ignored(scene.layer_name(id)),
            shader: shader_binding(scene, id),
        };
        scene.draw_list.set_target(target);
        scene.run_hooks(id, Hook::Draw);
        scene.dispatch(events::DRAW, &[id], &EventArgs::None, false, false);
    }

    scene.draw_list.set_target(DrawTarget {
        layer: scene.layers.default_index(),
        ..Default::default()
    });
    scene.dispatch(events::DRAW, &[], &EventArgs::None, true, false);

    if scene.debug.inspect {
        draw_inspect(scene);
    }
    if scene.debug.show_log {
        draw_log(scene);
    }

    scene.draw_list.sort();
    let frame = FrameData {
        commands: scene.draw_list.commands(),
        cam_transform: scene.camera.transform(),
        width: scene.width(),
        height: scene.height(),
        clear_color: scene.clear_color,
    };
    renderer.draw(&frame)
}

fn shader_binding(scene: &Scene, id: EntityId) -> Option<ShaderBinding> {
    scene.comp_as::<ShaderComp>(id).map(|s| ShaderBinding {
        name: s.shader.clone(),
        uniform: s.uniform.clone(),
    })
}

/// Above every declared layer.
fn overlay_target(scene: &Scene, screen_space: bool) -> DrawTarget {
    DrawTarget {
        layer: scene.layers.len(),
        z: f32::MAX,
        screen_space,
        shader: None,
    }
}

/// Outline every area and describe the entity under the cursor.
fn draw_inspect(scene: &mut Scene) {
    let color = scene.inspect_color;
    let mut hovered = None;
    for id in scene.entities.live() {
        if scene.is_hidden(id) {
            continue;
        }
        let Some(area) = scene.world_area(id) else {
            continue;
        };
        let screen_space = scene.camera.is_ignored(scene.layer_name(id));
        let target = overlay_target(scene, screen_space);
        scene.draw_list.set_target(target);
        scene.draw_list.push(
            Primitive::RectStroke {
                width: area.width(),
                height: area.height(),
                line_width: 1.0,
            },
            RenderProps::at(area.p1).with_color(color),
        );
        if scene.is_hovered(id) {
            hovered = Some(id);
        }
    }

    let Some(id) = hovered else {
        return;
    };
    let mut lines = vec![id.to_string()];
    let tags = scene.tags(id);
    if !tags.is_empty() {
        lines.push(format!("tags: {}", tags.join(", ")));
    }
    if let Some(record) = scene.entities.get(id) {
        lines.extend(record.comps.iter().filter_map(|c| c.inspect()));
    }
    let pos = scene.input.mouse_pos() + Vec2::new(8.0, 8.0);
    let target = overlay_target(scene, true);
    scene.draw_list.set_target(target);
    scene.draw_list.push(
        Primitive::Text {
            text: lines.join("\n"),
            size: INSPECT_TEXT_SIZE,
            font: None,
            wrap_width: None,
        },
        RenderProps::at(pos).with_color(color),
    );
}

/// Recent log lines in the bottom-left corner, newest at the bottom.
fn draw_log(scene: &mut Scene) {
    let entries: Vec<(String, LogLevel)> = scene
        .debug
        .logs()
        .map(|e| (e.msg.clone(), e.level))
        .collect();
    if entries.is_empty() {
        return;
    }
    let target = overlay_target(scene, true);
    scene.draw_list.set_target(target);
    let line_height = LOG_TEXT_SIZE * 1.2;
    for (i, (msg, level)) in entries.into_iter().enumerate() {
        let y = scene.height() - 8.0 - (i + 1) as f32 * line_height;
        let color = match level {
            LogLevel::Info => Color::WHITE,
            LogLevel::Error => Color::RED,
        };
        scene.draw_list.push(
            Primitive::Text {
                text: msg,
                size: LOG_TEXT_SIZE,
                font: None,
                wrap_width: None,
            },
            RenderProps::at(Vec2::new(8.0, y)).with_color(color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::area::AreaComp;
    use crate::components::layer::{LayerComp, ZComp};
    use crate::components::shape::RectComp;
    use crate::components::transform::PosComp;
    use crate::core::scene::EntityBuilder;
    use crate::renderer::traits::RecordingRenderer;

    fn rect(scene: &mut Scene, w: f32, layer: Option<&str>, z: f32) -> EntityId {
        let mut b = EntityBuilder::new()
            .with(PosComp::default())
            .with(RectComp::new(w, 1.0))
            .with(ZComp::new(z));
        if let Some(layer) = layer {
            b = b.with(LayerComp::new(layer));
        }
        scene.add(b).unwrap()
    }

    fn widths(r: &RecordingRenderer) -> Vec<f32> {
        r.last()
            .unwrap()
            .iter()
            .filter_map(|c| match c.primitive {
                Primitive::Rect { width, .. } => Some(width),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn draw_order_is_layer_then_z_then_insertion() {
        let mut scene = Scene::new();
        scene.layers(&["bg", "game", "ui"], Some("game"));
        rect(&mut scene, 1.0, Some("ui"), 0.0);
        rect(&mut scene, 2.0, None, 5.0);
        rect(&mut scene, 3.0, Some("game"), 1.0);
        rect(&mut scene, 4.0, Some("bg"), 9.0);
        rect(&mut scene, 5.0, None, 1.0);
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        assert_eq!(widths(&r), vec![4.0, 3.0, 5.0, 2.0, 1.0]);
    }

    #[test]
    fn hidden_entities_are_not_drawn() {
        let mut scene = Scene::new();
        let a = rect(&mut scene, 1.0, None, 0.0);
        rect(&mut scene, 2.0, None, 0.0);
        scene.set_hidden(a, true).unwrap();
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        assert_eq!(widths(&r), vec![2.0]);
    }

    #[test]
    fn ignored_layer_draws_in_screen_space() {
        let mut scene = Scene::new();
        scene.layers(&["game", "ui"], None);
        scene.camera.ignore = vec!["ui".into()];
        rect(&mut scene, 1.0, Some("ui"), 0.0);
        rect(&mut scene, 2.0, Some("game"), 0.0);
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        let cmds = r.last().unwrap();
        assert!(!cmds[0].screen_space);
        assert!(cmds[1].screen_space);
    }

    #[test]
    fn render_callbacks_draw_after_hooks() {
        let mut scene = Scene::new();
        let id = scene
            .add(EntityBuilder::new().with(PosComp::default()).with(RectComp::new(1.0, 1.0)).tag("e"))
            .unwrap();
        scene.render("e", |scene, id| {
            let pos = scene.pos(id).unwrap_or_default();
            scene.draw_rect(pos, 7.0, 7.0, Color::RED);
        });
        scene.render_global(|scene| scene.draw_line(Vec2::ZERO, Vec2::ONE, 1.0, Color::WHITE));
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        assert_eq!(widths(&r), vec![1.0, 7.0]);
        assert_eq!(r.last().unwrap().len(), 3);
        assert!(scene.exists(id));
    }

    #[test]
    fn inspect_outlines_areas() {
        let mut scene = Scene::new();
        scene
            .add(
                EntityBuilder::new()
                    .with(PosComp::new(100.0, 100.0))
                    .with(RectComp::new(4.0, 4.0))
                    .with(AreaComp::new()),
            )
            .unwrap();
        scene.debug.inspect = true;
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        let strokes = r
            .last()
            .unwrap()
            .iter()
            .filter(|c| matches!(c.primitive, Primitive::RectStroke { .. }))
            .count();
        assert_eq!(strokes, 1);
    }

    #[test]
    fn log_lines_drawn_on_top() {
        let mut scene = Scene::new();
        scene.debug.error("boom", 0.0);
        let mut r = RecordingRenderer::default();
        scene.frame(0.0, &mut r);
        let last = r.last().unwrap().last().unwrap();
        assert!(matches!(&last.primitive, Primitive::Text { text, .. } if text == "boom"));
        assert_eq!(last.props.color, Color::RED);
        assert!(last.screen_space);
    }
}
