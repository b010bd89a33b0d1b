use std::collections::BTreeMap;

use glam::Vec2;

use super::queue::InputEvent;
use crate::api::types::{events, EventArgs};

/// Lifecycle of a key or button across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    /// Went down this frame.
    Pressed,
    Down,
    /// Went up this frame.
    Released,
}

impl ButtonState {
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }

    fn settle(self) -> Self {
        match self {
            ButtonState::Pressed => ButtonState::Down,
            ButtonState::Released => ButtonState::Up,
            s => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Per-frame snapshot of keyboard, mouse and touch state, built from the
/// events drained out of an [`InputQueue`](super::InputQueue).
#[derive(Debug, Clone)]
pub struct InputState {
    keys: BTreeMap<String, ButtonState>,
    repeated: Vec<String>,
    chars: Vec<char>,
    mouse: ButtonState,
    mouse_pos: Vec2,
    mouse_delta: Vec2,
    mouse_moved: bool,
    touches: Vec<(TouchPhase, u64, Vec2)>,
    customs: Vec<(u32, [f32; 3])>,
    /// Mirror touches onto the mouse.
    pub touch_to_mouse: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputState {
    pub fn new(touch_to_mouse: bool) -> Self {
        Self {
            keys: BTreeMap::new(),
            repeated: Vec::new(),
            chars: Vec::new(),
            mouse: ButtonState::Up,
            mouse_pos: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            mouse_moved: false,
            touches: Vec::new(),
            customs: Vec::new(),
            touch_to_mouse,
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.move_mouse(Vec2::new(x, y));
                self.mouse = ButtonState::Pressed;
            }
            InputEvent::PointerUp { x, y } => {
                self.move_mouse(Vec2::new(x, y));
                self.mouse = ButtonState::Released;
            }
            InputEvent::PointerMove { x, y } => self.move_mouse(Vec2::new(x, y)),
            InputEvent::KeyDown { key, repeat } => {
                let state = self.keys.entry(key.clone()).or_default();
                if repeat && state.is_down() {
                    self.repeated.push(key);
                } else if !state.is_down() {
                    *state = ButtonState::Pressed;
                }
            }
            InputEvent::KeyUp { key } => {
                self.keys.insert(key, ButtonState::Released);
            }
            InputEvent::Char { ch } => self.chars.push(ch),
            InputEvent::TouchStart { id, x, y } => {
                let pos = Vec2::new(x, y);
                self.touches.push((TouchPhase::Start, id, pos));
                if self.touch_to_mouse {
                    self.move_mouse(pos);
                    self.mouse = ButtonState::Pressed;
                }
            }
            InputEvent::TouchMove { id, x, y } => {
                let pos = Vec2::new(x, y);
                self.touches.push((TouchPhase::Move, id, pos));
                if self.touch_to_mouse {
                    self.move_mouse(pos);
                }
            }
            InputEvent::TouchEnd { id, x, y } => {
                let pos = Vec2::new(x, y);
                self.touches.push((TouchPhase::End, id, pos));
                if self.touch_to_mouse {
                    self.move_mouse(pos);
                    self.mouse = ButtonState::Released;
                }
            }
            InputEvent::Custom { kind, a, b, c } => self.customs.push((kind, [a, b, c])),
        }
    }

    fn move_mouse(&mut self, pos: Vec2) {
        if pos != self.mouse_pos {
            self.mouse_delta += pos - self.mouse_pos;
            self.mouse_pos = pos;
            self.mouse_moved = true;
        }
    }

    /// Settle pressed/released states and clear per-frame data.
    pub fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            *state = state.settle();
        }
        self.keys.retain(|_, s| *s != ButtonState::Up);
        self.mouse = self.mouse.settle();
        self.repeated.clear();
        self.chars.clear();
        self.touches.clear();
        self.customs.clear();
        self.mouse_delta = Vec2::ZERO;
        self.mouse_moved = false;
    }

    fn key(&self, key: &str) -> ButtonState {
        self.keys.get(key).copied().unwrap_or_default()
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.key(key).is_down()
    }

    pub fn key_pressed(&self, key: &str) -> bool {
        self.key(key) == ButtonState::Pressed
    }

    /// Pressed this frame, or auto-repeated.
    pub fn key_pressed_rep(&self, key: &str) -> bool {
        self.key_pressed(key) || self.repeated.iter().any(|k| k == key)
    }

    pub fn key_released(&self, key: &str) -> bool {
        self.key(key) == ButtonState::Released
    }

    pub fn mouse_down(&self) -> bool {
        self.mouse.is_down()
    }

    pub fn mouse_clicked(&self) -> bool {
        self.mouse == ButtonState::Pressed
    }

    pub fn mouse_released(&self) -> bool {
        self.mouse == ButtonState::Released
    }

    /// Cursor position in screen space.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn mouse_moved(&self) -> bool {
        self.mouse_moved
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Global events to publish for this frame's input, in a fixed order.
    pub(crate) fn frame_events(&self) -> Vec<(&'static str, EventArgs)> {
        let mut out = Vec::new();
        for (key, state) in &self.keys {
            let args = || EventArgs::Key(key.clone());
            if *state == ButtonState::Pressed {
                out.push((events::KEY_PRESS, args()));
                out.push((events::KEY_PRESS_REP, args()));
            }
            if state.is_down() {
                out.push((events::KEY_DOWN, args()));
            }
            if *state == ButtonState::Released {
                out.push((events::KEY_RELEASE, args()));
            }
        }
        for key in &self.repeated {
            if !self.key_pressed(key) {
                out.push((events::KEY_PRESS_REP, EventArgs::Key(key.clone())));
            }
        }
        for ch in &self.chars {
            out.push((events::CHAR_INPUT, EventArgs::Char(*ch)));
        }
        let pos = EventArgs::Point(self.mouse_pos);
        if self.mouse_moved {
            out.push((events::MOUSE_MOVE, pos.clone()));
        }
        match self.mouse {
            ButtonState::Pressed => {
                out.push((events::MOUSE_CLICK, pos.clone()));
                out.push((events::MOUSE_DOWN, pos));
            }
            ButtonState::Down => out.push((events::MOUSE_DOWN, pos)),
            ButtonState::Released => out.push((events::MOUSE_RELEASE, pos)),
            ButtonState::Up => {}
        }
        for (phase, id, pos) in &self.touches {
            let name = match phase {
                TouchPhase::Start => events::TOUCH_START,
                TouchPhase::Move => events::TOUCH_MOVE,
                TouchPhase::End => events::TOUCH_END,
            };
            out.push((name, EventArgs::Touch { id: *id, pos: *pos }));
        }
        for (kind, [a, b, c]) in &self.customs {
            out.push((
                events::CUSTOM,
                EventArgs::Data(serde_json::json!({ "kind": kind, "a": a, "b": b, "c": c })),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(key: &str) -> InputEvent {
        InputEvent::KeyDown { key: key.into(), repeat: false }
    }

    #[test]
    fn key_lifecycle() {
        let mut input = InputState::default();
        input.apply(key_down("a"));
        assert!(input.key_pressed("a"));
        assert!(input.key_down("a"));
        input.end_frame();
        assert!(!input.key_pressed("a"));
        assert!(input.key_down("a"));
        input.apply(InputEvent::KeyUp { key: "a".into() });
        assert!(input.key_released("a"));
        input.end_frame();
        assert!(!input.key_down("a"));
        assert!(!input.key_released("a"));
    }

    #[test]
    fn repeat_only_counts_for_held_keys() {
        let mut input = InputState::default();
        input.apply(key_down("a"));
        input.end_frame();
        input.apply(InputEvent::KeyDown { key: "a".into(), repeat: true });
        assert!(input.key_pressed_rep("a"));
        assert!(!input.key_pressed("a"));
        let names: Vec<_> = input.frame_events().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&events::KEY_PRESS_REP));
        assert!(!names.contains(&events::KEY_PRESS));
    }

    #[test]
    fn click_publishes_click_and_down() {
        let mut input = InputState::default();
        input.apply(InputEvent::PointerDown { x: 3.0, y: 4.0 });
        let evs = input.frame_events();
        assert_eq!(evs[0], (events::MOUSE_MOVE, EventArgs::Point(Vec2::new(3.0, 4.0))));
        assert_eq!(evs[1].0, events::MOUSE_CLICK);
        assert_eq!(evs[2].0, events::MOUSE_DOWN);
        assert_eq!(input.mouse_delta(), Vec2::new(3.0, 4.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert!(input.mouse_down());
        assert!(!input.mouse_clicked());
    }

    #[test]
    fn touch_mirrors_mouse_when_enabled() {
        let mut input = InputState::new(true);
        input.apply(InputEvent::TouchStart { id: 1, x: 5.0, y: 5.0 });
        assert!(input.mouse_clicked());

        let mut input = InputState::new(false);
        input.apply(InputEvent::TouchStart { id: 1, x: 5.0, y: 5.0 });
        assert!(!input.mouse_clicked());
        assert_eq!(
            input.frame_events(),
            vec![(events::TOUCH_START, EventArgs::Touch { id: 1, pos: Vec2::new(5.0, 5.0) })]
        );
    }

    #[test]
    fn chars_and_customs_are_per_frame() {
        let mut input = InputState::default();
        input.apply(InputEvent::Char { ch: 'x' });
        input.apply(InputEvent::Custom { kind: 2, a: 0.0, b: 0.0, c: 0.0 });
        assert_eq!(input.chars(), &['x']);
        assert_eq!(input.frame_events().len(), 2);
        input.end_frame();
        assert!(input.chars().is_empty());
        assert!(input.frame_events().is_empty());
    }
}
