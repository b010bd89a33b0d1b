use std::collections::VecDeque;

use crate::core::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub msg: String,
    /// Scene time when it was logged.
    pub time: f32,
}

/// Runtime debug switches and frame statistics.
#[derive(Debug, Clone)]
pub struct DebugState {
    /// Freeze everything but drawing.
    pub paused: bool,
    /// Outline areas and show the hovered entity's info.
    pub inspect: bool,
    pub time_scale: f32,
    pub show_log: bool,
    /// Whether the developer keys are live.
    pub(crate) keys: bool,
    step: bool,
    log: VecDeque<LogEntry>,
    log_max: usize,
    fps: f32,
    obj_count: usize,
    draw_calls: usize,
}

impl Default for DebugState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DebugState {
    pub fn new(log_max: usize) -> Self {
        Self {
            paused: false,
            inspect: false,
            time_scale: 1.0,
            show_log: true,
            keys: false,
            step: false,
            log: VecDeque::new(),
            log_max,
            fps: 0.0,
            obj_count: 0,
            draw_calls: 0,
        }
    }

    pub fn log(&mut self, msg: impl Into<String>, time: f32) {
        let msg = msg.into();
        log::info!("{}", msg);
        self.push(LogLevel::Info, msg, time);
    }

    pub fn error(&mut self, msg: impl Into<String>, time: f32) {
        let msg = msg.into();
        log::error!("{}", msg);
        self.push(LogLevel::Error, msg, time);
    }

    fn push(&mut self, level: LogLevel, msg: String, time: f32) {
        self.log.push_front(LogEntry { level, msg, time });
        self.log.truncate(self.log_max);
    }

    /// Newest first.
    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn set_log_max(&mut self, log_max: usize) {
        self.log_max = log_max;
        self.log.truncate(log_max);
    }

    /// Run exactly one frame while paused.
    pub fn step_frame(&mut self) {
        self.step = true;
    }

    pub(crate) fn take_step(&mut self) -> bool {
        std::mem::take(&mut self.step)
    }

    pub(crate) fn record_frame(&mut self, real_dt: f32, obj_count: usize, draw_calls: usize) {
        if real_dt > 0.0 {
            self.fps = 1.0 / real_dt;
        }
        self.obj_count = obj_count;
        self.draw_calls = draw_calls;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn obj_count(&self) -> usize {
        self.obj_count
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }
}

/// Developer keys, checked every frame even while paused: F1 inspect,
/// F2 clear log, F7/F9 slow down and speed up, F8 pause, F10 single step.
pub(crate) fn poll_keys(scene: &mut Scene) {
    if !scene.debug.keys {
        return;
    }
    let time = scene.time();
    let input = &scene.input;
    let debug = &mut scene.debug;
    if input.key_pressed("f1") {
        debug.inspect = !debug.inspect;
    }
    if input.key_pressed("f2") {
        debug.clear_log();
    }
    if input.key_pressed("f7") {
        debug.time_scale = (debug.time_scale - 0.2).max(0.0);
        debug.log(format!("time scale: {:.1}", debug.time_scale), time);
    }
    if input.key_pressed("f9") {
        debug.time_scale = (debug.time_scale + 0.2).min(2.0);
        debug.log(format!("time scale: {:.1}", debug.time_scale), time);
    }
    if input.key_pressed("f8") {
        debug.paused = !debug.paused;
        debug.log(if debug.paused { "paused" } else { "unpaused" }, time);
    }
    if input.key_pressed("f10") {
        debug.step_frame();
    }
}
