use std::cell::Cell;
use std::rc::Rc;

use crate::core::error::isolate;
use crate::core::events::EventCanceller;
use crate::core::scene::Scene;

pub type TimerFn = dyn FnMut(&mut Scene);

struct Timer {
    remaining: f32,
    /// Re-arm interval for repeating timers.
    interval: Option<f32>,
    callback: Box<TimerFn>,
    cancelled: Rc<Cell<bool>>,
}

/// One-shot and repeating timers, ticked once per update.
#[derive(Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `callback` once, `secs` from now.
    pub fn wait(&mut self, secs: f32, callback: Box<TimerFn>) -> EventCanceller {
        self.push(secs, None, callback)
    }

    /// Fire `callback` on the next tick, then every `secs`.
    pub fn loop_every(&mut self, secs: f32, callback: Box<TimerFn>) -> EventCanceller {
        self.push(0.0, Some(secs), callback)
    }

    fn push(&mut self, remaining: f32, interval: Option<f32>, callback: Box<TimerFn>) -> EventCanceller {
        let canceller = EventCanceller::new();
        self.timers.push(Timer {
            remaining,
            interval,
            callback,
            cancelled: canceller.flag(),
        });
        canceller
    }

    /// Number of timers still armed.
    pub fn len(&self) -> usize {
        self.timers.iter().filter(|t| !t.cancelled.get()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Advance every timer of `scene` by `dt`, firing the ones that are due.
/// Timers created by callbacks start ticking on the next call.
pub(crate) fn tick(scene: &mut Scene, dt: f32) {
    let mut timers = std::mem::take(&mut scene.timers.timers);
    for timer in timers.iter_mut() {
        if timer.cancelled.get() {
            continue;
        }
        timer.remaining -= dt;
        if timer.remaining > 0.0 {
            continue;
        }
        match timer.interval {
            Some(interval) => timer.remaining += interval.max(f32::EPSILON),
            None => timer.cancelled.set(true),
        }
        isolate(&|| "timer".to_string(), || (timer.callback)(scene));
    }
    timers.retain(|t| !t.cancelled.get());
    timers.append(&mut scene.timers.timers);
    scene.timers.timers = timers;
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Box<TimerFn>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, Box::new(move |_| c.set(c.get() + 1)))
    }

    #[test]
    fn wait_fires_once_after_delay() {
        let mut scene = Scene::new();
        let (count, cb) = counter();
        scene.timers.wait(0.25, cb);
        tick(&mut scene, 0.1);
        tick(&mut scene, 0.1);
        assert_eq!(count.get(), 0);
        tick(&mut scene, 0.1);
        assert_eq!(count.get(), 1);
        tick(&mut scene, 1.0);
        assert_eq!(count.get(), 1);
        assert!(scene.timers.is_empty());
    }

    #[test]
    fn loop_fires_next_tick_then_every_interval() {
        let mut scene = Scene::new();
        let (count, cb) = counter();
        let c = scene.timers.loop_every(0.5, cb);
        tick(&mut scene, 0.1);
        assert_eq!(count.get(), 1);
        for _ in 0..5 {
            tick(&mut scene, 0.1);
        }
        assert_eq!(count.get(), 2);
        c.cancel();
        tick(&mut scene, 1.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn timers_added_from_callbacks_wait_for_next_tick() {
        let mut scene = Scene::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let f = Rc::clone(&fired);
        scene.timers.wait(
            0.0,
            Box::new(move |scene| {
                f.borrow_mut().push("outer");
                let f = Rc::clone(&f);
                scene.timers.wait(0.0, Box::new(move |_| f.borrow_mut().push("inner")));
            }),
        );
        tick(&mut scene, 0.1);
        assert_eq!(*fired.borrow(), vec!["outer"]);
        tick(&mut scene, 0.1);
        assert_eq!(*fired.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn panicking_timer_is_contained() {
        let mut scene = Scene::new();
        scene.timers.wait(0.0, Box::new(|_| panic!("bad timer")));
        let (count, cb) = counter();
        scene.timers.wait(0.0, cb);
        tick(&mut scene, 0.1);
        assert_eq!(count.get(), 1);
    }
}
