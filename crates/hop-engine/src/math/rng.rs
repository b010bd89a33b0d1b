//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic so that replays and tests see the same sequence.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Random float in [0, 1).
    pub fn gen(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Random float in [lo, hi).
    pub fn gen_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.gen()
    }

    /// Random vector with each axis in [lo, hi).
    pub fn gen_vec2(&mut self, lo: Vec2, hi: Vec2) -> Vec2 {
        Vec2::new(self.gen_range(lo.x, hi.x), self.gen_range(lo.y, hi.y))
    }

    /// Pick a random element. `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_int(items.len() as u32) as usize;
        items.get(idx)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.gen() < p
    }
}
