pub mod color;
pub mod rect;
pub mod rng;

pub use color::{Color, Quad};
pub use rect::{Penetration, Rect, Side};
pub use rng::Rng;

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Map `v` from [l1, h1] to [l2, h2].
pub fn map(v: f32, l1: f32, h1: f32, l2: f32, h2: f32) -> f32 {
    l2 + (v - l1) / (h1 - l1) * (h2 - l2)
}

/// Like [`map`] but clamped to the destination range.
pub fn mapc(v: f32, l1: f32, h1: f32, l2: f32, h2: f32) -> f32 {
    let (lo, hi) = if l2 <= h2 { (l2, h2) } else { (h2, l2) };
    map(v, l1, h1, l2, h2).clamp(lo, hi)
}

/// Sine oscillation between `lo` and `hi` over time `t`.
pub fn wave(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (t.sin() + 1.0) / 2.0 * (hi - lo)
}

pub fn deg2rad(deg: f32) -> f32 {
    deg.to_radians()
}

pub fn rad2deg(rad: f32) -> f32 {
    rad.to_degrees()
}
