use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as its min (`p1`) and max (`p2`) corners.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rect {
    pub p1: Vec2,
    pub p2: Vec2,
}

/// Which side of the moved rectangle was in contact when it got pushed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Minimal translation that separates two overlapping rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub side: Side,
    /// Penetration depth, always positive.
    pub dis: f32,
    /// Translation to apply to the moved rectangle.
    pub delta: Vec2,
}

impl Rect {
    /// Build from two arbitrary corners. The corners are normalized so that
    /// `p1` is the minimum and `p2` the maximum.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            p1: a.min(b),
            p2: a.max(b),
        }
    }

    /// Rectangle with its top-left corner at `pos`.
    pub fn from_size(pos: Vec2, width: f32, height: f32) -> Self {
        Self::new(pos, pos + Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.p2.x - self.p1.x
    }

    pub fn height(&self) -> f32 {
        self.p2.y - self.p1.y
    }

    pub fn center(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            p1: self.p1 + delta,
            p2: self.p2 + delta,
        }
    }

    /// Closed-interval containment: points on the edge count as inside.
    pub fn has_pt(&self, pt: Vec2) -> bool {
        self.p1.x <= pt.x && pt.x <= self.p2.x && self.p1.y <= pt.y && pt.y <= self.p2.y
    }

    /// Strict overlap: rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.p1.x < other.p2.x
            && other.p1.x < self.p2.x
            && self.p1.y < other.p2.y
            && other.p1.y < self.p2.y
    }

    /// Closed collision test: touching edges count.
    pub fn collides(&self, other: &Rect) -> bool {
        self.p1.x <= other.p2.x
            && other.p1.x <= self.p2.x
            && self.p1.y <= other.p2.y
            && other.p1.y <= self.p2.y
    }

    /// Compute how to move `self` out of `other`.
    ///
    /// Returns `None` when the two do not overlap. Otherwise picks the side
    /// with the smallest penetration; ties go to top, bottom, left, right in
    /// that order. Y grows downward, so `Side::Bottom` means `self` is lifted.
    pub fn push_out(&self, other: &Rect) -> Option<Penetration> {
        if !self.overlaps(other) {
            return None;
        }

        let candidates = [
            (Side::Top, other.p2.y - self.p1.y, Vec2::Y),
            (Side::Bottom, self.p2.y - other.p1.y, Vec2::NEG_Y),
            (Side::Left, other.p2.x - self.p1.x, Vec2::X),
            (Side::Right, self.p2.x - other.p1.x, Vec2::NEG_X),
        ];

        let mut best = candidates[0];
        for cand in &candidates[1..] {
            if cand.1 < best.1 {
                best = *cand;
            }
        }

        let (side, dis, dir) = best;
        Some(Penetration {
            side,
            dis,
            delta: dir * dis,
        })
    }
}
