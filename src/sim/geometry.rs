//! Axis-aligned rectangle primitives
//!
//! Overlap tests and minimum-translation-vector (MTV) separation. Everything
//! in the world that collides is an axis-aligned box, so this is the only
//! geometry the resolver needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::from_pos_size(center - size / 2.0, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.w / 2.0, self.h / 2.0)
    }

    /// Non-negative, finite extents
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) && self.w >= 0.0 && self.h >= 0.0
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }

    /// Strict overlap; rectangles sharing only an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// Strict AABB overlap test (symmetric, edge contact is not overlap)
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Separating axis chosen by the MTV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Minimum translation that separates a moving box from a fixed one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mtv {
    pub axis: Axis,
    /// Overlap depth along `axis` (always > 0)
    pub depth: f32,
    /// Direction the mover must travel along `axis` (-1 or +1)
    pub sign: f32,
}

impl Mtv {
    /// Signed displacement along the separating axis
    pub fn offset(&self) -> Vec2 {
        match self.axis {
            Axis::Horizontal => Vec2::new(self.depth * self.sign, 0.0),
            Axis::Vertical => Vec2::new(0.0, self.depth * self.sign),
        }
    }

    /// Mover was pushed up, i.e. it is standing on the fixed box
    pub fn is_landing(&self) -> bool {
        self.axis == Axis::Vertical && self.sign < 0.0
    }

    /// Mover was pushed down out of the fixed box's underside
    pub fn is_ceiling(&self) -> bool {
        self.axis == Axis::Vertical && self.sign > 0.0
    }
}

/// Compute the MTV pushing `mover` out of `fixed`, or `None` when they don't overlap.
///
/// The axis with the smaller overlap separates them. Equal overlaps (pure
/// corner contact) resolve vertically so a corner never registers as a wall.
pub fn mtv(mover: &Rect, fixed: &Rect) -> Option<Mtv> {
    if !intersects(mover, fixed) {
        return None;
    }

    let d = mover.center() - fixed.center();
    let reach = mover.half_extents() + fixed.half_extents();
    let overlap_x = reach.x - d.x.abs();
    let overlap_y = reach.y - d.y.abs();

    let result = if overlap_y <= overlap_x {
        Mtv {
            axis: Axis::Vertical,
            depth: overlap_y,
            // Centers level or mover above: land on top
            sign: if d.y <= 0.0 { -1.0 } else { 1.0 },
        }
    } else {
        Mtv {
            axis: Axis::Horizontal,
            depth: overlap_x,
            sign: if d.x < 0.0 { -1.0 } else { 1.0 },
        }
    };
    Some(result)
}

/// Place `mover` flush against `fixed` on the side chosen by `mtv`.
///
/// Snaps to the touching edge instead of adding the depth, so the boxes end
/// up sharing exactly one edge.
pub fn separate(mover: &Rect, fixed: &Rect, mtv: &Mtv) -> Rect {
    let mut out = *mover;
    match (mtv.axis, mtv.sign < 0.0) {
        (Axis::Vertical, true) => out.y = fixed.y - mover.h,
        (Axis::Vertical, false) => out.y = fixed.bottom(),
        (Axis::Horizontal, true) => out.x = fixed.x - mover.w,
        (Axis::Horizontal, false) => out.x = fixed.right(),
    }
    out
}
