//! Axis-aligned bounding boxes and field-bound checks
//!
//! Every pairwise test in the combat passes goes through [`Rect::overlaps`].
//! Intervals are half-open, so boxes that merely touch along an edge do not
//! overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    /// Square box enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::centered(center, Vec2::splat(radius * 2.0))
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Half-open overlap test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Free-function form of [`Rect::overlaps`]
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Whether `pos` lies more than `margin` outside the playfield
pub fn outside_field(pos: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.x > FIELD_WIDTH + margin || pos.y < -margin || pos.y > FIELD_HEIGHT + margin
}

/// Clamp a box center so the whole box stays on the playfield
pub fn clamp_to_field(center: Vec2, size: Vec2) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        center.x.clamp(half.x, FIELD_WIDTH - half.x),
        center.y.clamp(half.y, FIELD_HEIGHT - half.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));

        let far = Rect::new(50.0, 50.0, 1.0, 1.0);
        assert!(!a.overlaps(&far));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), Vec2::new(32.0, 16.0));
        assert_eq!(r.x, 84.0);
        assert_eq!(r.y, 42.0);
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_outside_field() {
        assert!(!outside_field(Vec2::new(-10.0, 10.0), 50.0));
        assert!(outside_field(Vec2::new(-51.0, 10.0), 50.0));
        assert!(outside_field(Vec2::new(10.0, FIELD_HEIGHT + 60.0), 50.0));
    }

    #[test]
    fn test_clamp_to_field() {
        let p = clamp_to_field(Vec2::new(-100.0, 5000.0), Vec2::splat(32.0));
        assert_eq!(p, Vec2::new(16.0, FIELD_HEIGHT - 16.0));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn test_nonempty_rect_overlaps_itself(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 0.5f32..200.0, h in 0.5f32..200.0,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.overlaps(&r));
        }
    }
}
