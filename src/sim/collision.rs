//! Axis-aligned collision tests
//!
//! Everything in the world is a box. Overlap is discrete and per-tick; there
//! is no swept test, so very fast movers can skip thin targets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict horizontal extent overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Strict overlap on both axes (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// True when `pos` lies outside `[0, width] x [0, height]` on any edge
#[inline]
pub fn out_of_world(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
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
    fn test_needs_both_axes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Same columns, different rows
        let b = Rect::new(2.0, 50.0, 4.0, 4.0);
        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_contained() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
    }

    #[test]
    fn test_out_of_world() {
        assert!(!out_of_world(Vec2::new(0.0, 0.0), 100.0, 50.0));
        assert!(!out_of_world(Vec2::new(100.0, 50.0), 100.0, 50.0));
        assert!(out_of_world(Vec2::new(-0.1, 10.0), 100.0, 50.0));
        assert!(out_of_world(Vec2::new(10.0, 50.1), 100.0, 50.0));
    }
}
