// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line segments.

use crate::common::direction;
use crate::{BoundingBox, Point, Vec2};

/// A single line segment, parametrized from `p0` at t = 0 to `p1` at
/// t = 1.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line segment.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Evaluate the segment at parameter `t`.
    ///
    /// The parameter is not clamped; values outside [0, 1] evaluate the
    /// supporting line.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    /// The unit tangent, constant along the segment.
    ///
    /// A degenerate (point-like) segment yields the positive x unit
    /// vector rather than NaN.
    pub fn tangent(&self) -> Vec2 {
        direction(self.p0, self.p1).unwrap_or(Vec2::new(1.0, 0.0))
    }

    /// Split the segment at `t`.
    pub fn split(&self, t: f64) -> (Line, Line) {
        let p = self.eval(t);
        (Line::new(self.p0, p), Line::new(p, self.p1))
    }

    /// The sub-segment between parameters `t0` and `t1`.
    pub fn segment(&self, t0: f64, t1: f64) -> Line {
        Line::new(self.eval(t0), self.eval(t1))
    }

    /// The same segment, traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self) -> Line {
        Line::new(self.p1, self.p0)
    }

    /// The length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    /// The bounding box of the segment.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.p0, self.p1)
    }

    /// The unclamped parameter of the orthogonal projection of `p` onto
    /// the supporting line.
    ///
    /// For a degenerate segment the result is 0.
    pub(crate) fn project(&self, p: Point) -> f64 {
        let d = self.p1 - self.p0;
        let dd = d.hypot2();
        if dd == 0.0 {
            return 0.0;
        }
        (p - self.p0).dot(d) / dd
    }

    /// Closest point on the segment to `p`, as (parameter, distance).
    pub fn closest_point(&self, p: Point) -> (f64, f64) {
        let t = self.project(p).clamp(0.0, 1.0);
        (t, self.eval(t).distance(p))
    }

    /// The winding contribution of this segment for a ray cast from `p`
    /// in the positive x direction.
    ///
    /// The test is half-open: an edge includes its lower endpoint in y
    /// and excludes its upper one, so a ray through a shared vertex is
    /// counted exactly once.
    pub fn crossing(&self, p: Point) -> i32 {
        let d = self.p1 - self.p0;
        if self.p0.y <= p.y {
            if self.p1.y > p.y && d.cross(p - self.p0) > 0.0 {
                return 1;
            }
        } else if self.p1.y <= p.y && d.cross(p - self.p0) < 0.0 {
            return -1;
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_and_length() {
        let l = Line::new((10.0, 10.0), (100.0, 130.0));
        assert_eq!(l.eval(0.0), l.p0);
        assert_eq!(l.eval(1.0), l.p1);
        assert_eq!(l.eval(0.5), Point::new(55.0, 70.0));
        assert_eq!(l.length(), 150.0);
    }

    #[test]
    fn split_segment() {
        let l = Line::new((0.0, 0.0), (100.0, 0.0));
        let (a, b) = l.split(0.25);
        assert_eq!(a.p1, Point::new(25.0, 0.0));
        assert_eq!(b.p0, Point::new(25.0, 0.0));
        let s = l.segment(0.25, 0.75);
        assert_eq!(s, Line::new((25.0, 0.0), (75.0, 0.0)));
    }

    #[test]
    fn degenerate_tangent() {
        let l = Line::new((5.0, 5.0), (5.0, 5.0));
        assert_eq!(l.tangent(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn closest_point_clamps() {
        let l = Line::new((0.0, 0.0), (100.0, 0.0));
        assert_eq!(l.closest_point(Point::new(50.0, 10.0)), (0.5, 10.0));
        assert_eq!(l.closest_point(Point::new(-30.0, 40.0)), (0.0, 50.0));
        assert_eq!(l.closest_point(Point::new(130.0, 40.0)), (1.0, 50.0));
    }

    #[test]
    fn crossing_half_open() {
        let up = Line::new((10.0, 0.0), (10.0, 100.0));
        let down = up.reverse();
        // Ray to the right of the segment start.
        assert_eq!(up.crossing(Point::new(0.0, 50.0)), 1);
        assert_eq!(down.crossing(Point::new(0.0, 50.0)), -1);
        // The lower endpoint is included, the upper one is not.
        assert_eq!(up.crossing(Point::new(0.0, 0.0)), 1);
        assert_eq!(up.crossing(Point::new(0.0, 100.0)), 0);
        // A point right of the segment sees no crossing.
        assert_eq!(up.crossing(Point::new(20.0, 50.0)), 0);
    }
}
