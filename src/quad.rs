// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier segments.

use arrayvec::ArrayVec;

use crate::common::direction;
use crate::{BoundingBox, Cubic, Line, Point, Vec2};

/// A single quadratic Bézier segment.
///
/// The power-basis coefficients are computed at construction and never
/// change, so evaluation is a couple of fused multiply-adds.
#[derive(Clone, Copy, Debug)]
pub struct Quad {
    pts: [Point; 3],
    /// c[0]·t² + c[1]·t + c[2]
    c: [Vec2; 3],
}

impl Quad {
    /// Create a new quadratic Bézier segment.
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Quad {
        let (p0, p1, p2) = (p0.into(), p1.into(), p2.into());
        let c = [
            (p2 - p1) - (p1 - p0),
            2.0 * (p1 - p0),
            p0.to_vec2(),
        ];
        Quad { pts: [p0, p1, p2], c }
    }

    /// The control points.
    #[inline]
    pub fn points(&self) -> &[Point; 3] {
        &self.pts
    }

    /// Evaluate the segment at parameter `t`.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        ((self.c[0] * t + self.c[1]) * t + self.c[2]).to_point()
    }

    /// The derivative vector at parameter `t`.
    #[inline]
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        2.0 * self.c[0] * t + self.c[1]
    }

    /// The derivative curve.
    ///
    /// The control points of the returned line are the derivative
    /// vectors, so `deriv().eval(t)` is the derivative at `t`.
    pub fn deriv(&self) -> Line {
        Line::new(
            (2.0 * (self.pts[1] - self.pts[0])).to_point(),
            (2.0 * (self.pts[2] - self.pts[1])).to_point(),
        )
    }

    /// The unit tangent at the start of the segment.
    pub fn start_tangent(&self) -> Vec2 {
        direction(self.pts[0], self.pts[1])
            .or_else(|| direction(self.pts[0], self.pts[2]))
            .unwrap_or(Vec2::new(1.0, 0.0))
    }

    /// The unit tangent at the end of the segment.
    pub fn end_tangent(&self) -> Vec2 {
        direction(self.pts[1], self.pts[2])
            .or_else(|| direction(self.pts[0], self.pts[2]))
            .unwrap_or(Vec2::new(1.0, 0.0))
    }

    /// The unit tangent at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let d = self.derivative_at(t);
        let hypot = d.hypot();
        if hypot > 1e-9 {
            d / hypot
        } else if t < 0.5 {
            self.start_tangent()
        } else {
            self.end_tangent()
        }
    }

    /// Split the segment at `t`, using de Casteljau.
    pub fn split(&self, t: f64) -> (Quad, Quad) {
        let [p0, p1, p2] = self.pts;
        let l1 = p0.lerp(p1, t);
        let r1 = p1.lerp(p2, t);
        let m = l1.lerp(r1, t);
        (Quad::new(p0, l1, m), Quad::new(m, r1, p2))
    }

    /// The sub-segment between parameters `t0` and `t1`.
    pub fn segment(&self, t0: f64, t1: f64) -> Quad {
        if t0 <= 0.0 {
            return self.split(t1).0;
        }
        if t1 >= 1.0 {
            return self.split(t0).1;
        }
        self.split(t0).1.split((t1 - t0) / (1.0 - t0)).0
    }

    /// The same segment, traversed in the opposite direction.
    pub fn reverse(&self) -> Quad {
        Quad::new(self.pts[2], self.pts[1], self.pts[0])
    }

    /// Raise the order by one.
    ///
    /// Returns a cubic Bézier segment that exactly represents this
    /// quadratic.
    pub fn elevate(&self) -> Cubic {
        let [p0, p1, p2] = self.pts;
        Cubic::new(
            p0,
            p0 + (2.0 / 3.0) * (p1 - p0),
            p2 + (2.0 / 3.0) * (p1 - p2),
            p2,
        )
    }

    /// Parameters in (0, 1) where a coordinate reaches an extremum.
    pub fn extrema(&self) -> ArrayVec<f64, 2> {
        let mut result = ArrayVec::new();
        let d = [self.c[0].x, self.c[0].y];
        let n = [self.c[1].x, self.c[1].y];
        for i in 0..2 {
            // The cutoff is relative to the linear coefficient so that
            // arbitrarily small curves keep their interior extrema.
            if d[i].abs() > 1e-4 * n[i].abs() {
                let t = -0.5 * n[i] / d[i];
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        }
        result
    }

    /// The control-hull bounding box.
    pub fn bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::new(self.pts[0], self.pts[2]);
        b.expand(self.pts[1]);
        b
    }

    /// The exact bounding box of the traced curve.
    pub fn tight_bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::new(self.pts[0], self.pts[2]);
        for t in self.extrema() {
            b.expand(self.eval(t));
        }
        b
    }

    /// Whether a single chord is not a good enough approximation of the
    /// segment.
    ///
    /// Compares the curve midpoint against the chord midpoint, per axis.
    pub(crate) fn too_curvy(&self, tolerance: f64) -> bool {
        let [p0, p1, p2] = self.pts;
        let dx = 0.5 * p1.x - 0.25 * (p0.x + p2.x);
        let dy = 0.5 * p1.y - 0.25 * (p0.y + p2.y);
        dx.abs() > tolerance || dy.abs() > tolerance
    }
}
