// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use arrayvec::ArrayVec;

use crate::common::{align_points, direction, filter_unit_interval, solve_quadratic};
use crate::{BoundingBox, Point, Quad, Vec2};

/// A single cubic Bézier segment.
///
/// The power-basis coefficients are computed at construction and never
/// change.
#[derive(Clone, Copy, Debug)]
pub struct Cubic {
    pts: [Point; 4],
    /// c[0]·t³ + c[1]·t² + c[2]·t + c[3]
    c: [Vec2; 4],
}

impl Cubic {
    /// Create a new cubic Bézier segment.
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Cubic {
        let (p0, p1, p2, p3) = (p0.into(), p1.into(), p2.into(), p3.into());
        let (v0, v1, v2, v3) = (p0.to_vec2(), p1.to_vec2(), p2.to_vec2(), p3.to_vec2());
        let c = [
            v3 - 3.0 * v2 + 3.0 * v1 - v0,
            3.0 * v2 - 6.0 * v1 + 3.0 * v0,
            3.0 * (v1 - v0),
            v0,
        ];
        Cubic {
            pts: [p0, p1, p2, p3],
            c,
        }
    }

    /// The control points.
    #[inline]
    pub fn points(&self) -> &[Point; 4] {
        &self.pts
    }

    /// Evaluate the segment at parameter `t`.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        (((self.c[0] * t + self.c[1]) * t + self.c[2]) * t + self.c[3]).to_point()
    }

    /// The derivative vector at parameter `t`.
    #[inline]
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        (3.0 * self.c[0] * t + 2.0 * self.c[1]) * t + self.c[2]
    }

    /// The second derivative vector at parameter `t`.
    #[inline]
    fn second_derivative_at(&self, t: f64) -> Vec2 {
        6.0 * self.c[0] * t + 2.0 * self.c[1]
    }

    /// The derivative curve.
    ///
    /// The control points of the returned quadratic are the derivative
    /// hodograph, so `deriv().eval(t)` is the derivative at `t`.
    pub fn deriv(&self) -> Quad {
        let [p0, p1, p2, p3] = self.pts;
        Quad::new(
            (3.0 * (p1 - p0)).to_point(),
            (3.0 * (p2 - p1)).to_point(),
            (3.0 * (p3 - p2)).to_point(),
        )
    }

    /// The unit tangent at the start of the segment.
    ///
    /// Coincident leading control points fall back to the next
    /// distinguishing point, and a fully degenerate segment yields the
    /// positive x unit vector.
    pub fn start_tangent(&self) -> Vec2 {
        let [p0, p1, p2, p3] = self.pts;
        direction(p0, p1)
            .or_else(|| direction(p0, p2))
            .or_else(|| direction(p0, p3))
            .unwrap_or(Vec2::new(1.0, 0.0))
    }

    /// The unit tangent at the end of the segment.
    pub fn end_tangent(&self) -> Vec2 {
        let [p0, p1, p2, p3] = self.pts;
        direction(p2, p3)
            .or_else(|| direction(p1, p3))
            .or_else(|| direction(p0, p3))
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

    /// Signed curvature at parameter `t`.
    pub fn curvature(&self, t: f64) -> f64 {
        let d = self.derivative_at(t);
        let dd = self.second_derivative_at(t);
        let norm = d.hypot2().powf(1.5);
        if norm == 0.0 {
            return 0.0;
        }
        d.cross(dd) / norm
    }

    /// Split the segment at `t`, using de Casteljau.
    pub fn split(&self, t: f64) -> (Cubic, Cubic) {
        let [p0, p1, p2, p3] = self.pts;
        let l1 = p0.lerp(p1, t);
        let m = p1.lerp(p2, t);
        let r2 = p2.lerp(p3, t);
        let l2 = l1.lerp(m, t);
        let r1 = m.lerp(r2, t);
        let mid = l2.lerp(r1, t);
        (Cubic::new(p0, l1, l2, mid), Cubic::new(mid, r1, r2, p3))
    }

    /// The sub-segment between parameters `t0` and `t1`.
    pub fn segment(&self, t0: f64, t1: f64) -> Cubic {
        if t0 <= 0.0 {
            return self.split(t1).0;
        }
        if t1 >= 1.0 {
            return self.split(t0).1;
        }
        self.split(t0).1.split((t1 - t0) / (1.0 - t0)).0
    }

    /// The same segment, traversed in the opposite direction.
    pub fn reverse(&self) -> Cubic {
        let [p0, p1, p2, p3] = self.pts;
        Cubic::new(p3, p2, p1, p0)
    }

    /// Parameters in (0, 1) where a coordinate reaches an extremum.
    pub fn extrema(&self) -> ArrayVec<f64, 4> {
        let mut result = ArrayVec::new();
        // Derivative power-basis coefficients, per axis.
        let a = [3.0 * self.c[0].x, 3.0 * self.c[0].y];
        let b = [2.0 * self.c[1].x, 2.0 * self.c[1].y];
        let c = [self.c[2].x, self.c[2].y];
        for i in 0..2 {
            for t in filter_unit_interval(solve_quadratic(c[i], b[i], a[i])) {
                result.push(t);
            }
        }
        result
    }

    /// The control-hull bounding box.
    pub fn bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::new(self.pts[0], self.pts[3]);
        b.expand(self.pts[1]);
        b.expand(self.pts[2]);
        b
    }

    /// The exact bounding box of the traced curve.
    pub fn tight_bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::new(self.pts[0], self.pts[3]);
        for t in self.extrema() {
            b.expand(self.eval(t));
        }
        b
    }

    /// Interior parameters where the curvature vanishes, found from a
    /// quadratic in chord-aligned control coordinates.
    ///
    /// A cubic with a loop has no inflection; in that case the single
    /// parameter where the turning is extremal is returned instead, which
    /// separates the two branches of the loop.
    pub fn curvature_points(&self) -> ArrayVec<f64, 2> {
        let p = align_points(&self.pts, self.pts[0], self.pts[3]);
        let a = p[2].x * p[1].y;
        let b = p[3].x * p[1].y;
        let c = p[1].x * p[2].y;
        let d = p[3].x * p[2].y;
        let cc2 = -3.0 * a + 2.0 * b + 3.0 * c - d;
        let cc1 = 3.0 * a - b - 3.0 * c;
        let cc0 = c - a;
        let roots = filter_unit_interval(solve_quadratic(cc0, cc1, cc2));
        if !roots.is_empty() {
            return roots;
        }
        let mut result = ArrayVec::new();
        if cc2.abs() > 1e-9 {
            let t = -0.5 * cc1 / cc2;
            if t > 0.0 && t < 1.0 {
                result.push(t);
            }
        }
        result
    }

    /// Interior parameters where the segment has a cusp, i.e. where the
    /// first derivative vanishes.
    ///
    /// Computed in chord-aligned coordinates: candidates are the roots
    /// of the aligned x component of the derivative, confirmed where
    /// the aligned y component also (nearly) vanishes. The alignment
    /// keeps cusps on chord-parallel and chord-collinear cubics
    /// detectable.
    pub fn cusps(&self) -> ArrayVec<f64, 2> {
        let p = align_points(&self.pts, self.pts[0], self.pts[3]);
        let d0 = 3.0 * (p[1] - p[0]);
        let d1 = 3.0 * (p[2] - p[1]);
        let d2 = 3.0 * (p[3] - p[2]);
        let a = d0.x - 2.0 * d1.x + d2.x;
        let b = 2.0 * (d1.x - d0.x);
        let c = d0.x;
        let mut result = ArrayVec::new();
        for t in filter_unit_interval(solve_quadratic(c, b, a)) {
            let mt = 1.0 - t;
            let dy = d0.y * mt * mt + 2.0 * d1.y * mt * t + d2.y * t * t;
            if dy.abs() < 1e-3 {
                result.push(t);
            }
        }
        result
    }

    /// Whether a single chord is not a good enough approximation of the
    /// segment.
    ///
    /// Compares the control points against their positions on the chord
    /// at 1/3 and 2/3, per axis.
    pub(crate) fn too_curvy(&self, tolerance: f64) -> bool {
        let [p0, p1, p2, p3] = self.pts;
        let q1 = p0.lerp(p3, 1.0 / 3.0);
        if (q1.x - p1.x).abs() > tolerance || (q1.y - p1.y).abs() > tolerance {
            return true;
        }
        let q2 = p0.lerp(p3, 2.0 / 3.0);
        (q2.x - p2.x).abs() > tolerance || (q2.y - p2.y).abs() > tolerance
    }
}
