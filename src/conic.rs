// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rational quadratic Bézier (conic) segments.

use arrayvec::ArrayVec;

use crate::common::direction;
use crate::{BoundingBox, Cubic, Point, Vec2};

/// A single conic (rational quadratic Bézier) segment, as used for
/// exact circular and elliptical arcs.
///
/// The end weights are normalized to 1, leaving a single shape weight
/// `w > 0` on the middle control point. The numerator and denominator
/// power-basis coefficients are computed at construction and never
/// change.
#[derive(Clone, Copy, Debug)]
pub struct Conic {
    pts: [Point; 3],
    weight: f64,
    /// num[0]·t² + num[1]·t + num[2]
    num: [Vec2; 3],
    /// denom[0]·t² + denom[1]·t + denom[2]
    denom: [f64; 3],
}

impl Conic {
    /// Create a new conic segment.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is not finite and positive.
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        weight: f64,
    ) -> Conic {
        let (p0, p1, p2) = (p0.into(), p1.into(), p2.into());
        assert!(
            weight.is_finite() && weight > 0.0,
            "conic weight must be finite and positive"
        );
        let pw = weight * p1.to_vec2();
        let num = [
            p2.to_vec2() - 2.0 * pw + p0.to_vec2(),
            2.0 * (pw - p0.to_vec2()),
            p0.to_vec2(),
        ];
        let denom = [-2.0 * (weight - 1.0), 2.0 * (weight - 1.0), 1.0];
        Conic {
            pts: [p0, p1, p2],
            weight,
            num,
            denom,
        }
    }

    /// The control points.
    #[inline]
    pub fn points(&self) -> &[Point; 3] {
        &self.pts
    }

    /// The weight of the middle control point.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    fn num_at(&self, t: f64) -> Vec2 {
        (self.num[0] * t + self.num[1]) * t + self.num[2]
    }

    #[inline]
    fn denom_at(&self, t: f64) -> f64 {
        (self.denom[0] * t + self.denom[1]) * t + self.denom[2]
    }

    /// Evaluate the segment at parameter `t`.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        (self.num_at(t) / self.denom_at(t)).to_point()
    }

    /// The derivative vector at parameter `t`.
    ///
    /// When an end control point coincides with its neighbor the
    /// quotient rule degenerates at that end; the chord direction is
    /// used there instead.
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        let [p0, p1, p2] = self.pts;
        if (t <= 0.0 && p0.is_near(p1, 1e-6)) || (t >= 1.0 && p1.is_near(p2, 1e-6)) {
            return p2 - p0;
        }
        let n = self.num_at(t);
        let nd = 2.0 * self.num[0] * t + self.num[1];
        let d = self.denom_at(t);
        let dd = 2.0 * self.denom[0] * t + self.denom[1];
        (nd * d - n * dd) / (d * d)
    }

    /// Signed curvature at parameter `t`.
    pub fn curvature(&self, t: f64) -> f64 {
        let n = self.num_at(t);
        let nd = 2.0 * self.num[0] * t + self.num[1];
        let ndd = 2.0 * self.num[0];
        let d = self.denom_at(t);
        let dd = 2.0 * self.denom[0] * t + self.denom[1];
        let ddd = 2.0 * self.denom[0];
        // quotient rule, with u = N'D - ND'
        let u = nd * d - n * dd;
        let d1 = u / (d * d);
        let d2 = ((ndd * d - n * ddd) * d - 2.0 * dd * u) / (d * d * d);
        let norm = d1.hypot2().powf(1.5);
        if norm == 0.0 {
            return 0.0;
        }
        d1.cross(d2) / norm
    }

    /// The unit tangent at the start of the segment.
    pub fn start_tangent(&self) -> Vec2 {
        let [p0, p1, p2] = self.pts;
        direction(p0, p1)
            .or_else(|| direction(p0, p2))
            .unwrap_or(Vec2::new(1.0, 0.0))
    }

    /// The unit tangent at the end of the segment.
    pub fn end_tangent(&self) -> Vec2 {
        let [p0, p1, p2] = self.pts;
        direction(p1, p2)
            .or_else(|| direction(p0, p2))
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

    /// Split the segment at `t`.
    ///
    /// The split is a de Casteljau step on the homogeneous control
    /// points; re-normalizing the end weights of each half to 1 divides
    /// the middle weight by the square root of the homogeneous weight at
    /// the split point.
    pub fn split(&self, t: f64) -> (Conic, Conic) {
        let w = self.weight;
        let h0 = (self.pts[0].to_vec2(), 1.0);
        let h1 = (self.pts[1].to_vec2() * w, w);
        let h2 = (self.pts[2].to_vec2(), 1.0);
        let lerp3 = |a: (Vec2, f64), b: (Vec2, f64)| (a.0.lerp(b.0, t), a.1 + t * (b.1 - a.1));
        let l1 = lerp3(h0, h1);
        let r1 = lerp3(h1, h2);
        let m = lerp3(l1, r1);
        let mid = (m.0 / m.1).to_point();
        let wsqrt = m.1.sqrt();
        let left = Conic::new(self.pts[0], (l1.0 / l1.1).to_point(), mid, l1.1 / wsqrt);
        let right = Conic::new(mid, (r1.0 / r1.1).to_point(), self.pts[2], r1.1 / wsqrt);
        (left, right)
    }

    /// The sub-segment between parameters `t0` and `t1`.
    ///
    /// Computed directly from the numerator and denominator
    /// coefficients evaluated at the range's start, middle and end.
    pub fn segment(&self, t0: f64, t1: f64) -> Conic {
        if t0 <= 0.0 {
            return self.split(t1).0;
        }
        if t1 >= 1.0 {
            return self.split(t0).1;
        }
        let tm = 0.5 * (t0 + t1);
        let num_start = self.num_at(t0);
        let num_mid = self.num_at(tm);
        let num_end = self.num_at(t1);
        let denom_start = self.denom_at(t0);
        let denom_mid = self.denom_at(tm);
        let denom_end = self.denom_at(t1);
        let ctrl_num = 2.0 * num_mid - 0.5 * (num_start + num_end);
        let ctrl_denom = 2.0 * denom_mid - 0.5 * (denom_start + denom_end);
        Conic::new(
            (num_start / denom_start).to_point(),
            (ctrl_num / ctrl_denom).to_point(),
            (num_end / denom_end).to_point(),
            ctrl_denom / (denom_start * denom_end).sqrt(),
        )
    }

    /// The same segment, traversed in the opposite direction.
    pub fn reverse(&self) -> Conic {
        Conic::new(self.pts[2], self.pts[1], self.pts[0], self.weight)
    }

    /// Parameters in (0, 1) where a coordinate reaches an extremum.
    pub fn extrema(&self) -> ArrayVec<f64, 4> {
        let mut result = ArrayVec::new();
        let w = self.weight;
        let [p0, p1, p2] = self.pts;
        for (a, b, c) in [(p0.x, p1.x, p2.x), (p0.y, p1.y, p2.y)] {
            if w == 1.0 {
                // plain quadratic
                let den = a - 2.0 * b + c;
                if den != 0.0 {
                    let t = (a - b) / den;
                    if t > 0.0 && t < 1.0 {
                        result.push(t);
                    }
                }
            } else if a == c {
                if w * (b - c) != 0.0 {
                    result.push(0.5);
                }
            } else {
                let w2 = w * w;
                let disc = a * a - 4.0 * a * b * w2 + 4.0 * a * c * w2 - 2.0 * a * c
                    + 4.0 * b * b * w2
                    - 4.0 * b * c * w2
                    + c * c;
                if disc >= 0.0 {
                    let q = disc.sqrt();
                    let base = 2.0 * a * w - a - 2.0 * b * w + c;
                    let wac = (w - 1.0) * (a - c);
                    for t in [(base + q) / (2.0 * wac), (base - q) / (2.0 * wac)] {
                        if t > 0.0 && t < 1.0 {
                            result.push(t);
                        }
                    }
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
    pub(crate) fn too_curvy(&self, tolerance: f64) -> bool {
        let m = self.eval(0.5);
        let c = self.pts[0].midpoint(self.pts[2]);
        (m.x - c.x).abs() > tolerance || (m.y - c.y).abs() > tolerance
    }

    /// The best single-cubic approximation, after Floater.
    pub(crate) fn cubic_approximation(&self) -> Cubic {
        let [p0, p1, p2] = self.pts;
        let w2 = self.weight * self.weight;
        let lambda = 2.0 * (6.0 * w2 + 1.0 - (3.0 * w2 + 1.0).sqrt()) / (12.0 * w2 + 3.0);
        Cubic::new(p0, p0.lerp(p1, lambda), p2.lerp(p1, lambda), p2)
    }

    /// Whether `cubic` deviates from this segment by at most `tolerance`
    /// per axis at a few sample parameters.
    pub(crate) fn is_close_to_cubic(&self, cubic: &Cubic, tolerance: f64) -> bool {
        for t in [0.1, 0.5, 0.9] {
            let p = self.eval(t);
            let q = cubic.eval(t);
            if (p.x - q.x).abs() > tolerance || (p.y - q.y).abs() > tolerance {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quarter circle of radius 100 around the origin, from (100, 0)
    /// to (0, 100).
    fn quarter_circle() -> Conic {
        Conic::new(
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
            0.5f64.sqrt(),
        )
    }

    fn assert_on_circle(p: Point, r: f64) {
        assert!(
            (p.to_vec2().hypot() - r).abs() < 1e-9,
            "{p:?} not on circle of radius {r}"
        );
    }

    #[test]
    fn conic_traces_circle() {
        let c = quarter_circle();
        let n = 16;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert_on_circle(c.eval(t), 100.0);
        }
        assert!(c.eval(0.0).is_near(Point::new(100.0, 0.0), 1e-12));
        assert!(c.eval(1.0).is_near(Point::new(0.0, 100.0), 1e-12));
    }

    #[test]
    fn conic_weight_one_is_quadratic() {
        let c = Conic::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0), 1.0);
        let q = crate::Quad::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0));
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert!(c.eval(t).is_near(q.eval(t), 1e-12));
        }
    }

    #[test]
    fn conic_derivative() {
        let c = quarter_circle();
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let delta = 1e-7;
            let d_approx = (c.eval(t + delta) - c.eval(t)) * delta.recip();
            let d = c.derivative_at(t);
            assert!((d - d_approx).hypot() < 1e-4 * d.hypot());
        }
    }

    #[test]
    fn conic_split_halves_stay_on_curve() {
        let c = quarter_circle();
        let (a, b) = c.split(0.5);
        // Halving a circular arc gives the half-angle weight.
        assert!((a.weight() - (std::f64::consts::PI / 8.0).cos()).abs() < 1e-12);
        assert!((b.weight() - (std::f64::consts::PI / 8.0).cos()).abs() < 1e-12);
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert_on_circle(a.eval(t), 100.0);
            assert_on_circle(b.eval(t), 100.0);
        }
        assert!(a.eval(1.0).is_near(c.eval(0.5), 1e-9));
        assert!(b.eval(0.0).is_near(c.eval(0.5), 1e-9));
    }

    #[test]
    fn conic_segment_stays_on_curve() {
        let c = quarter_circle();
        let s = c.segment(0.25, 0.75);
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert_on_circle(s.eval(t), 100.0);
        }
        assert!(s.eval(0.0).is_near(c.eval(0.25), 1e-9));
        assert!(s.eval(1.0).is_near(c.eval(0.75), 1e-9));
    }

    #[test]
    fn conic_curvature_of_circle() {
        let c = quarter_circle();
        for t in [0.0, 0.3, 0.5, 0.8, 1.0] {
            assert!(
                (c.curvature(t).abs() - 0.01).abs() < 1e-9,
                "curvature at {t}: {}",
                c.curvature(t)
            );
        }
    }

    #[test]
    fn conic_extrema_at_apex() {
        // Symmetric arc over the circle apex; the y maximum is interior.
        let x = 100.0 * (std::f64::consts::PI / 4.0).sin();
        let c = Conic::new(
            (-x, x),
            (0.0, 100.0 / (std::f64::consts::PI / 4.0).cos()),
            (x, x),
            (std::f64::consts::PI / 4.0).cos(),
        );
        let tight = c.tight_bounds();
        assert!((tight.max.y - 100.0).abs() < 1e-9);
        assert!((tight.min.y - x).abs() < 1e-9);
    }

    #[test]
    fn conic_reverse() {
        let c = quarter_circle();
        let r = c.reverse();
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert!(r.eval(t).is_near(c.eval(1.0 - t), 1e-9));
        }
    }

    #[test]
    fn conic_cubic_approximation() {
        let c = quarter_circle();
        let cubic = c.cubic_approximation();
        // A single cubic for a full quarter circle of radius 100 is off
        // by about 1.37 near the ends of the sampled range.
        assert!(c.is_close_to_cubic(&cubic, 1.5));
        assert!(!c.is_close_to_cubic(&cubic, 0.5));
        // Halving the arc shrinks the error to about 0.21.
        let (a, _) = c.split(0.5);
        let half = a.cubic_approximation();
        assert!(a.is_close_to_cubic(&half, 0.3));
        assert!(!a.is_close_to_cubic(&half, 0.1));
    }

    #[test]
    #[should_panic(expected = "conic weight")]
    fn conic_rejects_nonpositive_weight() {
        let _ = Conic::new((0.0, 0.0), (1.0, 1.0), (2.0, 0.0), 0.0);
    }
}
