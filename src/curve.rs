// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of path segment kinds, and the operations shared by
//! all of them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::common::{GAUSS_LEGENDRE_COEFFS_24, NEAR_EPS};
use crate::{BoundingBox, Conic, Cubic, Line, Point, Quad, Vec2};

/// The progress floor for flattening: a sub-span shorter than this is
/// emitted as a line even when still too curvy.
const MIN_PROGRESS: f64 = 1.0 / 1024.0;

/// A path operation tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathOp {
    /// A closing line segment.
    Close,
    /// A line segment.
    Line,
    /// A quadratic Bézier segment.
    Quad,
    /// A cubic Bézier segment.
    Cubic,
    /// A conic (rational quadratic) segment.
    Conic,
}

/// Why a flattening callback was handed a particular chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineReason {
    /// The chord is within tolerance of the sub-span it replaces.
    Straight,
    /// The sub-span fell below the minimum progress floor while still
    /// too curvy; the chord is emitted to guarantee termination.
    Short,
}

/// Which segment kinds a [`Curve::decompose_curves`] callback is
/// willing to receive. Lines are always allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecomposeFlags(u8);

impl DecomposeFlags {
    /// Lines only.
    pub const NONE: DecomposeFlags = DecomposeFlags(0);
    /// Quadratic Bézier segments may be emitted.
    pub const QUAD: DecomposeFlags = DecomposeFlags(1);
    /// Cubic Bézier segments may be emitted.
    pub const CUBIC: DecomposeFlags = DecomposeFlags(1 << 1);
    /// Conic segments may be emitted.
    pub const CONIC: DecomposeFlags = DecomposeFlags(1 << 2);

    /// Whether all flags in `other` are set in `self`.
    #[inline]
    pub fn contains(self, other: DecomposeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DecomposeFlags {
    type Output = DecomposeFlags;

    #[inline]
    fn bitor(self, rhs: DecomposeFlags) -> DecomposeFlags {
        DecomposeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for DecomposeFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: DecomposeFlags) {
        self.0 |= rhs.0;
    }
}

/// A path segment of any supported kind.
#[derive(Clone, Copy, Debug)]
pub enum Curve {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(Quad),
    /// A cubic Bézier segment.
    Cubic(Cubic),
    /// A conic segment.
    Conic(Conic),
}

impl From<Line> for Curve {
    fn from(l: Line) -> Curve {
        Curve::Line(l)
    }
}

impl From<Quad> for Curve {
    fn from(q: Quad) -> Curve {
        Curve::Quad(q)
    }
}

impl From<Cubic> for Curve {
    fn from(c: Cubic) -> Curve {
        Curve::Cubic(c)
    }
}

impl From<Conic> for Curve {
    fn from(c: Conic) -> Curve {
        Curve::Conic(c)
    }
}

impl Curve {
    /// Build a curve from an operation tag and its control points.
    ///
    /// `Close` behaves exactly like `Line`. The `weight` is only
    /// meaningful for `Conic` and is ignored otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the number of points does not match the operation, or
    /// if a conic weight is not finite and positive.
    pub fn from_points(op: PathOp, pts: &[Point], weight: f64) -> Curve {
        match op {
            PathOp::Close | PathOp::Line => {
                assert_eq!(pts.len(), 2, "a line takes 2 points");
                Curve::Line(Line::new(pts[0], pts[1]))
            }
            PathOp::Quad => {
                assert_eq!(pts.len(), 3, "a quadratic takes 3 points");
                Curve::Quad(Quad::new(pts[0], pts[1], pts[2]))
            }
            PathOp::Cubic => {
                assert_eq!(pts.len(), 4, "a cubic takes 4 points");
                Curve::Cubic(Cubic::new(pts[0], pts[1], pts[2], pts[3]))
            }
            PathOp::Conic => {
                assert_eq!(pts.len(), 3, "a conic takes 3 points");
                Curve::Conic(Conic::new(pts[0], pts[1], pts[2], weight))
            }
        }
    }

    /// The operation tag of this curve.
    pub fn path_op(&self) -> PathOp {
        match self {
            Curve::Line(_) => PathOp::Line,
            Curve::Quad(_) => PathOp::Quad,
            Curve::Cubic(_) => PathOp::Cubic,
            Curve::Conic(_) => PathOp::Conic,
        }
    }

    /// The point at t = 0.
    pub fn start_point(&self) -> Point {
        match self {
            Curve::Line(l) => l.p0,
            Curve::Quad(q) => q.points()[0],
            Curve::Cubic(c) => c.points()[0],
            Curve::Conic(c) => c.points()[0],
        }
    }

    /// The point at t = 1.
    pub fn end_point(&self) -> Point {
        match self {
            Curve::Line(l) => l.p1,
            Curve::Quad(q) => q.points()[2],
            Curve::Cubic(c) => c.points()[3],
            Curve::Conic(c) => c.points()[2],
        }
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point(&self, t: f64) -> Point {
        match self {
            Curve::Line(l) => l.eval(t),
            Curve::Quad(q) => q.eval(t),
            Curve::Cubic(c) => c.eval(t),
            Curve::Conic(c) => c.eval(t),
        }
    }

    /// The derivative vector at parameter `t`.
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        match self {
            Curve::Line(l) => l.p1 - l.p0,
            Curve::Quad(q) => q.derivative_at(t),
            Curve::Cubic(c) => c.derivative_at(t),
            Curve::Conic(c) => c.derivative_at(t),
        }
    }

    /// The unit tangent at the start.
    ///
    /// Never a zero or NaN vector; fully degenerate curves yield the
    /// positive x unit vector.
    pub fn start_tangent(&self) -> Vec2 {
        match self {
            Curve::Line(l) => l.tangent(),
            Curve::Quad(q) => q.start_tangent(),
            Curve::Cubic(c) => c.start_tangent(),
            Curve::Conic(c) => c.start_tangent(),
        }
    }

    /// The unit tangent at the end.
    pub fn end_tangent(&self) -> Vec2 {
        match self {
            Curve::Line(l) => l.tangent(),
            Curve::Quad(q) => q.end_tangent(),
            Curve::Cubic(c) => c.end_tangent(),
            Curve::Conic(c) => c.end_tangent(),
        }
    }

    /// The unit tangent at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match self {
            Curve::Line(l) => l.tangent(),
            Curve::Quad(q) => q.tangent(t),
            Curve::Cubic(c) => c.tangent(t),
            Curve::Conic(c) => c.tangent(t),
        }
    }

    /// The same curve, traversed in the opposite direction.
    pub fn reverse(&self) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(l.reverse()),
            Curve::Quad(q) => Curve::Quad(q.reverse()),
            Curve::Cubic(c) => Curve::Cubic(c.reverse()),
            Curve::Conic(c) => Curve::Conic(c.reverse()),
        }
    }

    /// Split the curve at `t`.
    pub fn split(&self, t: f64) -> (Curve, Curve) {
        match self {
            Curve::Line(l) => {
                let (a, b) = l.split(t);
                (Curve::Line(a), Curve::Line(b))
            }
            Curve::Quad(q) => {
                let (a, b) = q.split(t);
                (Curve::Quad(a), Curve::Quad(b))
            }
            Curve::Cubic(c) => {
                let (a, b) = c.split(t);
                (Curve::Cubic(a), Curve::Cubic(b))
            }
            Curve::Conic(c) => {
                let (a, b) = c.split(t);
                (Curve::Conic(a), Curve::Conic(b))
            }
        }
    }

    /// The sub-curve between parameters `t0` and `t1`.
    pub fn segment(&self, t0: f64, t1: f64) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(l.segment(t0, t1)),
            Curve::Quad(q) => Curve::Quad(q.segment(t0, t1)),
            Curve::Cubic(c) => Curve::Cubic(c.segment(t0, t1)),
            Curve::Conic(c) => Curve::Conic(c.segment(t0, t1)),
        }
    }

    /// Raise the degree by one: a line becomes a quadratic, a quadratic
    /// becomes a cubic.
    ///
    /// # Panics
    ///
    /// Panics for cubics and conics, which have no next degree here.
    pub fn elevate(&self) -> Curve {
        match self {
            Curve::Line(l) => Curve::Quad(Quad::new(l.p0, l.p0.midpoint(l.p1), l.p1)),
            Curve::Quad(q) => Curve::Cubic(q.elevate()),
            _ => panic!("cannot elevate a {:?}", self.path_op()),
        }
    }

    /// Signed curvature at parameter `t`.
    pub fn curvature(&self, t: f64) -> f64 {
        match self {
            Curve::Line(_) => 0.0,
            Curve::Quad(q) => q.elevate().curvature(t),
            Curve::Cubic(c) => c.curvature(t),
            Curve::Conic(c) => c.curvature(t),
        }
    }

    /// Curvature at `t`, with the osculating circle center when the
    /// curvature is nonzero.
    pub fn curvature_with_center(&self, t: f64) -> (f64, Option<Point>) {
        let k = self.curvature(t);
        if k.abs() < 1e-12 {
            return (k, None);
        }
        let center = self.point(t) + k.recip() * self.tangent(t).turn_90();
        (k, Some(center))
    }

    /// The control-hull bounding box. Cheap, and never smaller than
    /// [`tight_bounds`](Curve::tight_bounds).
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Curve::Line(l) => l.bounds(),
            Curve::Quad(q) => q.bounds(),
            Curve::Cubic(c) => c.bounds(),
            Curve::Conic(c) => c.bounds(),
        }
    }

    /// The exact bounding box of the traced curve.
    pub fn tight_bounds(&self) -> BoundingBox {
        match self {
            Curve::Line(l) => l.bounds(),
            Curve::Quad(q) => q.tight_bounds(),
            Curve::Cubic(c) => c.tight_bounds(),
            Curve::Conic(c) => c.tight_bounds(),
        }
    }

    /// The winding contribution of this curve for a ray cast from `p`
    /// in the positive x direction, by recursive bisection.
    pub fn crossing(&self, p: Point) -> i32 {
        if let Curve::Line(l) = self {
            return l.crossing(p);
        }
        let b = self.bounds();
        if b.max.y < p.y || b.min.y > p.y || b.max.x < p.x {
            return 0;
        }
        if b.min.x > p.x || b.diagonal() < 0.001 {
            // The curve is entirely right of the point, or effectively
            // linear; the chord decides.
            return Line::new(self.start_point(), self.end_point()).crossing(p);
        }
        let (a, c) = self.split(0.5);
        a.crossing(p) + c.crossing(p)
    }

    /// Arc length from t = 0 to `t`, by Gauss-Legendre quadrature of
    /// the derivative magnitude.
    pub fn length_to(&self, t: f64) -> f64 {
        if let Curve::Line(l) = self {
            return l.length() * t;
        }
        let z = 0.5 * t;
        let mut sum = 0.0;
        for &(wi, xi) in GAUSS_LEGENDRE_COEFFS_24 {
            let tt = z * xi + z;
            sum += wi * self.derivative_at(tt).hypot();
        }
        sum * z
    }

    /// The total arc length.
    pub fn length(&self) -> f64 {
        self.length_to(1.0)
    }

    /// The parameter at which the arc length from the start reaches
    /// `length`, by bisection; the result is clamped to [0, 1].
    pub fn at_length(&self, length: f64, epsilon: f64) -> f64 {
        if let Curve::Line(l) = self {
            let total = l.length();
            if total == 0.0 {
                return 0.0;
            }
            return (length / total).clamp(0.0, 1.0);
        }
        if length <= 0.0 {
            return 0.0;
        }
        if length >= self.length() {
            return 1.0;
        }
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        loop {
            let t = 0.5 * (t0 + t1);
            if t == t0 || t == t1 {
                return t;
            }
            let l = self.length_to(t);
            if (l - length).abs() < epsilon {
                return t;
            }
            if l < length {
                t0 = t;
            } else {
                t1 = t;
            }
        }
    }

    /// The closest point on the curve to `p` within `threshold`, as
    /// (parameter, distance), by bounding-sphere pruned bisection.
    pub fn closest_point(&self, p: Point, threshold: f64) -> Option<(f64, f64)> {
        if let Curve::Line(l) = self {
            let (t, d) = l.closest_point(p);
            return (d <= threshold).then_some((t, d));
        }
        let mut best = None;
        self.closest_rec(p, threshold, 0.0, 1.0, &mut best);
        best
    }

    fn closest_rec(
        &self,
        p: Point,
        threshold: f64,
        t0: f64,
        t1: f64,
        best: &mut Option<(f64, f64)>,
    ) {
        let limit = best.map_or(threshold, |(_, d)| threshold.min(d));
        let b = self.segment(t0, t1).tight_bounds();
        if p.distance(b.center()) - 0.5 * b.diagonal() > limit {
            return;
        }
        if t1 - t0 < 0.001 {
            let t = 0.5 * (t0 + t1);
            let d = p.distance(self.point(t));
            if d <= limit {
                *best = Some((t, d));
            }
            return;
        }
        let tm = 0.5 * (t0 + t1);
        self.closest_rec(p, threshold, t0, tm, best);
        self.closest_rec(p, threshold, tm, t1, best);
    }

    /// Whether a single chord is not a good enough approximation.
    pub(crate) fn too_curvy(&self, tolerance: f64) -> bool {
        match self {
            Curve::Line(_) => false,
            Curve::Quad(q) => q.too_curvy(tolerance),
            Curve::Cubic(c) => c.too_curvy(tolerance),
            Curve::Conic(c) => c.too_curvy(tolerance),
        }
    }

    /// Flatten the curve into a polyline.
    ///
    /// `emit` receives each chord with the parameter span it covers and
    /// the reason it was accepted; returning `false` aborts, and the
    /// abort is propagated as the return value.
    pub fn decompose(
        &self,
        tolerance: f64,
        mut emit: impl FnMut(Point, Point, f64, f64, LineReason) -> bool,
    ) -> bool {
        if let Curve::Line(l) = self {
            return emit(l.p0, l.p1, 0.0, 1.0, LineReason::Straight);
        }
        decompose_rec(self, 0.0, 1.0, tolerance, &mut emit)
    }

    /// Re-express the curve using only the segment kinds allowed by
    /// `flags` (lines are always allowed).
    ///
    /// Conics degrade to cubics via Floater's single-cubic
    /// approximation, split in half until the approximation is within
    /// `tolerance`; anything not otherwise expressible is flattened.
    pub fn decompose_curves(
        &self,
        flags: DecomposeFlags,
        tolerance: f64,
        mut emit: impl FnMut(&Curve) -> bool,
    ) -> bool {
        self.decompose_curves_inner(flags, tolerance, &mut emit)
    }

    fn decompose_curves_inner(
        &self,
        flags: DecomposeFlags,
        tolerance: f64,
        emit: &mut impl FnMut(&Curve) -> bool,
    ) -> bool {
        match self {
            Curve::Line(_) => emit(self),
            Curve::Quad(q) => {
                if flags.contains(DecomposeFlags::QUAD) {
                    return emit(self);
                }
                let [p0, p1, p2] = *q.points();
                if p0.is_near(p1, NEAR_EPS) || p1.is_near(p2, NEAR_EPS) {
                    if p0.is_near(p2, NEAR_EPS) {
                        return true;
                    }
                    return emit(&Curve::Line(Line::new(p0, p2)));
                }
                if flags.contains(DecomposeFlags::CUBIC) {
                    return emit(&self.elevate());
                }
                self.flatten_into(tolerance, emit)
            }
            Curve::Cubic(_) => {
                if flags.contains(DecomposeFlags::CUBIC) {
                    return emit(self);
                }
                self.flatten_into(tolerance, emit)
            }
            Curve::Conic(c) => {
                if flags.contains(DecomposeFlags::CONIC) {
                    return emit(self);
                }
                if flags.contains(DecomposeFlags::CUBIC) {
                    return conic_to_cubics(c, tolerance, emit);
                }
                self.flatten_into(tolerance, emit)
            }
        }
    }

    fn flatten_into(&self, tolerance: f64, emit: &mut impl FnMut(&Curve) -> bool) -> bool {
        self.decompose(tolerance, |from, to, _, _, _| {
            emit(&Curve::Line(Line::new(from, to)))
        })
    }
}

fn decompose_rec(
    sub: &Curve,
    t0: f64,
    t1: f64,
    tolerance: f64,
    emit: &mut impl FnMut(Point, Point, f64, f64, LineReason) -> bool,
) -> bool {
    if !sub.too_curvy(tolerance) {
        return emit(
            sub.start_point(),
            sub.end_point(),
            t0,
            t1,
            LineReason::Straight,
        );
    }
    if t1 - t0 < MIN_PROGRESS {
        return emit(sub.start_point(), sub.end_point(), t0, t1, LineReason::Short);
    }
    let tm = 0.5 * (t0 + t1);
    let (a, b) = sub.split(0.5);
    decompose_rec(&a, t0, tm, tolerance, emit) && decompose_rec(&b, tm, t1, tolerance, emit)
}

fn conic_to_cubics(conic: &Conic, tolerance: f64, emit: &mut impl FnMut(&Curve) -> bool) -> bool {
    let [p0, p1, p2] = *conic.points();
    if p0.is_near(p1, NEAR_EPS) || p1.is_near(p2, NEAR_EPS) {
        if p0.is_near(p2, NEAR_EPS) {
            return true;
        }
        return emit(&Curve::Line(Line::new(p0, p2)));
    }
    let cubic = conic.cubic_approximation();
    if conic.is_close_to_cubic(&cubic, tolerance) {
        return emit(&Curve::Cubic(cubic));
    }
    let (a, b) = conic.split(0.5);
    conic_to_cubics(&a, tolerance, emit) && conic_to_cubics(&b, tolerance, emit)
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Line(l) => {
                write!(f, "M {} {} L {} {}", l.p0.x, l.p0.y, l.p1.x, l.p1.y)
            }
            Curve::Quad(q) => {
                let [p0, p1, p2] = *q.points();
                write!(
                    f,
                    "M {} {} Q {} {} {} {}",
                    p0.x, p0.y, p1.x, p1.y, p2.x, p2.y
                )
            }
            Curve::Cubic(c) => {
                let [p0, p1, p2, p3] = *c.points();
                write!(
                    f,
                    "M {} {} C {} {} {} {} {} {}",
                    p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )
            }
            Curve::Conic(c) => {
                let [p0, p1, p2] = *c.points();
                write!(
                    f,
                    "M {} {} O {} {} {} {} {}",
                    p0.x,
                    p0.y,
                    p1.x,
                    p1.y,
                    p2.x,
                    p2.y,
                    c.weight()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> Curve {
        Curve::Cubic(Cubic::new(
            (0.0, 0.0),
            (0.0, 100.0),
            (100.0, 100.0),
            (100.0, 0.0),
        ))
    }

    fn quarter_circle() -> Curve {
        Curve::Conic(Conic::new(
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
            0.5f64.sqrt(),
        ))
    }

    #[test]
    fn from_points_dispatch() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let c = Curve::from_points(PathOp::Close, &pts, 1.0);
        assert_eq!(c.path_op(), PathOp::Line);
        assert_eq!(c.start_point(), pts[0]);
        assert_eq!(c.end_point(), pts[1]);
    }

    #[test]
    #[should_panic(expected = "a cubic takes 4 points")]
    fn from_points_count_mismatch() {
        let pts = [Point::ZERO, Point::new(1.0, 1.0)];
        let _ = Curve::from_points(PathOp::Cubic, &pts, 1.0);
    }

    #[test]
    fn bounds_nest() {
        for c in [
            arch(),
            quarter_circle(),
            Curve::Quad(Quad::new((-100.0, 100.0), (0.0, -100.0), (100.0, 100.0))),
            Curve::Line(Line::new((3.0, 8.0), (-2.0, 5.0))),
        ] {
            let tight = c.tight_bounds();
            let hull = c.bounds();
            let n = 32;
            for i in 0..=n {
                let t = (i as f64) * (n as f64).recip();
                assert!(
                    tight.contains_with_epsilon(c.point(t), 1e-9),
                    "{c} at {t} outside {tight}"
                );
            }
            assert!(hull.contains(tight.min) && hull.contains(tight.max));
        }
    }

    #[test]
    fn split_and_reverse_sampled() {
        let c = arch();
        let (a, b) = c.split(0.5);
        let r = c.reverse();
        let n = 16;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert!(a.point(t).is_near(c.point(0.5 * t), 1e-9));
            assert!(b.point(t).is_near(c.point(0.5 + 0.5 * t), 1e-9));
            assert!(r.point(t).is_near(c.point(1.0 - t), 1e-9));
        }
    }

    #[test]
    fn conic_split_joins_and_stays_on_arc() {
        // Conic subdivision re-normalizes the weight, which changes the
        // parametrization of the halves; the halves must meet at the
        // split point and trace the same arc, but interior parameters
        // do not map linearly.
        let c = quarter_circle();
        let (a, b) = c.split(0.5);
        assert!(a.point(1.0).is_near(c.point(0.5), 1e-9));
        assert!(b.point(0.0).is_near(c.point(0.5), 1e-9));
        assert_eq!(a.start_point(), c.start_point());
        assert_eq!(b.end_point(), c.end_point());
        let r = c.reverse();
        let n = 16;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert!((a.point(t).to_vec2().hypot() - 100.0).abs() < 1e-9);
            assert!((b.point(t).to_vec2().hypot() - 100.0).abs() < 1e-9);
            // Reversal does not re-normalize, so it is parameter-exact.
            assert!(r.point(t).is_near(c.point(1.0 - t), 1e-9));
        }
    }

    #[test]
    fn decompose_chains_and_covers() {
        let c = arch();
        let tolerance = 0.5;
        let mut lines = Vec::new();
        let done = c.decompose(tolerance, |from, to, t0, t1, reason| {
            assert_eq!(reason, LineReason::Straight);
            lines.push((from, to, t0, t1));
            true
        });
        assert!(done);
        assert!(lines.len() > 4);
        assert_eq!(lines[0].0, c.start_point());
        assert_eq!(lines[0].2, 0.0);
        assert_eq!(lines.last().unwrap().1, c.end_point());
        assert_eq!(lines.last().unwrap().3, 1.0);
        for w in lines.windows(2) {
            assert_eq!(w[0].1, w[1].0);
            assert_eq!(w[0].3, w[1].2);
        }
        // Each chord midpoint stays near the curve.
        for (from, to, t0, t1) in &lines {
            let mid = from.midpoint(*to);
            let on_curve = c.point(0.5 * (t0 + t1));
            assert!(mid.distance(on_curve) < 2.0 * tolerance);
        }
    }

    #[test]
    fn decompose_abort() {
        let mut count = 0;
        let done = arch().decompose(0.5, |_, _, _, _, _| {
            count += 1;
            false
        });
        assert!(!done);
        assert_eq!(count, 1);
    }

    #[test]
    fn decompose_progress_floor() {
        let mut reasons = Vec::new();
        let done = arch().decompose(0.0, |_, _, t0, t1, reason| {
            assert!(t1 - t0 >= 1.0 / 2048.0);
            reasons.push(reason);
            true
        });
        assert!(done);
        assert_eq!(reasons.len(), 2048);
        assert!(reasons.iter().all(|r| *r == LineReason::Short));
    }

    #[test]
    fn decompose_curves_lines_only() {
        let c = quarter_circle();
        let mut last = c.start_point();
        let done = c.decompose_curves(DecomposeFlags::NONE, 0.1, |seg| {
            match seg {
                Curve::Line(l) => {
                    assert_eq!(l.p0, last);
                    last = l.p1;
                }
                _ => panic!("expected only lines, got {seg}"),
            }
            true
        });
        assert!(done);
        assert_eq!(last, c.end_point());
    }

    #[test]
    fn decompose_curves_conic_to_cubics() {
        let c = quarter_circle();
        let tolerance = 0.1;
        let mut count = 0;
        let done = c.decompose_curves(DecomposeFlags::CUBIC, tolerance, |seg| {
            let Curve::Cubic(_) = seg else {
                panic!("expected only cubics, got {seg}");
            };
            let n = 8;
            for i in 0..=n {
                let t = (i as f64) * (n as f64).recip();
                let r = seg.point(t).to_vec2().hypot();
                assert!((r - 100.0).abs() < 2.0 * tolerance, "radius {r}");
            }
            count += 1;
            true
        });
        assert!(done);
        assert!(count >= 2);
    }

    #[test]
    fn decompose_curves_passthrough() {
        let q = Curve::Quad(Quad::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0)));
        let mut count = 0;
        q.decompose_curves(DecomposeFlags::QUAD | DecomposeFlags::CUBIC, 0.1, |seg| {
            assert_eq!(seg.path_op(), PathOp::Quad);
            count += 1;
            true
        });
        assert_eq!(count, 1);
        // Without the quad flag it elevates to a single exact cubic.
        let mut cubics = 0;
        q.decompose_curves(DecomposeFlags::CUBIC, 0.1, |seg| {
            assert_eq!(seg.path_op(), PathOp::Cubic);
            assert!(seg.point(0.5).is_near(q.point(0.5), 1e-9));
            cubics += 1;
            true
        });
        assert_eq!(cubics, 1);
    }

    #[test]
    fn crossing_counts() {
        let c = arch();
        // Ray to the right from under the arch crosses the descending
        // leg once.
        assert_eq!(c.crossing(Point::new(50.0, 10.0)), -1);
        assert_eq!(c.crossing(Point::new(50.0, 100.0)), 0);
        assert_eq!(c.crossing(Point::new(150.0, 10.0)), 0);
        // From the left of the arch the ray crosses both legs.
        assert_eq!(c.crossing(Point::new(-50.0, 10.0)), 0);
        // Reversing the curve flips the winding.
        assert_eq!(c.reverse().crossing(Point::new(50.0, 10.0)), 1);
    }

    #[test]
    fn length_known_values() {
        let l = Curve::Line(Line::new((10.0, 10.0), (100.0, 130.0)));
        assert_eq!(l.length(), 150.0);

        // Closed form for this quadratic's arc length.
        let q = Curve::Quad(Quad::new((0.0, 0.0), (0.0, 0.5), (1.0, 1.0)));
        let expected = 0.5 * 5.0f64.sqrt() + 0.25 * (2.0 + 5.0f64.sqrt()).ln();
        assert!((q.length() - expected).abs() < 1e-9);

        let arc = quarter_circle();
        assert!((arc.length() - 50.0 * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn at_length_inverts_length_to() {
        for c in [arch(), quarter_circle()] {
            let total = c.length();
            for i in 0..=10 {
                let target = total * (i as f64) / 10.0;
                let t = c.at_length(target, 1e-9);
                assert!(
                    (c.length_to(t) - target).abs() < 1e-6,
                    "{c} at length {target}"
                );
            }
            assert_eq!(c.at_length(-5.0, 1e-9), 0.0);
            assert_eq!(c.at_length(total + 5.0, 1e-9), 1.0);
        }
    }

    #[test]
    fn closest_point_on_curves() {
        let q = Curve::Quad(Quad::new((-100.0, 100.0), (0.0, -100.0), (100.0, 100.0)));
        let (t, d) = q.closest_point(Point::new(0.0, -10.0), 1e3).unwrap();
        assert!((t - 0.5).abs() < 0.01);
        assert!((d - 10.0).abs() < 0.01);
        // Out of range.
        assert!(q.closest_point(Point::new(0.0, -10.0), 5.0).is_none());

        let arc = quarter_circle();
        let (t, d) = arc.closest_point(Point::new(30.0, 30.0), 1e3).unwrap();
        assert!((t - 0.5).abs() < 0.01);
        assert!((d - (100.0 - 1800.0f64.sqrt())).abs() < 0.01);
    }

    #[test]
    fn curvature_center_of_circle() {
        let arc = quarter_circle();
        for t in [0.0, 0.25, 0.5, 1.0] {
            let (k, center) = arc.curvature_with_center(t);
            assert!((k.abs() - 0.01).abs() < 1e-9);
            assert!(center.unwrap().is_near(Point::ZERO, 1e-6));
        }
        let l = Curve::Line(Line::new((0.0, 0.0), (10.0, 0.0)));
        assert_eq!(l.curvature_with_center(0.5), (0.0, None));
    }

    #[test]
    fn degenerate_tangents_are_unit() {
        let p = Point::new(7.0, 7.0);
        for c in [
            Curve::Line(Line::new(p, p)),
            Curve::Quad(Quad::new(p, p, p)),
            Curve::Cubic(Cubic::new(p, p, p, p)),
            Curve::Conic(Conic::new(p, p, p, 1.0)),
        ] {
            for v in [c.start_tangent(), c.end_tangent(), c.tangent(0.3)] {
                assert_eq!(v, Vec2::new(1.0, 0.0));
            }
        }
    }

    #[test]
    fn display_forms() {
        let l = Curve::Line(Line::new((10.0, 10.0), (20.0, 30.0)));
        assert_eq!(format!("{l}"), "M 10 10 L 20 30");
        let q = Curve::Quad(Quad::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0)));
        assert_eq!(format!("{q}"), "M 0 0 Q 50 100 100 0");
        let c = Curve::Cubic(Cubic::new(
            (0.0, 0.0),
            (0.0, 100.0),
            (100.0, 100.0),
            (100.0, 0.0),
        ));
        assert_eq!(format!("{c}"), "M 0 0 C 0 100 100 100 100 0");
        let o = Curve::Conic(Conic::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0), 0.5));
        assert_eq!(format!("{o}"), "M 0 0 O 50 100 100 0 0.5");
    }
}
