// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations.

use arrayvec::ArrayVec;

use crate::{Point, Vec2};

/// A leading coefficient smaller than this, relative to the other
/// coefficients, demotes the polynomial to the next lower degree.
const DEGENERACY_EPS: f64 = 1e-4;

/// Two points closer than this are treated as coincident when choosing
/// tangent directions.
pub(crate) const NEAR_EPS: f64 = 1e-4;

/// Find real roots of a quadratic equation.
///
/// Returns values of x for which c0 + c1·x + c2·x² = 0.
///
/// If the equation is (nearly) linear, the single root of the linear
/// part is returned; the quadratic root this discards is far outside
/// any parameter interval of interest. In the fully degenerate case
/// where all coefficients are zero a single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    if c2 == 0.0 || c2.abs() <= DEGENERACY_EPS * c1.abs() {
        if c1 != 0.0 {
            let root = -c0 / c1;
            if root.is_finite() {
                result.push(root);
            }
        } else if c0 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let d = c1 * c1 - 4.0 * c2 * c0;
    if d < 0.0 {
        return result;
    }
    if d == 0.0 {
        result.push(-0.5 * c1 / c2);
        return result;
    }
    // See https://math.stackexchange.com/questions/866331 for the
    // cancellation-avoiding form.
    let q = -0.5 * (c1 + d.sqrt().copysign(c1));
    let root1 = q / c2;
    let root2 = c0 / q;
    if root2 > root1 {
        result.push(root1);
        result.push(root2);
    } else {
        result.push(root2);
        result.push(root1);
    }
    result
}

/// Find real roots of a cubic equation.
///
/// Returns values of x for which c0 + c1·x + c2·x² + c3·x³ = 0.
///
/// Uses Cardano's method, with the trigonometric form for the
/// three-real-root case. A (nearly) vanishing cubic coefficient falls
/// back to [`solve_quadratic`].
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let scale = c0.abs().max(c1.abs()).max(c2.abs());
    if c3 == 0.0 || c3.abs() <= DEGENERACY_EPS * scale {
        for root in solve_quadratic(c0, c1, c2) {
            result.push(root);
        }
        return result;
    }
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;
    let q = (a * a - 3.0 * b) / 9.0;
    let r = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a_third = a * (1.0 / 3.0);
    if r2 < q3 {
        const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
        let th = (r / q3.sqrt()).acos();
        let m = -2.0 * q.sqrt();
        result.push(m * (th * (1.0 / 3.0)).cos() - a_third);
        result.push(m * ((th + TWO_PI) * (1.0 / 3.0)).cos() - a_third);
        result.push(m * ((th - TWO_PI) * (1.0 / 3.0)).cos() - a_third);
    } else {
        let s = -(r.abs() + (r2 - q3).sqrt()).cbrt().copysign(r);
        let t = if s != 0.0 { q / s } else { 0.0 };
        result.push(s + t - a_third);
    }
    result
}

/// Keep only the roots strictly inside the unit interval.
pub(crate) fn filter_unit_interval<const N: usize>(roots: ArrayVec<f64, N>) -> ArrayVec<f64, N> {
    let mut result = ArrayVec::new();
    for t in roots {
        if t > 0.0 && t < 1.0 {
            result.push(t);
        }
    }
    result
}

/// Translate and rotate `pts` so that the chord from `a` to `b` lies on
/// the positive x axis starting at the origin.
pub(crate) fn align_points<const N: usize>(pts: &[Point; N], a: Point, b: Point) -> [Point; N] {
    let d = b - a;
    let hypot = d.hypot();
    let (c, s) = if hypot > 0.0 {
        (d.x / hypot, d.y / hypot)
    } else {
        (1.0, 0.0)
    };
    let mut aligned = [Point::ZERO; N];
    for (out, p) in aligned.iter_mut().zip(pts.iter()) {
        let v = *p - a;
        *out = Point::new(v.x * c + v.y * s, -v.x * s + v.y * c);
    }
    aligned
}

/// Unit direction from `a` to `b`, or `None` when the points (nearly)
/// coincide.
pub(crate) fn direction(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let hypot = d.hypot();
    if hypot > NEAR_EPS {
        Some(d / hypot)
    } else {
        None
    }
}

// Legendre-Gauss quadrature coefficients, adapted from:
// <https://pomax.github.io/bezierinfo/legendre-gauss.html>

/// 24-node Legendre-Gauss quadrature table, as (weight, xᵢ) pairs over
/// the interval [-1, 1].
pub const GAUSS_LEGENDRE_COEFFS_24: &[(f64, f64)] = &[
    (0.1279381953467522, -0.0640568928626056),
    (0.1279381953467522, 0.0640568928626056),
    (0.1258374563468283, -0.1911188674736163),
    (0.1258374563468283, 0.1911188674736163),
    (0.1216704729278034, -0.3150426796961634),
    (0.1216704729278034, 0.3150426796961634),
    (0.1155056680537256, -0.4337935076260451),
    (0.1155056680537256, 0.4337935076260451),
    (0.1074442701159656, -0.5454214713888396),
    (0.1074442701159656, 0.5454214713888396),
    (0.0976186521041139, -0.6480936519369755),
    (0.0976186521041139, 0.6480936519369755),
    (0.0861901615319533, -0.7401241915785544),
    (0.0861901615319533, 0.7401241915785544),
    (0.0733464814110803, -0.8200019859739029),
    (0.0733464814110803, 0.8200019859739029),
    (0.0592985849154368, -0.8864155270044011),
    (0.0592985849154368, 0.8864155270044011),
    (0.0442774388174198, -0.9382745520027328),
    (0.0442774388174198, 0.9382745520027328),
    (0.0285313886289337, -0.9747285559713095),
    (0.0285313886289337, 0.9747285559713095),
    (0.0123412297999872, -0.9951872199970213),
    (0.0123412297999872, 0.9951872199970213),
];

#[cfg(test)]
mod tests {
    use super::*;
    use arrayvec::ArrayVec;

    fn verify<const N: usize>(mut roots: ArrayVec<f64, N>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len(), "got {roots:?}");
        let epsilon = 1e-8;
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for i in 0..expected.len() {
            assert!(
                (roots[i] - expected[i]).abs() < epsilon,
                "root {i}: got {}, expected {}",
                roots[i],
                expected[i]
            );
        }
    }

    #[test]
    fn test_solve_cubic() {
        verify(solve_cubic(-5.0, 0.0, 0.0, 1.0), &[5.0f64.cbrt()]);
        verify(solve_cubic(-5.0, -1.0, 0.0, 1.0), &[1.90416085913492]);
        verify(solve_cubic(0.0, -1.0, 0.0, 1.0), &[-1.0, 0.0, 1.0]);
        verify(solve_cubic(-6.0, 11.0, -6.0, 1.0), &[1.0, 2.0, 3.0]);
        // Degenerate cubic coefficient falls through to the quadratic.
        verify(solve_cubic(2.0, -3.0, 1.0, 0.0), &[1.0, 2.0]);
    }

    #[test]
    fn test_solve_quadratic() {
        verify(
            solve_quadratic(-5.0, 0.0, 1.0),
            &[-(5.0f64.sqrt()), 5.0f64.sqrt()],
        );
        verify(solve_quadratic(5.0, 0.0, 1.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
        verify(solve_quadratic(0.0, 0.0, 0.0), &[0.0]);
    }

    #[test]
    fn test_align_points() {
        use crate::Point;
        let pts = [
            Point::new(1.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(5.0, 5.0),
        ];
        let aligned = align_points(&pts, pts[0], pts[2]);
        let len = 32.0f64.sqrt();
        assert!(aligned[0].is_near(Point::ZERO, 1e-12));
        assert!(aligned[1].is_near(Point::new(0.5 * len, 0.0), 1e-12));
        assert!(aligned[2].is_near(Point::new(len, 0.0), 1e-12));
    }

    #[test]
    fn test_filter_unit_interval() {
        let mut roots: ArrayVec<f64, 3> = ArrayVec::new();
        roots.push(-0.25);
        roots.push(0.5);
        roots.push(1.0);
        let filtered = filter_unit_interval(roots);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0], 0.5);
    }
}
