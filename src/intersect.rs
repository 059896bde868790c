// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairwise and self intersection of curves.

use smallvec::SmallVec;

use crate::common::{align_points, solve_cubic, solve_quadratic, NEAR_EPS};
use crate::{Cubic, Curve, Line, Point, Quad};

/// Boxes with a diagonal at or below this are accepted as an
/// intersection point by the recursive searches.
const BOX_TOLERANCE: f64 = 1e-3;

/// Intersections closer together than this are treated as one.
const DEDUP_DISTANCE: f64 = 0.1;

/// Recursion limit for the bisection searches.
const MAX_DEPTH: u32 = 25;

/// Slack for accepting parameters just outside [0, 1] from the
/// analytic solvers; accepted values are clamped.
const ACCEPT_EPS: f64 = 1e-6;

/// How an intersection record relates the two curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionKind {
    /// The curves cross or touch in a single point.
    Normal,
    /// The curves start running together here.
    Start,
    /// The curves stop running together here.
    End,
}

/// A single intersection record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// The parameter on the first curve.
    pub t1: f64,
    /// The parameter on the second curve.
    pub t2: f64,
    /// The intersection point.
    pub point: Point,
    /// How the curves meet here.
    pub kind: IntersectionKind,
}

type Intersections = SmallVec<[Intersection; 9]>;

/// Find intersections between two curves, at most `max_results` of
/// them.
///
/// Line pairs and lines against quadratics or cubics are solved in
/// closed form; everything else is found by recursive bisection with
/// bounding box pruning. Curves that run together over a stretch are
/// reported as a [`Start`](IntersectionKind::Start) and an
/// [`End`](IntersectionKind::End) record delimiting the overlap.
pub fn intersect(c1: &Curve, c2: &Curve, max_results: usize) -> Intersections {
    let mut results = Intersections::new();
    if max_results == 0 || !c1.bounds().intersects(&c2.bounds()) {
        return results;
    }
    if coincident(c1, c2) {
        results.push(Intersection {
            t1: 0.0,
            t2: 0.0,
            point: c1.start_point(),
            kind: IntersectionKind::Start,
        });
        results.push(Intersection {
            t1: 1.0,
            t2: 1.0,
            point: c1.end_point(),
            kind: IntersectionKind::End,
        });
        results.truncate(max_results);
        return results;
    }
    let product = degree(c1) * degree(c2);
    let cap = product + 1;
    match (c1, c2) {
        (Curve::Line(a), Curve::Line(b)) => line_line(a, b, &mut results),
        (Curve::Line(l), Curve::Quad(q)) => line_quad(l, q, false, &mut results),
        (Curve::Quad(q), Curve::Line(l)) => line_quad(l, q, true, &mut results),
        (Curve::Line(l), Curve::Cubic(c)) => line_cubic(l, c, false, &mut results),
        (Curve::Cubic(c), Curve::Line(l)) => line_cubic(l, c, true, &mut results),
        (Curve::Conic(_), _) | (_, Curve::Conic(_)) => {
            general_intersect_recurse(c1, c2, (0.0, 1.0), (0.0, 1.0), 0, cap, &mut results);
        }
        _ => {
            curve_intersect_recurse(c1, c2, (0.0, 1.0), (0.0, 1.0), 0, cap, &mut results);
        }
    }
    if results.len() > product && results.iter().all(|i| i.kind == IntersectionKind::Normal) {
        // More hits than the degrees allow means the curves run
        // together; reduce the cluster to the overlap endpoints.
        collapse_overlap(c1, c2, &mut results);
    }
    results.truncate(max_results);
    results
}

/// Find the self intersection of a curve, if any.
///
/// Only cubics can self intersect. The cubic is split at its loop
/// point, the halves are intersected, and their shared join is
/// discarded.
pub fn self_intersect(c: &Curve, max_results: usize) -> SmallVec<[Intersection; 2]> {
    let mut results = SmallVec::new();
    let Curve::Cubic(cubic) = c else {
        return results;
    };
    let split_points = cubic.curvature_points();
    if split_points.is_empty() {
        return results;
    }
    let s = split_points[0];
    let (a, b) = cubic.split(s);
    for hit in intersect(&Curve::Cubic(a), &Curve::Cubic(b), 9) {
        // The halves always meet where they were split apart.
        if hit.t1 > 0.99 && hit.t2 < 0.01 {
            continue;
        }
        results.push(Intersection {
            t1: s * hit.t1,
            t2: s + (1.0 - s) * hit.t2,
            point: hit.point,
            kind: IntersectionKind::Normal,
        });
        if results.len() >= max_results.min(2) {
            break;
        }
    }
    results
}

fn degree(c: &Curve) -> usize {
    match c {
        Curve::Line(_) => 1,
        Curve::Quad(_) | Curve::Conic(_) => 2,
        Curve::Cubic(_) => 3,
    }
}

fn coincident(c1: &Curve, c2: &Curve) -> bool {
    match (c1, c2) {
        (Curve::Line(a), Curve::Line(b)) => {
            a.p0.is_near(b.p0, NEAR_EPS) && a.p1.is_near(b.p1, NEAR_EPS)
        }
        (Curve::Quad(a), Curve::Quad(b)) => points_near(a.points(), b.points()),
        (Curve::Cubic(a), Curve::Cubic(b)) => points_near(a.points(), b.points()),
        (Curve::Conic(a), Curve::Conic(b)) => {
            points_near(a.points(), b.points()) && (a.weight() - b.weight()).abs() < NEAR_EPS
        }
        _ => false,
    }
}

fn points_near<const N: usize>(a: &[Point; N], b: &[Point; N]) -> bool {
    a.iter().zip(b).all(|(p, q)| p.is_near(*q, NEAR_EPS))
}

fn add_intersection(results: &mut Intersections, t1: f64, t2: f64, point: Point) {
    if results
        .iter()
        .any(|i| i.point.distance(point) < DEDUP_DISTANCE)
    {
        return;
    }
    results.push(Intersection {
        t1,
        t2,
        point,
        kind: IntersectionKind::Normal,
    });
}

fn unit_clamped(t: f64) -> Option<f64> {
    (-ACCEPT_EPS..=1.0 + ACCEPT_EPS)
        .contains(&t)
        .then(|| t.clamp(0.0, 1.0))
}

fn line_line(l1: &Line, l2: &Line, results: &mut Intersections) {
    let d1 = l1.p1 - l1.p0;
    let d2 = l2.p1 - l2.p0;
    let diff = l2.p0 - l1.p0;
    let det = d1.cross(d2);
    if det.abs() > 1e-9 * (d1.hypot() * d2.hypot()).max(1.0) {
        let t1 = diff.cross(d2) / det;
        let t2 = diff.cross(d1) / det;
        if let (Some(t1), Some(t2)) = (unit_clamped(t1), unit_clamped(t2)) {
            add_intersection(results, t1, t2, l1.eval(t1));
        }
        return;
    }
    // Parallel. Only collinear segments can intersect, over their
    // projected overlap.
    let n = d1.hypot();
    if n == 0.0 || diff.cross(d1).abs() > 1e-9 * n * diff.hypot().max(1.0) {
        return;
    }
    let s0 = l1.project(l2.p0);
    let s1 = l1.project(l2.p1);
    let lo = s0.min(s1).max(0.0);
    let hi = s0.max(s1).min(1.0);
    if lo > hi {
        return;
    }
    let p_lo = l1.eval(lo);
    let p_hi = l1.eval(hi);
    if hi - lo < 1e-9 {
        add_intersection(results, lo, l2.project(p_lo).clamp(0.0, 1.0), p_lo);
        return;
    }
    results.push(Intersection {
        t1: lo,
        t2: l2.project(p_lo).clamp(0.0, 1.0),
        point: p_lo,
        kind: IntersectionKind::Start,
    });
    results.push(Intersection {
        t1: hi,
        t2: l2.project(p_hi).clamp(0.0, 1.0),
        point: p_hi,
        kind: IntersectionKind::End,
    });
}

fn line_quad(l: &Line, q: &Quad, swapped: bool, results: &mut Intersections) {
    let y = align_points(q.points(), l.p0, l.p1).map(|p| p.y);
    let roots = solve_quadratic(y[0], 2.0 * (y[1] - y[0]), y[2] - 2.0 * y[1] + y[0]);
    add_line_curve_roots(l, &Curve::Quad(*q), &roots, swapped, results);
}

fn line_cubic(l: &Line, c: &Cubic, swapped: bool, results: &mut Intersections) {
    let y = align_points(c.points(), l.p0, l.p1).map(|p| p.y);
    let roots = solve_cubic(
        y[0],
        3.0 * (y[1] - y[0]),
        3.0 * (y[2] - 2.0 * y[1] + y[0]),
        y[3] - 3.0 * y[2] + 3.0 * y[1] - y[0],
    );
    add_line_curve_roots(l, &Curve::Cubic(*c), &roots, swapped, results);
}

fn add_line_curve_roots(
    l: &Line,
    curve: &Curve,
    roots: &[f64],
    swapped: bool,
    results: &mut Intersections,
) {
    for &root in roots {
        let Some(t) = unit_clamped(root) else {
            continue;
        };
        let point = curve.point(t);
        let Some(s) = unit_clamped(l.project(point)) else {
            continue;
        };
        let (t1, t2) = if swapped { (t, s) } else { (s, t) };
        add_intersection(results, t1, t2, point);
    }
}

/// Bisection search for quadratic and cubic pairs. The sub-curves are
/// carried along and re-split, which is cheap for polynomial segments.
fn curve_intersect_recurse(
    p1: &Curve,
    p2: &Curve,
    t1: (f64, f64),
    t2: (f64, f64),
    depth: u32,
    cap: usize,
    results: &mut Intersections,
) {
    if results.len() >= cap || depth >= MAX_DEPTH {
        return;
    }
    if !p1.bounds().intersects(&p2.bounds()) {
        return;
    }
    let b1 = p1.tight_bounds();
    let b2 = p2.tight_bounds();
    if !b1.intersects(&b2) {
        return;
    }
    let t1m = 0.5 * (t1.0 + t1.1);
    let t2m = 0.5 * (t2.0 + t2.1);
    if b1.diagonal() <= BOX_TOLERANCE && b2.diagonal() <= BOX_TOLERANCE {
        add_intersection(results, t1m, t2m, p1.point(0.5));
        return;
    }
    let (p11, p12) = p1.split(0.5);
    let (p21, p22) = p2.split(0.5);
    let depth = depth + 1;
    curve_intersect_recurse(&p11, &p21, (t1.0, t1m), (t2.0, t2m), depth, cap, results);
    curve_intersect_recurse(&p11, &p22, (t1.0, t1m), (t2m, t2.1), depth, cap, results);
    curve_intersect_recurse(&p12, &p21, (t1m, t1.1), (t2.0, t2m), depth, cap, results);
    curve_intersect_recurse(&p12, &p22, (t1m, t1.1), (t2m, t2.1), depth, cap, results);
}

/// Bisection search on parameter ranges of the original curves. Conic
/// sub-curves do not renormalize well under repeated splitting, so the
/// sub-curve is cut fresh from the whole curve at every step.
fn general_intersect_recurse(
    c1: &Curve,
    c2: &Curve,
    t1: (f64, f64),
    t2: (f64, f64),
    depth: u32,
    cap: usize,
    results: &mut Intersections,
) {
    if results.len() >= cap || depth >= MAX_DEPTH {
        return;
    }
    let b1 = c1.segment(t1.0, t1.1).tight_bounds();
    let b2 = c2.segment(t2.0, t2.1).tight_bounds();
    if !b1.intersects(&b2) {
        return;
    }
    let t1m = 0.5 * (t1.0 + t1.1);
    let t2m = 0.5 * (t2.0 + t2.1);
    if b1.diagonal() <= BOX_TOLERANCE && b2.diagonal() <= BOX_TOLERANCE {
        add_intersection(results, t1m, t2m, c1.point(t1m));
        return;
    }
    let depth = depth + 1;
    general_intersect_recurse(c1, c2, (t1.0, t1m), (t2.0, t2m), depth, cap, results);
    general_intersect_recurse(c1, c2, (t1.0, t1m), (t2m, t2.1), depth, cap, results);
    general_intersect_recurse(c1, c2, (t1m, t1.1), (t2.0, t2m), depth, cap, results);
    general_intersect_recurse(c1, c2, (t1m, t1.1), (t2m, t2.1), depth, cap, results);
}

/// Replace a cluster of bisection hits from two overlapping curves
/// with the endpoints of the overlap stretch.
fn collapse_overlap(c1: &Curve, c2: &Curve, results: &mut Intersections) {
    let mut anchors: SmallVec<[Intersection; 4]> = SmallVec::new();
    for t in [0.0, 1.0] {
        let p = c1.point(t);
        if let Some((t2, _)) = c2.closest_point(p, DEDUP_DISTANCE) {
            anchors.push(Intersection {
                t1: t,
                t2,
                point: p,
                kind: IntersectionKind::Normal,
            });
        }
        let q = c2.point(t);
        if let Some((t1, _)) = c1.closest_point(q, DEDUP_DISTANCE) {
            anchors.push(Intersection {
                t1,
                t2: t,
                point: q,
                kind: IntersectionKind::Normal,
            });
        }
    }
    let mut deduped: SmallVec<[Intersection; 4]> = SmallVec::new();
    for a in anchors {
        if !deduped
            .iter()
            .any(|i| i.point.distance(a.point) < DEDUP_DISTANCE)
        {
            deduped.push(a);
        }
    }
    if deduped.len() < 2 {
        return;
    }
    deduped.sort_by(|a, b| a.t1.total_cmp(&b.t1));
    let mut start = deduped[0];
    let mut end = deduped[deduped.len() - 1];
    start.kind = IntersectionKind::Start;
    end.kind = IntersectionKind::End;
    results.clear();
    results.push(start);
    results.push(end);
}
