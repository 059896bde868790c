// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An axis-aligned bounding box.

use std::fmt;

use crate::{Point, Vec2};

/// An axis-aligned rectangle, used to bound curves and prune search
/// recursions.
///
/// The invariant `min.x <= max.x && min.y <= max.y` holds for every
/// constructed value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// The minimum corner.
    pub min: Point,
    /// The maximum corner.
    pub max: Point,
}

impl BoundingBox {
    /// Create a box covering the two points, in any order.
    #[inline]
    pub fn new(p0: Point, p1: Point) -> BoundingBox {
        BoundingBox {
            min: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            max: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Create a degenerate box covering a single point.
    #[inline]
    pub fn from_point(p: Point) -> BoundingBox {
        BoundingBox { min: p, max: p }
    }

    /// Grow the box to cover `p`.
    #[inline]
    pub fn expand(&mut self, p: Point) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// The smallest box covering both boxes.
    #[inline]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Whether the boxes touch or overlap.
    ///
    /// Shared edges and corners count as intersecting.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// The overlap of the two boxes, if any.
    ///
    /// A shared edge yields a zero-area box rather than `None`.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }
        Some(BoundingBox {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        })
    }

    /// Whether `p` lies inside the box (boundary included).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Whether `p` lies inside the box grown by `epsilon` on every side.
    #[inline]
    pub fn contains_with_epsilon(&self, p: Point, epsilon: f64) -> bool {
        self.min.x - epsilon <= p.x
            && p.x <= self.max.x + epsilon
            && self.min.y - epsilon <= p.y
            && p.y <= self.max.y + epsilon
    }

    /// The extent of the box as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// The length of the box diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().hypot()
    }

    /// The center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} - {}", self.min, self.max)
    }
}
