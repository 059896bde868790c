// Copyright 2026 the Curvekit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A geometry kernel for planar path segments.
//!
//! Curvekit models the four segment kinds a vector path is made of:
//! [`Line`], quadratic ([`Quad`]) and cubic ([`Cubic`]) Bézier
//! segments, and rational quadratics ([`Conic`]), with the [`Curve`]
//! enum dispatching over all of them.
//!
//! Every segment supports evaluation, tangents, curvature, splitting,
//! bounding boxes, arc length, winding tests, and decomposition into
//! simpler segment kinds; the [`intersect`] and [`self_intersect`]
//! functions find where curves cross.
//!
//! # Example
//!
//! ```
//! use curvekit::{Conic, Curve, Point};
//!
//! // A quarter circle of radius 100 around the origin.
//! let arc = Curve::Conic(Conic::new(
//!     (100.0, 0.0),
//!     (100.0, 100.0),
//!     (0.0, 100.0),
//!     0.5f64.sqrt(),
//! ));
//! let (curvature, center) = arc.curvature_with_center(0.5);
//! assert!((curvature.abs() - 0.01).abs() < 1e-9);
//! assert!(center.unwrap().is_near(Point::ZERO, 1e-6));
//! ```

mod bounding_box;
pub mod common;
mod conic;
mod cubic;
mod curve;
mod intersect;
mod line;
mod point;
mod quad;
mod vec2;

pub use crate::bounding_box::BoundingBox;
pub use crate::conic::Conic;
pub use crate::cubic::Cubic;
pub use crate::curve::{Curve, DecomposeFlags, LineReason, PathOp};
pub use crate::intersect::{intersect, self_intersect, Intersection, IntersectionKind};
pub use crate::line::Line;
pub use crate::point::Point;
pub use crate::quad::Quad;
pub use crate::vec2::Vec2;
