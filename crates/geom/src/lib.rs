#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid, for vector editing.
//!
//! This crate is reexported in [vellum](../vellum/index.html).
//!
//! # Overview.
//!
//! This crate implements the maths behind the vellum path model:
//!
//! - axis-aligned bounds accumulation ([`Bounds2D`]),
//! - an affine transform that tracks which of its coefficients are trivial ([`AffineTransform`]),
//! - quadratic and cubic bézier curves with an arc-length sampling table,
//! - line segments and rectangles with the classic orientation and clipping tests,
//! - SVG-style elliptic arcs approximated with cubic bézier curves.
//!
//! All coordinates are `f64`. Points and vectors are euclid's `Point2D<f64>` and
//! `Vector2D<f64>`, so the usual euclid arithmetic is available on them.
//!
//! # Sparsity state
//!
//! [`AffineTransform`] keeps a small bitmask describing which coefficients of its matrix
//! are `0` or `1`. Every operation dispatches on that mask to pick the cheapest formula.
//! The mask is recomputed or updated incrementally after each mutation and always matches
//! the coefficients exactly.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
mod bounds;
pub mod cubic_bezier;
mod line;
pub mod quadratic_bezier;
mod rect;
pub mod sampling;
pub mod transform;
pub mod utils;

#[doc(inline)]
pub use crate::arc::{svg_arc_to_cubic_curves, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::bounds::Bounds2D;
#[doc(inline)]
pub use crate::cubic_bezier::CubicCurve2D;
#[doc(inline)]
pub use crate::line::{lines_intersect, pt_line_dist_sq, pt_seg_dist_sq, relative_ccw, Line2D};
#[doc(inline)]
pub use crate::quadratic_bezier::{QuadCurve2D, QuadraticRoots};
#[doc(inline)]
pub use crate::rect::Rect2D;
#[doc(inline)]
pub use crate::sampling::{ArcLengthTable, DEFAULT_SAMPLE_STEPS};
#[doc(inline)]
pub use crate::transform::{AffineTransform, DomMatrix, TransformError, TransformState};

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`
pub type Box2D = euclid::default::Box2D<f64>;

/// Alias for `euclid::default::Transform2D<f64>`
pub type Transform = euclid::default::Transform2D<f64>;

/// An angle in radians.
pub type Angle = euclid::Angle<f64>;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub mod traits {
    use crate::{Point, Transform, Vector};

    pub trait Transformation {
        fn transform_point(&self, p: Point) -> Point;
        fn transform_vector(&self, v: Vector) -> Vector;
    }

    impl Transformation for Transform {
        fn transform_point(&self, p: Point) -> Point {
            self.transform_point(p)
        }

        fn transform_vector(&self, v: Vector) -> Vector {
            self.transform_vector(v)
        }
    }

    // Automatically implement Transformation for all &Transformation.
    impl<'l, T: Transformation> Transformation for &'l T {
        #[inline]
        fn transform_point(&self, p: Point) -> Point {
            (*self).transform_point(p)
        }

        #[inline]
        fn transform_vector(&self, v: Vector) -> Vector {
            (*self).transform_vector(v)
        }
    }

    /// Something that can be sampled by an external animation scheduler.
    ///
    /// `t` is expected to be between 0 and 1. Implementations return the exact start
    /// and end positions for `t <= 0` and `t >= 1`.
    pub trait Animator {
        fn animation_value(&self, t: f64) -> Point;
    }
}
