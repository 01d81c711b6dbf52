#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Editable vector paths.
//!
//! This crate is reexported in [vellum](../vellum/index.html).
//!
//! # Overview
//!
//! [`Path2D`] is built with move-to, line-to, quadratic and cubic bézier, arc and close
//! commands. It can be consumed through a [`PathIterator`](iterator::PathIterator)
//! cursor, a snapshot of its [`Segment`]s or an iterator of [`SegmentEvent`]s, and its
//! points can be edited one at a time.
//!
//! The curve primitives of `vellum_geom` implement the same [`Shape2D`] interface, so
//! renderers and hit-testers can treat a lone curve like a path.
//!
//! # Examples
//!
//! ```
//! use vellum_path::{Path2D, SegmentEvent};
//! use vellum_path::geom::point;
//!
//! # fn main() -> Result<(), vellum_path::PathError> {
//! let mut path = Path2D::new();
//! path.move_to(point(0.0, 0.0));
//! path.line_to(point(1.0, 2.0))?;
//! path.quad_to(point(2.0, 3.0), point(3.0, 0.0))?;
//! path.close_path()?;
//!
//! for event in path.events() {
//!     match event {
//!         SegmentEvent::MoveTo { at } => println!("move to {:?}", at),
//!         SegmentEvent::LineTo { to, .. } => println!("line to {:?}", to),
//!         SegmentEvent::QuadTo { ctrl, to, .. } => println!("quad {:?} {:?}", ctrl, to),
//!         SegmentEvent::CubicTo { to, .. } => println!("cubic to {:?}", to),
//!         SegmentEvent::Close { first, .. } => println!("close to {:?}", first),
//!     }
//! }
//!
//! let from_svg = Path2D::from_svg_path("M 0 0 L 1 2 Q 2 3 3 0 Z")?;
//! assert_eq!(from_svg.num_segments(), path.num_segments());
//! # Ok(())
//! # }
//! ```

pub use vellum_geom as geom;
pub use vellum_svg as svg;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod animation;
pub mod document;
mod error;
pub mod iterator;
pub mod path;
pub mod registry;
mod segment;
pub mod shape;
pub mod shapes;

#[doc(inline)]
pub use crate::animation::PathAnimator;
#[doc(inline)]
pub use crate::document::{Document, PathId, VectorHandle};
pub use crate::error::PathError;
pub use crate::geom::ArcFlags;
#[doc(inline)]
pub use crate::path::{circle_bezier_geometry, ArcOptions, Path2D};
#[doc(inline)]
pub use crate::registry::ShapeRegistry;
pub use crate::segment::{Segment, SegmentEvent, SegmentKind};
#[doc(inline)]
pub use crate::shape::{EditableShape, PointShape, Shape2D};

pub mod traits {
    //! `vellum_path` traits reexported here for convenience.

    pub use crate::geom::traits::{Animator, Transformation};
    pub use crate::iterator::PathIterator;
    pub use crate::shape::{EditableShape, Shape2D};
}
