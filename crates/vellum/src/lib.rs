#![deny(bare_trait_objects)]

//! 2D path and transform geometry for vector editors.
//!
//! # Crates
//!
//! This meta-crate (`vellum`) reexports the following sub-crates for convenience:
//!
//! * **vellum_geom** - Bounds, affine transforms, quadratic and cubic bézier curves,
//!   lines, rectangles and SVG arcs.
//! * **vellum_svg** - Scanning SVG path data and reducing it to absolute `M`, `L`, `C`
//!   and `Z` commands.
//! * **vellum_path** - Editable paths, shape iteration, preset shapes, point handles and
//!   animation sampling.
//!
//! Each `vellum_<name>` crate is reexported as a `<name>` module in `vellum`. For example:
//!
//! ```ignore
//! extern crate vellum_path;
//! use vellum_path::Path2D;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate vellum;
//! use vellum::path::Path2D;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! `vellum_geom` can be used without the standard library by disabling the default
//! `std` feature.
//!
//! # Examples
//!
//! ## Importing SVG path data and moving it around
//!
//! ```
//! use vellum::geom::{point, vector, AffineTransform};
//! use vellum::path::Path2D;
//! use vellum::path::traits::*;
//!
//! fn main() {
//!     let path = Path2D::from_svg_path("M 10 10 h 20 v 20 q -10 10 -20 0 z").unwrap();
//!
//!     let mut transform = AffineTransform::identity();
//!     transform.translate(vector(5.0, 0.0)).rotate(std::f64::consts::PI);
//!
//!     let mut it = path.path_iterator(Some(&transform));
//!     let mut coords = [point(0.0, 0.0); 3];
//!     while !it.is_done() {
//!         let kind = it.current_segment(&mut coords).unwrap();
//!         println!("{:?} {:?}", kind, &coords[..kind.num_coords()]);
//!         it.next();
//!     }
//! }
//! ```
//!
//! ## Editing a point through a document handle
//!
//! ```
//! use vellum::geom::point;
//! use vellum::path::{Document, Path2D};
//!
//! fn main() {
//!     let mut document = Document::new();
//!     let id = document.add(Path2D::from_svg_path("M 0 0 L 10 0 L 10 10 Z").unwrap());
//!
//!     let handle = document.pick(point(9.5, 0.5), 1.0).unwrap();
//!     assert_eq!(handle.path, id);
//!
//!     document.set_vector_position(&handle, point(12.0, 0.0)).unwrap();
//!     assert_eq!(document.resolve(&handle), Some(point(12.0, 0.0)));
//! }
//! ```

pub extern crate vellum_geom;
pub extern crate vellum_path;
pub extern crate vellum_svg;

pub use vellum_geom as geom;
pub use vellum_path as path;
pub use vellum_svg as svg;

#[cfg(test)]
use approx::assert_relative_eq;

#[test]
fn svg_path_to_animation() {
    use crate::geom::point;
    use crate::geom::traits::Animator;
    use crate::path::{Path2D, PathAnimator};

    let path = Path2D::from_svg_path("M 0 0 A 10 10 0 0 1 20 0").unwrap();
    let animator = PathAnimator::from_path(&path);

    assert_eq!(animator.animation_value(0.0), point(0.0, 0.0));
    assert_eq!(animator.animation_value(1.0), point(20.0, 0.0));
    // Halfway along a half circle is close to its top.
    let top = animator.animation_value(0.5);
    assert_relative_eq!((top - point(10.0, 0.0)).length(), 10.0, epsilon = 0.05);
    assert_relative_eq!(top.x, 10.0, epsilon = 1.0);
}
