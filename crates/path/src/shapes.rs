//! Builders for the basic preset shapes.

use crate::geom::utils::deg_to_rad;
use crate::geom::{point, Point};
use crate::path::Path2D;
use crate::PathError;

/// An axis-aligned rectangle, starting at its top-left corner.
pub fn rect_shape(x: f64, y: f64, width: f64, height: f64) -> Result<Path2D, PathError> {
    let mut path = Path2D::with_capacity(5);
    path.move_to(point(x, y));
    path.line_to(point(x + width, y))?;
    path.line_to(point(x + width, y + height))?;
    path.line_to(point(x, y + height))?;
    path.close_path()?;

    Ok(path)
}

/// A circle, starting at its rightmost point.
pub fn circle_shape(cx: f64, cy: f64, radius: f64) -> Result<Path2D, PathError> {
    ellipse_shape(cx, cy, radius, radius)
}

/// An axis-aligned ellipse, starting at its rightmost point.
pub fn ellipse_shape(cx: f64, cy: f64, rx: f64, ry: f64) -> Result<Path2D, PathError> {
    let mut path = Path2D::with_capacity(10);
    path.move_to(point(cx + rx, cy));
    path.arc(
        point(cx, cy),
        rx,
        ry,
        deg_to_rad(0.0),
        deg_to_rad(360.0),
        false,
    )?;
    path.close_path()?;

    Ok(path)
}

/// A rectangle with rounded corners.
///
/// The corner radius is a third of the smallest side.
pub fn round_rect_shape(x: f64, y: f64, width: f64, height: f64) -> Result<Path2D, PathError> {
    let r = width.min(height) / 3.0;
    let corner = |center: Point, path: &mut Path2D, from: f64, to: f64| {
        path.arc(center, r, r, deg_to_rad(from), deg_to_rad(to), false)
    };

    let mut path = Path2D::with_capacity(14);
    path.move_to(point(x + r, y));
    path.line_to(point(x + width - r, y))?;
    corner(point(x + width - r, y + r), &mut path, 270.0, 360.0)?;
    path.line_to(point(x + width, y + height - r))?;
    corner(point(x + width - r, y + height - r), &mut path, 0.0, 90.0)?;
    path.line_to(point(x + r, y + height))?;
    corner(point(x + r, y + height - r), &mut path, 90.0, 180.0)?;
    path.line_to(point(x, y + r))?;
    corner(point(x + r, y + r), &mut path, 180.0, 270.0)?;
    path.close_path()?;

    Ok(path)
}

#[cfg(test)]
use crate::segment::SegmentKind;
#[cfg(test)]
use approx::assert_relative_eq;

#[test]
fn rect() {
    let path = rect_shape(1.0, 2.0, 10.0, 5.0).unwrap();
    assert_eq!(path.num_segments(), 5);
    assert_eq!(path.bounds2d().min, point(1.0, 2.0));
    assert_eq!(path.bounds2d().max, point(11.0, 7.0));
    assert_eq!(path.segment_kind(4), Some(SegmentKind::Close));
}

#[test]
fn circle() {
    let path = circle_shape(5.0, 5.0, 10.0).unwrap();

    // Move-to, eight curves and the close.
    assert_eq!(path.num_segments(), 10);
    let bounds = path.bounds2d();
    assert!(bounds.min.x <= -5.0 + 1e-9);
    assert!(bounds.max.x >= 15.0 - 1e-9);

    let end = path.coord(path.num_coords() - 1).unwrap();
    assert_relative_eq!(end.x, 15.0, epsilon = 1e-9);
    assert_relative_eq!(end.y, 5.0, epsilon = 1e-9);
}

#[test]
fn round_rect() {
    let path = round_rect_shape(0.0, 0.0, 30.0, 60.0).unwrap();

    // Each quarter corner is two curves.
    let curves = path.segments().iter().filter(|s| s.kind == SegmentKind::CubicTo).count();
    assert_eq!(curves, 8);
    assert_eq!(path.coord(0), Some(point(10.0, 0.0)));

    let bounds = path.bounds2d();
    assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.x, 30.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.y, 60.0, epsilon = 1e-9);
}

#[test]
fn ellipse() {
    let path = ellipse_shape(0.0, 0.0, 20.0, 10.0).unwrap();
    assert_eq!(path.num_segments(), 10);
    assert_eq!(path.coord(0), Some(point(20.0, 0.0)));

    let bounds = path.bounds2d();
    assert_relative_eq!(bounds.min.x, -20.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.min.y, -10.0, epsilon = 1e-9);
}
