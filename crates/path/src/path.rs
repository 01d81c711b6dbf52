//! The editable path data structure.

use crate::geom::arc::ArcCubics;
use crate::geom::utils::{normalize_360_radians, perpendicular, points_equal};
use crate::geom::{
    point, svg_arc_to_cubic_curves, vector, AffineTransform, ArcFlags, Bounds2D, Point,
    TransformError, Vector,
};
use crate::iterator::{Events, PathIter};
use crate::segment::{Segment, SegmentKind};
use crate::svg::{self, SvgEvent};
use crate::PathError;

use std::f64::consts::PI;

/// Parameters of [`Path2D::arc_with_options`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcOptions {
    /// Number of cubic bézier curves used per quarter of a full turn.
    ///
    /// Values below 1 are treated as 1.
    pub steps_per_quarter: u32,
}

impl ArcOptions {
    pub const DEFAULT: Self = ArcOptions {
        steps_per_quarter: 2,
    };
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An editable 2D path.
///
/// # Representation
///
/// A path keeps two views of the same geometry, updated together:
///
/// - a buffer of segment kinds and a flat buffer of points, where each kind consumes
///   [`SegmentKind::num_coords`] points (the start point of a segment is the end point
///   of the previous one),
/// - a list of [`Segment`]s that each carry a copy of every point needed to draw them
///   on their own, including their start point.
///
/// The first command of a path is always a move-to. Drawing commands on an empty path
/// fail with [`PathError::MissingMoveTo`].
///
/// The bounds of the path are accumulated from every point passed to the builder
/// methods, control points included. They never shrink.
///
/// # Examples
///
/// ```
/// use vellum_path::Path2D;
/// use vellum_path::geom::point;
///
/// # fn main() -> Result<(), vellum_path::PathError> {
/// let mut path = Path2D::new();
/// path.move_to(point(0.0, 0.0));
/// path.line_to(point(10.0, 0.0))?;
/// path.line_to(point(10.0, 10.0))?;
/// path.close_path()?;
///
/// assert_eq!(path.num_segments(), 4);
/// assert_eq!(path.bounds2d().max, point(10.0, 10.0));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path2D {
    types: Vec<SegmentKind>,
    coords: Vec<Point>,
    segments: Vec<Segment>,
    bounds: Bounds2D,
    last_move_to: Option<Point>,
    pub stroke: bool,
    pub fill: bool,
}

impl Default for Path2D {
    fn default() -> Self {
        Path2D::new()
    }
}

impl Path2D {
    /// Creates an empty path, stroked and not filled.
    pub fn new() -> Self {
        Path2D {
            types: Vec::new(),
            coords: Vec::new(),
            segments: Vec::new(),
            bounds: Bounds2D::new(),
            last_move_to: None,
            stroke: true,
            fill: false,
        }
    }

    pub fn with_capacity(segments: usize) -> Self {
        Path2D {
            types: Vec::with_capacity(segments),
            coords: Vec::with_capacity(segments * 2),
            segments: Vec::with_capacity(segments),
            ..Path2D::new()
        }
    }

    /// Starts a new sub-path at `to`.
    ///
    /// If the previous command is also a move-to, it is replaced instead of leaving an
    /// empty sub-path behind.
    pub fn move_to(&mut self, to: Point) {
        nan_check(to);
        if self.types.last() == Some(&SegmentKind::MoveTo) {
            if let Some(last) = self.coords.last_mut() {
                *last = to;
            }
            if let Some(segment) = self.segments.last_mut() {
                segment.coords[0] = to;
            }
        } else {
            self.types.push(SegmentKind::MoveTo);
            self.coords.push(to);
            self.push_segment(SegmentKind::MoveTo, &[to]);
        }

        self.last_move_to = Some(to);
        self.bounds.add_point(to);
    }

    /// Adds a line from the current point to `to`.
    ///
    /// A line that ends where it starts is recorded in the flat buffer but does not
    /// produce a segment.
    pub fn line_to(&mut self, to: Point) -> Result<(), PathError> {
        let from = self.begin_segment()?;
        nan_check(to);

        self.types.push(SegmentKind::LineTo);
        self.coords.push(to);
        if !points_equal(from, to) {
            self.push_segment(SegmentKind::LineTo, &[from, to]);
        }
        self.bounds.add_point(to);

        Ok(())
    }

    /// Adds a quadratic bézier curve from the current point to `to`.
    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> Result<(), PathError> {
        let from = self.begin_segment()?;
        nan_check(ctrl);
        nan_check(to);

        self.types.push(SegmentKind::QuadTo);
        self.coords.push(ctrl);
        self.coords.push(to);
        self.push_segment(SegmentKind::QuadTo, &[from, ctrl, to]);
        self.bounds.add_point(ctrl);
        self.bounds.add_point(to);

        Ok(())
    }

    /// Adds a cubic bézier curve from the current point to `to`.
    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> Result<(), PathError> {
        let from = self.begin_segment()?;
        nan_check(ctrl1);
        nan_check(ctrl2);
        nan_check(to);

        self.types.push(SegmentKind::CubicTo);
        self.coords.push(ctrl1);
        self.coords.push(ctrl2);
        self.coords.push(to);
        self.push_segment(SegmentKind::CubicTo, &[from, ctrl1, ctrl2, to]);
        self.bounds.add_point(ctrl1);
        self.bounds.add_point(ctrl2);
        self.bounds.add_point(to);

        Ok(())
    }

    /// Closes the current sub-path with a line back to its first point.
    pub fn close_path(&mut self) -> Result<(), PathError> {
        let from = self.begin_segment()?;
        let first = self.last_move_to.ok_or(PathError::MissingMoveTo)?;

        self.types.push(SegmentKind::Close);
        self.push_segment(SegmentKind::Close, &[from, first]);

        Ok(())
    }

    /// Adds an elliptic arc centered on `center`, from `start_angle` to `end_angle`
    /// (in radians, clockwise in a y-down coordinate system unless `counterclockwise`).
    ///
    /// The arc is made of cubic bézier curves. No line is added between the current
    /// point and the start of the arc.
    pub fn arc(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) -> Result<(), PathError> {
        self.arc_with_options(
            center,
            rx,
            ry,
            start_angle,
            end_angle,
            counterclockwise,
            &ArcOptions::DEFAULT,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_with_options(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
        options: &ArcOptions,
    ) -> Result<(), PathError> {
        self.begin_segment()?;

        let (mut start, mut end) = if counterclockwise {
            (end_angle, start_angle)
        } else {
            (start_angle, end_angle)
        };
        if start < 0.0 {
            start = normalize_360_radians(start);
        }
        if end < 0.0 {
            end = normalize_360_radians(end);
        }

        let mut buffer = circle_bezier_geometry(start, end, options.steps_per_quarter);
        if counterclockwise {
            buffer.reverse();
        }

        let mut transform = AffineTransform::translation(center.x, center.y);
        transform.scale(rx, ry);

        for curve in buffer[1..].chunks_exact(3) {
            self.cubic_to(
                transform.transform_point(curve[0]),
                transform.transform_point(curve[1]),
                transform.transform_point(curve[2]),
            )?;
        }

        Ok(())
    }

    /// Adds an SVG-style elliptic arc from the current point to `to`.
    ///
    /// `x_rotation` is in degrees. The arc is appended as cubic bézier curves, which
    /// are also returned as `[ctrl1, ctrl2, to]` triples.
    pub fn svg_arc_to(
        &mut self,
        radii: Vector,
        x_rotation: f64,
        flags: ArcFlags,
        to: Point,
    ) -> Result<ArcCubics, PathError> {
        let from = self.begin_segment()?;
        nan_check(to);

        let curves = svg_arc_to_cubic_curves(from, to, radii, x_rotation, flags);
        for &[ctrl1, ctrl2, to] in &curves {
            self.cubic_to(ctrl1, ctrl2, to)?;
        }

        Ok(curves)
    }

    /// The point the next drawing command starts from.
    ///
    /// After a close this is the first point of the closed sub-path.
    pub fn get_current_point(&self) -> Option<Point> {
        let last = *self.types.last()?;
        if last != SegmentKind::Close {
            return self.coords.last().copied();
        }

        let mut idx = self.coords.len();
        for kind in self.types.iter().rev() {
            idx = idx.checked_sub(kind.num_coords())?;
            if *kind == SegmentKind::MoveTo {
                return self.coords.get(idx).copied();
            }
        }

        None
    }

    /// Moves the point `vector` of segment `segment`.
    ///
    /// The segment's own copy is always updated. If the point is one of the segment's
    /// points in the flat buffer (not its copied start point, and not a close), the flat
    /// buffer is updated too, so iteration sees the change. Neighbouring segments keep
    /// their copies. The bounds grow to include the new position.
    pub fn set_vector_position(
        &mut self,
        segment: usize,
        vector: usize,
        value: Point,
    ) -> Result<(), PathError> {
        nan_check(value);
        let invalid = PathError::InvalidHandle { segment, vector };
        let seg = self.segments.get_mut(segment).ok_or(invalid.clone())?;
        let slot = seg.coords.get_mut(vector).ok_or(invalid)?;
        *slot = value;

        if let Some(first) = seg.first_owned_vector() {
            if vector >= first {
                if let Some(p) = self.coords.get_mut(seg.coord_offset + vector - first) {
                    *p = value;
                }
            }
        }
        self.bounds.add_point(value);

        Ok(())
    }

    /// Number of commands in the path, including the ones that did not produce a
    /// segment.
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn segment_kind(&self, index: usize) -> Option<SegmentKind> {
        self.types.get(index).copied()
    }

    /// The point at `index` in the flat coordinate buffer.
    #[inline]
    pub fn coord(&self, index: usize) -> Option<Point> {
        self.coords.get(index).copied()
    }

    #[inline]
    pub fn num_coords(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    #[inline]
    pub fn bounds2d(&self) -> Bounds2D {
        self.bounds
    }

    #[inline]
    pub fn last_move_to(&self) -> Option<Point> {
        self.last_move_to
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Copies of the segments, optionally transformed.
    pub fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        match transform {
            Some(transform) => self
                .segments
                .iter()
                .map(|segment| segment.transformed(transform))
                .collect(),
            None => self.segments.clone(),
        }
    }

    /// A cursor over the flat buffer, optionally transformed.
    pub fn path_iterator(&self, transform: Option<&AffineTransform>) -> PathIter {
        PathIter::new(&self.types, &self.coords, transform)
    }

    /// Iterates over the commands of the path as [`SegmentEvent`](crate::SegmentEvent)s.
    pub fn events(&self) -> Events {
        Events::new(&self.types, &self.coords)
    }

    /// Builds a new path with every point mapped through `transform`.
    ///
    /// Fails if the transform has non-finite coefficients or maps a point out of the
    /// range of `f64`.
    pub fn transformed(&self, transform: &AffineTransform) -> Result<Self, PathError> {
        if !transform.is_finite() {
            return Err(TransformError::NonFinite.into());
        }

        let mut coords = self.coords.clone();
        let n = coords.len();
        transform.transform(&mut coords, 0, n);
        if let Some(p) = coords.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(PathError::NonFiniteCoordinate(*p));
        }

        let mut path = Path2D::with_capacity(self.types.len());
        path.stroke = self.stroke;
        path.fill = self.fill;

        // Replaying through the builder keeps every view consistent.
        let mut idx = 0;
        for kind in &self.types {
            let p = &coords[idx..idx + kind.num_coords()];
            match kind {
                SegmentKind::MoveTo => path.move_to(p[0]),
                SegmentKind::LineTo => path.line_to(p[0])?,
                SegmentKind::QuadTo => path.quad_to(p[0], p[1])?,
                SegmentKind::CubicTo => path.cubic_to(p[0], p[1], p[2])?,
                SegmentKind::Close => path.close_path()?,
            }
            idx += kind.num_coords();
        }

        Ok(path)
    }

    /// Builds a path from a list of absolute `M`, `L`, `C` and `Z` commands.
    ///
    /// Any other command fails with [`PathError::UnreducedCommand`]; run the events
    /// through [`vellum_svg::reduce`](crate::svg::reduce) first.
    pub fn from_commands(events: &[SvgEvent]) -> Result<Self, PathError> {
        let mut path = Path2D::new();
        for event in events {
            match *event {
                SvgEvent::MoveTo(to) => path.move_to(to),
                SvgEvent::LineTo(to) => path.line_to(to)?,
                SvgEvent::CubicTo(ctrl1, ctrl2, to) => path.cubic_to(ctrl1, ctrl2, to)?,
                SvgEvent::Close => path.close_path()?,
                _ => return Err(PathError::UnreducedCommand(event.command())),
            }
        }

        Ok(path)
    }

    /// Parses SVG path data into a single path.
    ///
    /// Parsing stops at the first malformed command; the commands before it are kept.
    pub fn from_svg_path(src: &str) -> Result<Self, PathError> {
        Path2D::from_commands(&svg::path_data(src))
    }

    /// Parses SVG path data into one path per sub-path.
    pub fn subpath_array_from_svg_path(src: &str) -> Result<Vec<Self>, PathError> {
        svg::subpath_array(src)
            .iter()
            .map(|events| Path2D::from_commands(events))
            .collect()
    }

    // Checks that the path was started and returns the current point.
    fn begin_segment(&self) -> Result<Point, PathError> {
        if self.types.first() != Some(&SegmentKind::MoveTo) {
            return Err(PathError::MissingMoveTo);
        }

        self.get_current_point().ok_or(PathError::MissingMoveTo)
    }

    fn push_segment(&mut self, kind: SegmentKind, coords: &[Point]) {
        let offset = self.coords.len() - kind.num_coords();
        let segment = Segment::new(kind, coords, self.segments.len()).with_offset(offset);
        self.segments.push(segment);
    }
}

const ANGLE_EPSILON: f64 = 1e-9;

/// Approximates an arc of the unit circle with cubic bézier curves.
///
/// Returns the start point followed by `ctrl1, ctrl2, to` for each curve. Angles are in
/// radians and are expected in `[0, 2π)`; negative angles and a full turn are treated
/// as 0. The arc always goes from `start_angle` in the direction of increasing
/// angles, wrapping around if `end_angle` is smaller.
///
/// The circle is divided in `4 * steps_per_quarter` sectors. Each sector the arc covers
/// fully becomes one curve, and the partially covered sectors at both ends become
/// shorter curves. Degenerate curves are skipped.
pub fn circle_bezier_geometry(start_angle: f64, end_angle: f64, steps_per_quarter: u32) -> Vec<Point> {
    let normalize = |angle: f64| {
        if !(0.0..2.0 * PI - ANGLE_EPSILON).contains(&angle) {
            0.0
        } else {
            angle
        }
    };
    let start_angle = normalize(start_angle);
    let end_angle = normalize(end_angle);

    let steps = steps_per_quarter.max(1) as usize;
    let num_sectors = steps * 4;
    let sector_angle = (PI / 2.0) / steps as f64;
    let sector_of = |angle: f64| {
        // Angles within rounding error of a sector boundary start the next sector.
        let ratio = angle / sector_angle;
        let ratio = if (ratio - ratio.round()).abs() < ANGLE_EPSILON {
            ratio.round()
        } else {
            ratio.floor()
        };
        (ratio as usize) % num_sectors
    };
    let start_sector = sector_of(start_angle);
    let end_sector = sector_of(end_angle);
    let sector_kappa = kappa(sector_angle);

    let unit = |angle: f64| {
        let (sin, cos) = angle.sin_cos();
        point(cos, sin)
    };

    let mut buffer = Vec::with_capacity(1 + 3 * (num_sectors + 1));
    let mut seg_start = unit(start_angle);
    buffer.push(seg_start);

    if start_sector == end_sector && start_angle < end_angle {
        let seg_end = unit(end_angle);
        let k = kappa(end_angle - start_angle);
        buffer.push(seg_start + perp(seg_start) * k);
        buffer.push(seg_end - perp(seg_end) * k);
        buffer.push(seg_end);
        return buffer;
    }

    let push_curve = |buffer: &mut Vec<Point>, from: Point, to: Point, k: f64| {
        let ctrl1 = from + perp(from) * k;
        let ctrl2 = to - perp(to) * k;
        if !(points_equal(ctrl1, ctrl2) || points_equal(ctrl2, to)) {
            buffer.push(ctrl1);
            buffer.push(ctrl2);
            buffer.push(to);
        }
    };

    // Partial first sector.
    let seg_end_angle = (start_sector + 1) as f64 * sector_angle;
    let seg_end = unit(seg_end_angle);
    push_curve(&mut buffer, seg_start, seg_end, kappa(seg_end_angle - start_angle));
    seg_start = seg_end;

    // Full sectors.
    let mut sector = (start_sector + 1) % num_sectors;
    while sector != end_sector {
        let seg_end = unit((sector + 1) as f64 * sector_angle);
        push_curve(&mut buffer, seg_start, seg_end, sector_kappa);
        sector = (sector + 1) % num_sectors;
        seg_start = seg_end;
    }

    // Partial last sector.
    let seg_start_angle = sector as f64 * sector_angle;
    push_curve(
        &mut buffer,
        seg_start,
        unit(end_angle),
        kappa(end_angle - seg_start_angle),
    );

    buffer
}

// Distance from the end points of a circular arc of the unit circle to the control points
// of its cubic bézier approximation.
fn kappa(angle: f64) -> f64 {
    if (0.0..=2.0 * PI).contains(&angle) {
        4.0 / 3.0 * (angle / 4.0).tan()
    } else {
        0.0
    }
}

#[inline]
fn perp(p: Point) -> Vector {
    perpendicular(vector(p.x, p.y))
}

#[inline]
fn nan_check(p: Point) {
    debug_assert!(p.x.is_finite());
    debug_assert!(p.y.is_finite());
}

#[cfg(test)]
use crate::geom::utils::deg_to_rad;
#[cfg(test)]
use crate::segment::SegmentEvent;
#[cfg(test)]
use approx::assert_relative_eq;

#[cfg(test)]
fn square() -> Path2D {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    path.close_path().unwrap();
    path
}

#[test]
fn num_segments_after_line_to() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    for i in 1..=5 {
        path.line_to(point(i as f64, 0.0)).unwrap();
    }

    assert_eq!(path.num_segments(), 6);
    assert_eq!(path.segments().len(), 6);
    assert_eq!(path.num_coords(), 6);
    assert_eq!(path.coord(5), Some(point(5.0, 0.0)));
}

#[test]
fn drawing_requires_move_to() {
    let mut path = Path2D::new();
    assert_eq!(path.line_to(point(1.0, 1.0)), Err(PathError::MissingMoveTo));
    assert_eq!(
        path.quad_to(point(1.0, 1.0), point(2.0, 0.0)),
        Err(PathError::MissingMoveTo)
    );
    assert_eq!(path.close_path(), Err(PathError::MissingMoveTo));
    assert_eq!(
        path.arc(point(0.0, 0.0), 1.0, 1.0, 0.0, PI, false),
        Err(PathError::MissingMoveTo)
    );
    assert!(path.is_empty());
    assert!(path.bounds2d().is_empty());
}

#[test]
fn closed_square() {
    let path = square();

    assert_eq!(path.num_segments(), 4);
    assert_eq!(path.segments().len(), 4);
    assert_eq!(path.bounds2d().min, point(0.0, 0.0));
    assert_eq!(path.bounds2d().max, point(10.0, 10.0));

    let close = &path.segments()[3];
    assert_eq!(close.kind, SegmentKind::Close);
    assert_eq!(&close.coords[..], &[point(10.0, 10.0), point(0.0, 0.0)]);
    assert_eq!(path.get_current_point(), Some(point(0.0, 0.0)));
    assert_eq!(path.last_move_to(), Some(point(0.0, 0.0)));
}

#[test]
fn double_move_to_overwrites() {
    let mut path = Path2D::new();
    path.move_to(point(1.0, 1.0));
    path.move_to(point(5.0, 5.0));

    assert_eq!(path.num_segments(), 1);
    assert_eq!(path.segments().len(), 1);
    assert_eq!(path.coord(0), Some(point(5.0, 5.0)));
    assert_eq!(path.segments()[0].coords[0], point(5.0, 5.0));
    assert_eq!(path.last_move_to(), Some(point(5.0, 5.0)));

    // The bounds still contain the replaced point.
    assert!(path.bounds2d().contains_point(point(1.0, 1.0)));
}

#[test]
fn zero_length_line_has_no_segment() {
    let mut path = Path2D::new();
    path.move_to(point(1.0, 1.0));
    path.line_to(point(1.0, 1.0)).unwrap();
    path.line_to(point(2.0, 1.0)).unwrap();

    assert_eq!(path.num_segments(), 3);
    assert_eq!(path.segments().len(), 2);
    assert_eq!(path.segments()[1].index, 1);
    assert_eq!(&path.segments()[1].coords[..], &[point(1.0, 1.0), point(2.0, 1.0)]);
}

#[test]
fn current_point_with_several_subpaths() {
    let mut path = square();
    path.move_to(point(20.0, 20.0));
    path.line_to(point(30.0, 20.0)).unwrap();
    path.close_path().unwrap();
    assert_eq!(path.get_current_point(), Some(point(20.0, 20.0)));

    // Drawing after a close continues from the start of the closed sub-path.
    path.line_to(point(20.0, 30.0)).unwrap();
    let last = path.segments().last().unwrap();
    assert_eq!(&last.coords[..], &[point(20.0, 20.0), point(20.0, 30.0)]);
}

#[test]
fn quad_bounds() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.quad_to(point(5.0, 10.0), point(10.0, 0.0)).unwrap();

    assert_eq!(path.bounds2d().min, point(0.0, 0.0));
    assert_eq!(path.bounds2d().max, point(10.0, 10.0));
    assert_eq!(
        &path.segments()[1].coords[..],
        &[point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0)]
    );
}

#[test]
fn quarter_arc() {
    let mut path = Path2D::new();
    path.move_to(point(10.0, 0.0));
    path.arc(point(0.0, 0.0), 10.0, 10.0, 0.0, PI / 2.0, false).unwrap();

    // Two curves per quarter by default.
    assert_eq!(path.num_segments(), 3);
    let end = path.get_current_point().unwrap();
    assert!((end.x - 0.0).abs() < 1e-6);
    assert!((end.y - 10.0).abs() < 1e-6);

    let mid = path.segments()[1].to().unwrap();
    assert_relative_eq!(mid.x, 50.0f64.sqrt(), epsilon = 1e-9);
    assert_relative_eq!(mid.y, 50.0f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn counterclockwise_arc() {
    let mut path = Path2D::new();
    path.move_to(point(10.0, 0.0));
    path.arc(point(0.0, 0.0), 10.0, 10.0, 0.0, PI / 2.0, true).unwrap();

    // Three quarters of a turn going through negative y.
    assert_eq!(path.num_segments(), 7);
    let end = path.get_current_point().unwrap();
    assert_relative_eq!(end.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(end.y, 10.0, epsilon = 1e-9);
    assert!(path.bounds2d().min.y < -9.0);
}

#[test]
fn elliptic_arc_options() {
    let mut path = Path2D::new();
    path.move_to(point(25.0, 10.0));
    path.arc_with_options(
        point(5.0, 10.0),
        20.0,
        5.0,
        0.0,
        PI,
        false,
        &ArcOptions { steps_per_quarter: 1 },
    )
    .unwrap();

    assert_eq!(path.num_segments(), 3);
    let end = path.get_current_point().unwrap();
    assert_relative_eq!(end.x, -15.0, epsilon = 1e-9);
    assert_relative_eq!(end.y, 10.0, epsilon = 1e-9);
    let mid = path.segments()[1].to().unwrap();
    assert_relative_eq!(mid.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(mid.y, 15.0, epsilon = 1e-9);
}

#[test]
fn full_circle_geometry() {
    let buffer = circle_bezier_geometry(0.0, deg_to_rad(360.0), 2);
    assert_eq!(buffer.len(), 1 + 8 * 3);
    assert_eq!(buffer[0], point(1.0, 0.0));
    let end = buffer[buffer.len() - 1];
    assert_relative_eq!(end.x, 1.0, epsilon = 1e-9);
    assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
}

#[test]
fn partial_sector_geometry() {
    let buffer = circle_bezier_geometry(0.1, 0.3, 2);
    assert_eq!(buffer.len(), 4);
    assert_relative_eq!(buffer[3].x, 0.3f64.cos());
    assert_relative_eq!(buffer[3].y, 0.3f64.sin());
}

#[test]
fn svg_arc() {
    let mut path = Path2D::new();
    path.move_to(point(10.0, 0.0));
    let curves = path
        .svg_arc_to(
            vector(10.0, 10.0),
            0.0,
            ArcFlags {
                large_arc: false,
                sweep: true,
            },
            point(0.0, 10.0),
        )
        .unwrap();

    assert_eq!(curves.len(), 1);
    assert_eq!(path.num_segments(), 2);
    assert_eq!(path.get_current_point(), Some(point(0.0, 10.0)));
}

#[test]
fn set_vector_position_isolation() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();

    // Move the end of the first line.
    path.set_vector_position(1, 1, point(12.0, 1.0)).unwrap();
    assert_eq!(path.segments()[1].coords[1], point(12.0, 1.0));
    assert_eq!(path.coord(1), Some(point(12.0, 1.0)));
    // The next segment keeps its own start point.
    assert_eq!(path.segments()[2].coords[0], point(10.0, 0.0));
    assert_eq!(path.bounds2d().max, point(12.0, 10.0));

    // Moving a copied start point only touches the segment.
    path.set_vector_position(2, 0, point(-5.0, 0.0)).unwrap();
    assert_eq!(path.segments()[2].coords[0], point(-5.0, 0.0));
    assert_eq!(path.coord(1), Some(point(12.0, 1.0)));

    assert_eq!(
        path.set_vector_position(2, 2, point(0.0, 0.0)),
        Err(PathError::InvalidHandle { segment: 2, vector: 2 })
    );
    assert_eq!(
        path.set_vector_position(7, 0, point(0.0, 0.0)),
        Err(PathError::InvalidHandle { segment: 7, vector: 0 })
    );
}

#[test]
fn set_vector_position_after_skipped_line() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(0.0, 0.0)).unwrap();
    path.cubic_to(point(1.0, 1.0), point(2.0, 1.0), point(3.0, 0.0))
        .unwrap();

    // Segment 1 is the cubic, its flat points start after the skipped line.
    path.set_vector_position(1, 2, point(2.0, 4.0)).unwrap();
    assert_eq!(path.coord(2), Some(point(1.0, 1.0)));
    assert_eq!(path.coord(3), Some(point(2.0, 4.0)));
}

#[test]
fn segment_array_is_transformed() {
    let path = square();
    let transform = AffineTransform::translation(5.0, 0.0);
    let segments = path.as_segment_array(Some(&transform));

    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1].coords[1], point(15.0, 0.0));
    // The path is left untouched.
    assert_eq!(path.segments()[1].coords[1], point(10.0, 0.0));
    assert_eq!(path.as_segment_array(None), path.segments().to_vec());
}

#[test]
fn events_iterator() {
    let path = square();
    let events: Vec<SegmentEvent> = path.events().collect();

    assert_eq!(events.len(), 4);
    assert_eq!(
        events[2],
        SegmentEvent::LineTo {
            from: point(10.0, 0.0),
            to: point(10.0, 10.0)
        }
    );
    assert_eq!(
        events[3],
        SegmentEvent::Close {
            last: point(10.0, 10.0),
            first: point(0.0, 0.0)
        }
    );
}

#[test]
fn path_iterator_walks_flat_buffer() {
    use crate::iterator::PathIterator;

    let path = square();
    let transform = AffineTransform::scaling(2.0, 2.0);
    let mut it = path.path_iterator(Some(&transform));
    let mut coords = [Point::zero(); 3];
    let mut kinds = Vec::new();
    while !it.is_done() {
        kinds.push(it.current_segment(&mut coords).unwrap());
        it.next();
    }

    assert_eq!(
        kinds,
        vec![
            SegmentKind::MoveTo,
            SegmentKind::LineTo,
            SegmentKind::LineTo,
            SegmentKind::Close
        ]
    );
    assert_eq!(coords[0], point(20.0, 20.0));
    assert_eq!(
        it.current_segment(&mut coords),
        Err(PathError::IteratorExhausted)
    );
}

#[test]
fn transformed_path() {
    let path = square();
    let moved = path
        .transformed(&AffineTransform::translation(1.0, 1.0))
        .unwrap();

    assert_eq!(moved.num_segments(), 4);
    assert_eq!(moved.bounds2d().min, point(1.0, 1.0));
    assert_eq!(moved.bounds2d().max, point(11.0, 11.0));
    assert_eq!(moved.get_current_point(), Some(point(1.0, 1.0)));
}

#[test]
fn non_finite_transformed_path() {
    let path = square();
    assert_eq!(
        path.transformed(&AffineTransform::scaling(f64::INFINITY, 1.0)),
        Err(PathError::Transform(TransformError::NonFinite))
    );
    assert_eq!(
        path.transformed(&AffineTransform::scaling(1e308, 1.0)),
        Err(PathError::NonFiniteCoordinate(point(f64::INFINITY, 0.0)))
    );
    assert_eq!(
        Path2D::new().transformed(&AffineTransform::scaling(1e308, 1.0)),
        Ok(Path2D::new())
    );
}

#[test]
fn out_of_range_svg_data() {
    // The number can't be represented, parsing stops before it.
    let path = Path2D::from_svg_path("M 1e999 0 L 1 1").unwrap();
    assert!(path.is_empty());

    let path = Path2D::from_svg_path("M 0 0 L 5 5 L 1e999 0").unwrap();
    assert_eq!(path.num_segments(), 2);
    assert_eq!(path.get_current_point(), Some(point(5.0, 5.0)));

    // Radii this large can't be resolved, the arc is drawn as a line.
    let path = Path2D::from_svg_path("M0 0 A1e200 1e200 0 0 1 10 0").unwrap();
    assert_eq!(path.num_segments(), 2);
    assert_eq!(path.get_current_point(), Some(point(10.0, 0.0)));
    assert!((0..path.num_coords())
        .filter_map(|i| path.coord(i))
        .all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn from_svg_path() {
    let path = Path2D::from_svg_path("M0,0 L10,0 L10,10 Z").unwrap();
    assert_eq!(path.num_segments(), 4);
    assert_eq!(path.bounds2d().max, point(10.0, 10.0));

    let path = Path2D::from_svg_path("M 0 0 Q 5 10 10 0").unwrap();
    assert_eq!(path.segment_kind(1), Some(SegmentKind::CubicTo));

    let paths = Path2D::subpath_array_from_svg_path("M0 0 L1 0 Z M5 5 l1 1").unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[1].coord(1), Some(point(6.0, 6.0)));
}

#[test]
fn unreduced_commands_are_rejected() {
    let events = [
        SvgEvent::MoveTo(point(0.0, 0.0)),
        SvgEvent::QuadraticTo(point(1.0, 1.0), point(2.0, 0.0)),
    ];
    assert_eq!(
        Path2D::from_commands(&events),
        Err(PathError::UnreducedCommand('Q'))
    );

    let events = [SvgEvent::LineTo(point(1.0, 1.0))];
    assert_eq!(Path2D::from_commands(&events), Err(PathError::MissingMoveTo));
}
