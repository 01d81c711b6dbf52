//! The capabilities shared by paths and curve primitives.
//!
//! Renderers and hit-testers consume shapes through [`Shape2D`] only, so a lone curve
//! can be drawn or picked the same way as a full [`Path2D`].

use crate::geom::traits::Animator;
use crate::geom::{AffineTransform, Bounds2D, CubicCurve2D, Line2D, Point, QuadCurve2D};
use crate::iterator::{CurveIter, PathIterator};
use crate::path::Path2D;
use crate::segment::{Segment, SegmentKind};
use crate::PathError;

/// Something that can be iterated as a sequence of path segments.
pub trait Shape2D {
    /// A cursor over the segments of the shape, optionally transformed.
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l>;

    /// Copies of the segments of the shape, optionally transformed.
    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment>;

    fn bounds2d(&self) -> Bounds2D;
}

/// A shape whose points can be moved individually.
pub trait EditableShape {
    /// Moves the point `vector` of segment `segment` to `value`.
    fn set_vector_position(
        &mut self,
        segment: usize,
        vector: usize,
        value: Point,
    ) -> Result<(), PathError>;
}

impl Shape2D for Path2D {
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l> {
        Box::new(Path2D::path_iterator(self, transform))
    }

    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        Path2D::as_segment_array(self, transform)
    }

    fn bounds2d(&self) -> Bounds2D {
        Path2D::bounds2d(self)
    }
}

impl EditableShape for Path2D {
    fn set_vector_position(
        &mut self,
        segment: usize,
        vector: usize,
        value: Point,
    ) -> Result<(), PathError> {
        Path2D::set_vector_position(self, segment, vector, value)
    }
}

// A curve is a single segment holding all of its points.
fn single_segment(
    kind: SegmentKind,
    points: &[Point],
    transform: Option<&AffineTransform>,
) -> Vec<Segment> {
    let segment = Segment::new(kind, points, 0);
    match transform {
        Some(transform) => vec![segment.transformed(transform)],
        None => vec![segment],
    }
}

impl Shape2D for QuadCurve2D {
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l> {
        Box::new(CurveIter::curve(
            self.from(),
            SegmentKind::QuadTo,
            &[self.ctrl(), self.to()],
            transform,
        ))
    }

    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        single_segment(
            SegmentKind::QuadTo,
            &[self.from(), self.ctrl(), self.to()],
            transform,
        )
    }

    fn bounds2d(&self) -> Bounds2D {
        self.bounds()
    }
}

impl Shape2D for CubicCurve2D {
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l> {
        Box::new(CurveIter::curve(
            self.from(),
            SegmentKind::CubicTo,
            &[self.ctrl1(), self.ctrl2(), self.to()],
            transform,
        ))
    }

    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        single_segment(
            SegmentKind::CubicTo,
            &[self.from(), self.ctrl1(), self.ctrl2(), self.to()],
            transform,
        )
    }

    fn bounds2d(&self) -> Bounds2D {
        self.bounds()
    }
}

impl Shape2D for Line2D {
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l> {
        Box::new(CurveIter::curve(
            self.from(),
            SegmentKind::LineTo,
            &[self.to()],
            transform,
        ))
    }

    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        single_segment(SegmentKind::LineTo, &[self.from(), self.to()], transform)
    }

    fn bounds2d(&self) -> Bounds2D {
        self.bounds()
    }
}

/// A shape made of a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PointShape {
    pub position: Point,
}

impl PointShape {
    pub fn new(position: Point) -> Self {
        PointShape { position }
    }
}

impl Shape2D for PointShape {
    fn path_iterator<'l>(
        &'l self,
        transform: Option<&AffineTransform>,
    ) -> Box<dyn PathIterator + 'l> {
        Box::new(CurveIter::point(self.position, transform))
    }

    fn as_segment_array(&self, transform: Option<&AffineTransform>) -> Vec<Segment> {
        single_segment(SegmentKind::MoveTo, &[self.position], transform)
    }

    fn bounds2d(&self) -> Bounds2D {
        Bounds2D::from_points(&[self.position])
    }
}

impl Animator for PointShape {
    fn animation_value(&self, _t: f64) -> Point {
        self.position
    }
}

#[cfg(test)]
use crate::geom::point;

#[cfg(test)]
fn collect(shape: &dyn Shape2D, transform: Option<&AffineTransform>) -> Vec<(SegmentKind, Vec<Point>)> {
    let mut it = shape.path_iterator(transform);
    let mut coords = [Point::zero(); 3];
    let mut result = Vec::new();
    while !it.is_done() {
        let kind = it.current_segment(&mut coords).unwrap();
        result.push((kind, coords[..kind.num_coords()].to_vec()));
        it.next();
    }
    result
}

#[test]
fn curves_iterate_as_move_then_segment() {
    let quad = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    assert_eq!(
        collect(&quad, None),
        vec![
            (SegmentKind::MoveTo, vec![point(0.0, 0.0)]),
            (SegmentKind::QuadTo, vec![point(5.0, 10.0), point(10.0, 0.0)]),
        ]
    );

    let cubic = CubicCurve2D::new(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    let transform = AffineTransform::translation(1.0, 0.0);
    let segments = collect(&cubic, Some(&transform));
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].0, SegmentKind::CubicTo);
    assert_eq!(segments[1].1[2], point(11.0, 0.0));

    let line = Line2D::new(point(1.0, 1.0), point(4.0, 5.0));
    assert_eq!(
        collect(&line, None),
        vec![
            (SegmentKind::MoveTo, vec![point(1.0, 1.0)]),
            (SegmentKind::LineTo, vec![point(4.0, 5.0)]),
        ]
    );
}

#[test]
fn point_shape() {
    let p = PointShape::new(point(3.0, 4.0));
    assert_eq!(collect(&p, None), vec![(SegmentKind::MoveTo, vec![point(3.0, 4.0)])]);
    assert_eq!(p.animation_value(0.7), point(3.0, 4.0));

    let bounds = p.bounds2d();
    assert_eq!(bounds.min, point(3.0, 4.0));
    assert_eq!(bounds.max, point(3.0, 4.0));

    let segments = p.as_segment_array(Some(&AffineTransform::scaling(2.0, 2.0)));
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].coords[0], point(6.0, 8.0));
}

#[test]
fn curve_segment_arrays() {
    let quad = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    let segments = quad.as_segment_array(None);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].kind, SegmentKind::QuadTo);
    assert_eq!(segments[0].coords.len(), 3);

    let bounds = Shape2D::bounds2d(&quad);
    assert_eq!(bounds.min, point(0.0, 0.0));
    assert_eq!(bounds.max, point(10.0, 10.0));
}

#[test]
fn paths_through_trait_objects() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(2.0, 0.0)).unwrap();

    let shapes: Vec<Box<dyn Shape2D>> = vec![
        Box::new(path.clone()),
        Box::new(Line2D::new(point(0.0, 0.0), point(2.0, 0.0))),
    ];
    for shape in &shapes {
        assert_eq!(collect(shape.as_ref(), None).len(), 2);
    }

    let editable: &mut dyn EditableShape = &mut path;
    editable.set_vector_position(1, 1, point(3.0, 0.0)).unwrap();
    assert_eq!(path.coord(1), Some(point(3.0, 0.0)));
}
