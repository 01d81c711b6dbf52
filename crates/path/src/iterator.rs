//! Cursors and iterators over the segments of a shape.
//!
//! [`PathIterator`] is the cursor interface that renderers and hit-testers consume: it
//! walks the flat coordinate buffer of a shape and writes the points of the current
//! segment into a caller-provided array. [`Events`] is the same walk expressed as a
//! regular Rust iterator of [`SegmentEvent`]s.
//!
//! # Examples
//!
//! ```
//! use vellum_path::Path2D;
//! use vellum_path::iterator::PathIterator;
//! use vellum_path::geom::{point, Point};
//!
//! let mut path = Path2D::new();
//! path.move_to(point(0.0, 0.0));
//! path.line_to(point(10.0, 0.0)).unwrap();
//!
//! let mut it = path.path_iterator(None);
//! let mut coords = [Point::zero(); 3];
//! while !it.is_done() {
//!     let kind = it.current_segment(&mut coords).unwrap();
//!     println!("{:?} {:?}", kind, &coords[..kind.num_coords()]);
//!     it.next();
//! }
//! ```

use crate::geom::arrayvec::ArrayVec;
use crate::geom::{AffineTransform, Point};
use crate::segment::{SegmentEvent, SegmentKind};
use crate::PathError;

/// A cursor over the segments of a shape.
pub trait PathIterator {
    /// Whether the cursor moved past the last segment.
    fn is_done(&self) -> bool;

    /// Moves to the next segment.
    fn next(&mut self);

    /// Writes the points of the current segment in `coords` and returns its kind.
    ///
    /// Only the first `kind.num_coords()` entries are written. The points are
    /// transformed if the iterator was created with a transform.
    fn current_segment(&self, coords: &mut [Point; 3]) -> Result<SegmentKind, PathError>;
}

/// Cursor over the flat buffers of a [`Path2D`](crate::Path2D).
pub struct PathIter<'l> {
    types: &'l [SegmentKind],
    coords: &'l [Point],
    type_index: usize,
    point_index: usize,
    transform: Option<AffineTransform>,
}

impl<'l> PathIter<'l> {
    pub fn new(
        types: &'l [SegmentKind],
        coords: &'l [Point],
        transform: Option<&AffineTransform>,
    ) -> Self {
        PathIter {
            types,
            coords,
            type_index: 0,
            point_index: 0,
            transform: transform.copied(),
        }
    }
}

impl<'l> PathIterator for PathIter<'l> {
    fn is_done(&self) -> bool {
        self.type_index >= self.types.len()
    }

    fn next(&mut self) {
        if let Some(kind) = self.types.get(self.type_index) {
            self.point_index += kind.num_coords();
            self.type_index += 1;
        }
    }

    fn current_segment(&self, coords: &mut [Point; 3]) -> Result<SegmentKind, PathError> {
        let kind = *self
            .types
            .get(self.type_index)
            .ok_or(PathError::IteratorExhausted)?;
        let n = kind.num_coords();
        let src = self
            .coords
            .get(self.point_index..self.point_index + n)
            .ok_or(PathError::IteratorExhausted)?;

        coords[..n].copy_from_slice(src);
        if let Some(transform) = &self.transform {
            transform.transform(coords, 0, n);
        }

        Ok(kind)
    }
}

/// Cursor over a fixed, short list of segments.
///
/// Used by the curve primitives and [`PointShape`](crate::shape::PointShape), which
/// iterate as a move-to followed by at most one drawing segment.
pub struct CurveIter {
    segments: ArrayVec<(SegmentKind, [Point; 3]), 2>,
    index: usize,
    transform: Option<AffineTransform>,
}

impl CurveIter {
    /// Iterates a single move-to.
    pub fn point(at: Point, transform: Option<&AffineTransform>) -> Self {
        let mut segments = ArrayVec::new();
        segments.push((SegmentKind::MoveTo, [at, at, at]));
        CurveIter {
            segments,
            index: 0,
            transform: transform.copied(),
        }
    }

    /// Iterates a move-to `from` followed by a segment of the given kind.
    ///
    /// `points` holds the flat coordinates of the segment, that is the control points
    /// and the end point.
    pub fn curve(
        from: Point,
        kind: SegmentKind,
        points: &[Point],
        transform: Option<&AffineTransform>,
    ) -> Self {
        let mut iter = CurveIter::point(from, transform);
        let mut coords = [from; 3];
        for (dst, src) in coords.iter_mut().zip(points.iter().take(kind.num_coords())) {
            *dst = *src;
        }
        iter.segments.push((kind, coords));

        iter
    }
}

impl PathIterator for CurveIter {
    fn is_done(&self) -> bool {
        self.index >= self.segments.len()
    }

    fn next(&mut self) {
        if !self.is_done() {
            self.index += 1;
        }
    }

    fn current_segment(&self, coords: &mut [Point; 3]) -> Result<SegmentKind, PathError> {
        let (kind, points) = self
            .segments
            .get(self.index)
            .ok_or(PathError::IteratorExhausted)?;
        let n = kind.num_coords();
        coords[..n].copy_from_slice(&points[..n]);
        if let Some(transform) = &self.transform {
            transform.transform(coords, 0, n);
        }

        Ok(*kind)
    }
}

/// An iterator of [`SegmentEvent`]s over the flat buffers of a path.
///
/// The start point of each event is the current point, which after a close is the
/// start of the closed sub-path.
#[derive(Clone)]
pub struct Events<'l> {
    types: core::slice::Iter<'l, SegmentKind>,
    coords: &'l [Point],
    point_index: usize,
    current: Point,
    first: Point,
}

impl<'l> Events<'l> {
    pub fn new(types: &'l [SegmentKind], coords: &'l [Point]) -> Self {
        Events {
            types: types.iter(),
            coords,
            point_index: 0,
            current: Point::zero(),
            first: Point::zero(),
        }
    }

    fn take(&mut self, n: usize) -> Option<&'l [Point]> {
        let points = self.coords.get(self.point_index..self.point_index + n)?;
        self.point_index += n;
        Some(points)
    }
}

impl<'l> Iterator for Events<'l> {
    type Item = SegmentEvent;

    fn next(&mut self) -> Option<SegmentEvent> {
        let kind = *self.types.next()?;
        let from = self.current;
        let points = self.take(kind.num_coords())?;
        let event = match kind {
            SegmentKind::MoveTo => {
                self.first = points[0];
                SegmentEvent::MoveTo { at: points[0] }
            }
            SegmentKind::LineTo => SegmentEvent::LineTo {
                from,
                to: points[0],
            },
            SegmentKind::QuadTo => SegmentEvent::QuadTo {
                from,
                ctrl: points[0],
                to: points[1],
            },
            SegmentKind::CubicTo => SegmentEvent::CubicTo {
                from,
                ctrl1: points[0],
                ctrl2: points[1],
                to: points[2],
            },
            SegmentKind::Close => SegmentEvent::Close {
                last: from,
                first: self.first,
            },
        };
        self.current = event.to();

        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.types.len()))
    }
}

#[cfg(test)]
use crate::geom::point;

#[test]
fn curve_iter_yields_move_then_curve() {
    let mut it = CurveIter::curve(
        point(0.0, 0.0),
        SegmentKind::QuadTo,
        &[point(1.0, 1.0), point(2.0, 0.0)],
        None,
    );
    let mut coords = [Point::zero(); 3];

    assert_eq!(it.current_segment(&mut coords), Ok(SegmentKind::MoveTo));
    assert_eq!(coords[0], point(0.0, 0.0));
    it.next();
    assert_eq!(it.current_segment(&mut coords), Ok(SegmentKind::QuadTo));
    assert_eq!(&coords[..2], &[point(1.0, 1.0), point(2.0, 0.0)]);
    it.next();
    assert!(it.is_done());
    assert_eq!(
        it.current_segment(&mut coords),
        Err(PathError::IteratorExhausted)
    );

    // Stepping past the end is harmless.
    it.next();
    assert!(it.is_done());
}

#[test]
fn point_iter_is_transformed() {
    let transform = AffineTransform::scaling(2.0, 3.0);
    let mut it = CurveIter::point(point(1.0, 1.0), Some(&transform));
    let mut coords = [Point::zero(); 3];

    assert_eq!(it.current_segment(&mut coords), Ok(SegmentKind::MoveTo));
    assert_eq!(coords[0], point(2.0, 3.0));
    it.next();
    assert!(it.is_done());
}

#[test]
fn events_track_current_point() {
    let types = [
        SegmentKind::MoveTo,
        SegmentKind::LineTo,
        SegmentKind::Close,
        SegmentKind::LineTo,
    ];
    let coords = [point(1.0, 1.0), point(5.0, 1.0), point(1.0, 5.0)];
    let events: Vec<SegmentEvent> = Events::new(&types, &coords).collect();

    assert_eq!(
        events,
        vec![
            SegmentEvent::MoveTo { at: point(1.0, 1.0) },
            SegmentEvent::LineTo {
                from: point(1.0, 1.0),
                to: point(5.0, 1.0)
            },
            SegmentEvent::Close {
                last: point(5.0, 1.0),
                first: point(1.0, 1.0)
            },
            SegmentEvent::LineTo {
                from: point(1.0, 1.0),
                to: point(1.0, 5.0)
            },
        ]
    );
}
