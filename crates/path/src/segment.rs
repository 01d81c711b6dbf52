use crate::geom::arrayvec::ArrayVec;
use crate::geom::{AffineTransform, Point};

/// The kind of a path segment, without its coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SegmentKind {
    MoveTo,
    LineTo,
    QuadTo,
    CubicTo,
    Close,
}

impl SegmentKind {
    /// Number of points this kind of segment stores in the flat coordinate buffer.
    #[inline]
    pub fn num_coords(self) -> usize {
        match self {
            SegmentKind::MoveTo => 1,
            SegmentKind::LineTo => 1,
            SegmentKind::QuadTo => 2,
            SegmentKind::CubicTo => 3,
            SegmentKind::Close => 0,
        }
    }

    /// The SVG command letter of this kind of segment.
    pub fn command(self) -> char {
        match self {
            SegmentKind::MoveTo => 'M',
            SegmentKind::LineTo => 'L',
            SegmentKind::QuadTo => 'Q',
            SegmentKind::CubicTo => 'C',
            SegmentKind::Close => 'Z',
        }
    }

    pub fn is_curve(self) -> bool {
        matches!(self, SegmentKind::QuadTo | SegmentKind::CubicTo)
    }
}

/// A segment that can be drawn on its own.
///
/// Unlike the flat coordinate buffer of a path, a segment stores its start point too:
///
/// - `MoveTo`: `[at]`
/// - `LineTo`: `[from, to]`
/// - `QuadTo`: `[from, ctrl, to]`
/// - `CubicTo`: `[from, ctrl1, ctrl2, to]`
/// - `Close`: `[last, first]`, the closing line.
///
/// These are copies: editing a segment's start point does not move the end point of
/// the previous segment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Segment {
    pub kind: SegmentKind,
    pub coords: ArrayVec<Point, 4>,
    /// Position of the segment in its path's segment list.
    pub index: usize,
    // Offset of the segment's own points in the flat coordinate buffer.
    pub(crate) coord_offset: usize,
}

impl Segment {
    pub fn new(kind: SegmentKind, coords: &[Point], index: usize) -> Self {
        let mut points = ArrayVec::new();
        for p in coords.iter().take(4) {
            points.push(*p);
        }

        Segment {
            kind,
            coords: points,
            index,
            coord_offset: 0,
        }
    }

    pub(crate) fn with_offset(mut self, offset: usize) -> Self {
        self.coord_offset = offset;
        self
    }

    /// The first point of the segment.
    pub fn from(&self) -> Option<Point> {
        self.coords.first().copied()
    }

    /// The last point of the segment.
    pub fn to(&self) -> Option<Point> {
        self.coords.last().copied()
    }

    /// Index in `coords` of the first point that belongs to the flat buffer, if any.
    pub(crate) fn first_owned_vector(&self) -> Option<usize> {
        match self.kind {
            SegmentKind::MoveTo => Some(0),
            SegmentKind::Close => None,
            _ => Some(1),
        }
    }

    /// Returns a copy of this segment with every point transformed.
    pub fn transformed(&self, transform: &AffineTransform) -> Self {
        let mut segment = self.clone();
        for p in &mut segment.coords {
            *p = transform.transform_point(*p);
        }

        segment
    }

    /// The segment as an enum with named points.
    ///
    /// Returns `None` if the segment does not hold the number of points its kind requires.
    pub fn event(&self) -> Option<SegmentEvent> {
        let c = &self.coords;
        Some(match (self.kind, c.len()) {
            (SegmentKind::MoveTo, 1) => SegmentEvent::MoveTo { at: c[0] },
            (SegmentKind::LineTo, 2) => SegmentEvent::LineTo { from: c[0], to: c[1] },
            (SegmentKind::QuadTo, 3) => SegmentEvent::QuadTo {
                from: c[0],
                ctrl: c[1],
                to: c[2],
            },
            (SegmentKind::CubicTo, 4) => SegmentEvent::CubicTo {
                from: c[0],
                ctrl1: c[1],
                ctrl2: c[2],
                to: c[3],
            },
            (SegmentKind::Close, 2) => SegmentEvent::Close {
                last: c[0],
                first: c[1],
            },
            _ => return None,
        })
    }
}

/// A path segment with its start point, for exhaustive matching.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SegmentEvent {
    MoveTo {
        at: Point,
    },
    LineTo {
        from: Point,
        to: Point,
    },
    QuadTo {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    CubicTo {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Close {
        last: Point,
        first: Point,
    },
}

impl SegmentEvent {
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentEvent::MoveTo { .. } => SegmentKind::MoveTo,
            SegmentEvent::LineTo { .. } => SegmentKind::LineTo,
            SegmentEvent::QuadTo { .. } => SegmentKind::QuadTo,
            SegmentEvent::CubicTo { .. } => SegmentKind::CubicTo,
            SegmentEvent::Close { .. } => SegmentKind::Close,
        }
    }

    pub fn from(&self) -> Point {
        match *self {
            SegmentEvent::MoveTo { at } => at,
            SegmentEvent::LineTo { from, .. }
            | SegmentEvent::QuadTo { from, .. }
            | SegmentEvent::CubicTo { from, .. } => from,
            SegmentEvent::Close { last, .. } => last,
        }
    }

    pub fn to(&self) -> Point {
        match *self {
            SegmentEvent::MoveTo { at } => at,
            SegmentEvent::LineTo { to, .. }
            | SegmentEvent::QuadTo { to, .. }
            | SegmentEvent::CubicTo { to, .. } => to,
            SegmentEvent::Close { first, .. } => first,
        }
    }
}

#[cfg(test)]
use crate::geom::point;

#[test]
fn coordinate_counts() {
    let counts: Vec<usize> = [
        SegmentKind::MoveTo,
        SegmentKind::LineTo,
        SegmentKind::QuadTo,
        SegmentKind::CubicTo,
        SegmentKind::Close,
    ]
    .iter()
    .map(|kind| kind.num_coords())
    .collect();

    assert_eq!(counts, vec![1, 1, 2, 3, 0]);
}

#[test]
fn segment_events() {
    let quad = Segment::new(
        SegmentKind::QuadTo,
        &[point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0)],
        3,
    );
    assert_eq!(
        quad.event(),
        Some(SegmentEvent::QuadTo {
            from: point(0.0, 0.0),
            ctrl: point(1.0, 1.0),
            to: point(2.0, 0.0),
        })
    );
    assert_eq!(quad.from(), Some(point(0.0, 0.0)));
    assert_eq!(quad.to(), Some(point(2.0, 0.0)));

    let moved = quad.transformed(&AffineTransform::translation(1.0, 2.0));
    assert_eq!(moved.coords[2], point(3.0, 2.0));
    assert_eq!(moved.index, 3);

    let broken = Segment::new(SegmentKind::CubicTo, &[point(0.0, 0.0)], 0);
    assert_eq!(broken.event(), None);
}
