use crate::geom::{ArcFlags, Point, Vector};

/// A command of the SVG path mini-language, with its arguments.
///
/// Absolute variants carry points, relative ones carry offsets from the current
/// point. Arc rotations are in degrees, as written in the path data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SvgEvent {
    MoveTo(Point),
    RelativeMoveTo(Vector),
    LineTo(Point),
    RelativeLineTo(Vector),
    HorizontalLineTo(f64),
    RelativeHorizontalLineTo(f64),
    VerticalLineTo(f64),
    RelativeVerticalLineTo(f64),
    CubicTo(Point, Point, Point),
    RelativeCubicTo(Vector, Vector, Vector),
    SmoothCubicTo(Point, Point),
    SmoothRelativeCubicTo(Vector, Vector),
    QuadraticTo(Point, Point),
    RelativeQuadraticTo(Vector, Vector),
    SmoothQuadraticTo(Point),
    SmoothRelativeQuadraticTo(Vector),
    ArcTo(Vector, f64, ArcFlags, Point),
    RelativeArcTo(Vector, f64, ArcFlags, Vector),
    Close,
}

impl SvgEvent {
    /// The command letter of this event.
    pub fn command(&self) -> char {
        match *self {
            SvgEvent::MoveTo(..) => 'M',
            SvgEvent::RelativeMoveTo(..) => 'm',
            SvgEvent::LineTo(..) => 'L',
            SvgEvent::RelativeLineTo(..) => 'l',
            SvgEvent::HorizontalLineTo(..) => 'H',
            SvgEvent::RelativeHorizontalLineTo(..) => 'h',
            SvgEvent::VerticalLineTo(..) => 'V',
            SvgEvent::RelativeVerticalLineTo(..) => 'v',
            SvgEvent::CubicTo(..) => 'C',
            SvgEvent::RelativeCubicTo(..) => 'c',
            SvgEvent::SmoothCubicTo(..) => 'S',
            SvgEvent::SmoothRelativeCubicTo(..) => 's',
            SvgEvent::QuadraticTo(..) => 'Q',
            SvgEvent::RelativeQuadraticTo(..) => 'q',
            SvgEvent::SmoothQuadraticTo(..) => 'T',
            SvgEvent::SmoothRelativeQuadraticTo(..) => 't',
            SvgEvent::ArcTo(..) => 'A',
            SvgEvent::RelativeArcTo(..) => 'a',
            SvgEvent::Close => 'Z',
        }
    }

    pub fn is_move_to(&self) -> bool {
        matches!(self, SvgEvent::MoveTo(..) | SvgEvent::RelativeMoveTo(..))
    }

    /// Whether the event is one of the absolute `M`, `L`, `C` or `Z` commands that
    /// remain after [`reduce`](crate::reduce).
    pub fn is_reduced(&self) -> bool {
        matches!(
            self,
            SvgEvent::MoveTo(..) | SvgEvent::LineTo(..) | SvgEvent::CubicTo(..) | SvgEvent::Close
        )
    }

    /// The absolute end point, if the event has one.
    pub fn destination(&self) -> Option<Point> {
        match *self {
            SvgEvent::MoveTo(to)
            | SvgEvent::LineTo(to)
            | SvgEvent::CubicTo(_, _, to)
            | SvgEvent::SmoothCubicTo(_, to)
            | SvgEvent::QuadraticTo(_, to)
            | SvgEvent::SmoothQuadraticTo(to)
            | SvgEvent::ArcTo(_, _, _, to) => Some(to),
            _ => None,
        }
    }
}

#[cfg(test)]
use crate::geom::{point, vector};

#[test]
fn command_letters() {
    assert_eq!(SvgEvent::MoveTo(point(0.0, 0.0)).command(), 'M');
    assert_eq!(SvgEvent::RelativeLineTo(vector(1.0, 0.0)).command(), 'l');
    assert_eq!(SvgEvent::Close.command(), 'Z');

    assert!(SvgEvent::RelativeMoveTo(vector(1.0, 1.0)).is_move_to());
    assert!(!SvgEvent::Close.is_move_to());
    assert!(SvgEvent::CubicTo(point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)).is_reduced());
    assert!(!SvgEvent::QuadraticTo(point(0.0, 0.0), point(1.0, 0.0)).is_reduced());
    assert!(!SvgEvent::RelativeLineTo(vector(1.0, 0.0)).is_reduced());

    assert_eq!(
        SvgEvent::QuadraticTo(point(0.0, 0.0), point(1.0, 2.0)).destination(),
        Some(point(1.0, 2.0))
    );
    assert_eq!(SvgEvent::HorizontalLineTo(3.0).destination(), None);
}
