//! Turning parsed path data into absolute `M`, `L`, `C` and `Z` commands.

use crate::events::SvgEvent;
use crate::geom::{point, Point, SvgArc};
use crate::parser::{ParserOptions, PathParser, Source};

/// Parses the whole path data string.
///
/// Malformed data ends the command list early: everything parsed before the error is
/// returned and the error is logged.
pub fn parse_events(src: &str, options: &ParserOptions) -> Vec<SvgEvent> {
    let mut events = Vec::new();
    let mut parser = PathParser::with_options(options);
    let mut src = Source::new(src.chars());
    loop {
        match parser.parse_segment(&mut src) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => break,
            Err(e) => {
                log::debug!("svg path data ends early after {} commands: {}", events.len(), e);
                break;
            }
        }
    }

    events
}

/// Rewrites relative commands as absolute ones.
///
/// The current point starts at the origin, so a leading relative move-to is absolute.
/// A close command moves the current point back to the start of its sub-path.
pub fn absolutize(events: &[SvgEvent]) -> Vec<SvgEvent> {
    let mut output = Vec::with_capacity(events.len());
    let mut current = point(0.0, 0.0);
    let mut first = point(0.0, 0.0);

    for event in events {
        let abs = match *event {
            SvgEvent::MoveTo(to) => {
                first = to;
                SvgEvent::MoveTo(to)
            }
            SvgEvent::RelativeMoveTo(v) => {
                let to = current + v;
                first = to;
                SvgEvent::MoveTo(to)
            }
            SvgEvent::LineTo(to) => SvgEvent::LineTo(to),
            SvgEvent::RelativeLineTo(v) => SvgEvent::LineTo(current + v),
            SvgEvent::HorizontalLineTo(x) => SvgEvent::HorizontalLineTo(x),
            SvgEvent::RelativeHorizontalLineTo(dx) => SvgEvent::HorizontalLineTo(current.x + dx),
            SvgEvent::VerticalLineTo(y) => SvgEvent::VerticalLineTo(y),
            SvgEvent::RelativeVerticalLineTo(dy) => SvgEvent::VerticalLineTo(current.y + dy),
            SvgEvent::CubicTo(c1, c2, to) => SvgEvent::CubicTo(c1, c2, to),
            SvgEvent::RelativeCubicTo(c1, c2, to) => {
                SvgEvent::CubicTo(current + c1, current + c2, current + to)
            }
            SvgEvent::SmoothCubicTo(c2, to) => SvgEvent::SmoothCubicTo(c2, to),
            SvgEvent::SmoothRelativeCubicTo(c2, to) => {
                SvgEvent::SmoothCubicTo(current + c2, current + to)
            }
            SvgEvent::QuadraticTo(ctrl, to) => SvgEvent::QuadraticTo(ctrl, to),
            SvgEvent::RelativeQuadraticTo(ctrl, to) => {
                SvgEvent::QuadraticTo(current + ctrl, current + to)
            }
            SvgEvent::SmoothQuadraticTo(to) => SvgEvent::SmoothQuadraticTo(to),
            SvgEvent::SmoothRelativeQuadraticTo(to) => SvgEvent::SmoothQuadraticTo(current + to),
            SvgEvent::ArcTo(radii, rotation, flags, to) => {
                SvgEvent::ArcTo(radii, rotation, flags, to)
            }
            SvgEvent::RelativeArcTo(radii, rotation, flags, to) => {
                SvgEvent::ArcTo(radii, rotation, flags, current + to)
            }
            SvgEvent::Close => SvgEvent::Close,
        };

        current = match abs {
            SvgEvent::HorizontalLineTo(x) => point(x, current.y),
            SvgEvent::VerticalLineTo(y) => point(current.x, y),
            SvgEvent::Close => first,
            _ => abs.destination().unwrap_or(current),
        };

        output.push(abs);
    }

    output
}

// Which family the previous command belongs to, for smooth curve reflection.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Smooth {
    None,
    Cubic,
    Quadratic,
}

/// Rewrites absolute commands in terms of `M`, `L`, `C` and `Z`.
///
/// - `H` and `V` become line-to commands.
/// - `S` reflects the previous cubic control point if the previous command was `C` or
///   `S`, otherwise its first control point is the current point. `T` does the same with
///   `Q` and `T`.
/// - Quadratic curves are elevated to cubic ones.
/// - Arcs are approximated with cubic curves. An arc with a zero radius becomes the
///   cubic curve `(current, to, to)`, an arc ending at the current point is dropped.
///
/// Relative commands are expected to have gone through [`absolutize`] and are passed
/// through unchanged.
pub fn reduce(events: &[SvgEvent]) -> Vec<SvgEvent> {
    let mut output = Vec::with_capacity(events.len());
    let mut current = point(0.0, 0.0);
    let mut first = point(0.0, 0.0);
    let mut last_ctrl = point(0.0, 0.0);
    let mut smooth = Smooth::None;

    // Quadratic control point elevated to the two cubic ones.
    fn elevate(from: Point, ctrl: Point, to: Point) -> SvgEvent {
        SvgEvent::CubicTo(
            point(
                from.x + 2.0 * (ctrl.x - from.x) / 3.0,
                from.y + 2.0 * (ctrl.y - from.y) / 3.0,
            ),
            point(
                to.x + 2.0 * (ctrl.x - to.x) / 3.0,
                to.y + 2.0 * (ctrl.y - to.y) / 3.0,
            ),
            to,
        )
    }

    fn reflect(current: Point, ctrl: Point) -> Point {
        current + (current - ctrl)
    }

    for event in events {
        let mut next_smooth = Smooth::None;
        match *event {
            SvgEvent::MoveTo(to) => {
                output.push(SvgEvent::MoveTo(to));
                first = to;
                current = to;
            }
            SvgEvent::LineTo(to) => {
                output.push(SvgEvent::LineTo(to));
                current = to;
            }
            SvgEvent::HorizontalLineTo(x) => {
                current = point(x, current.y);
                output.push(SvgEvent::LineTo(current));
            }
            SvgEvent::VerticalLineTo(y) => {
                current = point(current.x, y);
                output.push(SvgEvent::LineTo(current));
            }
            SvgEvent::CubicTo(ctrl1, ctrl2, to) => {
                output.push(SvgEvent::CubicTo(ctrl1, ctrl2, to));
                last_ctrl = ctrl2;
                current = to;
                next_smooth = Smooth::Cubic;
            }
            SvgEvent::SmoothCubicTo(ctrl2, to) => {
                let ctrl1 = if smooth == Smooth::Cubic {
                    reflect(current, last_ctrl)
                } else {
                    current
                };
                output.push(SvgEvent::CubicTo(ctrl1, ctrl2, to));
                last_ctrl = ctrl2;
                current = to;
                next_smooth = Smooth::Cubic;
            }
            SvgEvent::QuadraticTo(ctrl, to) => {
                output.push(elevate(current, ctrl, to));
                last_ctrl = ctrl;
                current = to;
                next_smooth = Smooth::Quadratic;
            }
            SvgEvent::SmoothQuadraticTo(to) => {
                let ctrl = if smooth == Smooth::Quadratic {
                    reflect(current, last_ctrl)
                } else {
                    current
                };
                output.push(elevate(current, ctrl, to));
                last_ctrl = ctrl;
                current = to;
                next_smooth = Smooth::Quadratic;
            }
            SvgEvent::ArcTo(radii, x_rotation, flags, to) => {
                let arc = SvgArc {
                    from: current,
                    to,
                    radii: radii.abs(),
                    x_rotation,
                    flags,
                };
                if arc.is_straight_line() {
                    output.push(SvgEvent::CubicTo(current, to, to));
                } else if current != to {
                    let start = output.len();
                    arc.for_each_cubic(&mut |ctrl1, ctrl2, to| {
                        output.push(SvgEvent::CubicTo(ctrl1, ctrl2, to));
                    });
                    log::trace!("arc to {:?} expanded into {} curves", to, output.len() - start);
                }
                current = to;
            }
            SvgEvent::Close => {
                output.push(SvgEvent::Close);
                current = first;
            }
            relative => {
                output.push(relative);
            }
        }
        smooth = next_smooth;
    }

    output
}

/// Parses, absolutizes and reduces path data.
///
/// ```
/// use vellum_svg::{path_data, SvgEvent};
/// use vellum_svg::geom::point;
///
/// let events = path_data("m 1 1 h 10 v 10 z");
/// assert_eq!(
///     events,
///     vec![
///         SvgEvent::MoveTo(point(1.0, 1.0)),
///         SvgEvent::LineTo(point(11.0, 1.0)),
///         SvgEvent::LineTo(point(11.0, 11.0)),
///         SvgEvent::Close,
///     ]
/// );
/// ```
pub fn path_data(src: &str) -> Vec<SvgEvent> {
    path_data_with_options(src, &ParserOptions::DEFAULT)
}

pub fn path_data_with_options(src: &str, options: &ParserOptions) -> Vec<SvgEvent> {
    reduce(&absolutize(&parse_events(src, options)))
}

/// Like [`path_data`], with the commands split into one group per sub-path.
///
/// The whole stream is made absolute before splitting, so a relative move-to that
/// starts a group is resolved against the end of the previous group, as SVG renderers
/// do. In `M 0 0 L 1 0 m 5 5 l 1 0` the second group starts at `(6, 5)`, not `(5, 5)`.
pub fn subpath_array(src: &str) -> Vec<Vec<SvgEvent>> {
    subpath_array_with_options(src, &ParserOptions::DEFAULT)
}

pub fn subpath_array_with_options(src: &str, options: &ParserOptions) -> Vec<Vec<SvgEvent>> {
    let events = absolutize(&parse_events(src, options));

    let mut groups = Vec::new();
    let mut start = 0;
    for (i, event) in events.iter().enumerate() {
        if event.is_move_to() && i > start {
            groups.push(reduce(&events[start..i]));
            start = i;
        }
    }
    if start < events.len() {
        groups.push(reduce(&events[start..]));
    }

    groups
}

#[cfg(test)]
use crate::geom::vector;

#[test]
fn square() {
    assert_eq!(
        path_data("M0,0 L10,0 L10,10 Z"),
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::LineTo(point(10.0, 0.0)),
            SvgEvent::LineTo(point(10.0, 10.0)),
            SvgEvent::Close,
        ]
    );
}

#[test]
fn relative_commands() {
    assert_eq!(
        path_data("m 1 1 l 2 0 h 3 v 4 z l 1 1"),
        vec![
            SvgEvent::MoveTo(point(1.0, 1.0)),
            SvgEvent::LineTo(point(3.0, 1.0)),
            SvgEvent::LineTo(point(6.0, 1.0)),
            SvgEvent::LineTo(point(6.0, 5.0)),
            SvgEvent::Close,
            SvgEvent::LineTo(point(2.0, 2.0)),
        ]
    );

    assert_eq!(
        absolutize(&[
            SvgEvent::MoveTo(point(1.0, 2.0)),
            SvgEvent::RelativeCubicTo(vector(1.0, 0.0), vector(2.0, 0.0), vector(3.0, 3.0)),
            SvgEvent::SmoothRelativeQuadraticTo(vector(1.0, 1.0)),
        ]),
        vec![
            SvgEvent::MoveTo(point(1.0, 2.0)),
            SvgEvent::CubicTo(point(2.0, 2.0), point(3.0, 2.0), point(4.0, 5.0)),
            SvgEvent::SmoothQuadraticTo(point(5.0, 6.0)),
        ]
    );
}

#[test]
fn smooth_cubic() {
    let events = path_data("M0 0 C 0 10 10 10 10 0 S 20 -10 20 0");
    assert_eq!(
        events[2],
        SvgEvent::CubicTo(point(10.0, -10.0), point(20.0, -10.0), point(20.0, 0.0))
    );

    // Without a previous cubic curve, the first control point is the current point.
    let events = path_data("M0 0 L 5 0 S 10 10 10 0");
    assert_eq!(
        events[2],
        SvgEvent::CubicTo(point(5.0, 0.0), point(10.0, 10.0), point(10.0, 0.0))
    );

    // A quadratic curve does not count.
    let events = path_data("M0 0 Q 3 3 6 0 S 10 10 10 0");
    assert_eq!(
        events[2],
        SvgEvent::CubicTo(point(6.0, 0.0), point(10.0, 10.0), point(10.0, 0.0))
    );
}

#[test]
fn quadratic_curves() {
    let events = path_data("M0 0 Q 3 3 6 0 T 12 0");
    assert_eq!(
        events,
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::CubicTo(point(2.0, 2.0), point(4.0, 2.0), point(6.0, 0.0)),
            SvgEvent::CubicTo(point(8.0, -2.0), point(10.0, -2.0), point(12.0, 0.0)),
        ]
    );

    // A smooth quadratic curve after a line is a straight line.
    let events = path_data("M0 0 L 3 0 T 6 0");
    assert_eq!(
        events[2],
        SvgEvent::CubicTo(point(3.0, 0.0), point(4.0, 0.0), point(6.0, 0.0))
    );
}

#[test]
fn arcs() {
    assert_eq!(
        path_data("M0 0 A 0 5 0 0 1 10 0"),
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::CubicTo(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 0.0)),
        ]
    );

    assert_eq!(
        path_data("M0 0 A 5 5 0 0 1 0 0"),
        vec![SvgEvent::MoveTo(point(0.0, 0.0))]
    );

    let events = path_data("M10 0 A 10 10 0 0 1 0 10");
    assert_eq!(events.len(), 2);
    match events[1] {
        SvgEvent::CubicTo(_, _, to) => assert_eq!(to, point(0.0, 10.0)),
        _ => panic!("{:?}", events),
    }

    // Negative radii are treated as positive.
    assert_eq!(events, path_data("M10 0 A -10 -10 0 0 1 0 10"));

    for event in path_data("M0 0 a 20 10 15 1 1 30 5 l 1 1") {
        assert!(event.is_reduced());
    }
}

#[test]
fn subpaths() {
    let groups = subpath_array("M0 0 L1 0 m 5 5 l 1 0 Z M 3 3");
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups[0],
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::LineTo(point(1.0, 0.0)),
        ]
    );
    assert_eq!(
        groups[1],
        vec![
            SvgEvent::MoveTo(point(6.0, 5.0)),
            SvgEvent::LineTo(point(7.0, 5.0)),
            SvgEvent::Close,
        ]
    );
    assert_eq!(groups[2], vec![SvgEvent::MoveTo(point(3.0, 3.0))]);

    assert!(subpath_array("").is_empty());
}

#[test]
fn malformed_data_is_truncated() {
    assert_eq!(
        path_data("M0 0 L 10 0 L 5 *"),
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::LineTo(point(10.0, 0.0)),
        ]
    );

    assert!(path_data("L 10 10").is_empty());
    assert!(path_data("").is_empty());
}

#[test]
fn relative_events_are_not_reduced() {
    let events = reduce(&[
        SvgEvent::MoveTo(point(0.0, 0.0)),
        SvgEvent::RelativeLineTo(vector(1.0, 1.0)),
    ]);
    assert_eq!(events[1], SvgEvent::RelativeLineTo(vector(1.0, 1.0)));
    assert!(!events[1].is_reduced());
}

#[test]
fn relative_move_to_starts_from_previous_group() {
    let groups = subpath_array("M 0 0 L 1 0 m 5 5 l 1 0");
    assert_eq!(
        groups,
        vec![
            vec![SvgEvent::MoveTo(point(0.0, 0.0)), SvgEvent::LineTo(point(1.0, 0.0))],
            vec![SvgEvent::MoveTo(point(6.0, 5.0)), SvgEvent::LineTo(point(7.0, 5.0))],
        ]
    );
}
