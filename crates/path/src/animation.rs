//! Positions along a path, for animations.
//!
//! Scheduling and timing are left to the caller: a [`PathAnimator`] only maps a
//! progress value in `[0, 1]` to a point, moving at approximately constant speed
//! along the whole path.

use crate::geom::traits::Animator;
use crate::geom::utils::{lerp_points, CURVE_APPROX_T_STEP};
use crate::geom::{CubicCurve2D, Point, QuadCurve2D};
use crate::path::Path2D;
use crate::segment::{Segment, SegmentEvent};

/// Samples positions along a sequence of segments, weighted by their lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathAnimator {
    segments: Vec<SegmentEvent>,
    lengths: Vec<f64>,
    total_length: f64,
}

impl PathAnimator {
    pub fn new() -> Self {
        PathAnimator::default()
    }

    /// An animator following every drawing segment of `path`.
    pub fn from_path(path: &Path2D) -> Self {
        let mut animator = PathAnimator::new();
        for segment in path.segments() {
            animator.add_segment(segment);
        }

        animator
    }

    /// Appends a segment.
    ///
    /// Move-tos are ignored and closes are followed as straight lines. Returns whether the
    /// segment was added.
    pub fn add_segment(&mut self, segment: &Segment) -> bool {
        let event = match segment.event() {
            Some(SegmentEvent::MoveTo { .. }) => return false,
            Some(event) => event,
            None => {
                log::debug!("ignoring malformed segment {:?}", segment);
                return false;
            }
        };

        let length = segment_length(&event);
        self.segments.push(event);
        self.lengths.push(length);
        self.total_length += length;

        true
    }

    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.lengths.clear();
        self.total_length = 0.0;
    }

    /// The point at `t` of the way along the segments, or `None` if there are none.
    pub fn position(&self, t: f64) -> Option<Point> {
        let idx = self.index_for_time(t)?;
        let segment = self.segments.get(idx)?;

        let target = self.total_length * t;
        let before: f64 = self.lengths[..idx].iter().sum();
        let length = self.lengths[idx];
        let local_t = if t >= 1.0 {
            1.0
        } else if length > 0.0 {
            (target - before) / length
        } else {
            0.0
        };

        Some(match *segment {
            SegmentEvent::LineTo { from, to } | SegmentEvent::Close { last: from, first: to } => {
                lerp_points(from, to, local_t)
            }
            SegmentEvent::QuadTo { from, ctrl, to } => QuadCurve2D::point_at(from, ctrl, to, local_t),
            SegmentEvent::CubicTo {
                from,
                ctrl1,
                ctrl2,
                to,
            } => CubicCurve2D::point_at(from, ctrl1, ctrl2, to, local_t),
            SegmentEvent::MoveTo { at } => at,
        })
    }

    fn index_for_time(&self, t: f64) -> Option<usize> {
        let last = self.segments.len().checked_sub(1)?;
        if t <= 0.0 {
            return Some(0);
        }
        if t >= 1.0 {
            return Some(last);
        }

        let target = self.total_length * t;
        let mut end = 0.0;
        for (idx, length) in self.lengths.iter().enumerate() {
            end += length;
            if end >= target {
                return Some(idx);
            }
        }

        Some(last)
    }

    /// Points of a cubic bézier curve every `CURVE_APPROX_T_STEP`, both ends included.
    pub fn cubic_point_array(p1: Point, p2: Point, p3: Point, p4: Point) -> Vec<Point> {
        approx_points(|t| CubicCurve2D::point_at(p1, p2, p3, p4, t))
    }

    /// Points of a quadratic bézier curve every `CURVE_APPROX_T_STEP`, both ends included.
    pub fn quad_point_array(p1: Point, p2: Point, p3: Point) -> Vec<Point> {
        approx_points(|t| QuadCurve2D::point_at(p1, p2, p3, t))
    }
}

impl Animator for PathAnimator {
    /// Returns the origin when there are no segments.
    fn animation_value(&self, t: f64) -> Point {
        self.position(t).unwrap_or_else(Point::zero)
    }
}

fn segment_length(segment: &SegmentEvent) -> f64 {
    match *segment {
        SegmentEvent::LineTo { from, to } | SegmentEvent::Close { last: from, first: to } => {
            (to - from).length()
        }
        SegmentEvent::QuadTo { from, ctrl, to } => QuadCurve2D::new(from, ctrl, to).length(),
        SegmentEvent::CubicTo {
            from,
            ctrl1,
            ctrl2,
            to,
        } => CubicCurve2D::new(from, ctrl1, ctrl2, to).length(),
        SegmentEvent::MoveTo { .. } => 0.0,
    }
}

fn approx_points<F: Fn(f64) -> Point>(curve: F) -> Vec<Point> {
    let steps = (1.0 / CURVE_APPROX_T_STEP).round() as usize;
    (0..=steps).map(|i| curve(i as f64 / steps as f64)).collect()
}

#[cfg(test)]
use crate::geom::point;
#[cfg(test)]
use approx::assert_relative_eq;

#[cfg(test)]
fn corner() -> Path2D {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    path
}

#[test]
fn lines_at_constant_speed() {
    let animator = PathAnimator::from_path(&corner());
    assert_eq!(animator.len(), 2);
    assert_eq!(animator.total_length(), 20.0);

    assert_eq!(animator.animation_value(0.0), point(0.0, 0.0));
    assert_eq!(animator.animation_value(0.25), point(5.0, 0.0));
    assert_eq!(animator.animation_value(0.5), point(10.0, 0.0));
    assert_eq!(animator.animation_value(0.75), point(10.0, 5.0));
    assert_eq!(animator.animation_value(1.0), point(10.0, 10.0));
    assert_eq!(animator.animation_value(2.0), point(10.0, 10.0));
}

#[test]
fn close_is_followed() {
    let mut path = corner();
    path.close_path().unwrap();
    let animator = PathAnimator::from_path(&path);

    assert_eq!(animator.len(), 3);
    assert_relative_eq!(animator.total_length(), 20.0 + 200.0f64.sqrt());
    assert_eq!(animator.animation_value(1.0), point(0.0, 0.0));
}

#[test]
fn curves() {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.cubic_to(point(0.0, 10.0), point(10.0, 10.0), point(10.0, 0.0))
        .unwrap();
    let animator = PathAnimator::from_path(&path);

    assert_eq!(animator.animation_value(0.0), point(0.0, 0.0));
    assert_eq!(animator.animation_value(1.0), point(10.0, 0.0));
    // The curve is symmetric, half of its length is reached at its middle.
    let mid = animator.animation_value(0.5);
    assert_relative_eq!(mid.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(mid.y, 7.5, epsilon = 1e-9);
}

#[test]
fn empty_animator() {
    let mut animator = PathAnimator::from_path(&corner());
    animator.clear();

    assert!(animator.is_empty());
    assert_eq!(animator.total_length(), 0.0);
    assert_eq!(animator.position(0.5), None);
    assert_eq!(animator.animation_value(0.5), point(0.0, 0.0));

    let move_to = Segment::new(crate::SegmentKind::MoveTo, &[point(1.0, 1.0)], 0);
    assert!(!animator.add_segment(&move_to));
    assert!(animator.is_empty());
}

#[test]
fn point_arrays() {
    let points = PathAnimator::quad_point_array(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    assert_eq!(points.len(), 51);
    assert_eq!(points[0], point(0.0, 0.0));
    assert_eq!(points[50], point(10.0, 0.0));
    assert_relative_eq!(points[25].y, 5.0, epsilon = 1e-12);

    let points = PathAnimator::cubic_point_array(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    assert_eq!(points.len(), 51);
    assert_relative_eq!(points[25].x, 5.0, epsilon = 1e-12);
    assert_relative_eq!(points[25].y, 7.5, epsilon = 1e-12);
}
